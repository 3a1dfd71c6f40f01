//! Integration tests for the address book routes.

use axum::http::StatusCode;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde_json::{Value, json};

use crate::helpers::TestApp;

fn contact(first: &str, last: &str, email: &str, phone: &str, birthday: NaiveDate) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": email,
        "phone": phone,
        "birthday": birthday.to_string(),
    })
}

/// A birthday in 1992 falling on the same month/day as `today + offset`.
fn birthday_in(offset_days: i64) -> NaiveDate {
    let day = Utc::now().date_naive() + Duration::days(offset_days);
    day.with_year(1992).expect("1992 is a leap year")
}

#[tokio::test]
async fn test_contact_crud() {
    let app = TestApp::new();
    let token = app.register("owner", "owner@example.com", "secret1").await;
    let token = Some(token.as_str());
    let birthday = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();

    let created = app
        .request(
            "POST",
            "/api/contacts/",
            Some(contact("John", "Doe", "john@example.com", "+380501112233", birthday)),
            token,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["birthday"], "1990-05-17");
    let id = created.body["id"].as_i64().unwrap();

    let duplicate = app
        .request(
            "POST",
            "/api/contacts/",
            Some(contact("Jane", "Doe", "john@example.com", "+380509999999", birthday)),
            token,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["detail"], "Email or phone number already exists.");

    let fetched = app
        .request("GET", &format!("/api/contacts/{id}"), None, token)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["first_name"], "John");

    let updated = app
        .request(
            "PUT",
            &format!("/api/contacts/{id}"),
            Some(contact("Johnny", "Doe", "john@example.com", "+380501112233", birthday)),
            token,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["first_name"], "Johnny");

    let deleted = app
        .request("DELETE", &format!("/api/contacts/{id}"), None, token)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["id"], id);

    let gone = app
        .request("GET", &format!("/api/contacts/{id}"), None, token)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["detail"], "Contact not found");
}

#[tokio::test]
async fn test_contact_search_is_case_insensitive() {
    let app = TestApp::new();
    let token = app.register("owner", "owner@example.com", "secret1").await;
    let token = Some(token.as_str());
    let birthday = NaiveDate::from_ymd_opt(1985, 1, 2).unwrap();

    for (first, last, email, phone) in [
        ("John", "Doe", "john@example.com", "1"),
        ("Mary", "Johnson", "mary@example.com", "2"),
        ("Peter", "Parker", "peter@daily.com", "3"),
    ] {
        let r = app
            .request(
                "POST",
                "/api/contacts/",
                Some(contact(first, last, email, phone, birthday)),
                token,
            )
            .await;
        assert_eq!(r.status, StatusCode::CREATED);
    }

    let by_first = app
        .request("GET", "/api/contacts/?first_name=JOHN", None, token)
        .await;
    assert_eq!(by_first.body.as_array().unwrap().len(), 1);

    let by_email = app
        .request("GET", "/api/contacts/?email=example", None, token)
        .await;
    assert_eq!(by_email.body.as_array().unwrap().len(), 2);

    let all = app.request("GET", "/api/contacts", None, token).await;
    assert_eq!(all.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_contacts_are_scoped_to_owner() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com", "secret1").await;
    let bob = app.register("bob", "bob@example.com", "secret1").await;
    let birthday = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();

    let created = app
        .request(
            "POST",
            "/api/contacts/",
            Some(contact("Shared", "Person", "shared@example.com", "555", birthday)),
            Some(&alice),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let foreign = app
        .request("GET", &format!("/api/contacts/{id}"), None, Some(&bob))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);

    let foreign_delete = app
        .request("DELETE", &format!("/api/contacts/{id}"), None, Some(&bob))
        .await;
    assert_eq!(foreign_delete.status, StatusCode::NOT_FOUND);

    // the same email and phone are fine in another address book
    let own_copy = app
        .request(
            "POST",
            "/api/contacts/",
            Some(contact("Shared", "Person", "shared@example.com", "555", birthday)),
            Some(&bob),
        )
        .await;
    assert_eq!(own_copy.status, StatusCode::CREATED);

    let listed = app.request("GET", "/api/contacts/", None, Some(&bob)).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upcoming_birthdays() {
    let app = TestApp::new();
    let token = app.register("owner", "owner@example.com", "secret1").await;
    let token = Some(token.as_str());

    for (name, phone, offset) in [("Soon", "1", 3), ("Later", "2", 40), ("Today", "3", 0)] {
        let r = app
            .request(
                "POST",
                "/api/contacts/",
                Some(contact(
                    name,
                    "X",
                    &format!("{}@example.com", name.to_lowercase()),
                    phone,
                    birthday_in(offset),
                )),
                token,
            )
            .await;
        assert_eq!(r.status, StatusCode::CREATED);
    }

    let week = app
        .request("GET", "/api/contacts/birthdays", None, token)
        .await;
    assert_eq!(week.status, StatusCode::OK);
    let names: Vec<&str> = week
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Today", "Soon"]);

    let wide = app
        .request("GET", "/api/contacts/birthdays?days=60", None, token)
        .await;
    assert_eq!(wide.body.as_array().unwrap().len(), 3);

    let too_wide = app
        .request("GET", "/api/contacts/birthdays?days=400", None, token)
        .await;
    assert_eq!(too_wide.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_path_query_and_body_use_error_shape() {
    let app = TestApp::new();
    let token = app.register("ivy", "ivy@example.com", "secret1").await;
    let token = Some(token.as_str());

    let bad_id = app.request("GET", "/api/contacts/abc", None, token).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.body["error"], "INVALID");

    let bad_days = app
        .request("GET", "/api/contacts/birthdays?days=abc", None, token)
        .await;
    assert_eq!(bad_days.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_days.body["error"], "INVALID");

    let mut body = contact("Ann", "Lee", "ann@example.com", "555-0100", birthday_in(3));
    body["birthday"] = json!("not-a-date");
    let bad_date = app
        .request("POST", "/api/contacts/", Some(body), token)
        .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_date.body["error"], "INVALID");

    let bad_user_id = app.request("GET", "/api/users/abc", None, token).await;
    assert_eq!(bad_user_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_user_id.body["error"], "INVALID");
}

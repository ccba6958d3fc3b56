// src/tests/router_tests/customer_tests.rs
use chrono::Duration;

use crate::domain::{CustomerStatus, PlanDuration};
use crate::errors::ServerError;
use crate::router::{handle_at, AppState};
use crate::tests::utils::*;

fn add_customer(state: &AppState, token: &str, email: &str, phone: &str, status: &str) {
    let resp = handle_at(
        post(
            "/customers",
            Some(token),
            &[
                ("email", email),
                ("phone", phone),
                ("plan_duration", "1 year"),
                ("status", status),
                ("view", status),
            ],
        ),
        state,
        now(),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
}

fn click(state: &AppState, token: &str, id: &str, action: &str, view: &str) -> String {
    let resp = handle_at(
        post(&format!("/customers/{id}/{action}"), Some(token), &[("view", view)]),
        state,
        now(),
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    header(&resp, "Location")
}

#[test]
fn add_customer_redirects_with_notice() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    let resp = handle_at(
        post(
            "/customers",
            Some(&token),
            &[
                ("email", "chloe@example.com"),
                ("phone", "555-0101"),
                ("plan_duration", "3 years"),
                ("status", "active"),
                ("view", "active"),
                ("q", "chl"),
            ],
        ),
        &state,
        now(),
    )?;
    assert_eq!(resp.status(), 303);
    let location = header(&resp, "Location");
    assert!(location.starts_with("/?view=active&tab=40-plus-access&q=chl&notice=Customer+Added"));

    let c = customer_by_email(&state, "chloe@example.com");
    assert_eq!(c.status, CustomerStatus::Active);
    assert_eq!(c.plan_duration, Some(PlanDuration::ThreeYears));
    assert_eq!(c.expiration_date, Some(PlanDuration::ThreeYears.expiration_from(now())));

    let page = handle_at(get(&location, Some(&token)), &state, now())?;
    let body = body_string(page);
    assert!(body.contains("Customer Added"));
    assert!(body.contains("chloe@example.com"));
    Ok(())
}

#[test]
fn invalid_customer_form_rerenders_dialog() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    let resp = handle_at(
        post(
            "/customers",
            Some(&token),
            &[("email", "not-an-email"), ("phone", "123"), ("plan_duration", "1 year"), ("status", "active")],
        ),
        &state,
        now(),
    )?;
    assert_eq!(resp.status(), 400);
    let body = body_string(resp);
    assert!(body.contains("<dialog"));
    assert!(body.contains("Invalid email address."));
    assert!(body.contains("Phone number is too short."));
    assert!(body.contains("value=\"not-an-email\""));
    assert!(state.manager.all()?.is_empty());
    Ok(())
}

#[test]
fn switch_takes_four_clicks() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "active");
    let id = customer_by_email(&state, "a@b.com").id;

    for n in 1..4 {
        let location = click(&state, &token, &id, "switch", "active");
        assert!(location.contains("Click+"));
        assert_eq!(customer_by_email(&state, "a@b.com").switch_clicks, n);
        assert_eq!(customer_by_email(&state, "a@b.com").status, CustomerStatus::Active);
    }

    let location = click(&state, &token, &id, "switch", "active");
    assert!(location.contains("notice=Status+Switched%21"));
    let c = customer_by_email(&state, "a@b.com");
    assert_eq!(c.status, CustomerStatus::Pending);
    assert_eq!(c.switch_clicks, 0);
    assert!(c.purchase_date.is_none());
    assert!(c.expiration_date.is_none());
    Ok(())
}

#[test]
fn archive_without_reason_is_rejected() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "active");
    let id = customer_by_email(&state, "a@b.com").id;

    let resp = handle_at(
        post(&format!("/customers/{id}/archive"), Some(&token), &[("reason", "   ")]),
        &state,
        now(),
    )?;
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Please provide a reason for archiving."));
    let c = customer_by_email(&state, "a@b.com");
    assert!(!c.is_archived);
    assert!(c.reason_for_archival.is_none());
    Ok(())
}

#[test]
fn archive_restore_round_trip() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "pending");
    let id = customer_by_email(&state, "a@b.com").id;

    let resp = handle_at(
        post(
            &format!("/customers/{id}/archive"),
            Some(&token),
            &[("reason", "asked to pause"), ("view", "pending")],
        ),
        &state,
        now(),
    )?;
    assert_eq!(resp.status(), 303);
    let c = customer_by_email(&state, "a@b.com");
    assert!(c.is_archived);
    assert_eq!(c.reason_for_archival.as_deref(), Some("asked to pause"));

    click(&state, &token, &id, "restore", "archived");
    click(&state, &token, &id, "restore", "archived");
    assert!(customer_by_email(&state, "a@b.com").is_archived);

    let location = click(&state, &token, &id, "restore", "archived");
    assert!(location.contains("notice=Customer+Restored"));
    let c = customer_by_email(&state, "a@b.com");
    assert!(!c.is_archived);
    assert!(c.reason_for_archival.is_none());
    assert_eq!(c.restore_clicks, 0);
    Ok(())
}

#[test]
fn delete_thresholds_depend_on_view() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);

    // Archived view: five clicks.
    add_customer(&state, &token, "old@b.com", "5550101", "active");
    let old = customer_by_email(&state, "old@b.com").id;
    handle_at(
        post(&format!("/customers/{old}/archive"), Some(&token), &[("reason", "duplicate")]),
        &state,
        now(),
    )?;
    for _ in 0..4 {
        click(&state, &token, &old, "delete", "archived");
    }
    assert_eq!(customer_by_email(&state, "old@b.com").delete_clicks, 4);
    click(&state, &token, &old, "delete", "archived");
    assert!(state.manager.find(&old)?.is_none());

    // Follow-up view: four clicks.
    handle_at(
        post(
            "/follow-ups",
            Some(&token),
            &[("phone", "5550199"), ("note", "call back"), ("days", "3"), ("view", "follow-up")],
        ),
        &state,
        now(),
    )?;
    let lead = customer_by_email(&state, "5550199@example.com").id;
    for _ in 0..3 {
        click(&state, &token, &lead, "delete", "follow-up");
    }
    assert!(state.manager.find(&lead)?.is_some());
    let location = click(&state, &token, &lead, "delete", "follow-up");
    assert!(location.contains("notice=Customer+Deleted"));
    assert!(state.manager.find(&lead)?.is_none());
    Ok(())
}

#[test]
fn delete_outside_its_views_is_bad_request() {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "active");
    let id = customer_by_email(&state, "a@b.com").id;

    let req = post(&format!("/customers/{id}/delete"), Some(&token), &[("view", "active")]);
    assert!(matches!(handle_at(req, &state, now()), Err(ServerError::BadRequest(_))));
    assert_eq!(customer_by_email(&state, "a@b.com").delete_clicks, 0);
}

#[test]
fn follow_up_attaches_to_existing_phone() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "active");

    let resp = handle_at(
        post(
            "/follow-ups",
            Some(&token),
            &[("phone", "5550101"), ("note", "renewal"), ("days", "5"), ("view", "follow-up")],
        ),
        &state,
        now(),
    )?;
    assert!(header(&resp, "Location").contains("notice=Follow-up+Scheduled"));

    let all = state.manager.all()?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].notes.as_deref(), Some("renewal"));
    assert_eq!(all[0].follow_up_date, Some(now() + Duration::days(5)));

    let page = handle_at(get("/?view=follow-up", Some(&token)), &state, now())?;
    assert!(body_string(page).contains("a@b.com"));
    Ok(())
}

#[test]
fn follow_up_form_rejects_bad_days() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    let resp = handle_at(
        post(
            "/follow-ups",
            Some(&token),
            &[("phone", "5550101"), ("note", ""), ("days", "-2")],
        ),
        &state,
        now(),
    )?;
    assert_eq!(resp.status(), 400);
    let body = body_string(resp);
    assert!(body.contains("Note cannot be empty."));
    assert!(body.contains("Days must be a positive number."));
    Ok(())
}

#[test]
fn search_filters_current_view() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "Chloe.Miller@example.com", "555-0101", "active");
    add_customer(&state, &token, "liam@example.com", "555-0102", "active");
    add_customer(&state, &token, "chloe.pending@example.com", "555-0103", "pending");

    let page = handle_at(get("/?view=active&q=chloe", Some(&token)), &state, now())?;
    let body = body_string(page);
    assert!(body.contains("Chloe.Miller@example.com"));
    assert!(!body.contains("liam@example.com"));
    assert!(!body.contains("chloe.pending@example.com"));

    let page = handle_at(get("/?view=active&q=0102", Some(&token)), &state, now())?;
    assert!(body_string(page).contains("liam@example.com"));
    Ok(())
}

#[test]
fn notes_access_plan_and_reason_edits() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "pending");
    let id = customer_by_email(&state, "a@b.com").id;

    handle_at(
        post(&format!("/customers/{id}/notes"), Some(&token), &[("notes", "prefers email")]),
        &state,
        now(),
    )?;
    assert_eq!(customer_by_email(&state, "a@b.com").notes.as_deref(), Some("prefers email"));

    let resp = handle_at(
        post(&format!("/customers/{id}/access-plan"), Some(&token), &[("app", "")]),
        &state,
        now(),
    )?;
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Please select an app."));

    handle_at(
        post(&format!("/customers/{id}/access-plan"), Some(&token), &[("app", "revit")]),
        &state,
        now(),
    )?;
    let c = customer_by_email(&state, "a@b.com");
    assert!(c.has_access_plan);
    assert_eq!(c.autodesk_app.as_deref(), Some("Revit"));

    handle_at(
        post(&format!("/customers/{id}/archive"), Some(&token), &[("reason", "first")]),
        &state,
        now(),
    )?;
    handle_at(
        post(&format!("/customers/{id}/reason"), Some(&token), &[("reason", "second")]),
        &state,
        now(),
    )?;
    assert_eq!(
        customer_by_email(&state, "a@b.com").reason_for_archival.as_deref(),
        Some("second")
    );
    Ok(())
}

#[test]
fn dialog_opens_from_query() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "active");
    let id = customer_by_email(&state, "a@b.com").id;

    let page = handle_at(get(&format!("/?dialog=archive&id={id}"), Some(&token)), &state, now())?;
    let body = body_string(page);
    assert!(body.contains("Archive a@b.com"));
    assert!(body.contains(&format!("action=\"/customers/{id}/archive\"")));
    Ok(())
}

#[test]
fn unknown_customer_is_not_found() {
    let state = password_state();
    let token = sign_in(&state);
    let req = post("/customers/missing/switch", Some(&token), &[("view", "active")]);
    assert!(matches!(handle_at(req, &state, now()), Err(ServerError::NotFound)));
}

#[test]
fn oversized_form_is_rejected_without_saving() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    add_customer(&state, &token, "a@b.com", "5550101", "active");
    let id = customer_by_email(&state, "a@b.com").id;
    handle_at(
        post(&format!("/customers/{id}/notes"), Some(&token), &[("notes", "prefers email")]),
        &state,
        now(),
    )?;

    let huge = "x".repeat(70_000);
    let req = post(&format!("/customers/{id}/notes"), Some(&token), &[("notes", huge.as_str())]);
    assert!(matches!(handle_at(req, &state, now()), Err(ServerError::BadRequest(_))));
    assert_eq!(customer_by_email(&state, "a@b.com").notes.as_deref(), Some("prefers email"));
    Ok(())
}

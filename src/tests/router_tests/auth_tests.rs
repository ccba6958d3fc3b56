// src/tests/router_tests/auth_tests.rs
use chrono::Duration;

use crate::errors::ServerError;
use crate::router::handle_at;
use crate::tests::utils::*;

#[test]
fn signed_out_visitor_sees_login_form() -> Result<(), ServerError> {
    let state = password_state();
    let resp = handle_at(get("/", None), &state, now())?;
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("action=\"/login\""));
    assert!(!body.contains("Customers</h1>"));
    Ok(())
}

#[test]
fn wrong_password_is_rejected_inline() -> Result<(), ServerError> {
    let state = password_state();
    let resp = handle_at(post("/login", None, &[("password", "nope")]), &state, now())?;
    assert_eq!(resp.status(), 401);
    assert!(header(&resp, "Set-Cookie").is_empty());
    assert!(body_string(resp).contains("Incorrect password. Please try again."));
    Ok(())
}

#[test]
fn correct_password_sets_session_cookie() -> Result<(), ServerError> {
    let state = password_state();
    let resp = handle_at(post("/login", None, &[("password", PASSWORD)]), &state, now())?;
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/");

    let cookie = header(&resp, "Set-Cookie");
    let token = cookie
        .strip_prefix("session=")
        .and_then(|rest| rest.split(';').next())
        .unwrap()
        .to_string();

    let page = handle_at(get("/", Some(&token)), &state, now())?;
    assert_eq!(page.status(), 200);
    assert!(body_string(page).contains("Customers</h1>"));
    Ok(())
}

#[test]
fn mutations_require_a_session() {
    let state = password_state();
    let req = post(
        "/customers",
        None,
        &[("email", "a@b.com"), ("phone", "5550101"), ("plan_duration", "1 year"), ("status", "active")],
    );
    match handle_at(req, &state, now()) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got: {:?}", other.map(|r| r.status())),
    }
    assert!(state.manager.all().unwrap().is_empty());

    match handle_at(get("/api/customers", Some("forged")), &state, now()) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn anonymous_mode_signs_in_on_first_visit() -> Result<(), ServerError> {
    let state = anonymous_state();
    let resp = handle_at(get("/?view=pending", None), &state, now())?;
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/?view=pending");
    assert!(header(&resp, "Set-Cookie").starts_with("session="));
    Ok(())
}

#[test]
fn logout_revokes_session() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);

    let resp = handle_at(post("/logout", Some(&token), &[]), &state, now())?;
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    let page = handle_at(get("/", Some(&token)), &state, now())?;
    assert!(body_string(page).contains("action=\"/login\""));
    Ok(())
}

#[test]
fn cookieless_visits_do_not_pile_up_sessions() -> Result<(), ServerError> {
    let state = anonymous_state();
    let later = now() + Duration::days(8);
    for _ in 0..5 {
        handle_at(get("/", None), &state, now())?;
    }
    for _ in 0..5 {
        handle_at(get("/", None), &state, later)?;
    }

    let rows: i64 = state.manager.database().with_conn(|conn| {
        conn.query_row("select count(*) from sessions", [], |r| r.get(0))
            .map_err(|e| ServerError::DbError(e.to_string()))
    })?;
    assert_eq!(rows, 5);
    Ok(())
}

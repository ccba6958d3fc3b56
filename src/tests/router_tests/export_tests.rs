// src/tests/router_tests/export_tests.rs
use crate::errors::ServerError;
use crate::responses::xlsx::XLSX_CONTENT_TYPE;
use crate::router::handle_at;
use crate::tests::utils::*;

#[test]
fn export_downloads_workbook() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    state.manager.seed_demo(now())?;

    let resp = handle_at(get("/customers/export?view=active", Some(&token)), &state, now())?;
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), XLSX_CONTENT_TYPE);
    assert_eq!(
        header(&resp, "Content-Disposition"),
        "attachment; filename=\"customers.xlsx\""
    );
    Ok(())
}

#[test]
fn api_lists_view_with_derived_fields() -> Result<(), ServerError> {
    let state = password_state();
    let token = sign_in(&state);
    state.manager.seed_demo(now())?;

    let resp = handle_at(get("/api/customers?view=pending", Some(&token)), &state, now())?;
    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("application/json"));

    let rows: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let noah = rows
        .iter()
        .find(|r| r["email"] == "noah.williams@example.com")
        .unwrap();
    assert_eq!(noah["planInfo"], "Purchased 14 days ago");
    assert_eq!(noah["isDue"], false);
    assert_eq!(noah["status"], "pending");
    Ok(())
}

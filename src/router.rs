use std::io::Read;

use astra::Request;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use url::form_urlencoded;

use crate::auth::password::PasswordGate;
use crate::auth::sessions::{
    expired_session_cookie, find_session, revoke_session, session_cookie, token_from_cookie_header,
};
use crate::config::AuthSettings;
use crate::db::Database;
use crate::domain::confirm::{DeleteView, GuardedAction};
use crate::domain::validation::{
    AccessPlanForm, FieldErrors, FollowUpForm, FormFields, NewCustomerForm, OneAppCustomerForm,
    ReasonForm,
};
use crate::domain::view::CustomerQuery;
use crate::domain::view_state::DialogState;
use crate::domain::CustomerStatus;
use crate::errors::{ResultResp, ServerError};
use crate::manager::{CustomerManager, Notice};
use crate::responses::{
    html_response, html_response_with_status, json_response, see_other, see_other_with_cookie,
    xlsx_response,
};
use crate::spreadsheets::EXPORT_FILENAME;
use crate::templates::pages::customers::page_href;
use crate::templates::pages::{customers_page, login_page, CustomersPageVm};

const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Shared by every worker thread.
#[derive(Debug, Clone)]
pub struct AppState {
    pub manager: CustomerManager,
    pub gate: PasswordGate,
}

impl AppState {
    pub fn new(db: Database, auth: AuthSettings) -> Self {
        Self {
            manager: CustomerManager::new(db),
            gate: PasswordGate::new(auth),
        }
    }

    fn db(&self) -> &Database {
        self.manager.database()
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    handle_at(req, state, Utc::now())
}

/// Routes one request with an explicit clock.
pub fn handle_at(req: Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "request");

    let token = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
        .map(str::to_string);

    match (method.as_str(), path.as_str()) {
        ("POST", "/login") => return login(req, state, now),
        ("POST", "/logout") => return logout(token.as_deref(), state, now),
        _ => {}
    }

    let signed_in = match token.as_deref() {
        Some(t) => state
            .db()
            .with_conn(|conn| find_session(conn, t, now.timestamp()))?
            .is_some(),
        None => false,
    };

    if !signed_in {
        return match (method.as_str(), path.as_str()) {
            ("GET", "/") => welcome(&req, state, now),
            _ => Err(ServerError::Unauthorized("Please sign in.".into())),
        };
    }

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => home(&req, state, now),
        ("GET", "/customers/export") => {
            let query = CustomerQuery::from_fields(&query_fields(&req));
            xlsx_response(state.manager.export(&query, now)?, EXPORT_FILENAME)
        }
        ("GET", "/api/customers") => {
            let query = CustomerQuery::from_fields(&query_fields(&req));
            json_response(&state.manager.snapshot(&query, now)?.rows)
        }
        ("POST", "/customers") => add_customer(req, state, now),
        ("POST", "/customers/one-app") => add_one_app_customer(req, state, now),
        ("POST", "/follow-ups") => add_follow_up(req, state, now),
        ("POST", p) => match p.strip_prefix("/customers/").and_then(|rest| rest.split_once('/')) {
            Some((id, action)) if !id.is_empty() => customer_action(req, state, id, action, now),
            _ => Err(ServerError::NotFound),
        },
        _ => Err(ServerError::NotFound),
    }
}

fn query_fields(req: &Request) -> FormFields {
    req.uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn read_form(req: Request) -> Result<FormFields, ServerError> {
    let mut body = String::new();
    req.into_body()
        .reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Unreadable form body: {e}")))?;
    if body.len() as u64 > MAX_FORM_BYTES {
        return Err(ServerError::BadRequest("Form too large".into()));
    }
    Ok(form_urlencoded::parse(body.as_bytes()).into_owned().collect())
}

// ---------------------------------------------------------------------------
// Sessions

/// Signed-out visitors: anonymous mode hands out a session, password mode
/// shows the sign-in form.
fn welcome(req: &Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let issued = state
        .db()
        .with_conn(|conn| state.gate.sign_in_anonymously(conn, now.timestamp()))?;

    match issued {
        Some(token) => {
            let back = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".into());
            see_other_with_cookie(
                &back,
                &session_cookie(&token, state.gate.settings().session_ttl_secs),
            )
        }
        None => html_response(login_page(None)),
    }
}

fn login(req: Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let fields = read_form(req)?;
    let password = fields.get("password").map(String::as_str).unwrap_or("");

    let signed_in = state
        .db()
        .with_conn(|conn| state.gate.sign_in(conn, password, now.timestamp()));

    match signed_in {
        Ok(token) => {
            info!("signed in");
            see_other_with_cookie(
                "/",
                &session_cookie(&token, state.gate.settings().session_ttl_secs),
            )
        }
        Err(ServerError::Unauthorized(msg)) => {
            html_response_with_status(401, login_page(Some(&msg)))
        }
        Err(e) => Err(e),
    }
}

fn logout(token: Option<&str>, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    if let Some(t) = token {
        state
            .db()
            .with_conn(|conn| revoke_session(conn, t, now.timestamp()))?;
        info!("signed out");
    }
    see_other_with_cookie("/", &expired_session_cookie())
}

// ---------------------------------------------------------------------------
// Page

fn home(req: &Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let params = query_fields(req);
    let query = CustomerQuery::from_fields(&params);
    let dialog = DialogState::parse(
        params.get("dialog").map(String::as_str),
        params.get("id").map(String::as_str),
    );
    let notice = params.get("notice").filter(|t| !t.is_empty()).map(|title| Notice {
        title: title.clone(),
        detail: params.get("detail").cloned().unwrap_or_default(),
    });

    render_page(
        state,
        PageRequest {
            query,
            dialog,
            notice,
            form: FormFields::new(),
            errors: FieldErrors::default(),
        },
        200,
        now,
    )
}

struct PageRequest {
    query: CustomerQuery,
    dialog: DialogState,
    notice: Option<Notice>,
    form: FormFields,
    errors: FieldErrors,
}

fn render_page(state: &AppState, page: PageRequest, status: u16, now: DateTime<Utc>) -> ResultResp {
    let view = state.manager.snapshot(&page.query, now)?;
    let dialog_customer = match page.dialog.customer_id() {
        Some(id) => state.manager.find(id)?,
        None => None,
    };

    html_response_with_status(
        status,
        customers_page(&CustomersPageVm {
            query: page.query,
            view,
            dialog: page.dialog,
            dialog_customer,
            notice: page.notice,
            form: page.form,
            errors: page.errors,
        }),
    )
}

/// The page again, dialog open with the submitted values and their errors.
fn rejected(
    state: &AppState,
    dialog: DialogState,
    form: FormFields,
    errors: FieldErrors,
    now: DateTime<Utc>,
) -> ResultResp {
    debug!(?dialog, "form rejected");
    let query = CustomerQuery::from_fields(&form);
    render_page(
        state,
        PageRequest {
            query,
            dialog,
            notice: None,
            form,
            errors,
        },
        400,
        now,
    )
}

fn back_with_notice(query: &CustomerQuery, notice: &Notice) -> ResultResp {
    see_other(&page_href(
        query,
        &[("notice", notice.title.as_str()), ("detail", notice.detail.as_str())],
    ))
}

// ---------------------------------------------------------------------------
// Mutations

fn add_customer(req: Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let fields = read_form(req)?;
    let query = CustomerQuery::from_fields(&fields);
    match NewCustomerForm::parse(&fields) {
        Ok(form) => back_with_notice(&query, &state.manager.add_customer(&form, now)?),
        Err(errors) => {
            let status = fields
                .get("status")
                .and_then(|s| CustomerStatus::parse(s))
                .unwrap_or(CustomerStatus::Pending);
            rejected(state, DialogState::AddCustomer(status), fields, errors, now)
        }
    }
}

fn add_one_app_customer(req: Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let fields = read_form(req)?;
    let query = CustomerQuery::from_fields(&fields);
    match OneAppCustomerForm::parse(&fields) {
        Ok(form) => back_with_notice(
            &query,
            &state.manager.add_one_app_customer(&form, query.view, now)?,
        ),
        Err(errors) => rejected(state, DialogState::AddOneAppCustomer, fields, errors, now),
    }
}

fn add_follow_up(req: Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let fields = read_form(req)?;
    let query = CustomerQuery::from_fields(&fields);
    match FollowUpForm::parse(&fields) {
        Ok(form) => back_with_notice(&query, &state.manager.add_follow_up(&form, now)?),
        Err(errors) => rejected(state, DialogState::AddFollowUp, fields, errors, now),
    }
}

fn customer_action(
    req: Request,
    state: &AppState,
    id: &str,
    action: &str,
    now: DateTime<Utc>,
) -> ResultResp {
    let fields = read_form(req)?;
    let query = CustomerQuery::from_fields(&fields);
    let m = &state.manager;

    let notice = match action {
        "switch" => m.click(id, GuardedAction::Switch, now)?.notice(),
        "restore" => m.click(id, GuardedAction::Restore, now)?.notice(),
        "delete" => {
            let from = fields
                .get("view")
                .and_then(|v| DeleteView::parse(v))
                .ok_or_else(|| {
                    ServerError::BadRequest(
                        "Delete is only available from the archived or follow-up view.".into(),
                    )
                })?;
            m.click(id, GuardedAction::Delete(from), now)?.notice()
        }
        "archive" => match ReasonForm::parse(&fields) {
            Ok(form) => m.archive(id, &form, now)?,
            Err(errors) => {
                return rejected(state, DialogState::Archiving(id.into()), fields, errors, now)
            }
        },
        "reason" => match ReasonForm::parse(&fields) {
            Ok(form) => m.edit_reason(id, &form, now)?,
            Err(errors) => {
                return rejected(state, DialogState::EditingReason(id.into()), fields, errors, now)
            }
        },
        "notes" => {
            let notes = fields.get("notes").map(String::as_str).unwrap_or("");
            m.edit_notes(id, notes, now)?
        }
        "access-plan" => match AccessPlanForm::parse(&fields) {
            Ok(form) => m.add_access_plan(id, &form, now)?,
            Err(errors) => {
                return rejected(
                    state,
                    DialogState::AddingAccessPlan(id.into()),
                    fields,
                    errors,
                    now,
                )
            }
        },
        _ => return Err(ServerError::NotFound),
    };

    back_with_notice(&query, &notice)
}

use maud::{html, Markup};

pub mod error;
pub mod notice;

pub use error::error_page;
pub use notice::notice_toast;

pub fn button(label: &str, class: &str) -> Markup {
    html! {
        button type="submit" class=(format!("btn {class}")) { (label) }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Inline message under a form field.
pub fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = message {
            p class="field-error" { (msg) }
        }
    }
}

/// "2/4" style progress badge; hidden before the first click.
pub fn click_badge(clicks: u32, threshold: u32) -> Markup {
    html! {
        @if clicks > 0 {
            " " span class="badge clicks" { (clicks) "/" (threshold) }
        }
    }
}

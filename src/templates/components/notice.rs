use maud::{html, Markup};

pub fn notice_toast(title: &str, detail: &str) -> Markup {
    html! {
        div class="card notice" role="status" {
            strong { (title) }
            @if !detail.is_empty() {
                p { (detail) }
            }
        }
    }
}

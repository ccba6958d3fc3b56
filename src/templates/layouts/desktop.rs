use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (BASE_CSS) }
            }
            body {
              header class="topbar" {
                  svg
                      xmlns="http://www.w3.org/2000/svg"
                      width="24"
                      height="24"
                      viewBox="0 0 24 24"
                      fill="none"
                      stroke="#524ed2"
                      stroke-width="2"
                      stroke-linecap="round"
                      stroke-linejoin="round"
                  {
                      path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                      path d="M9 7m-4 0a4 4 0 1 0 8 0a4 4 0 1 0 -8 0" {}
                      path d="M3 21v-2a4 4 0 0 1 4 -4h4a4 4 0 0 1 4 4v2" {}
                      path d="M16 3.13a4 4 0 0 1 0 7.75" {}
                      path d="M21 21v-2a4 4 0 0 0 -3 -3.85" {}
                  }
                  h3 { "Customer Desk" }
                  @if signed_in {
                      form method="post" action="/logout" class="inline" {
                          button type="submit" class="btn ghost" { "Sign out" }
                      }
                  }
              }
                (content)
            }
        }
    }
}

const BASE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; background: #f8fafc; }
.topbar { display: flex; align-items: center; gap: .75rem; padding: .75rem 1.5rem; background: #fff; box-shadow: 0 1px 2px #0001; }
.topbar h3 { margin: 0; flex: 1; }
.container { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
.narrow { max-width: 420px; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; box-shadow: 0 1px 3px #0001; margin-bottom: 1rem; }
.btn { border: 1px solid #d1d5db; background: #fff; border-radius: 6px; padding: .35rem .75rem; cursor: pointer; text-decoration: none; color: inherit; font-size: .9rem; }
.btn.primary { background: #524ed2; border-color: #524ed2; color: #fff; }
.btn.danger { border-color: #dc2626; color: #dc2626; }
.btn.ghost { border-color: transparent; }
.inline { display: inline; }
.views a, .tabs a { margin-right: .5rem; }
.views a.current, .tabs a.current { font-weight: 600; text-decoration: underline; }
.badge { display: inline-block; border-radius: 999px; padding: 0 .5rem; font-size: .75rem; background: #e5e7eb; }
.badge.due { background: #fee2e2; color: #b91c1c; }
.badge.clicks { background: #fef3c7; color: #92400e; }
table { width: 100%; border-collapse: collapse; }
td, th { text-align: left; padding: .5rem; border-bottom: 1px solid #f1f5f9; vertical-align: middle; }
img.avatar { width: 32px; height: 32px; border-radius: 50%; }
.notice { border-left: 4px solid #524ed2; }
.field-error { color: #dc2626; font-size: .85rem; margin: .25rem 0 0; }
dialog { border: none; border-radius: 8px; box-shadow: 0 10px 30px #0003; min-width: 360px; }
label { display: block; margin-top: .75rem; font-size: .9rem; }
input, select, textarea { width: 100%; box-sizing: border-box; padding: .4rem; margin-top: .25rem; }
input[type=checkbox] { width: auto; }
"#;

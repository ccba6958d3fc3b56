use crate::templates::components::{button, card, field_error};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                (card("Sign in", html! {
                    p { "Enter the admin password to manage customers." }
                    form method="post" action="/login" {
                        label for="password" { "Password" }
                        input
                            type="password"
                            id="password"
                            name="password"
                            autocomplete="current-password"
                            required
                            autofocus;
                        (field_error(error))
                        p { (button("Sign in", "primary")) }
                    }
                }))
            }
        },
    )
}

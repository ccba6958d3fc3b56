pub mod components;
pub mod layouts;
pub mod pages;

pub use layouts::desktop::desktop_layout;

use url::form_urlencoded;

/// `path` with the given pairs as an encoded query string.
pub fn href(path: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_encodes_pairs() {
        assert_eq!(href("/", &[]), "/");
        assert_eq!(
            href("/", &[("view", "follow-up"), ("q", "a b&c")]),
            "/?view=follow-up&q=a+b%26c"
        );
    }
}

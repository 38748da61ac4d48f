use regex::Regex;
use std::sync::LazyLock;

// Optional scheme, dotted host with a 2-6 letter suffix, optional path.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})([/A-Za-z0-9_ .-]*)*/?$")
        .expect("URL pattern is valid")
});

pub fn is_valid_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

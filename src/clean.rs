use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<.*?>").unwrap());
static MARKDOWN_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)!?\[.*?\]\s?\(.*?\)").unwrap());

/// Replace every HTML-like tag (non-greedy, spanning newlines) with a space.
pub fn remove_html_tags(text: &str) -> String {
    HTML_TAG_RE.replace_all(text, " ").into_owned()
}

/// Replace Markdown image/link syntax (`![alt](url)` and `[text](url)`,
/// non-greedy, spanning newlines) with a space.
pub fn remove_markdown_images(text: &str) -> String {
    MARKDOWN_IMAGE_RE.replace_all(text, " ").into_owned()
}

/// Replace every literal run of four hyphens with a space.
pub fn remove_dash_runs(text: &str) -> String {
    text.replace("----", " ")
}

/// The full cleaning pass. No other normalization is applied; surrounding
/// whitespace is left as-is.
pub fn clean_text(text: &str) -> String {
    remove_dash_runs(&remove_markdown_images(&remove_html_tags(text)))
}

use scraper::Html;

/// Plain text of a headline with HTML entities decoded.
///
/// Angle brackets are escaped before parsing so text such as `<T>` stays in
/// the headline instead of being read as a tag.
pub fn plain_text(fragment: &str) -> String {
    let escaped = fragment.replace('<', "&lt;").replace('>', "&gt;");
    let parsed = Html::parse_fragment(&escaped);
    let text: String = parsed.root_element().text().collect();
    let text = text.trim();
    if text.is_empty() {
        fragment.trim().to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entities() {
        assert_eq!(
            plain_text("Tom &amp; Jerry &quot;live&quot;"),
            "Tom & Jerry \"live\""
        );
    }

    #[test]
    fn keeps_text_that_looks_like_markup() {
        assert_eq!(
            plain_text("Rust <T> generics explained"),
            "Rust <T> generics explained"
        );
        assert_eq!(
            plain_text("Why <br> tags break the layout"),
            "Why <br> tags break the layout"
        );
        assert_eq!(plain_text("Patch &amp; fixes <beta"), "Patch & fixes <beta");
    }

    #[test]
    fn decodes_escaped_brackets_once() {
        assert_eq!(plain_text("a &lt;b&gt; &amp;lt;c"), "a <b> &lt;c");
    }
}

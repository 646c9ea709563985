use scraper::Html;

/// Cleans user supplied HTML before it is stored.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, input: &str) -> String;
}

/// Whitelist sanitizer backed by `ammonia`.
///
/// Scripts, styles, event handler attributes and `javascript:` links are
/// removed; ordinary formatting tags survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, input: &str) -> String {
        ammonia::clean(input)
    }
}

/// Text content of an HTML fragment, used for the plain-text mail part.
///
/// Character references are decoded, so `a &amp; b` reads `a & b`.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(&ammonia::clean(html));
    fragment.root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_scripts_and_handlers() {
        let dirty = r#"<p onclick="steal()">Hi <b>there</b></p><script>alert(1)</script><a href="javascript:alert(2)">x</a>"#;
        let clean = AmmoniaSanitizer.sanitize(dirty);

        assert!(clean.contains("<b>there</b>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("javascript:"));
    }

    #[test]
    fn plain_text_drops_all_tags() {
        assert_eq!(plain_text("<p>Hello <em>world</em></p>"), "Hello world");
    }

    #[test]
    fn plain_text_decodes_entities() {
        assert_eq!(plain_text("<p>a &amp; b &lt;3</p>"), "a & b <3");
        assert_eq!(plain_text("<script>alert(1)</script>ok"), "ok");
    }
}

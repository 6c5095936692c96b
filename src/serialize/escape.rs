// Entity escaping for text and attribute values.
//
// Text escapes `&`, `<` and `>`. Attribute values are always written inside
// double quotes, so they additionally escape `"`.

use std::borrow::Cow;

/// Escape character data.
pub(crate) fn escape_text(value: &str) -> Cow<'_, str> {
    escape(value, false)
}

/// Escape a double-quoted attribute value.
pub(crate) fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, true)
}

fn escape(value: &str, quote: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (quote && c == '"');
    let Some(first) = value.find(needs_escape) else {
        return Cow::Borrowed(value);
    };

    let mut out = String::with_capacity(value.len() + 8);
    out.push_str(&value[..first]);
    for c in value[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_text("plain \"text\""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_text_escapes_markup() {
        assert_eq!(escape_text("A & B < C > D"), "A &amp; B &lt; C &gt; D");
    }

    #[test]
    fn test_text_keeps_quotes() {
        assert_eq!(escape_text(r#"say "hi""#), r#"say "hi""#);
    }

    #[test]
    fn test_attribute_escapes_quotes() {
        assert_eq!(
            escape_attribute(r#"a "b" & 'c'"#),
            "a &quot;b&quot; &amp; 'c'"
        );
    }

    #[test]
    fn test_existing_entities_are_escaped_again() {
        assert_eq!(escape_text("&amp;"), "&amp;amp;");
    }
}

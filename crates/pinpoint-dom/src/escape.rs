//! `CSS.escape` for selector identifiers

/// Escape a string for use as a CSS identifier (CSSOM `CSS.escape`)
///
/// ```
/// use pinpoint_dom::css_escape;
///
/// assert_eq!(css_escape("save-btn"), "save-btn");
/// assert_eq!(css_escape("1st"), "\\31 st");
/// assert_eq!(css_escape("md:px-4"), "md\\:px-4");
/// ```
pub fn css_escape(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());

    for (index, &c) in chars.iter().enumerate() {
        let code = c as u32;
        if code == 0 {
            out.push('\u{FFFD}');
        } else if (0x01..=0x1F).contains(&code)
            || code == 0x7F
            || (index == 0 && c.is_ascii_digit())
            || (index == 1 && c.is_ascii_digit() && chars[0] == '-')
        {
            out.push_str(&format!("\\{:x} ", code));
        } else if index == 0 && c == '-' && chars.len() == 1 {
            out.push_str("\\-");
        } else if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers_untouched() {
        assert_eq!(css_escape("header"), "header");
        assert_eq!(css_escape("_private-1"), "_private-1");
        assert_eq!(css_escape("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn test_leading_digits() {
        assert_eq!(css_escape("123"), "\\31 23");
        assert_eq!(css_escape("-1a"), "-\\31 a");
        assert_eq!(css_escape("--1"), "--1");
    }

    #[test]
    fn test_lone_hyphen() {
        assert_eq!(css_escape("-"), "\\-");
        assert_eq!(css_escape("-a"), "-a");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(css_escape("w-1/2"), "w-1\\/2");
        assert_eq!(css_escape("a.b"), "a\\.b");
        assert_eq!(css_escape("has space"), "has\\ space");
        assert_eq!(css_escape("tab\there"), "tab\\9 here");
    }

    #[test]
    fn test_nul_replaced() {
        assert_eq!(css_escape("a\u{0}b"), "a\u{FFFD}b");
    }
}

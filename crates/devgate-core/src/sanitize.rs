//! Plain-text sanitation for client-submitted signal fields.
//!
//! Decision endpoint inputs are attacker-controlled and may be echoed into
//! logs or admin views later; both fields are reduced to plain text before
//! any matching happens. Sanitation never fails: garbage in, empty-ish
//! plain text out.

/// Sanitizes a single-line field (the device model).
///
/// Strips markup, drops control characters including newlines, collapses
/// runs of whitespace, and trims.
pub fn sanitize_text(input: &str) -> String {
    let stripped = strip_tags(input);
    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;

    for c in stripped.chars() {
        if c.is_whitespace() || c.is_control() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Sanitizes a multi-line field (the User-Agent).
///
/// Strips markup and control characters but keeps the string otherwise
/// intact; UA strings are matched without structural trimming.
pub fn sanitize_multiline(input: &str) -> String {
    strip_tags(input)
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Removes `<...>` tag spans. An unterminated tag swallows the remainder.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;

    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(sanitize_text("Redmi Note 8"), "Redmi Note 8");
    }

    #[test]
    fn strips_script_tags() {
        assert_eq!(
            sanitize_text("<script>alert(1)</script>Pixel"),
            "alert(1)Pixel"
        );
    }

    #[test]
    fn drops_unterminated_tag_remainder() {
        assert_eq!(sanitize_text("Pixel <img src=x onerror=alert(1)"), "Pixel");
    }

    #[test]
    fn collapses_whitespace_and_control() {
        assert_eq!(sanitize_text("  a\t\nb\x00 c  "), "a b c");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(sanitize_text(""), "");
        assert_eq!(sanitize_multiline(""), "");
    }

    #[test]
    fn multiline_keeps_structure() {
        assert_eq!(
            sanitize_multiline("Mozilla/5.0 (Linux;\nAndroid 9)"),
            "Mozilla/5.0 (Linux;\nAndroid 9)"
        );
    }

    #[test]
    fn multiline_strips_markup_and_nul() {
        assert_eq!(sanitize_multiline("UA<b>bold</b>\x00end"), "UAboldend");
    }

    #[test]
    fn unicode_survives() {
        assert_eq!(sanitize_text("téléphone 日本語"), "téléphone 日本語");
    }
}

//! Text sanitization applied to every untrusted field before it reaches an
//! email body or the audit log.

use std::fmt;

use serde::Serialize;

/// Characters kept by [`sanitize_email`], besides ASCII letters and digits.
const EMAIL_SYMBOLS: &str = "!#$%&'*+-=?^_`{|}~@.[]";

/// Longest entity body recognised, e.g. `CounterClockwiseContourIntegral`.
const MAX_ENTITY_LEN: usize = 32;

/// Text that has been trimmed, stripped of markup and HTML-escaped.
///
/// The only way to build one is through [`Sanitized::new`], so holding a
/// `Sanitized` means the value is safe to emit verbatim inside HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sanitized(String);

impl Sanitized {
    pub fn new(raw: &str) -> Self {
        let stripped = strip_tags(raw.trim());
        Self(escape_html(stripped.trim()))
    }

    /// Joins already sanitized values with `", "`, skipping empty ones.
    pub fn join(values: &[Sanitized]) -> Self {
        let parts: Vec<&str> = values
            .iter()
            .map(Sanitized::as_str)
            .filter(|value| !value.is_empty())
            .collect();

        Self(parts.join(", "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sanitized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sanitized {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Removes every character that cannot appear in an email address. No HTML
/// escaping is applied; the address is validated afterwards.
pub fn sanitize_email(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || EMAIL_SYMBOLS.contains(*c))
        .collect()
}

/// Drops `<...>` tags, including comments and tags left open at the end of
/// the input. A `<` followed by whitespace (or nothing) is plain text.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some(next) if !next.is_whitespace() => {}
            _ => {
                out.push(c);
                continue;
            }
        }

        // skip to the closing '>', ignoring any inside quoted attribute values
        let mut quote: Option<char> = None;
        for c in chars.by_ref() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == '>' => break,
                None => {}
            }
        }
    }

    out
}

/// Escapes `& < > " '`. Existing entity references are left as they are so
/// that sanitizing twice gives the same result.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (index, c) in input.char_indices() {
        match c {
            '&' if starts_with_entity(&input[index..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }

    out
}

/// `true` when `s` starts with `&name;`, `&#123;` or `&#x1f;`. Looks at no
/// more than [`MAX_ENTITY_LEN`] bytes past the `&`.
fn starts_with_entity(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('&') else {
        return false;
    };
    let end = rest
        .bytes()
        .take(MAX_ENTITY_LEN + 1)
        .position(|b| !(b.is_ascii_alphanumeric() || b == b'#'));
    let Some(end) = end.filter(|&end| rest.as_bytes()[end] == b';') else {
        return false;
    };
    // everything before `end` is ASCII, so this is a char boundary
    let body = &rest[..end];

    if let Some(number) = body.strip_prefix('#') {
        let hex = number
            .strip_prefix('x')
            .or_else(|| number.strip_prefix('X'));
        return match hex {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()),
        };
    }

    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(Sanitized::new("  Jane Doe \n").as_str(), "Jane Doe");
    }

    #[test]
    fn test_strips_tags_and_escapes() {
        let value = Sanitized::new("<script>alert('x')</script> Tom & \"Jerry\"");

        assert_eq!(value.as_str(), "alert(&#039;x&#039;) Tom &amp; &quot;Jerry&quot;");
    }

    #[test]
    fn test_strips_comments_and_quoted_attributes() {
        assert_eq!(Sanitized::new("a<!-- hidden -->b").as_str(), "ab");
        assert_eq!(Sanitized::new("<a title='x>y'>link</a>").as_str(), "link");
    }

    #[test]
    fn test_unclosed_tag_drops_the_rest() {
        assert_eq!(Sanitized::new("hello <img src=x onerror=alert(1)").as_str(), "hello");
    }

    #[test]
    fn test_lone_angle_bracket_is_escaped() {
        assert_eq!(Sanitized::new("5 < 6 and 7 > 3").as_str(), "5 &lt; 6 and 7 &gt; 3");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "<b>bold</b> & <i>italic</i>",
            "  <p> padded </p>  ",
            "5 < 6 \"quoted\" 'single'",
            "already &amp; escaped &#039; &#x27;",
            "&unterminated & bare",
        ];

        for input in inputs {
            let once = Sanitized::new(input);
            let twice = Sanitized::new(once.as_str());
            assert_eq!(once, twice, "input: {input}");
            assert!(!once.as_str().contains('<'));
            assert!(!once.as_str().contains('>'));
        }
    }

    #[test]
    fn test_join_skips_empty_values() {
        let values = vec![
            Sanitized::new("Shipping"),
            Sanitized::new("  "),
            Sanitized::new("Customs <b>Clearance</b>"),
        ];

        assert_eq!(Sanitized::join(&values).as_str(), "Shipping, Customs Clearance");
        assert!(Sanitized::join(&[]).is_empty());
    }

    #[test]
    fn test_sanitize_email_removes_illegal_characters() {
        assert_eq!(sanitize_email(" jane doe@example.com "), "janedoe@example.com");
        assert_eq!(sanitize_email("<bob>@x.com"), "bob@x.com");
        assert_eq!(sanitize_email("o'neil+tag@example.com"), "o'neil+tag@example.com");
    }

    #[test]
    fn test_entity_detection() {
        assert!(starts_with_entity("&amp; rest"));
        assert!(starts_with_entity("&#039;"));
        assert!(starts_with_entity("&#x1F600;"));
        assert!(!starts_with_entity("& amp;"));
        assert!(!starts_with_entity("&#;"));
        assert!(!starts_with_entity("&x"));
        assert!(starts_with_entity("&CounterClockwiseContourIntegral;"));
        assert!(!starts_with_entity(&format!("&{};", "a".repeat(40))));
        assert!(!starts_with_entity("&amp &lt;"));
    }

    #[test]
    fn test_ampersand_flood_is_linear() {
        let input = "&".repeat(1_000_000);
        let started = std::time::Instant::now();

        let value = Sanitized::new(&input);

        assert_eq!(value.as_str().len(), 5 * input.len());
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_overlong_entity_name_is_escaped() {
        let input = format!("a &{};", "x".repeat(64));

        assert_eq!(
            Sanitized::new(&input).as_str(),
            format!("a &amp;{};", "x".repeat(64))
        );
    }
}

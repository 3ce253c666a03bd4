//! Parameter value decoding
//!
//! Campaign values arrive encoded in every way imaginable: double
//! percent-encoding from redirect chains, `+` used both as an encoded space and
//! as a literal character in campaign names. [`decode_value`] applies a small,
//! best-effort heuristic; it is approximate by nature and every branch is
//! covered by the table in the tests below.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// A value with more `+` signs than this is assumed to use `+` for spaces.
const MAX_LITERAL_PLUS: usize = 3;

/// Percent-decode without touching `+`. Invalid UTF-8 becomes U+FFFD.
#[inline]
pub fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Form decoding: `+` becomes a space, then percent-decode.
#[inline]
pub fn form_decode(value: &str) -> String {
    let spaced: Cow<'_, str> = if value.contains('+') {
        Cow::Owned(value.replace('+', " "))
    } else {
        Cow::Borrowed(value)
    };
    percent_decode(&spaced)
}

/// Check for an encoded space (`%20`) or plus (`%2B`). The hex digits are
/// case-insensitive, so `%2b` counts as well.
fn has_space_indicator(value: &str) -> bool {
    value
        .as_bytes()
        .windows(3)
        .any(|w| w[0] == b'%' && w[1] == b'2' && (w[2] == b'0' || (w[2] | 0x20) == b'b'))
}

/// Decode a raw tracking parameter value.
///
/// - `%25` present: the value was encoded twice, so decode twice (the second
///   pass only when a `%` survives the first). `+` is left alone.
/// - a few `+` and no `%20`/`%2B`: the `+` is part of the value
///   ("summer+sale") and is kept literally.
/// - otherwise standard form decoding.
pub fn decode_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    if value.contains("%25") {
        let decoded_once = percent_decode(value);
        if decoded_once.contains('%') {
            return percent_decode(&decoded_once);
        }
        return decoded_once;
    }

    let plus_count = value.bytes().filter(|&b| b == b'+').count();
    if plus_count > 0 && plus_count <= MAX_LITERAL_PLUS && !has_space_indicator(value) {
        return percent_decode(value);
    }

    form_decode(value)
}

/// Normalize a raw parameter name: form-decode, lowercase, strip array
/// notation (`name[]`, `name[0]`).
pub fn normalize_name(raw: &str) -> String {
    let lowered = form_decode(raw).to_lowercase();
    let trimmed = lowered.trim_end_matches(|c: char| c == '[' || c == ']');
    match trimmed.find('[') {
        Some(bracket) => trimmed[..bracket].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_value_table() {
        let cases: &[(&str, &str)] = &[
            ("", ""),
            ("plain", "plain"),
            // literal plus preserved
            ("summer+sale", "summer+sale"),
            ("a+b+c+d", "a+b+c+d"),
            // too many plus signs: treated as spaces
            ("a+b+c+d+e", "a b c d e"),
            // encoded space forces form decoding
            ("google%20ads", "google ads"),
            ("big+summer%20sale", "big summer sale"),
            ("c%2B%2B+jobs", "c++ jobs"),
            ("c%2b%2b+jobs", "c++ jobs"),
            // double encoding
            ("%252D", "-"),
            ("spring%2520sale", "spring sale"),
            ("100%25", "100%"),
            ("a%25+b", "a%+b"),
            // unicode
            ("%F0%9F%9A%80", "🚀"),
            ("🚀", "🚀"),
            ("caf%C3%A9", "café"),
            // malformed escapes are kept, invalid utf-8 replaced
            ("%zz", "%zz"),
            ("%FF", "\u{FFFD}"),
        ];

        for (input, expected) in cases {
            assert_eq!(decode_value(input), *expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_form_decode() {
        assert_eq!(form_decode("web+analytics+guide"), "web analytics guide");
        assert_eq!(form_decode("a%2Bb"), "a+b");
        assert_eq!(form_decode("%E4%B8%AD"), "中");
    }

    #[test]
    fn test_has_space_indicator() {
        assert!(has_space_indicator("a%20b"));
        assert!(has_space_indicator("a%2Bb"));
        assert!(has_space_indicator("a%2bb"));
        assert!(!has_space_indicator("a%21b"));
        assert!(!has_space_indicator("a+b"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("UTM_SOURCE"), "utm_source");
        assert_eq!(normalize_name("utm_source[]"), "utm_source");
        assert_eq!(normalize_name("utm_source[0]"), "utm_source");
        assert_eq!(normalize_name("utm%5Fsource"), "utm_source");
        assert_eq!(normalize_name("ScCid"), "sccid");
    }
}

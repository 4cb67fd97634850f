//! Short renderings of identifiers and ids for lists and notifications

use std::sync::LazyLock;

use regex::Regex;

const ZERO_IDENTIFIER_PREFIX: &str = "0000000000000000000000000000000000000000000";

static TRAILING_ZEROS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("0+=?$").expect("padding pattern is valid"));

/// Shorten a base64 identifier
///
/// The all-zero identifier collapses to `"0"`. Otherwise trailing zero
/// padding (and the `=` after it) is dropped and the rest is cut to 15
/// characters, so padded ideals read as the words they were made from.
pub fn shorten_b64(value: &str) -> String {
    if value.starts_with(ZERO_IDENTIFIER_PREFIX) {
        return value.chars().take(1).collect();
    }

    TRAILING_ZEROS_REGEX
        .replace_all(value, "")
        .chars()
        .take(15)
        .collect()
}

/// Shorten a hex consideration id to its first 5 and trailing characters
pub fn shorten_hex(value: &str) -> String {
    let head: String = value.chars().take(5).collect();
    let tail: String = value.chars().skip(60).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shorten_b64() {
        assert_eq!(
            shorten_b64("0000000000000000000000000000000000000000000="),
            "0"
        );
        assert_eq!(
            shorten_b64("helloworld000000000000000000000000000000000="),
            "helloworld"
        );
        assert_eq!(
            shorten_b64("kAlAffNeTSfhooM0641keP9tI7GoGATYQpCtYmuZ7ew="),
            "kAlAffNeTSfhooM"
        );
        assert_eq!(shorten_b64(""), "");
    }

    #[test]
    fn test_shorten_hex() {
        let id = "23d7c4d22ce46989abc4f97f9cf3def630bf6f49722b627945584a7a9918233f";
        assert_eq!(shorten_hex(id), "23d7c...233f");
        assert_eq!(shorten_hex("abc"), "abc...");
    }
}

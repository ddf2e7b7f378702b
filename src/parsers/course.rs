use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, ScraperError};

static CREDITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Total Credits: (\d+)").unwrap());

/// Extracts N from a `Total Credits: N` label.
///
/// The label may appear anywhere in the text; the first occurrence wins.
pub fn parse_credits(text: &str) -> Result<u32> {
    let digits = CREDITS_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ScraperError::CreditsNotFound(text.to_string()))?;

    digits
        .as_str()
        .parse()
        .map_err(|_| ScraperError::CreditsNotFound(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_label() {
        assert_eq!(parse_credits("Total Credits: 4").unwrap(), 4);
        assert_eq!(parse_credits("Total Credits: 12").unwrap(), 12);
    }

    #[test]
    fn search_is_unanchored() {
        assert_eq!(parse_credits("Total Credits: 4 (repeatable)").unwrap(), 4);
        assert_eq!(parse_credits("Credits\nTotal Credits: 3").unwrap(), 3);
    }

    #[test]
    fn rejects_other_wording() {
        for text in [
            "",
            "Total Credits 4",
            "Total credits: 4",
            "Total Credits: four",
            "Total Credits:4",
        ] {
            assert!(
                matches!(parse_credits(text), Err(ScraperError::CreditsNotFound(_))),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn overflowing_count_is_an_error() {
        assert!(parse_credits("Total Credits: 99999999999999999999").is_err());
    }
}

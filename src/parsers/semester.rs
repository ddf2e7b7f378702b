use crate::models::{Parity, Term};

/// Parses one raw offering label such as `"Fall of odd years"`.
///
/// The season is everything before the first space. The rest only decides
/// the parity: it is `Odd` when it mentions "odd", `Even` when it mentions
/// "even" (checked last, so it wins when both appear) and `Every` otherwise.
/// Matching is case-sensitive.
pub fn parse_term(raw: &str) -> Term {
    let (season, rest) = raw.split_once(' ').unwrap_or((raw, ""));

    let mut parity = Parity::Every;
    if rest.contains("odd") {
        parity = Parity::Odd;
    }
    if rest.contains("even") {
        parity = Parity::Even;
    }

    Term {
        season: season.to_string(),
        parity,
    }
}

/// Maps a raw offering label to its short code, e.g. `FallOdd`.
pub fn format_semester(raw: &str) -> String {
    parse_term(raw).to_string()
}

/// Normalizes the whole semesters block into `|`-separated short codes.
pub fn format_semesters(text: &str) -> String {
    split_terms(text)
        .iter()
        .map(|term| format_semester(term))
        .collect::<Vec<_>>()
        .join("|")
}

/// Splits on `", "`, keeping lowercase continuations ("odd years") attached
/// to the term they qualify.
fn split_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    for piece in text.split(", ") {
        let continues = piece.starts_with(|c: char| c.is_lowercase());
        match terms.last_mut() {
            Some(last) if continues => {
                last.push_str(", ");
                last.push_str(piece);
            }
            _ => terms.push(piece.to_string()),
        }
    }

    terms
}

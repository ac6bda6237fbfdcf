//! Term segmentation (`Período lectivo:` headers).

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::marked_spans;
use crate::error::{CoreError, Result};
use crate::term::Term;

fn term_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)per[ií]odo lectivo:[ \t]*([^\r\n]*)").expect("term marker regex is valid")
    })
}

/// Parse a header label such as `2024 - 2do Cuatrimestre`.
///
/// Returns `None` for labels without a 4-digit year and a leading term digit
/// (e.g. `Curso de Verano`).
fn parse_term_label(label: &str) -> Option<Term> {
    let (year, rest) = label.split_once('-')?;
    let year = year.trim();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number = rest.trim_start().chars().next()?.to_digit(10)?;
    Term::new(year.parse().ok()?, u8::try_from(number).ok()?).ok()
}

/// Split a report into `(term, slice)` pairs in header order.
///
/// Each slice runs from the end of its header line to the start of the next
/// header. Headers that do not parse are dropped together with their slice.
/// The output is not sorted chronologically.
pub fn segment_terms(text: &str) -> Vec<(Term, &str)> {
    marked_spans(term_marker(), text)
        .into_iter()
        .filter_map(|(caps, body)| {
            let label = caps.get(1).map_or("", |m| m.as_str());
            match parse_term_label(label) {
                Some(term) => Some((term, body)),
                None => {
                    debug!(label = %label.trim(), "skipping unparseable term header");
                    None
                }
            }
        })
        .collect()
}

/// The chronologically latest term among segmented slices.
pub fn latest_term(terms: &[(Term, &str)]) -> Result<Term> {
    terms
        .iter()
        .map(|(term, _)| *term)
        .max()
        .ok_or(CoreError::NoTermsFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term_label() {
        assert_eq!(
            parse_term_label("2024 - 2do Cuatrimestre"),
            Some(Term::new(2024, 2).unwrap())
        );
        assert_eq!(
            parse_term_label("2025 - 1er Cuatrimestre"),
            Some(Term::new(2025, 1).unwrap())
        );
        assert_eq!(parse_term_label("2025 - Curso de Verano"), None);
        assert_eq!(parse_term_label("25 - 1er Cuatrimestre"), None);
        assert_eq!(parse_term_label("2025 - 3er Cuatrimestre"), None);
        assert_eq!(parse_term_label("Curso de Verano"), None);
    }

    #[test]
    fn test_segments_follow_header_order() {
        let text = "Período lectivo: 2025 - 1er Cuatrimestre\nA\nPeríodo lectivo: 2024 - 2do Cuatrimestre\nB\n";
        let terms = segment_terms(text);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].0, Term::new(2025, 1).unwrap());
        assert_eq!(terms[0].1, "\nA\n");
        assert_eq!(terms[1].0, Term::new(2024, 2).unwrap());
        assert_eq!(terms[1].1, "\nB\n");
        assert_eq!(latest_term(&terms).unwrap(), Term::new(2025, 1).unwrap());
    }

    #[test]
    fn test_summer_course_slice_is_skipped() {
        let text = "Período lectivo: 2024 - 2do Cuatrimestre\nA\nPeríodo lectivo: 2024 - Curso de Verano\nV\nPeríodo lectivo: 2025 - 1er Cuatrimestre\nB";
        let terms = segment_terms(text);
        let bodies: Vec<&str> = terms.iter().map(|(_, b)| *b).collect();
        assert_eq!(bodies, vec!["\nA\n", "\nB"]);
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let terms = segment_terms("PERÍODO LECTIVO: 2023 - 1er Cuatrimestre\nX");
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_no_terms() {
        let terms = segment_terms("nothing to see");
        assert!(terms.is_empty());
        assert_eq!(latest_term(&terms), Err(CoreError::NoTermsFound));
    }

    #[test]
    fn test_slices_rejoin_to_original_content() {
        let text = "Período lectivo: 2023 - 1er C\nActividad: A (1)\nx\nPeríodo lectivo: 2023 - 2do C\nActividad: B (2)\ny\n";
        let terms = segment_terms(text);
        let rejoined: String = terms.iter().map(|(_, b)| *b).collect();
        let expected = text
            .replace("Período lectivo: 2023 - 1er C", "")
            .replace("Período lectivo: 2023 - 2do C", "");
        assert_eq!(rejoined, expected);
    }
}

//! Subject extraction (`Actividad:` headers).

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::marked_spans;
use crate::model::normalize_name;

/// Institutional pseudo-subject that consumers never need.
const PROFESSIONAL_WORK: &str = "TRABAJO PROFESIONAL";

fn subject_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)actividad:[ \t]*([^()\r\n]+?)[ \t]*\(([^()\r\n]*)\)")
            .expect("subject marker regex is valid")
    })
}

/// A subject header and the raw text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSubject<'t> {
    /// Upper-cased subject name.
    pub name: String,
    pub code: String,
    pub body: &'t str,
}

/// Split one term slice into subjects, in header order.
pub fn extract_subjects(term_slice: &str) -> Vec<RawSubject<'_>> {
    marked_spans(subject_marker(), term_slice)
        .into_iter()
        .filter_map(|(caps, body)| {
            let name = normalize_name(caps.get(1).map_or("", |m| m.as_str()));
            let code = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            if name.contains(PROFESSIONAL_WORK) {
                debug!(subject = %name, code = %code, "skipping professional work pseudo-subject");
                return None;
            }
            Some(RawSubject { name, code, body })
        })
        .collect()
}

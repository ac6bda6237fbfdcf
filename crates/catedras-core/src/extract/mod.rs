//! Marker-driven extraction of SIU report text.
//!
//! Every stage follows the same span model: find all non-overlapping marker
//! matches, then pair each match with the text from its end up to the start
//! of the next match (or the end of the input for the last one).
//!
//! ```text
//! report ── Período lectivo ──▶ term slices
//!        └─ Actividad ────────▶ subject slices
//!           └─ Comisión ──────▶ section slices
//!              └─ Docentes ───▶ teachers
//! ```

mod section;
mod segment;
mod subject;
mod teacher;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::model::{Offer, Subject};
use crate::term::Term;

pub use section::{extract_sections, extract_staffed_sections};
pub use segment::{latest_term, segment_terms};
pub use subject::{extract_subjects, RawSubject};
pub use teacher::extract_teachers;

/// Pair each marker match with the slice that follows it.
fn marked_spans<'t>(marker: &Regex, text: &'t str) -> Vec<(Captures<'t>, &'t str)> {
    let matches: Vec<Captures<'t>> = marker.captures_iter(text).collect();
    let starts: Vec<usize> = matches
        .iter()
        .map(|caps| caps.get(0).map_or(0, |m| m.start()))
        .collect();

    matches
        .into_iter()
        .enumerate()
        .map(|(i, caps)| {
            let end = caps.get(0).map_or(0, |m| m.end());
            let next = starts.get(i + 1).copied().unwrap_or(text.len());
            (caps, &text[end..next])
        })
        .collect()
}

/// Subjects of one term slice that have at least one staffed section.
fn parse_subjects(term_slice: &str) -> Vec<Subject> {
    extract_subjects(term_slice)
        .into_iter()
        .filter_map(|raw| {
            let sections = extract_staffed_sections(raw.body);
            if sections.is_empty() {
                debug!(subject = %raw.name, "subject has no staffed sections, skipping");
                return None;
            }
            Some(Subject::new(&raw.name, &raw.code, sections))
        })
        .collect()
}

impl Offer {
    /// Parse every usable term of a report, in header order.
    ///
    /// A report without usable term headers yields an empty list.
    pub fn parse(program: &str, text: &str) -> Vec<Offer> {
        segment_terms(text)
            .into_iter()
            .map(|(term, slice)| Offer {
                term,
                program: program.to_string(),
                subjects: parse_subjects(slice),
            })
            .collect()
    }

    /// Parse only the chronologically latest term of a report.
    ///
    /// When the same term appears under several headers their subjects are
    /// concatenated in header order.
    pub fn parse_latest(program: &str, text: &str) -> Result<Offer> {
        let terms = segment_terms(text);
        let latest = latest_term(&terms)?;
        let subjects = terms
            .iter()
            .filter(|(term, _)| *term == latest)
            .flat_map(|(_, slice)| parse_subjects(slice))
            .collect();
        Ok(Offer {
            term: latest,
            program: program.to_string(),
            subjects,
        })
    }

    /// Parse the offer for one specific term, if the report contains it.
    pub fn parse_term(program: &str, text: &str, term: Term) -> Result<Offer> {
        let terms = segment_terms(text);
        if terms.is_empty() {
            return Err(CoreError::NoTermsFound);
        }
        let subjects = terms
            .iter()
            .filter(|(t, _)| *t == term)
            .flat_map(|(_, slice)| parse_subjects(slice))
            .collect();
        Ok(Offer {
            term,
            program: program.to_string(),
            subjects,
        })
    }

    pub fn subject(&self, name: &str) -> Option<&Subject> {
        let name = crate::model::normalize_name(name);
        self.subjects.iter().find(|s| s.name == name)
    }
}

//! Section extraction (`Comisión:` headers) and variant unification.
//!
//! Runs in two passes. The first walks the headers in order and accumulates
//! teachers per provisional code: numeric codes drop their letter variant
//! (`23A`, `23B` and `23C` all land on 23) and each unnamed section gets its
//! own negative placeholder. The second renumbers placeholders after the
//! highest numeric code, in the order they were first seen.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{extract_teachers, marked_spans};
use crate::model::{Section, Teacher};

/// Section name that does not denote a real cátedra.
const CONDITIONAL: &str = "CONDICIONAL";

fn section_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(
            r"(?i)comisi[oó]n:[ \t]*(?:curso\b:?[ \t]*)?(?:([0-9]{1,2})(\p{L})?\b|([\p{L} ]+))",
        )
        .expect("section marker regex is valid")
    })
}

/// Code assigned while accumulating, before placeholders are renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProvisionalCode {
    Numbered(u32),
    Placeholder(i32),
}

#[derive(Debug)]
struct Accumulated {
    code: ProvisionalCode,
    teachers: BTreeSet<Teacher>,
}

/// First pass: resolve provisional codes and union teachers per code.
fn accumulate(subject_slice: &str) -> Vec<Accumulated> {
    let mut acc: Vec<Accumulated> = Vec::new();
    let mut next_placeholder = -1;

    for (caps, body) in marked_spans(section_marker(), subject_slice) {
        let Some(code) = provisional_code(&caps, &mut next_placeholder) else {
            continue;
        };
        let teachers = extract_teachers(body).unwrap_or_default();

        match acc.iter_mut().find(|a| a.code == code) {
            Some(existing) => existing.teachers.extend(teachers),
            None => acc.push(Accumulated {
                code,
                teachers: teachers.into_iter().collect(),
            }),
        }
    }

    acc
}

fn provisional_code(caps: &Captures<'_>, next_placeholder: &mut i32) -> Option<ProvisionalCode> {
    if let Some(digits) = caps.get(1) {
        match digits.as_str().parse::<u32>() {
            Ok(0) => debug!("section code 0 treated as unnamed"),
            Ok(n) => return Some(ProvisionalCode::Numbered(n)),
            Err(_) => return None,
        }
    }

    let name = caps.get(3).map_or("", |m| m.as_str().trim());
    if name == CONDITIONAL {
        debug!("skipping conditional section");
        return None;
    }

    let code = ProvisionalCode::Placeholder(*next_placeholder);
    *next_placeholder -= 1;
    Some(code)
}

/// Second pass: give placeholders positive codes after the highest number.
fn finalize(acc: Vec<Accumulated>) -> Vec<Section> {
    let max_numbered = acc
        .iter()
        .filter_map(|a| match a.code {
            ProvisionalCode::Numbered(n) => Some(n),
            ProvisionalCode::Placeholder(_) => None,
        })
        .max()
        .unwrap_or(0);

    let mut next = max_numbered + 1;
    acc.into_iter()
        .map(|a| {
            let code = match a.code {
                ProvisionalCode::Numbered(n) => n,
                ProvisionalCode::Placeholder(_) => {
                    let assigned = next;
                    next += 1;
                    assigned
                }
            };
            Section {
                code,
                teachers: a.teachers,
            }
        })
        .collect()
}

/// All unified sections of one subject slice, staffed or not.
pub fn extract_sections(subject_slice: &str) -> Vec<Section> {
    finalize(accumulate(subject_slice))
}

/// Unified sections of one subject slice that have at least one teacher.
pub fn extract_staffed_sections(subject_slice: &str) -> Vec<Section> {
    extract_sections(subject_slice)
        .into_iter()
        .filter(Section::is_staffed)
        .collect()
}

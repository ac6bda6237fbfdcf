//! Teacher extraction (`Docentes:` lines).

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::model::Teacher;

/// Placeholder the SIU prints for an unfilled position.
const TO_BE_DESIGNATED: &str = "A DESIGNAR A DESIGNAR";

fn staff_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)docentes:[ \t]*([^\r\n]*)").expect("staff marker regex is valid")
    })
}

fn no_staff_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?i)\bsin docentes\b").expect("no-staff regex is valid"))
}

fn teacher_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"([\p{L} ]+)\(([^()\r\n]*)\)").expect("teacher token regex is valid")
    })
}

/// Extract the normalized, deduplicated teachers of one section slice.
///
/// Only the `Docentes:` line is scanned when one is present; otherwise the
/// first non-empty line of the slice is read as a bare teacher line, so
/// schedule or classroom lines further down never turn into teachers.
/// Returns `None` when no teacher survives, which callers must keep apart
/// from a section that was never parsed.
pub fn extract_teachers(section_slice: &str) -> Option<Vec<Teacher>> {
    let line = match staff_marker().captures(section_slice) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None if no_staff_marker().is_match(section_slice) => return None,
        None => section_slice
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or(""),
    };

    let mut seen = HashSet::new();
    let teachers: Vec<Teacher> = teacher_token()
        .captures_iter(line)
        .filter_map(|caps| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let role = caps.get(2).map_or("", |m| m.as_str());
            let teacher = Teacher::new(name, role);
            if teacher.name.is_empty() {
                return None;
            }
            if teacher.name == TO_BE_DESIGNATED {
                debug!(role = %teacher.role, "skipping placeholder teacher");
                return None;
            }
            Some(teacher)
        })
        .filter(|teacher| seen.insert(teacher.clone()))
        .collect();

    if teachers.is_empty() {
        None
    } else {
        Some(teachers)
    }
}

//! Record types produced by the extractors.
//!
//! - `Teacher`: a normalized (name, role) assignment
//! - `Section`: a cátedra with a positive code and a teacher set
//! - `Subject`: a materia and its sections
//! - `Offer`: every subject parsed from one term of one program's report

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::term::Term;

/// A teacher assignment. Identity is the normalized (name, role) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub role: String,
}

impl Teacher {
    /// Build a teacher from raw report text, normalizing both fields.
    ///
    /// Normalization is idempotent, so passing an already normalized pair
    /// yields the same pair.
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: normalize_name(name),
            role: normalize_role(role),
        }
    }
}

/// Upper-case, trim and collapse inner whitespace.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Drop `/a` gender suffixes, then trim and upper-case.
pub fn normalize_role(raw: &str) -> String {
    normalize_name(&raw.replace("/a", ""))
}

/// A teaching section (cátedra / comisión) of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub code: u32,
    pub teachers: BTreeSet<Teacher>,
}

impl Section {
    pub fn new(code: u32) -> Self {
        Self {
            code,
            teachers: BTreeSet::new(),
        }
    }

    pub fn with_teachers(code: u32, teachers: impl IntoIterator<Item = Teacher>) -> Self {
        Self {
            code,
            teachers: teachers.into_iter().collect(),
        }
    }

    pub fn is_staffed(&self) -> bool {
        !self.teachers.is_empty()
    }

    /// Union another section's teachers into this one.
    pub fn absorb(&mut self, other: Section) {
        self.teachers.extend(other.teachers);
    }
}

/// A subject (materia) as reported by one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Upper-cased name; the identity used for reconciliation.
    pub name: String,
    /// Program-specific code, as reported.
    pub code: String,
    pub sections: Vec<Section>,
}

impl Subject {
    pub fn new(name: &str, code: &str, sections: Vec<Section>) -> Self {
        Self {
            name: normalize_name(name),
            code: code.trim().to_string(),
            sections,
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Distinct teachers across every section.
    pub fn teacher_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.teachers.iter())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn has_staffed_sections(&self) -> bool {
        self.sections.iter().any(Section::is_staffed)
    }

    pub fn section(&self, code: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.code == code)
    }

    /// Union `incoming` into this subject by section code.
    ///
    /// Shared codes get their teacher sets unioned; new codes are appended in
    /// the order they arrive. Name and code of `self` are kept.
    pub fn merge_sections(&mut self, incoming: Vec<Section>) {
        for section in incoming {
            match self.sections.iter_mut().find(|s| s.code == section.code) {
                Some(existing) => existing.absorb(section),
                None => self.sections.push(section),
            }
        }
    }
}

/// The parsed content of one term of one program's report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub term: Term,
    pub program: String,
    pub subjects: Vec<Subject>,
}

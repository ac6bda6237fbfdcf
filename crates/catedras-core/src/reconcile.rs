//! Cross-report reconciliation.
//!
//! Folds offers from many programs and terms into one record per subject
//! name, keeping the most recent term. Offers that tie on the latest term are
//! merged section by section instead of one being picked arbitrarily.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Offer, Subject};
use crate::term::Term;

/// A subject together with the term it was last confirmed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledSubject {
    pub subject: Subject,
    pub term: Term,
    /// Programs whose reports contributed to this record, first-seen first.
    pub programs: Vec<String>,
}

/// Explicit orderings for a reconciled corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusOrder {
    #[default]
    Name,
    Code,
    /// Most sections first, ties broken by name.
    SectionCount,
}

/// One record per distinct subject name. Iteration order is unspecified;
/// use [`ReconciledCorpus::ordered`] when a sequence is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledCorpus {
    subjects: HashMap<String, ReconciledSubject>,
}

impl ReconciledCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ReconciledSubject> {
        self.subjects.get(&crate::model::normalize_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReconciledSubject> {
        self.subjects.values()
    }

    pub fn into_map(self) -> HashMap<String, ReconciledSubject> {
        self.subjects
    }

    pub fn ordered(&self, order: CorpusOrder) -> Vec<&ReconciledSubject> {
        let mut records: Vec<&ReconciledSubject> = self.subjects.values().collect();
        match order {
            CorpusOrder::Name => records.sort_by(|a, b| a.subject.name.cmp(&b.subject.name)),
            CorpusOrder::Code => records.sort_by(|a, b| {
                a.subject
                    .code
                    .cmp(&b.subject.code)
                    .then_with(|| a.subject.name.cmp(&b.subject.name))
            }),
            CorpusOrder::SectionCount => records.sort_by(|a, b| {
                b.subject
                    .section_count()
                    .cmp(&a.subject.section_count())
                    .then_with(|| a.subject.name.cmp(&b.subject.name))
            }),
        }
        records
    }

    /// Fold one subject reported by `program` in `term` into the corpus.
    pub fn absorb(&mut self, program: &str, term: Term, subject: Subject) {
        if !subject.has_staffed_sections() {
            debug!(subject = %subject.name, "ignoring subject without staffed sections");
            return;
        }

        match self.subjects.entry(subject.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(ReconciledSubject {
                    subject,
                    term,
                    programs: vec![program.to_string()],
                });
            }
            Entry::Occupied(mut slot) => {
                let best = slot.get_mut();
                if term.is_after(&best.term) {
                    debug!(subject = %subject.name, from = %best.term, to = %term, "newer term replaces record");
                    *best = ReconciledSubject {
                        subject,
                        term,
                        programs: vec![program.to_string()],
                    };
                } else if term == best.term {
                    best.subject.merge_sections(subject.sections);
                    if !best.programs.iter().any(|p| p == program) {
                        best.programs.push(program.to_string());
                    }
                }
            }
        }
    }
}

/// Reconcile offers into one latest-known record per subject name.
///
/// - unseen name, or strictly newer term: the incoming subject replaces the record
/// - same term: sections are unioned by code, the first-seen name and code are kept
/// - older term: the incoming subject is discarded
pub fn reconcile<'a>(offers: impl IntoIterator<Item = &'a Offer>) -> ReconciledCorpus {
    let mut corpus = ReconciledCorpus::new();
    for offer in offers {
        for subject in &offer.subjects {
            corpus.absorb(&offer.program, offer.term, subject.clone());
        }
    }
    corpus
}

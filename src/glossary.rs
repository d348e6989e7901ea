use crate::dataset::GlossaryEntry;
use itertools::Itertools;

/// Most terms shown for a single answer; longer (more specific) terms win.
pub const MAX_TERMS: usize = 5;

/// Scans the glossary for terms appearing in the correct answer text.
/// Matching is case-insensitive substring containment; results are ordered
/// longest term first and capped at [`MAX_TERMS`].
pub fn matching_terms<'a>(glossary: &'a [GlossaryEntry], answer_text: &str) -> Vec<&'a GlossaryEntry> {
    let haystack = answer_text.to_lowercase();

    glossary
        .iter()
        .filter(|e| haystack.contains(&e.term.to_lowercase()))
        .sorted_by(|a, b| b.term.len().cmp(&a.term.len()))
        .take(MAX_TERMS)
        .collect()
}

//! Colloquial phrasings attached to canonical term names.

use crate::text;
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Pre-normalized synonym hints, keyed by the exact canonical LLT name.
#[derive(Debug, Clone, Default)]
pub struct SynonymHints {
    by_name: AHashMap<String, Vec<String>>,
}

impl SynonymHints {
    /// Normalize every hint once. Hints that normalize to nothing are dropped.
    pub fn new(hints: &BTreeMap<String, Vec<String>>) -> Self {
        let by_name = hints
            .iter()
            .map(|(name, phrases)| {
                let compacted: Vec<String> = phrases
                    .iter()
                    .map(|phrase| text::compact(phrase))
                    .filter(|phrase| !phrase.is_empty())
                    .collect();
                (name.clone(), compacted)
            })
            .filter(|(_, phrases)| !phrases.is_empty())
            .collect();
        Self { by_name }
    }

    /// Normalized hints for a term name, empty when none are configured.
    pub fn for_name(&self, name: &str) -> &[String] {
        self.by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

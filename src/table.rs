//! Translation-table construction from training corpora.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::CorpusLine;
use crate::types::{Normalization, Surface};

/// One candidate normalization with its training frequency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Normalized form observed in training.
    pub normalization: Normalization,
    /// Number of training co-occurrences with the surface form.
    pub frequency: u64,
}

/// Frequency-based mapping from non-standard surfaces to candidate
/// normalizations.
///
/// Candidates are kept in first-observed order; that order, not any
/// re-sorting, is the documented tie-break for ambiguous lookups.
/// The table is built once from training data and read-only afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TranslationTable {
    entries: IndexMap<Surface, Vec<Candidate>>,
}

impl TranslationTable {
    /// Build a table from training corpus lines.
    ///
    /// Boundary lines are skipped for counting but never interrupt pair
    /// extraction: every token line contributes exactly one
    /// `(non_standard, gold)` pair. Duplicate pairs accumulate counts
    /// instead of producing duplicate entries. Matching is exact: no
    /// case folding, no smoothing.
    pub fn from_training(lines: &[CorpusLine]) -> Self {
        let mut entries: IndexMap<Surface, Vec<Candidate>> = IndexMap::new();
        let mut pairs = 0u64;
        for line in lines {
            let Some(record) = line.token() else { continue };
            pairs += 1;
            let candidates = entries.entry(record.non_standard.clone()).or_default();
            match candidates
                .iter_mut()
                .find(|candidate| candidate.normalization == record.gold)
            {
                Some(candidate) => candidate.frequency += 1,
                None => candidates.push(Candidate {
                    normalization: record.gold.clone(),
                    frequency: 1,
                }),
            }
        }
        debug!(surfaces = entries.len(), pairs, "built translation table");
        Self { entries }
    }

    /// Candidate list for `surface` in first-observed order, if recorded.
    pub fn candidates(&self, surface: &str) -> Option<&[Candidate]> {
        self.entries.get(surface).map(Vec::as_slice)
    }

    /// Total training occurrences recorded for `surface`.
    pub fn occurrences(&self, surface: &str) -> u64 {
        self.candidates(surface)
            .map(|candidates| candidates.iter().map(|c| c.frequency).sum())
            .unwrap_or(0)
    }

    /// Number of distinct surface forms in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no surface forms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(surface, candidates)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Surface, &[Candidate])> {
        self.entries
            .iter()
            .map(|(surface, candidates)| (surface, candidates.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_token_lines;

    fn training(pairs: &[(&str, &str)]) -> Vec<CorpusLine> {
        let contents: String = pairs
            .iter()
            .map(|(surface, gold)| format!("{surface}\t{gold}\tTAG\n"))
            .collect();
        parse_token_lines(&contents, "train").unwrap()
    }

    #[test]
    fn duplicate_pairs_accumulate_counts() {
        let lines = training(&[
            ("hasses", "hasse es"),
            ("hasses", "hasse es"),
            ("viiu", "viel"),
            ("viiu", "viele"),
        ]);
        let table = TranslationTable::from_training(&lines);

        let hasses = table.candidates("hasses").unwrap();
        assert_eq!(hasses.len(), 1);
        assert_eq!(hasses[0].normalization, "hasse es");
        assert_eq!(hasses[0].frequency, 2);

        let viiu = table.candidates("viiu").unwrap();
        assert_eq!(viiu.len(), 2);
        assert_eq!(viiu[0].normalization, "viel");
        assert_eq!(viiu[1].normalization, "viele");
    }

    #[test]
    fn candidate_order_is_first_observed() {
        let lines = training(&[("vill", "viele"), ("vill", "viel"), ("vill", "viel")]);
        let table = TranslationTable::from_training(&lines);
        let vill = table.candidates("vill").unwrap();
        assert_eq!(vill[0].normalization, "viele");
        assert_eq!(vill[0].frequency, 1);
        assert_eq!(vill[1].normalization, "viel");
        assert_eq!(vill[1].frequency, 2);
    }

    #[test]
    fn frequencies_sum_to_surface_occurrences() {
        let lines = training(&[
            ("vill", "viel"),
            ("vill", "viele"),
            ("vill", "viel"),
            ("merci", "danke"),
        ]);
        let table = TranslationTable::from_training(&lines);
        assert_eq!(table.occurrences("vill"), 3);
        assert_eq!(table.occurrences("merci"), 1);
        assert_eq!(table.occurrences("unseen"), 0);
    }

    #[test]
    fn boundaries_do_not_break_pair_extraction() {
        let contents = "a\tb\tT\n\na\tb\tT\n\n";
        let lines = parse_token_lines(contents, "train").unwrap();
        let table = TranslationTable::from_training(&lines);
        assert_eq!(table.len(), 1);
        assert_eq!(table.occurrences("a"), 2);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let lines = training(&[("Merci", "Danke"), ("merci", "danke")]);
        let table = TranslationTable::from_training(&lines);
        assert_eq!(table.len(), 2);
        assert_eq!(table.candidates("Merci").unwrap()[0].normalization, "Danke");
    }

    #[test]
    fn empty_training_yields_empty_table() {
        let table = TranslationTable::from_training(&[]);
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }
}

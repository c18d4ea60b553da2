//! Strategy-based normalization of token records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::{CorpusLine, TokenRecord};
use crate::table::{Candidate, TranslationTable};
use crate::types::{Normalization, Surface, TagLabel};

/// Normalization strategy chosen for a token.
///
/// A pure function of the candidate-set size for the token's surface form:
/// absent → `New`, one candidate → `Unique`, several → `Ambiguous`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Exactly one normalization was recorded in training.
    Unique,
    /// Several normalizations compete; the most frequent one wins.
    Ambiguous,
    /// The surface form was never seen in training.
    New,
}

impl Strategy {
    /// Canonical iteration order for report rows.
    pub const ALL: [Strategy; 3] = [Strategy::Unique, Strategy::Ambiguous, Strategy::New];

    /// Single-letter code used in the on-disk formats.
    pub fn code(self) -> &'static str {
        match self {
            Strategy::Unique => "U",
            Strategy::Ambiguous => "A",
            Strategy::New => "N",
        }
    }

    /// Parse a single-letter disk code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "U" => Some(Strategy::Unique),
            "A" => Some(Strategy::Ambiguous),
            "N" => Some(Strategy::New),
            _ => None,
        }
    }

    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Unique => "Unique",
            Strategy::Ambiguous => "Ambiguous",
            Strategy::New => "New",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One automatically normalized token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Strategy that produced the prediction.
    pub strategy: Strategy,
    /// Original non-standard surface form.
    pub non_standard: Surface,
    /// Predicted normalization.
    pub predicted: Normalization,
    /// Manually normalized gold form.
    pub gold: Normalization,
    /// Gold part-of-speech tag.
    pub pos_gold: TagLabel,
}

/// One line of a normalized corpus: a record or a sentence boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedLine {
    /// A normalized token.
    Token(NormalizedRecord),
    /// A blank line separating sentences.
    Boundary,
}

impl NormalizedLine {
    /// Return the normalized record unless this line is a boundary.
    pub fn token(&self) -> Option<&NormalizedRecord> {
        match self {
            NormalizedLine::Token(record) => Some(record),
            NormalizedLine::Boundary => None,
        }
    }
}

/// Applies a translation table to corpus lines.
pub struct Normalizer<'a> {
    table: &'a TranslationTable,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer over a built translation table.
    pub fn new(table: &'a TranslationTable) -> Self {
        Self { table }
    }

    /// Normalize every line; boundaries pass through unchanged.
    ///
    /// The output has exactly one entry per input line.
    pub fn normalize(&self, lines: &[CorpusLine]) -> Vec<NormalizedLine> {
        lines
            .iter()
            .map(|line| match line {
                CorpusLine::Boundary => NormalizedLine::Boundary,
                CorpusLine::Token(record) => NormalizedLine::Token(self.normalize_record(record)),
            })
            .collect()
    }

    /// Normalize one record under the unique/ambiguous/new strategy split.
    pub fn normalize_record(&self, record: &TokenRecord) -> NormalizedRecord {
        let (strategy, predicted) = match self.table.candidates(&record.non_standard) {
            None => (Strategy::New, record.non_standard.clone()),
            Some([single]) => (Strategy::Unique, single.normalization.clone()),
            Some(candidates) => (
                Strategy::Ambiguous,
                best_candidate(candidates).normalization.clone(),
            ),
        };
        NormalizedRecord {
            strategy,
            non_standard: record.non_standard.clone(),
            predicted,
            gold: record.gold.clone(),
            pos_gold: record.pos_gold.clone(),
        }
    }
}

/// Highest-frequency candidate; ties keep the earlier (first-observed) entry.
fn best_candidate(candidates: &[Candidate]) -> &Candidate {
    candidates
        .iter()
        .reduce(|best, candidate| {
            if candidate.frequency > best.frequency {
                candidate
            } else {
                best
            }
        })
        .expect("candidate list non-empty")
}

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Token alignment against the fixed reference tokenization.
pub mod align;
/// Centralized constants used across corpus formats, alignment, and reports.
pub mod constants;
/// Token corpus parsing and the tab-separated file formats.
pub mod corpus;
/// Reusable CLI runners shared by the demo binaries.
pub mod example_apps;
/// Strategy-based normalization of token records.
pub mod normalize;
/// End-to-end evaluation orchestration.
pub mod pipeline;
/// Accuracy aggregation and report rendering.
pub mod report;
/// Translation-table construction from training corpora.
pub mod table;
/// The tagging seam and a lexicon-backed reference tagger.
pub mod tagger;
/// Shared type aliases.
pub mod types;

mod errors;

pub use align::{
    AlignedTag, ReferenceToken, SegmentationOverride, SegmentationOverrides, TaggedLine,
    TokenAligner,
};
pub use corpus::{CorpusLine, TokenRecord};
pub use errors::PipelineError;
pub use normalize::{NormalizedLine, NormalizedRecord, Normalizer, Strategy};
pub use pipeline::EvaluationPipeline;
pub use report::{
    AlignedLine, AlignedRecord, EvaluationReport, Setting, StrategyCounts, render_report,
};
pub use table::{Candidate, TranslationTable};
pub use tagger::{LexiconTagger, TaggedToken, Tagger};
pub use types::{Normalization, SentenceText, Surface, TagLabel};

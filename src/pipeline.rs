//! End-to-end orchestration from a normalized corpus to an accuracy report.

use rayon::prelude::*;
use tracing::debug;

use crate::align::{AlignedTag, ReferenceToken, SegmentationOverrides, TokenAligner};
use crate::errors::PipelineError;
use crate::normalize::{NormalizedLine, NormalizedRecord};
use crate::report::{AlignedLine, AlignedRecord, EvaluationReport};
use crate::tagger::Tagger;

/// Runs the three tagging settings over one normalized split and aligns
/// each against the fixed reference tokenization.
///
/// Sentence tagging is embarrassingly parallel; sentences are tagged with
/// `rayon` and reassembled in corpus order before the aligner consumes the
/// flat stream, so the result is identical to a sequential run.
pub struct EvaluationPipeline<T: Tagger> {
    tagger: T,
    aligner: TokenAligner,
}

impl<T: Tagger> EvaluationPipeline<T> {
    /// Create a pipeline around a tagger and its segmentation overrides.
    pub fn new(tagger: T, overrides: SegmentationOverrides) -> Self {
        Self {
            tagger,
            aligner: TokenAligner::new(overrides),
        }
    }

    /// Produce 8-field aligned records for one normalized split.
    ///
    /// The lower-bound column tags the raw non-standard text, the
    /// upper-bound column the gold normalization, and the baseline column
    /// the automatic normalization; each column is aligned against its own
    /// tokenization. The output has exactly one line per input line.
    pub fn evaluate(&self, lines: &[NormalizedLine]) -> Result<Vec<AlignedLine>, PipelineError> {
        let lower = column_reference(lines, |record| record.non_standard.as_str());
        let upper = column_reference(lines, |record| record.gold.as_str());
        let baseline = column_reference(lines, |record| record.predicted.as_str());

        let pos_lower = self.align_column(&lower)?;
        let pos_upper = self.align_column(&upper)?;
        let pos_baseline = self.align_column(&baseline)?;

        let mut out = Vec::with_capacity(lines.len());
        let zipped = lines
            .iter()
            .zip(pos_lower)
            .zip(pos_upper)
            .zip(pos_baseline);
        for (idx, (((line, lower), upper), baseline)) in zipped.enumerate() {
            match (line, lower, upper, baseline) {
                (
                    NormalizedLine::Boundary,
                    AlignedTag::Boundary,
                    AlignedTag::Boundary,
                    AlignedTag::Boundary,
                ) => out.push(AlignedLine::Boundary),
                (
                    NormalizedLine::Token(record),
                    AlignedTag::Tag(pos_lower),
                    AlignedTag::Tag(pos_upper),
                    AlignedTag::Tag(pos_baseline),
                ) => out.push(AlignedLine::Token(AlignedRecord {
                    strategy: record.strategy,
                    non_standard: record.non_standard.clone(),
                    predicted: record.predicted.clone(),
                    gold: record.gold.clone(),
                    pos_gold: record.pos_gold.clone(),
                    pos_lower,
                    pos_upper,
                    pos_baseline,
                })),
                _ => return Err(PipelineError::BoundaryMismatch { line: idx + 1 }),
            }
        }
        debug!(lines = out.len(), "aligned evaluation records");
        Ok(out)
    }

    /// Aggregate an evaluated split into an accuracy report.
    pub fn report(&self, lines: &[AlignedLine]) -> Result<EvaluationReport, PipelineError> {
        EvaluationReport::from_lines(lines)
    }

    fn align_column(&self, reference: &[ReferenceToken]) -> Result<Vec<AlignedTag>, PipelineError> {
        let sentences = TokenAligner::sentences(reference);
        let outputs = sentences
            .par_iter()
            .map(|sentence| self.tagger.tag(sentence))
            .collect::<Result<Vec<_>, PipelineError>>()?;
        let stream = TokenAligner::assemble_stream(outputs);
        self.aligner.align(reference, &stream)
    }
}

/// Extract one token column as a reference tokenization.
fn column_reference<F>(lines: &[NormalizedLine], pick: F) -> Vec<ReferenceToken>
where
    F: Fn(&NormalizedRecord) -> &str,
{
    lines
        .iter()
        .map(|line| match line {
            NormalizedLine::Boundary => ReferenceToken::Boundary,
            NormalizedLine::Token(record) => ReferenceToken::Unit(pick(record).to_string()),
        })
        .collect()
}

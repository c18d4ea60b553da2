//! Token alignment against the fixed reference tokenization.
//!
//! A third-party tagger re-segments its input: it may split a single
//! reference token (`!!!` → three punctuation tokens) or need several
//! output tokens for one multi-word reference unit (`würde ich`). The
//! aligner walks the reference tokenization with a cursor into the flat
//! tagger-output stream and recovers exactly one tag per reference
//! position, consulting an injectable override table for surface forms the
//! tagger is known to split.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::align::{
    MAX_OVERRIDE_CONSUMED, MAX_UNIT_WORDS, MIN_OVERRIDE_CONSUMED, TAG_JOIN,
};
use crate::errors::PipelineError;
use crate::tagger::{TaggedToken, Tagger};
use crate::types::{SentenceText, Surface, TagLabel};

/// One position of the fixed reference tokenization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceToken {
    /// A reference token, possibly a multi-word unit.
    Unit(String),
    /// A sentence boundary.
    Boundary,
}

/// One entry of the flat tagger-output stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaggedLine {
    /// A tagger output token.
    Token(TaggedToken),
    /// The sentinel closing one sentence's output.
    Boundary,
}

/// One aligned output position: a recovered tag or a boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlignedTag {
    /// The tag recovered for one reference token.
    Tag(TagLabel),
    /// A sentence boundary carried through from the reference.
    Boundary,
}

/// A fixed re-segmentation rule for one surface form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationOverride {
    /// Tag emitted for the reference token.
    pub tag: TagLabel,
    /// Number of tagger tokens consumed from the stream.
    pub consumed: usize,
}

/// Injectable table of surface forms the tagger is known to re-segment.
///
/// This is configuration, not code: the entries are curated per tagger by
/// comparing reference tokens against the tagger's output, and loaded at
/// startup (typically from JSON). Consumption counts are validated to lie
/// in 2..=5.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SegmentationOverrides {
    entries: IndexMap<Surface, SegmentationOverride>,
}

impl SegmentationOverrides {
    /// Create an empty override table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one override rule for `surface`.
    pub fn insert(
        &mut self,
        surface: impl Into<Surface>,
        tag: impl Into<TagLabel>,
        consumed: usize,
    ) -> Result<(), PipelineError> {
        let surface = surface.into();
        validate_consumed(&surface, consumed)?;
        self.entries.insert(
            surface,
            SegmentationOverride {
                tag: tag.into(),
                consumed,
            },
        );
        Ok(())
    }

    /// Load overrides from a JSON object file:
    /// `{"!!!": {"tag": "$.", "consumed": 3}, ...}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let entries: IndexMap<Surface, SegmentationOverride> = serde_json::from_str(&contents)
            .map_err(|err| {
                PipelineError::Configuration(format!(
                    "invalid segmentation overrides '{}': {err}",
                    path.display()
                ))
            })?;
        for (surface, rule) in &entries {
            validate_consumed(surface, rule.consumed)?;
        }
        Ok(Self { entries })
    }

    /// Look up the override rule for `surface`, if any.
    pub fn get(&self, surface: &str) -> Option<&SegmentationOverride> {
        self.entries.get(surface)
    }

    /// Number of override rules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_consumed(surface: &str, consumed: usize) -> Result<(), PipelineError> {
    if !(MIN_OVERRIDE_CONSUMED..=MAX_OVERRIDE_CONSUMED).contains(&consumed) {
        return Err(PipelineError::Configuration(format!(
            "segmentation override for '{surface}' consumes {consumed} tokens; \
             allowed range is {MIN_OVERRIDE_CONSUMED}..={MAX_OVERRIDE_CONSUMED}"
        )));
    }
    Ok(())
}

/// Re-attaches tagger output to the fixed reference tokenization.
pub struct TokenAligner {
    overrides: SegmentationOverrides,
}

impl TokenAligner {
    /// Create an aligner with a segmentation override table.
    pub fn new(overrides: SegmentationOverrides) -> Self {
        Self { overrides }
    }

    /// The override table this aligner consults.
    pub fn overrides(&self) -> &SegmentationOverrides {
        &self.overrides
    }

    /// Space-joined sentences of a reference tokenization.
    ///
    /// Boundaries split the reference into groups; the group after the last
    /// boundary is included even when empty, so the sentence count always
    /// equals the boundary count plus one.
    pub fn sentences(reference: &[ReferenceToken]) -> Vec<SentenceText> {
        let mut sentences = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for entry in reference {
            match entry {
                ReferenceToken::Unit(unit) => current.push(unit),
                ReferenceToken::Boundary => {
                    sentences.push(current.join(" "));
                    current.clear();
                }
            }
        }
        sentences.push(current.join(" "));
        sentences
    }

    /// Flatten per-sentence tagger outputs into one stream, closing each
    /// sentence with a boundary sentinel.
    pub fn assemble_stream(outputs: Vec<Vec<TaggedToken>>) -> Vec<TaggedLine> {
        let mut stream = Vec::new();
        for output in outputs {
            stream.extend(output.into_iter().map(TaggedLine::Token));
            stream.push(TaggedLine::Boundary);
        }
        stream
    }

    /// Tag every sentence sequentially and build the flat stream.
    pub fn tag_stream<T: Tagger>(
        tagger: &T,
        reference: &[ReferenceToken],
    ) -> Result<Vec<TaggedLine>, PipelineError> {
        let outputs = Self::sentences(reference)
            .iter()
            .map(|sentence| tagger.tag(sentence))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::assemble_stream(outputs))
    }

    /// Walk `reference` against `stream`, emitting exactly one entry per
    /// reference position.
    ///
    /// Reference boundaries consume stream boundaries in lockstep. A
    /// single-word token either matches an override (advancing the cursor
    /// by the rule's consumed count) or takes the tag at the cursor. An
    /// N-word unit (N in 2..=4) consumes N tokens and joins their tags
    /// with `+`. Running out of tagger output is a fatal
    /// [`PipelineError::AlignmentExhausted`] naming the reference token.
    /// After the walk the single trailing sentence sentinel is discarded;
    /// any further unconsumed tokens are logged as an override-table gap.
    pub fn align(
        &self,
        reference: &[ReferenceToken],
        stream: &[TaggedLine],
    ) -> Result<Vec<AlignedTag>, PipelineError> {
        let mut tags = Vec::with_capacity(reference.len());
        let mut cursor = 0usize;
        let mut sentence = 0usize;

        for (idx, entry) in reference.iter().enumerate() {
            let line = idx + 1;
            match entry {
                ReferenceToken::Boundary => {
                    match stream.get(cursor) {
                        Some(TaggedLine::Boundary) => {}
                        _ => return Err(PipelineError::BoundaryMismatch { line }),
                    }
                    cursor += 1;
                    sentence += 1;
                    tags.push(AlignedTag::Boundary);
                }
                ReferenceToken::Unit(unit) => {
                    let words = unit.split_whitespace().count();
                    match words {
                        0 => {
                            return Err(PipelineError::Configuration(format!(
                                "reference token at line {line} contains no words"
                            )));
                        }
                        1 => {
                            if let Some(rule) = self.overrides.get(unit.as_str()) {
                                for _ in 0..rule.consumed {
                                    take(stream, &mut cursor, unit, line, sentence)?;
                                }
                                tags.push(AlignedTag::Tag(rule.tag.clone()));
                            } else {
                                let token = take(stream, &mut cursor, unit, line, sentence)?;
                                tags.push(AlignedTag::Tag(token.tag.clone()));
                            }
                        }
                        n if n <= MAX_UNIT_WORDS => {
                            let mut joined = String::new();
                            for word in 0..n {
                                let token = take(stream, &mut cursor, unit, line, sentence)?;
                                if word > 0 {
                                    joined.push_str(TAG_JOIN);
                                }
                                joined.push_str(&token.tag);
                            }
                            tags.push(AlignedTag::Tag(joined));
                        }
                        n => {
                            return Err(PipelineError::Configuration(format!(
                                "reference token '{unit}' at line {line} spans {n} words; \
                                 at most {MAX_UNIT_WORDS} are supported"
                            )));
                        }
                    }
                }
            }
        }

        let residue = stream[cursor.min(stream.len())..]
            .iter()
            .filter(|entry| matches!(entry, TaggedLine::Token(_)))
            .count();
        if residue > 0 {
            warn!(residue, "tagger output not consumed by alignment");
        }
        Ok(tags)
    }

    /// Convenience: tag sequentially, then align.
    pub fn tag_and_align<T: Tagger>(
        &self,
        tagger: &T,
        reference: &[ReferenceToken],
    ) -> Result<Vec<AlignedTag>, PipelineError> {
        let stream = Self::tag_stream(tagger, reference)?;
        self.align(reference, &stream)
    }
}

fn take<'s>(
    stream: &'s [TaggedLine],
    cursor: &mut usize,
    unit: &str,
    line: usize,
    sentence: usize,
) -> Result<&'s TaggedToken, PipelineError> {
    match stream.get(*cursor) {
        Some(TaggedLine::Token(token)) => {
            *cursor += 1;
            Ok(token)
        }
        Some(TaggedLine::Boundary) => Err(PipelineError::BoundaryMismatch { line }),
        None => Err(PipelineError::AlignmentExhausted {
            token: unit.to_string(),
            line,
            sentence: sentence + 1,
        }),
    }
}

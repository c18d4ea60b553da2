use std::io;

use thiserror::Error;

use crate::normalize::Strategy;

/// Error type for corpus parsing, alignment, and evaluation failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "malformed record in '{path}' line {line}: expected {expected} tab-separated columns, found {found}"
    )]
    MalformedRecord {
        path: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error(
        "tagger output exhausted at reference token '{token}' (line {line}, sentence {sentence})"
    )]
    AlignmentExhausted {
        token: String,
        line: usize,
        sentence: usize,
    },
    #[error("sentence boundary mismatch at line {line}: reference and tagger streams disagree")]
    BoundaryMismatch { line: usize },
    #[error("no {strategy} tokens in the evaluated split; accuracy is undefined")]
    EmptyStrategyBucket { strategy: Strategy },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}

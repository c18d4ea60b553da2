//! Token corpus parsing and the tab-separated file formats.
//!
//! Every format is line-oriented: one token per line, columns separated by
//! tabs, a blank line marking a sentence boundary. Parsing is strict: a
//! line with the wrong column count aborts with its file and line number
//! rather than guessing at missing fields.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::corpus::{
    ALIGNED_COLUMNS, FIELD_SEPARATOR, INPUT_COLUMNS, NORMALIZED_COLUMNS,
};
use crate::errors::PipelineError;
use crate::normalize::{NormalizedLine, NormalizedRecord, Strategy};
use crate::report::{AlignedLine, AlignedRecord};
use crate::types::{Normalization, Surface, TagLabel};

/// One labeled token of corpus data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Non-standard surface form (first column).
    pub non_standard: Surface,
    /// Manually normalized gold form (second column).
    pub gold: Normalization,
    /// Gold part-of-speech tag (third column).
    pub pos_gold: TagLabel,
}

/// One line of a token corpus: a record or a sentence boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorpusLine {
    /// A labeled token.
    Token(TokenRecord),
    /// A blank line separating sentences.
    Boundary,
}

impl CorpusLine {
    /// Return the token record unless this line is a boundary.
    pub fn token(&self) -> Option<&TokenRecord> {
        match self {
            CorpusLine::Token(record) => Some(record),
            CorpusLine::Boundary => None,
        }
    }
}

/// Read and parse a 3-column token file.
pub fn read_token_file(path: impl AsRef<Path>) -> Result<Vec<CorpusLine>, PipelineError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_token_lines(&contents, &path.display().to_string())
}

/// Parse 3-column token lines, reporting `name` as the source on failure.
pub fn parse_token_lines(contents: &str, name: &str) -> Result<Vec<CorpusLine>, PipelineError> {
    let mut lines = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        if raw.is_empty() {
            lines.push(CorpusLine::Boundary);
            continue;
        }
        let fields = split_columns(raw, INPUT_COLUMNS, name, idx)?;
        lines.push(CorpusLine::Token(TokenRecord {
            non_standard: fields[0].to_string(),
            gold: fields[1].to_string(),
            pos_gold: fields[2].to_string(),
        }));
    }
    debug!(source = name, lines = lines.len(), "read token corpus");
    Ok(lines)
}

/// Read and parse a 5-column normalized file.
pub fn read_normalized_file(path: impl AsRef<Path>) -> Result<Vec<NormalizedLine>, PipelineError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_normalized_lines(&contents, &path.display().to_string())
}

/// Parse 5-column normalized lines, reporting `name` as the source on failure.
pub fn parse_normalized_lines(
    contents: &str,
    name: &str,
) -> Result<Vec<NormalizedLine>, PipelineError> {
    let mut lines = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        if raw.is_empty() {
            lines.push(NormalizedLine::Boundary);
            continue;
        }
        let fields = split_columns(raw, NORMALIZED_COLUMNS, name, idx)?;
        lines.push(NormalizedLine::Token(NormalizedRecord {
            strategy: parse_strategy(fields[0], name, idx)?,
            non_standard: fields[1].to_string(),
            predicted: fields[2].to_string(),
            gold: fields[3].to_string(),
            pos_gold: fields[4].to_string(),
        }));
    }
    debug!(source = name, lines = lines.len(), "read normalized corpus");
    Ok(lines)
}

/// Read and parse an 8-column aligned evaluation file.
pub fn read_aligned_file(path: impl AsRef<Path>) -> Result<Vec<AlignedLine>, PipelineError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let name = path.display().to_string();
    let mut lines = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        if raw.is_empty() {
            lines.push(AlignedLine::Boundary);
            continue;
        }
        let fields = split_columns(raw, ALIGNED_COLUMNS, &name, idx)?;
        lines.push(AlignedLine::Token(AlignedRecord {
            strategy: parse_strategy(fields[0], &name, idx)?,
            non_standard: fields[1].to_string(),
            predicted: fields[2].to_string(),
            gold: fields[3].to_string(),
            pos_gold: fields[4].to_string(),
            pos_lower: fields[5].to_string(),
            pos_upper: fields[6].to_string(),
            pos_baseline: fields[7].to_string(),
        }));
    }
    Ok(lines)
}

/// Write normalizer output in the 5-column format.
pub fn write_normalized_file(
    path: impl AsRef<Path>,
    lines: &[NormalizedLine],
) -> Result<(), PipelineError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    for line in lines {
        match line {
            NormalizedLine::Boundary => writeln!(writer)?,
            NormalizedLine::Token(record) => writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                record.strategy.code(),
                record.non_standard,
                record.predicted,
                record.gold,
                record.pos_gold
            )?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write aligned evaluation records in the 8-column format.
pub fn write_aligned_file(
    path: impl AsRef<Path>,
    lines: &[AlignedLine],
) -> Result<(), PipelineError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    for line in lines {
        match line {
            AlignedLine::Boundary => writeln!(writer)?,
            AlignedLine::Token(record) => writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                record.strategy.code(),
                record.non_standard,
                record.predicted,
                record.gold,
                record.pos_gold,
                record.pos_lower,
                record.pos_upper,
                record.pos_baseline
            )?,
        }
    }
    writer.flush()?;
    Ok(())
}

fn split_columns<'a>(
    raw: &'a str,
    expected: usize,
    name: &str,
    idx: usize,
) -> Result<Vec<&'a str>, PipelineError> {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(PipelineError::MalformedRecord {
            path: name.to_string(),
            line: idx + 1,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_strategy(code: &str, name: &str, idx: usize) -> Result<Strategy, PipelineError> {
    Strategy::from_code(code).ok_or_else(|| {
        PipelineError::Configuration(format!(
            "unknown strategy code '{}' in '{}' line {}",
            code,
            name,
            idx + 1
        ))
    })
}

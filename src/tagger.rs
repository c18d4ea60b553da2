//! The tagging seam and a lexicon-backed reference tagger.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::types::TagLabel;

/// One token of tagger output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Surface form as segmented by the tagger.
    pub surface: String,
    /// Predicted tag label.
    pub tag: TagLabel,
}

/// Part-of-speech tagging backend.
///
/// Implementations receive a whole sentence and return their own
/// segmentation with one tag per produced token, which may split or merge
/// tokens differently from the reference tokenization. Output must be
/// deterministic for identical input.
pub trait Tagger: Send + Sync {
    /// Tag `sentence`, returning the tagger's own token segmentation.
    fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, PipelineError>;
}

/// Deterministic word-lexicon tagger used by the demos and tests.
///
/// Splits on whitespace, then splits leading and trailing punctuation runs
/// into one token per character, the same re-segmentation behavior the
/// aligner's override table exists to reconcile.
#[derive(Debug)]
pub struct LexiconTagger {
    lexicon: HashMap<String, TagLabel>,
    fallback: TagLabel,
}

/// Tag assigned to punctuation tokens missing from the lexicon.
const PUNCTUATION_TAG: &str = "$.";

impl LexiconTagger {
    /// Create a tagger from word→tag pairs with `fallback` for unknown words.
    pub fn new<I, W, T>(entries: I, fallback: impl Into<TagLabel>) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: Into<String>,
        T: Into<TagLabel>,
    {
        Self {
            lexicon: entries
                .into_iter()
                .map(|(word, tag)| (word.into(), tag.into()))
                .collect(),
            fallback: fallback.into(),
        }
    }

    /// Load a two-column tab-separated `word \t tag` lexicon file.
    pub fn from_file(
        path: impl AsRef<Path>,
        fallback: impl Into<TagLabel>,
    ) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let name = path.display().to_string();
        let mut lexicon = HashMap::new();
        for (idx, raw) in contents.lines().enumerate() {
            if raw.is_empty() {
                continue;
            }
            let Some((word, tag)) = raw.split_once('\t') else {
                return Err(PipelineError::MalformedRecord {
                    path: name.clone(),
                    line: idx + 1,
                    expected: 2,
                    found: 1,
                });
            };
            lexicon.insert(word.to_string(), tag.to_string());
        }
        Ok(Self {
            lexicon,
            fallback: fallback.into(),
        })
    }

    fn lookup(&self, word: &str) -> TagLabel {
        if let Some(tag) = self.lexicon.get(word) {
            return tag.clone();
        }
        if word.chars().all(|c| c.is_ascii_punctuation()) {
            return PUNCTUATION_TAG.to_string();
        }
        self.fallback.clone()
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, PipelineError> {
        let mut out = Vec::new();
        for word in sentence.split_whitespace() {
            for piece in split_punctuation(word) {
                out.push(TaggedToken {
                    surface: piece.to_string(),
                    tag: self.lookup(piece),
                });
            }
        }
        Ok(out)
    }
}

/// Split leading and trailing ASCII punctuation runs off a word, one token
/// per punctuation character; a word made entirely of punctuation becomes
/// one token per character.
fn split_punctuation(word: &str) -> Vec<&str> {
    if word.chars().all(|c| c.is_ascii_punctuation()) {
        return word
            .char_indices()
            .map(|(idx, c)| &word[idx..idx + c.len_utf8()])
            .collect();
    }
    let head = word
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_punctuation())
        .count();
    let tail = word
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_punctuation())
        .count();

    let bytes: Vec<(usize, char)> = word.char_indices().collect();
    let core_start = bytes[head].0;
    let core_end = if tail == 0 {
        word.len()
    } else {
        bytes[bytes.len() - tail].0
    };

    let mut pieces = Vec::with_capacity(head + tail + 1);
    for (idx, c) in &bytes[..head] {
        pieces.push(&word[*idx..idx + c.len_utf8()]);
    }
    pieces.push(&word[core_start..core_end]);
    for (idx, c) in &bytes[bytes.len() - tail..] {
        pieces.push(&word[*idx..idx + c.len_utf8()]);
    }
    pieces
}

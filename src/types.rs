/// Non-standard surface form as it appears in a corpus.
/// Examples: `viiu`, `hasses`, `!!!`
pub type Surface = String;
/// Standard (normalized) word form, possibly multi-word.
/// Examples: `viel`, `hasse es`
pub type Normalization = String;
/// Part-of-speech tag label; multi-word units carry joined labels.
/// Examples: `VAFIN`, `PPER`, `$.`, `VAFIN+PPER`
pub type TagLabel = String;
/// A sentence assembled from reference tokens joined by single spaces.
/// Example: `i muen alles wüsse XD`
pub type SentenceText = String;

/// Constants used by corpus file parsing and writing.
pub mod corpus {
    /// Column separator for every token file format.
    pub const FIELD_SEPARATOR: char = '\t';
    /// Column count of training/input token files.
    pub const INPUT_COLUMNS: usize = 3;
    /// Column count of normalizer output files.
    pub const NORMALIZED_COLUMNS: usize = 5;
    /// Column count of aligned evaluation files.
    pub const ALIGNED_COLUMNS: usize = 8;
}

/// Constants used by token alignment and segmentation overrides.
pub mod align {
    /// Marker joining the tags of a multi-word reference unit.
    pub const TAG_JOIN: &str = "+";
    /// Widest reference unit the aligner will consume, in whitespace-delimited words.
    pub const MAX_UNIT_WORDS: usize = 4;
    /// Minimum tagger tokens a segmentation override may consume.
    pub const MIN_OVERRIDE_CONSUMED: usize = 2;
    /// Maximum tagger tokens a segmentation override may consume.
    pub const MAX_OVERRIDE_CONSUMED: usize = 5;
}

/// Constants used by accuracy report rendering.
pub mod report {
    /// Row label for the cross-strategy totals.
    pub const TOTAL_LABEL: &str = "Total";
    /// Column header for per-strategy token counts.
    pub const COUNT_HEADER: &str = "N";
    /// Column header for accuracy percentages.
    pub const ACCURACY_HEADER: &str = "Accuracy";
}

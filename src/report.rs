//! Accuracy aggregation across strategies and tagging settings.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::constants::report::{ACCURACY_HEADER, COUNT_HEADER, TOTAL_LABEL};
use crate::errors::PipelineError;
use crate::normalize::Strategy;
use crate::types::{Normalization, Surface, TagLabel};

/// Tagging settings compared against the gold tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Setting {
    /// Tagger run on the raw non-standard text.
    LowerBound,
    /// Tagger run on the manually normalized gold text.
    UpperBound,
    /// Tagger run on the automatically normalized text.
    Baseline,
}

impl Setting {
    /// Canonical iteration order for report sections.
    pub const ALL: [Setting; 3] = [Setting::LowerBound, Setting::UpperBound, Setting::Baseline];

    /// Display label used in rendered reports.
    pub fn label(self) -> &'static str {
        match self {
            Setting::LowerBound => "Lower bound",
            Setting::UpperBound => "Upper bound",
            Setting::Baseline => "Baseline",
        }
    }
}

/// One fully aligned evaluation record (the 8-column format).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRecord {
    /// Strategy that produced the normalization.
    pub strategy: Strategy,
    /// Original non-standard surface form.
    pub non_standard: Surface,
    /// Predicted normalization.
    pub predicted: Normalization,
    /// Manually normalized gold form.
    pub gold: Normalization,
    /// Gold part-of-speech tag.
    pub pos_gold: TagLabel,
    /// Tag recovered in the lower-bound setting.
    pub pos_lower: TagLabel,
    /// Tag recovered in the upper-bound setting.
    pub pos_upper: TagLabel,
    /// Tag recovered in the baseline setting.
    pub pos_baseline: TagLabel,
}

impl AlignedRecord {
    /// Tag column for `setting`.
    pub fn setting_tag(&self, setting: Setting) -> &str {
        match setting {
            Setting::LowerBound => &self.pos_lower,
            Setting::UpperBound => &self.pos_upper,
            Setting::Baseline => &self.pos_baseline,
        }
    }
}

/// One line of an aligned corpus: a record or a sentence boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignedLine {
    /// An aligned evaluation record.
    Token(AlignedRecord),
    /// A blank line separating sentences.
    Boundary,
}

impl AlignedLine {
    /// Return the aligned record unless this line is a boundary.
    pub fn token(&self) -> Option<&AlignedRecord> {
        match self {
            AlignedLine::Token(record) => Some(record),
            AlignedLine::Boundary => None,
        }
    }
}

/// Agreement counts for one strategy bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCounts {
    /// Tokens observed for this strategy.
    pub total: u64,
    /// Tokens whose setting tag matched the gold tag, in [`Setting::ALL`] order.
    pub agreement: [u64; 3],
}

impl StrategyCounts {
    /// Agreement count for one setting.
    pub fn agreement_for(&self, setting: Setting) -> u64 {
        self.agreement[setting_index(setting)]
    }
}

/// Per-strategy and total accuracy table for one evaluated split.
///
/// Construction fails with [`PipelineError::EmptyStrategyBucket`] when any
/// strategy has zero tokens in the split, so every accuracy this table
/// reports has a non-zero denominator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationReport {
    counts: [StrategyCounts; 3],
}

impl EvaluationReport {
    /// Aggregate aligned lines into per-strategy agreement counts.
    ///
    /// Every compared tag, gold and setting columns alike, is trimmed of
    /// trailing whitespace before comparison.
    pub fn from_lines(lines: &[AlignedLine]) -> Result<Self, PipelineError> {
        let mut counts = [StrategyCounts::default(); 3];
        for line in lines {
            let Some(record) = line.token() else { continue };
            let bucket = &mut counts[strategy_index(record.strategy)];
            bucket.total += 1;
            let gold = record.pos_gold.trim_end();
            for (idx, setting) in Setting::ALL.into_iter().enumerate() {
                if record.setting_tag(setting).trim_end() == gold {
                    bucket.agreement[idx] += 1;
                }
            }
        }
        for (strategy, bucket) in Strategy::ALL.into_iter().zip(&counts) {
            if bucket.total == 0 {
                return Err(PipelineError::EmptyStrategyBucket { strategy });
            }
        }
        Ok(Self { counts })
    }

    /// Counts for one strategy bucket.
    pub fn counts(&self, strategy: Strategy) -> &StrategyCounts {
        &self.counts[strategy_index(strategy)]
    }

    /// Total token count across strategies.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|bucket| bucket.total).sum()
    }

    /// Total agreement across strategies for `setting`.
    pub fn total_agreement(&self, setting: Setting) -> u64 {
        self.counts
            .iter()
            .map(|bucket| bucket.agreement_for(setting))
            .sum()
    }

    /// Accuracy percentage for one strategy and setting, rounded to two
    /// decimals.
    pub fn accuracy(&self, strategy: Strategy, setting: Setting) -> f64 {
        let bucket = self.counts(strategy);
        percentage(bucket.agreement_for(setting), bucket.total)
    }

    /// Overall accuracy percentage for `setting`, rounded to two decimals.
    pub fn total_accuracy(&self, setting: Setting) -> f64 {
        percentage(self.total_agreement(setting), self.total())
    }
}

fn strategy_index(strategy: Strategy) -> usize {
    match strategy {
        Strategy::Unique => 0,
        Strategy::Ambiguous => 1,
        Strategy::New => 2,
    }
}

fn setting_index(setting: Setting) -> usize {
    match setting {
        Setting::LowerBound => 0,
        Setting::UpperBound => 1,
        Setting::Baseline => 2,
    }
}

/// Round an agreement ratio to a two-decimal percentage.
fn percentage(agreement: u64, total: u64) -> f64 {
    (agreement as f64 / total as f64 * 10_000.0).round() / 100.0
}

/// Render accuracy tables for one or more named splits, one section per
/// tagging setting.
pub fn render_report(splits: &[(String, EvaluationReport)]) -> String {
    let mut out = String::new();
    for setting in Setting::ALL {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}:", setting.label());
        out.push('\n');
        render_setting(&mut out, setting, splits);
    }
    out
}

fn render_setting(out: &mut String, setting: Setting, splits: &[(String, EvaluationReport)]) {
    let mut header = vec!["Case".to_string()];
    for (name, _) in splits {
        header.push(format!("{COUNT_HEADER} ({name})"));
        header.push(format!("{ACCURACY_HEADER} ({name})"));
    }

    let mut rows = vec![header];
    for strategy in Strategy::ALL {
        let mut row = vec![strategy.label().to_string()];
        for (_, report) in splits {
            row.push(report.counts(strategy).total.to_string());
            row.push(format!("{:.2}", report.accuracy(strategy, setting)));
        }
        rows.push(row);
    }
    let mut total_row = vec![TOTAL_LABEL.to_string()];
    for (_, report) in splits {
        total_row.push(report.total().to_string());
        total_row.push(format!("{:.2}", report.total_accuracy(setting)));
    }
    rows.push(total_row);

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|col| rows.iter().map(|row| row[col].len()).max().unwrap_or(0))
        .collect();
    for (idx, row) in rows.iter().enumerate() {
        let mut rendered = String::new();
        for (col, cell) in row.iter().enumerate() {
            if col > 0 {
                rendered.push_str("  ");
            }
            let _ = write!(rendered, "{cell:<width$}", width = widths[col]);
        }
        let _ = writeln!(out, "{}", rendered.trim_end());
        if idx == 0 {
            let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            let _ = writeln!(out, "{}", underline.join("  "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(strategy: Strategy, gold_tag: &str, lower: &str, upper: &str, baseline: &str) -> AlignedLine {
        AlignedLine::Token(AlignedRecord {
            strategy,
            non_standard: "w".into(),
            predicted: "w".into(),
            gold: "w".into(),
            pos_gold: gold_tag.into(),
            pos_lower: lower.into(),
            pos_upper: upper.into(),
            pos_baseline: baseline.into(),
        })
    }

    fn sample_lines() -> Vec<AlignedLine> {
        vec![
            record(Strategy::Unique, "PPER", "PPER", "PPER", "PPER"),
            record(Strategy::Unique, "NN", "ADV", "NN", "NN"),
            AlignedLine::Boundary,
            record(Strategy::Ambiguous, "PIS", "PIS", "PIS", "ADV"),
            record(Strategy::New, "ITJ", "XY", "ITJ", "XY"),
        ]
    }

    #[test]
    fn counts_and_accuracies_reconcile() {
        let report = EvaluationReport::from_lines(&sample_lines()).unwrap();
        assert_eq!(report.total(), 4);
        for setting in Setting::ALL {
            let per_strategy: u64 = Strategy::ALL
                .into_iter()
                .map(|strategy| report.counts(strategy).agreement_for(setting))
                .sum();
            assert_eq!(report.total_agreement(setting), per_strategy);
        }
        assert_eq!(report.accuracy(Strategy::Unique, Setting::LowerBound), 50.0);
        assert_eq!(report.accuracy(Strategy::Unique, Setting::UpperBound), 100.0);
        assert_eq!(report.total_accuracy(Setting::UpperBound), 100.0);
        assert_eq!(report.total_accuracy(Setting::Baseline), 50.0);
    }

    #[test]
    fn accuracies_stay_within_percentage_bounds() {
        let report = EvaluationReport::from_lines(&sample_lines()).unwrap();
        for strategy in Strategy::ALL {
            for setting in Setting::ALL {
                let accuracy = report.accuracy(strategy, setting);
                assert!((0.0..=100.0).contains(&accuracy));
            }
        }
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        let lines = vec![
            record(Strategy::Unique, "A", "A", "A", "A"),
            record(Strategy::Unique, "A", "B", "A", "A"),
            record(Strategy::Unique, "A", "B", "A", "A"),
            record(Strategy::Ambiguous, "A", "A", "A", "A"),
            record(Strategy::New, "A", "A", "A", "A"),
        ];
        let report = EvaluationReport::from_lines(&lines).unwrap();
        // 1/3 agreement rounds to 33.33, not a long fraction.
        assert_eq!(report.accuracy(Strategy::Unique, Setting::LowerBound), 33.33);
    }

    #[test]
    fn empty_strategy_bucket_is_an_explicit_error() {
        let lines = vec![
            record(Strategy::Unique, "A", "A", "A", "A"),
            record(Strategy::New, "A", "A", "A", "A"),
        ];
        let err = EvaluationReport::from_lines(&lines).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyStrategyBucket { strategy: Strategy::Ambiguous }
        ));
    }

    #[test]
    fn trailing_whitespace_is_ignored_on_both_sides() {
        let lines = vec![
            record(Strategy::Unique, "PPER ", "PPER", "PPER\t", "PPER"),
            record(Strategy::Ambiguous, "A", "A", "A", "A"),
            record(Strategy::New, "A", "A", "A", "A"),
        ];
        let report = EvaluationReport::from_lines(&lines).unwrap();
        for setting in Setting::ALL {
            assert_eq!(report.accuracy(Strategy::Unique, setting), 100.0);
        }
    }

    #[test]
    fn rendered_report_lists_all_sections_and_rows() {
        let report = EvaluationReport::from_lines(&sample_lines()).unwrap();
        let rendered = render_report(&[("dev".to_string(), report)]);
        for setting in Setting::ALL {
            assert!(rendered.contains(&format!("{}:", setting.label())));
        }
        for strategy in Strategy::ALL {
            assert!(rendered.contains(strategy.label()));
        }
        assert!(rendered.contains(TOTAL_LABEL));
        assert!(rendered.contains("N (dev)"));
        assert!(rendered.contains("Accuracy (dev)"));
    }
}

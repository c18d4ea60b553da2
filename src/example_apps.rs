//! Reusable CLI runners shared by the demo binaries.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, error::ErrorKind};

use crate::align::SegmentationOverrides;
use crate::corpus::{
    read_normalized_file, read_token_file, write_aligned_file, write_normalized_file,
};
use crate::normalize::Normalizer;
use crate::pipeline::EvaluationPipeline;
use crate::report::{EvaluationReport, render_report};
use crate::table::TranslationTable;
use crate::tagger::LexiconTagger;

#[derive(Debug, Parser)]
#[command(
    name = "normalize",
    disable_help_subcommand = true,
    about = "Learn a translation table and normalize token files",
    long_about = "Build a frequency-based translation table from a 3-column training file \
                  and write a 5-column normalized file next to each input."
)]
struct NormalizeCli {
    #[arg(long, help = "3-column training file the translation table is learned from")]
    train: PathBuf,
    #[arg(
        long,
        default_value = "_norm",
        help = "Suffix appended to input stems for output files"
    )]
    suffix: String,
    #[arg(required = true, help = "3-column token files to normalize")]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(
    name = "evaluate",
    disable_help_subcommand = true,
    about = "Tag normalized splits and report accuracy per strategy",
    long_about = "Tag each normalized split in the lower-bound, upper-bound, and baseline \
                  settings, align the tagger output against the reference tokenization, \
                  write 8-column files, and render an accuracy report."
)]
struct EvaluateCli {
    #[arg(long, help = "Two-column word\\ttag lexicon for the demo tagger")]
    lexicon: PathBuf,
    #[arg(
        long,
        default_value = "XY",
        help = "Fallback tag for words missing from the lexicon"
    )]
    fallback: String,
    #[arg(long, help = "JSON segmentation-overrides file")]
    overrides: Option<PathBuf>,
    #[arg(
        long,
        default_value = "_tagged",
        help = "Suffix appended to input stems for 8-column output files"
    )]
    suffix: String,
    #[arg(long, help = "Write the rendered accuracy report here instead of stdout")]
    report: Option<PathBuf>,
    #[arg(
        required = true,
        value_name = "NAME=PATH",
        help = "5-column normalized files to evaluate, as name=path pairs"
    )]
    splits: Vec<String>,
}

/// Build a translation table from `--train` and write a normalized file per
/// input.
pub fn run_normalize_app<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_logging();
    let Some(cli) = parse_cli::<NormalizeCli, _>(
        std::iter::once("normalize".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let train = read_token_file(&cli.train)?;
    let table = TranslationTable::from_training(&train);
    let normalizer = Normalizer::new(&table);
    println!(
        "Learned {} surface forms from {}",
        table.len(),
        cli.train.display()
    );

    for input in &cli.inputs {
        let lines = read_token_file(input)?;
        let normalized = normalizer.normalize(&lines);
        let out_path = suffixed_path(input, &cli.suffix);
        write_normalized_file(&out_path, &normalized)?;
        println!("Wrote {}", out_path.display());
    }
    Ok(())
}

/// Tag each named normalized split, write 8-column files, and render the
/// accuracy report.
pub fn run_evaluate_app<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_logging();
    let Some(cli) =
        parse_cli::<EvaluateCli, _>(std::iter::once("evaluate".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let tagger = LexiconTagger::from_file(&cli.lexicon, cli.fallback.as_str())?;
    let overrides = match &cli.overrides {
        Some(path) => SegmentationOverrides::from_json_file(path)?,
        None => SegmentationOverrides::new(),
    };
    let pipeline = EvaluationPipeline::new(tagger, overrides);

    let mut reports: Vec<(String, EvaluationReport)> = Vec::new();
    for split in &cli.splits {
        let (name, path) = parse_split_arg(split)?;
        let normalized = read_normalized_file(&path)?;
        let aligned = pipeline.evaluate(&normalized)?;
        let out_path = suffixed_path(&path, &cli.suffix);
        write_aligned_file(&out_path, &aligned)?;
        println!("Wrote {}", out_path.display());
        reports.push((name, pipeline.report(&aligned)?));
    }

    let rendered = render_report(&reports);
    match &cli.report {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn parse_split_arg(raw: &str) -> Result<(String, PathBuf), Box<dyn Error>> {
    let Some((name, path)) = raw.split_once('=') else {
        return Err(format!("split '{raw}' must be given as name=path").into());
    };
    if name.is_empty() {
        return Err(format!("split '{raw}' has an empty name").into());
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("out");
    path.with_file_name(format!("{stem}{suffix}.tsv"))
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_args_require_name_and_path() {
        let (name, path) = parse_split_arg("dev=data/dev.tsv").unwrap();
        assert_eq!(name, "dev");
        assert_eq!(path, PathBuf::from("data/dev.tsv"));

        assert!(parse_split_arg("no-separator").is_err());
        assert!(parse_split_arg("=missing-name").is_err());
    }

    #[test]
    fn suffixed_paths_keep_the_directory() {
        let out = suffixed_path(Path::new("data/dev.txt"), "_norm");
        assert_eq!(out, PathBuf::from("data/dev_norm.tsv"));
    }
}

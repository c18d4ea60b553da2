use std::collections::HashMap;

use lexnorm::{
    AlignedTag, PipelineError, ReferenceToken, SegmentationOverrides, TaggedToken, Tagger,
    TokenAligner,
};

/// Scripted tagger returning pre-recorded output per sentence, the way the
/// reconciled third-party tagger would.
struct ScriptedTagger {
    outputs: HashMap<String, Vec<(String, String)>>,
}

impl ScriptedTagger {
    fn new(outputs: &[(&str, &[(&str, &str)])]) -> Self {
        Self {
            outputs: outputs
                .iter()
                .map(|(sentence, tokens)| {
                    (
                        sentence.to_string(),
                        tokens
                            .iter()
                            .map(|(surface, tag)| (surface.to_string(), tag.to_string()))
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

impl Tagger for ScriptedTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, PipelineError> {
        Ok(self
            .outputs
            .get(sentence)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|(surface, tag)| TaggedToken { surface, tag })
            .collect())
    }
}

fn units(tokens: &[&str]) -> Vec<ReferenceToken> {
    tokens
        .iter()
        .map(|token| {
            if token.is_empty() {
                ReferenceToken::Boundary
            } else {
                ReferenceToken::Unit(token.to_string())
            }
        })
        .collect()
}

fn emitted_tags(aligned: &[AlignedTag]) -> Vec<Option<String>> {
    aligned
        .iter()
        .map(|entry| match entry {
            AlignedTag::Tag(tag) => Some(tag.clone()),
            AlignedTag::Boundary => None,
        })
        .collect()
}

#[test]
fn split_punctuation_is_reconciled_through_the_override_table() {
    let tagger = ScriptedTagger::new(&[(
        "genau !!!",
        &[("genau", "ADV"), ("!", "$."), ("!", "$."), ("!", "$.")],
    )]);
    let mut overrides = SegmentationOverrides::new();
    overrides.insert("!!!", "$.", 3).unwrap();

    let reference = units(&["genau", "!!!"]);
    let aligned = TokenAligner::new(overrides)
        .tag_and_align(&tagger, &reference)
        .unwrap();

    assert_eq!(
        emitted_tags(&aligned),
        vec![Some("ADV".to_string()), Some("$.".to_string())]
    );
}

#[test]
fn two_word_unit_consumes_two_tagger_tokens() {
    let tagger = ScriptedTagger::new(&[(
        "würde ich nicht sagen",
        &[
            ("würde", "VAFIN"),
            ("ich", "PPER"),
            ("nicht", "PTKNEG"),
            ("sagen", "VVINF"),
        ],
    )]);
    let reference = units(&["würde ich", "nicht", "sagen"]);
    let aligned = TokenAligner::new(SegmentationOverrides::new())
        .tag_and_align(&tagger, &reference)
        .unwrap();

    assert_eq!(
        emitted_tags(&aligned),
        vec![
            Some("VAFIN+PPER".to_string()),
            Some("PTKNEG".to_string()),
            Some("VVINF".to_string()),
        ]
    );
}

#[test]
fn alignment_emits_one_entry_per_reference_position() {
    let tagger = ScriptedTagger::new(&[
        ("i muen alles", &[("i", "XY"), ("muen", "XY"), ("alles", "PIS")]),
        ("nei", &[("nei", "PTKANT")]),
    ]);
    let reference = units(&["i", "muen", "alles", "", "nei"]);
    let aligned = TokenAligner::new(SegmentationOverrides::new())
        .tag_and_align(&tagger, &reference)
        .unwrap();

    assert_eq!(aligned.len(), reference.len());
    assert_eq!(aligned[3], AlignedTag::Boundary);
    assert!(aligned.iter().filter(|t| **t == AlignedTag::Boundary).count() == 1);
}

#[test]
fn overrun_reports_token_line_and_sentence() {
    // A truncated stream (no tokens or sentinel left for the second
    // sentence) exhausts the cursor at the offending reference token.
    use lexnorm::TaggedLine;

    let reference = units(&["i", "muen", "", "nur"]);
    let stream = vec![
        TaggedLine::Token(TaggedToken {
            surface: "i".to_string(),
            tag: "XY".to_string(),
        }),
        TaggedLine::Token(TaggedToken {
            surface: "muen".to_string(),
            tag: "XY".to_string(),
        }),
        TaggedLine::Boundary,
    ];
    let err = TokenAligner::new(SegmentationOverrides::new())
        .align(&reference, &stream)
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::AlignmentExhausted { ref token, line: 4, sentence: 2 } if token == "nur"
    ));
}

#[test]
fn tagger_dropping_a_token_is_detected_at_the_sentence_break() {
    let tagger = ScriptedTagger::new(&[
        ("i muen", &[("i", "XY"), ("muen", "XY")]),
        ("nei nur", &[("nei", "PTKANT")]),
    ]);
    let reference = units(&["i", "muen", "", "nei", "nur"]);
    let err = TokenAligner::new(SegmentationOverrides::new())
        .tag_and_align(&tagger, &reference)
        .unwrap_err();

    assert!(matches!(err, PipelineError::BoundaryMismatch { line: 5 }));
}

#[test]
fn missing_sentence_break_in_tagger_output_is_fatal() {
    // An override that consumes past the end of the sentence hits the
    // stream sentinel instead of a token.
    let tagger = ScriptedTagger::new(&[("na ?!", &[("na", "ITJ"), ("?", "$."), ("!", "$.")])]);
    let mut overrides = SegmentationOverrides::new();
    overrides.insert("?!", "$.", 3).unwrap();

    let reference = units(&["na", "?!"]);
    let err = TokenAligner::new(overrides)
        .tag_and_align(&tagger, &reference)
        .unwrap_err();
    assert!(matches!(err, PipelineError::BoundaryMismatch { line: 2 }));
}

#[test]
fn overrides_round_trip_through_json_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.json");
    std::fs::write(
        &path,
        r#"{
            "!!!": { "tag": "$.", "consumed": 3 },
            "*_*": { "tag": "EMO", "consumed": 3 },
            "evt.": { "tag": "ADV", "consumed": 2 }
        }"#,
    )
    .unwrap();

    let overrides = SegmentationOverrides::from_json_file(&path).unwrap();
    assert_eq!(overrides.len(), 3);
    assert_eq!(overrides.get("*_*").unwrap().tag, "EMO");

    let tagger = ScriptedTagger::new(&[(
        "evt. morn",
        &[("evt", "ADV"), (".", "$."), ("morn", "ADV")],
    )]);
    let reference = units(&["evt.", "morn"]);
    let aligned = TokenAligner::new(overrides)
        .tag_and_align(&tagger, &reference)
        .unwrap();
    assert_eq!(
        emitted_tags(&aligned),
        vec![Some("ADV".to_string()), Some("ADV".to_string())]
    );
}

use std::sync::Arc;

use super::*;
use crate::brief::SynthesizedBrief;
use crate::corpus::KnowledgeCorpus;
use crate::delegate::DelegateRole;
use crate::test_support::{test_angle, test_profile, test_video, StaticDelegate};
use tubeforge_research::ResearchBundle;

fn test_brief() -> SynthesizedBrief {
    SynthesizedBrief::fallback(&ResearchBundle::empty("compilers"))
}

fn delegate_script_json(title_count: usize) -> String {
    let titles: Vec<String> = (0..title_count).map(|i| format!("Title {i}")).collect();
    serde_json::json!({
        "script": "[HOOK] Watch this. [INTRO] Setup. [BODY] Facts. [CONCLUSION] Subscribe.",
        "titles": titles,
        "thumbnails": ["T1", "T2", "T3", "T4"]
    })
    .to_string()
}

#[tokio::test]
async fn parses_delegate_script_package() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Generator,
        &format!("```json\n{}\n```", delegate_script_json(4)),
    ));
    let generator = Generator::new(delegate, KnowledgeCorpus::default());

    let package = generator
        .generate(&test_video(), &test_angle(), &test_brief(), &test_profile())
        .await;

    assert_eq!(package.origin, StageOrigin::Delegate);
    assert!(package.script.contains("[HOOK]"));
    assert_eq!(package.titles.len(), 4);
    assert_eq!(package.thumbnails.len(), 4);
}

#[tokio::test]
async fn delegate_failure_yields_marked_fallback_with_full_variant_sets() {
    let delegate = Arc::new(StaticDelegate::failing(DelegateRole::Generator));
    let generator = Generator::new(delegate, KnowledgeCorpus::default());

    let package = generator
        .generate(&test_video(), &test_angle(), &test_brief(), &test_profile())
        .await;

    assert!(package.origin.is_fallback());
    assert_eq!(package.titles.len(), 4);
    assert_eq!(package.thumbnails.len(), 4);
    assert!(package.titles.iter().all(|t| !t.is_empty()));
    assert!(package.thumbnails.iter().all(|t| !t.is_empty()));
    assert!(!package.script.is_empty());
}

#[tokio::test]
async fn too_few_title_variants_falls_back() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Generator,
        &delegate_script_json(2),
    ));
    let generator = Generator::new(delegate, KnowledgeCorpus::default());

    let package = generator
        .generate(&test_video(), &test_angle(), &test_brief(), &test_profile())
        .await;

    assert!(package.origin.is_fallback());
    assert_eq!(package.titles.len(), 4);
}

#[tokio::test]
async fn extra_variants_are_trimmed_to_four() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Generator,
        &delegate_script_json(7),
    ));
    let generator = Generator::new(delegate, KnowledgeCorpus::default());

    let package = generator
        .generate(&test_video(), &test_angle(), &test_brief(), &test_profile())
        .await;

    assert_eq!(package.origin, StageOrigin::Delegate);
    assert_eq!(package.titles.len(), 4);
}

#[tokio::test]
async fn unparseable_response_falls_back() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Generator,
        "no json here",
    ));
    let generator = Generator::new(delegate, KnowledgeCorpus::default());

    let package = generator
        .generate(&test_video(), &test_angle(), &test_brief(), &test_profile())
        .await;

    assert!(package.origin.is_fallback());
}

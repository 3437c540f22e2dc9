use std::sync::Arc;

use super::*;
use crate::delegate::DelegateRole;
use crate::test_support::StaticDelegate;

#[tokio::test]
async fn json_array_strategy_wins() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Synthesizer,
        "```json\n[\"@ChannelOne\", \"ChannelTwo\"]\n```",
    ));
    let suggester = ChannelSuggester::new(delegate);

    let handles = suggester.suggest("25yo junior dev", 10).await;
    assert_eq!(handles, vec!["@ChannelOne".to_string(), "@ChannelTwo".to_string()]);
}

#[tokio::test]
async fn handle_scan_strategy_handles_prose() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Synthesizer,
        "They would definitely watch @Fireship and @ThePrimeagen for sure.",
    ));
    let suggester = ChannelSuggester::new(delegate);

    let handles = suggester.suggest("dev", 10).await;
    assert_eq!(handles, vec!["@Fireship".to_string(), "@ThePrimeagen".to_string()]);
}

#[tokio::test]
async fn comma_list_strategy_as_last_parse_resort() {
    let delegate = Arc::new(StaticDelegate::completing(
        DelegateRole::Synthesizer,
        "ChannelAlpha, ChannelBeta, ChannelGamma",
    ));
    let suggester = ChannelSuggester::new(delegate);

    let handles = suggester.suggest("dev", 2).await;
    assert_eq!(handles, vec!["@ChannelAlpha".to_string(), "@ChannelBeta".to_string()]);
}

#[tokio::test]
async fn delegate_failure_uses_static_fallback() {
    let delegate = Arc::new(StaticDelegate::failing(DelegateRole::Synthesizer));
    let suggester = ChannelSuggester::new(delegate);

    let handles = suggester.suggest("anyone", 3).await;
    assert_eq!(handles.len(), 3);
    assert_eq!(handles[0], "@MrBeast");
}

#[tokio::test]
async fn unparseable_response_uses_static_fallback() {
    let delegate = Arc::new(StaticDelegate::completing(DelegateRole::Synthesizer, "???"));
    let suggester = ChannelSuggester::new(delegate);

    let handles = suggester.suggest("anyone", 10).await;
    assert_eq!(handles.len(), 10);
}

mod common;

use common::*;
use polyhedge::application::hedge::HedgeOptions;
use polyhedge::domain::entities::hedge::{RecommendationSource, Relevance};
use polyhedge::domain::error::DomainError;
use polyhedge::domain::ports::llm::LlmProvider;
use polyhedge::domain::values::outcome::Outcome;
use polyhedge::domain::values::portfolio::{Holding, Portfolio};
use polyhedge::domain::values::topic::Topic;
use polyhedge::infrastructure::llm::NoopLlm;
use polyhedge::PolyHedge;
use std::sync::Arc;

fn active_events() -> Vec<polyhedge::domain::entities::prediction_event::PredictionEvent> {
    vec![
        open_event("e1", "Will Apple be fined by the EU in 2025?", 0.30, 1_000.0),
        open_event("e2", "Will the Fed announce a rate hike in March?", 0.20, 5_000.0),
        open_event("e3", "Will Bitcoin reach $150k in 2025?", 0.10, 9_000.0),
    ]
}

fn hedger(llm: Arc<dyn LlmProvider>, store: Arc<MemoryStore>) -> PolyHedge {
    setup_with(
        Arc::new(FakeMarketSource::with_active(active_events())),
        Arc::new(FakePriceSource::new(&[("AAPL", 200.0)], &[])),
        llm,
        store,
    )
}

fn apple_portfolio() -> Portfolio {
    Portfolio::new(vec![Holding::new("aapl", 10.0, None)])
}

#[tokio::test]
async fn test_heuristic_recommendations_without_llm() {
    let ph = hedger(Arc::new(NoopLlm), Arc::new(MemoryStore::default()));
    let report = ph.hedge(apple_portfolio(), &HedgeOptions::default()).await.unwrap();

    assert_eq!(report.source, RecommendationSource::Heuristic);
    assert_eq!(report.portfolio_value_cents, 200_000);
    assert_eq!(report.events_considered, 3);
    // Crypto is not a technology theme.
    assert_eq!(report.candidates, 2);
    assert_eq!(report.recommendations.len(), 2);

    let first = &report.recommendations[0];
    assert_eq!(first.event_id, "e1");
    assert_eq!(first.ticker, "AAPL");
    assert_eq!(first.relevance, Relevance::Direct);
    assert_eq!(first.topic, Topic::Regulatory);
    assert_eq!(first.position, Outcome::Yes);
    assert!((first.confidence - 0.45).abs() < 1e-9);
    assert_eq!(first.market_price, Some(0.30));
    assert!(first.sizing.is_some());

    let second = &report.recommendations[1];
    assert_eq!(second.event_id, "e2");
    assert_eq!(second.relevance, Relevance::Thematic);
    assert_eq!(second.topic, Topic::Macro);
    assert!((second.confidence - 0.30).abs() < 1e-9);
}

#[tokio::test]
async fn test_llm_recommendations_drop_unknown_references() {
    let reply = r#"Here you go:
```json
[
  {"ticker": "AAPL", "event_id": "e1", "position": "yes", "confidence": 0.6, "rationale": "EU fine hits margins"},
  {"ticker": "AAPL", "event_id": "nope", "position": "yes", "confidence": 0.9},
  {"ticker": "ZZZZ", "event_id": "e2", "position": "no", "confidence": 0.9}
]
```"#;
    let llm = Arc::new(FakeLlm::replying(&[reply]));
    let ph = hedger(llm.clone(), Arc::new(MemoryStore::default()));

    let report = ph.hedge(apple_portfolio(), &HedgeOptions::default()).await.unwrap();
    assert_eq!(llm.calls(), 1);
    assert_eq!(report.source, RecommendationSource::Llm);
    assert_eq!(report.recommendations.len(), 1);

    let rec = &report.recommendations[0];
    assert_eq!(rec.event_id, "e1");
    assert_eq!(rec.rationale, "EU fine hits margins");
    assert!((rec.base_confidence - 0.6).abs() < 1e-9);
    assert!((rec.confidence - 0.6).abs() < 1e-9);

    // 200_000 * 0.10 * 0.6 = 12_000, capped at 5% of 200_000.
    let sizing = rec.sizing.as_ref().unwrap();
    assert_eq!(sizing.raw_size_cents, 12_000);
    assert_eq!(sizing.suggested_size_cents, 10_000);
    assert_eq!(sizing.binding_constraint.as_deref(), Some("max_portfolio_fraction"));
}

#[tokio::test]
async fn test_llm_failure_falls_back_to_heuristic() {
    let ph = hedger(Arc::new(FakeLlm::failing()), Arc::new(MemoryStore::default()));
    let report = ph.hedge(apple_portfolio(), &HedgeOptions::default()).await.unwrap();
    assert_eq!(report.source, RecommendationSource::Heuristic);
    assert_eq!(report.recommendations.len(), 2);
}

#[tokio::test]
async fn test_unparsable_llm_reply_falls_back_to_heuristic() {
    let llm = Arc::new(FakeLlm::replying(&["I cannot help with that."]));
    let ph = hedger(llm, Arc::new(MemoryStore::default()));
    let report = ph.hedge(apple_portfolio(), &HedgeOptions::default()).await.unwrap();
    assert_eq!(report.source, RecommendationSource::Heuristic);
}

#[tokio::test]
async fn test_refinement_narrows_candidates() {
    // First reply prunes candidates, second is unusable so the heuristic runs.
    let llm = Arc::new(FakeLlm::replying(&[r#"["e1"]"#, "no idea"]));
    let ph = hedger(llm.clone(), Arc::new(MemoryStore::default()));

    let report = ph
        .hedge(
            apple_portfolio(),
            &HedgeOptions {
                refine_candidates: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(llm.calls(), 2);
    assert_eq!(report.candidates, 1);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].event_id, "e1");
}

#[tokio::test]
async fn test_refinement_prompt_carries_event_description() {
    let mut events = active_events();
    events[0].description = "Resolves Yes if the European Commission fines Apple.".into();
    let llm = Arc::new(FakeLlm::replying(&[r#"["e1"]"#]));
    let ph = setup_with(
        Arc::new(FakeMarketSource::with_active(events)),
        Arc::new(FakePriceSource::new(&[("AAPL", 200.0)], &[])),
        llm.clone(),
        Arc::new(MemoryStore::default()),
    );

    let report = ph
        .hedge(
            apple_portfolio(),
            &HedgeOptions {
                refine_candidates: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(report.candidates, 1);

    let prompts = llm.prompts.lock().unwrap();
    assert!(prompts[0].contains("Will Apple be fined by the EU in 2025?"));
    assert!(prompts[0].contains("European Commission fines Apple"));
}

#[tokio::test]
async fn test_correlation_history_boosts_confidence() {
    let history = (0..5)
        .map(|i| record(&format!("h{i}"), "AAPL", Topic::Regulatory, Outcome::Yes, Some(-6.0)))
        .collect();
    let ph = hedger(Arc::new(NoopLlm), Arc::new(MemoryStore::with_records(history)));

    let report = ph.hedge(apple_portfolio(), &HedgeOptions::default()).await.unwrap();
    let rec = report
        .recommendations
        .iter()
        .find(|r| r.event_id == "e1")
        .unwrap();
    let insight = rec.correlation.as_ref().unwrap();
    assert_eq!(insight.topic_matches, 5);
    assert!((insight.confidence_boost - 0.075).abs() < 1e-9);
    assert!((rec.confidence - 0.525).abs() < 1e-9);
    assert!((rec.base_confidence - 0.45).abs() < 1e-9);
}

#[tokio::test]
async fn test_unpriced_holdings_are_reported_and_skipped() {
    let ph = hedger(Arc::new(NoopLlm), Arc::new(MemoryStore::default()));
    let portfolio = Portfolio::new(vec![
        Holding::new("AAPL", 10.0, None),
        Holding::new("ZZZZ", 5.0, None),
    ]);
    let report = ph.hedge(portfolio, &HedgeOptions::default()).await.unwrap();
    assert_eq!(report.unpriced, vec!["ZZZZ".to_string()]);
    assert!(report.recommendations.iter().all(|r| r.ticker == "AAPL"));
}

#[tokio::test]
async fn test_max_recommendations_truncates() {
    let ph = hedger(Arc::new(NoopLlm), Arc::new(MemoryStore::default()));
    let report = ph
        .hedge(
            apple_portfolio(),
            &HedgeOptions {
                max_recommendations: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].event_id, "e1");
}

#[tokio::test]
async fn test_empty_portfolio_is_rejected() {
    let ph = hedger(Arc::new(NoopLlm), Arc::new(MemoryStore::default()));
    let result = ph.hedge(Portfolio::default(), &HedgeOptions::default()).await;
    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

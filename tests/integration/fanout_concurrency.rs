//! Fan-out timing: every search is in flight before any result is merged

use super::support::{plan_with_topics, request, service_with_executor, FakeModel, FakeSearch};
use roadmap::enrichment::EnrichmentExecutor;
use roadmap::generation::parse_plan;
use roadmap::plan::extract_topics;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TITLES: [&str; 6] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];

fn variable_latency_search() -> FakeSearch {
    // Reverse latency order so later topics finish first.
    TITLES
        .iter()
        .enumerate()
        .fold(FakeSearch::new(2), |search, (i, title)| {
            search.with_latency(title, Duration::from_millis(20 * (TITLES.len() - i) as u64))
        })
}

#[tokio::test]
async fn all_calls_are_dispatched_before_any_completes() {
    let search = Arc::new(variable_latency_search());
    let executor = EnrichmentExecutor::new(search.clone());
    let plan = parse_plan(&plan_with_topics(&TITLES).to_string()).unwrap();
    let topics = extract_topics(&plan);

    let outcomes = executor.fetch_all(&topics).await;

    assert_eq!(outcomes.len(), TITLES.len());
    let seen = search.started_at_completion();
    assert_eq!(seen.len(), TITLES.len());
    assert!(
        seen.iter().all(|&started| started == TITLES.len()),
        "every completion should observe all {} calls started, saw {:?}",
        TITLES.len(),
        seen
    );
    assert_eq!(search.max_in_flight(), TITLES.len());
}

#[tokio::test]
async fn outcomes_keep_topic_order_despite_completion_order() {
    let search = Arc::new(variable_latency_search());
    let executor = EnrichmentExecutor::new(search);
    let plan = parse_plan(&plan_with_topics(&TITLES).to_string()).unwrap();
    let topics = extract_topics(&plan);

    let outcomes = executor.fetch_all(&topics).await;

    for (outcome, topic) in outcomes.iter().zip(&topics) {
        assert_eq!(outcome.path, topic.path);
        assert_eq!(outcome.title, topic.title);
        assert!(outcome.resources[0].title.starts_with(&topic.title));
    }
}

#[tokio::test]
async fn merged_videos_land_on_their_own_topic() {
    let model = FakeModel::returning(plan_with_topics(&TITLES).to_string());
    let search = Arc::new(variable_latency_search());
    let roadmap = service_with_executor(model, EnrichmentExecutor::new(search))
        .generate(&request())
        .await
        .unwrap();

    for (_, topic) in roadmap.plan.topics() {
        let videos = &topic.resources[2..];
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|v| v.title.starts_with(&topic.title)));
    }
}

#[tokio::test]
async fn latency_is_bounded_by_slowest_call() {
    let search = Arc::new(FakeSearch::new(1).with_default_latency(Duration::from_millis(100)));
    let executor = EnrichmentExecutor::new(search);
    let plan = parse_plan(&plan_with_topics(&TITLES).to_string()).unwrap();

    let started = Instant::now();
    executor.fetch_all(&extract_topics(&plan)).await;
    let elapsed = started.elapsed();

    // Sequential would take 600ms.
    assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);
}

#[tokio::test]
async fn concurrency_cap_limits_in_flight_calls() {
    let search = Arc::new(FakeSearch::new(1).with_default_latency(Duration::from_millis(20)));
    let executor = EnrichmentExecutor::new(search.clone()).with_max_concurrency(Some(2));
    let mut plan = parse_plan(&plan_with_topics(&TITLES).to_string()).unwrap();

    let summary = executor.enrich(&mut plan).await;

    assert_eq!(summary.enriched, TITLES.len());
    assert_eq!(search.call_count(), TITLES.len());
    assert!(search.max_in_flight() <= 2, "max in flight {}", search.max_in_flight());
}

#[tokio::test]
async fn slow_failure_does_not_block_or_cancel_siblings() {
    let search = Arc::new(
        FakeSearch::new(2)
            .failing_for("Alpha")
            .with_latency("Alpha", Duration::from_millis(60))
            .with_latency("Beta", Duration::from_millis(5)),
    );
    let executor = EnrichmentExecutor::new(search);
    let mut plan = parse_plan(&plan_with_topics(&["Alpha", "Beta"]).to_string()).unwrap();

    let summary = executor.enrich(&mut plan).await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.enriched, 1);
    let topics = &plan.phases[0].steps[0].topics;
    assert_eq!(topics[0].resources.len(), 2);
    assert_eq!(topics[1].resources.len(), 4);
}

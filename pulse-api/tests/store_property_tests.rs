//! Property-Based Tests for Event Store Semantics
//!
//! Drives the in-memory store (the reference implementation of the
//! `EventStore` contract) against a naive model:
//!
//! - First write wins per `(tenant_id, event_id)`; later writes are
//!   absorbed as duplicates no matter what their payload says.
//! - A count over `[from, to)` equals the number of model records with a
//!   matching tenant and event name whose `occurred_at` falls in the
//!   half-open window.
//! - Widening a window never decreases the count; adjacent windows
//!   partition their union.

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use pulse_core::{IngestOutcome, TimeWindow, Timestamp};
use pulse_store::{EventStore, InMemoryEventStore};

// ============================================================================
// GENERATORS
// ============================================================================

fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 2, 13, 0, 0, 0).unwrap()
}

/// One submission: small domains force key collisions, so duplicate and
/// isolation behavior is exercised constantly.
#[derive(Debug, Clone)]
struct Submission {
    tenant_id: &'static str,
    event_id: String,
    event_name: &'static str,
    minute: i64,
}

fn submission_strategy() -> impl Strategy<Value = Submission> {
    (
        prop_oneof![Just("tenant1"), Just("tenant2")],
        0u8..8,
        prop_oneof![Just("login"), Just("purchase")],
        0i64..60,
    )
        .prop_map(|(tenant_id, id, event_name, minute)| Submission {
            tenant_id,
            event_id: format!("e{}", id),
            event_name,
            minute,
        })
}

fn occurred_at(submission: &Submission) -> Timestamp {
    base_time() + Duration::minutes(submission.minute)
}

/// Replay submissions into the store and a first-write-wins model.
async fn replay(
    submissions: &[Submission],
) -> (
    InMemoryEventStore,
    HashMap<(String, String), (&'static str, Timestamp)>,
) {
    let store = InMemoryEventStore::new();
    let mut model: HashMap<(String, String), (&'static str, Timestamp)> = HashMap::new();

    for submission in submissions {
        let outcome = store
            .ingest(
                submission.tenant_id,
                &submission.event_id,
                submission.event_name,
                occurred_at(submission),
                None,
            )
            .await
            .unwrap();

        let key = (
            submission.tenant_id.to_string(),
            submission.event_id.clone(),
        );
        let expected = if model.contains_key(&key) {
            IngestOutcome::Duplicate
        } else {
            model.insert(key, (submission.event_name, occurred_at(submission)));
            IngestOutcome::Created
        };
        assert_eq!(outcome, expected);
    }

    (store, model)
}

fn model_count(
    model: &HashMap<(String, String), (&'static str, Timestamp)>,
    tenant_id: &str,
    event_name: &str,
    window: TimeWindow,
) -> i64 {
    model
        .iter()
        .filter(|((tenant, _), (name, at))| {
            tenant == tenant_id && *name == event_name && window.contains(*at)
        })
        .count() as i64
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The store agrees with the first-write-wins model on every window.
    #[test]
    fn prop_count_matches_model(
        submissions in proptest::collection::vec(submission_strategy(), 0..40),
        from_minute in 0i64..60,
        width in 1i64..60,
    ) {
        block_on(async {
            let (store, model) = replay(&submissions).await;

            let from = base_time() + Duration::minutes(from_minute);
            let window = TimeWindow::new(from, from + Duration::minutes(width)).unwrap();

            for tenant_id in ["tenant1", "tenant2"] {
                for event_name in ["login", "purchase"] {
                    let counted = store.count(tenant_id, event_name, window).await.unwrap();
                    prop_assert_eq!(
                        counted,
                        model_count(&model, tenant_id, event_name, window)
                    );
                }
            }
            Ok(())
        })?;
    }

    /// Widening [from, to) can only add matching records, never remove them.
    #[test]
    fn prop_count_is_monotonic_in_window_width(
        submissions in proptest::collection::vec(submission_strategy(), 0..40),
        widen in 0i64..120,
    ) {
        block_on(async {
            let (store, _) = replay(&submissions).await;

            let narrow = TimeWindow::new(base_time(), base_time() + Duration::minutes(30)).unwrap();
            let wide = TimeWindow::new(
                base_time(),
                base_time() + Duration::minutes(30 + widen + 1),
            )
            .unwrap();

            let narrow_count = store.count("tenant1", "login", narrow).await.unwrap();
            let wide_count = store.count("tenant1", "login", wide).await.unwrap();
            prop_assert!(wide_count >= narrow_count);
            Ok(())
        })?;
    }

    /// Adjacent half-open windows partition their union: no double counts
    /// at the shared boundary, no gaps.
    #[test]
    fn prop_adjacent_windows_partition(
        submissions in proptest::collection::vec(submission_strategy(), 0..40),
        split_minute in 1i64..59,
    ) {
        block_on(async {
            let (store, _) = replay(&submissions).await;

            let start = base_time();
            let split = start + Duration::minutes(split_minute);
            let end = start + Duration::minutes(60);

            let left = store
                .count("tenant1", "login", TimeWindow::new(start, split).unwrap())
                .await
                .unwrap();
            let right = store
                .count("tenant1", "login", TimeWindow::new(split, end).unwrap())
                .await
                .unwrap();
            let whole = store
                .count("tenant1", "login", TimeWindow::new(start, end).unwrap())
                .await
                .unwrap();

            prop_assert_eq!(left + right, whole);
            Ok(())
        })?;
    }

    /// Replaying the exact same submissions a second time yields only
    /// duplicates and leaves every count unchanged.
    #[test]
    fn prop_replay_is_idempotent(
        submissions in proptest::collection::vec(submission_strategy(), 1..30),
    ) {
        block_on(async {
            let (store, _) = replay(&submissions).await;
            let window = TimeWindow::new(base_time(), base_time() + Duration::minutes(60)).unwrap();

            let before = store.count("tenant1", "login", window).await.unwrap();

            for submission in &submissions {
                let outcome = store
                    .ingest(
                        submission.tenant_id,
                        &submission.event_id,
                        submission.event_name,
                        occurred_at(submission),
                        None,
                    )
                    .await
                    .unwrap();
                prop_assert_eq!(outcome, IngestOutcome::Duplicate);
            }

            let after = store.count("tenant1", "login", window).await.unwrap();
            prop_assert_eq!(before, after);
            Ok(())
        })?;
    }
}

// ============================================================================
// SCENARIO CHECK
// ============================================================================

/// The end-to-end ingest/count scenario: create, absorb a retry, and keep
/// tenant key spaces independent.
#[tokio::test]
async fn test_ingest_count_scenario() {
    let store = InMemoryEventStore::new();
    let at = Utc.with_ymd_and_hms(2026, 2, 13, 20, 0, 0).unwrap();
    let day = TimeWindow::new(
        Utc.with_ymd_and_hms(2026, 2, 13, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap(),
    )
    .unwrap();

    let outcome = store
        .ingest("tenant1", "e1", "login", at, None)
        .await
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Created);
    assert_eq!(store.count("tenant1", "login", day).await.unwrap(), 1);

    let outcome = store
        .ingest("tenant1", "e1", "login", at, None)
        .await
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Duplicate);
    assert_eq!(store.count("tenant1", "login", day).await.unwrap(), 1);

    let outcome = store
        .ingest("tenant2", "e1", "login", at, None)
        .await
        .unwrap();
    assert_eq!(outcome, IngestOutcome::Created);
    assert_eq!(store.count("tenant2", "login", day).await.unwrap(), 1);
    assert_eq!(store.count("tenant1", "login", day).await.unwrap(), 1);
}

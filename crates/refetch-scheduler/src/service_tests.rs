//! Tests for the scheduler service.

use std::sync::Mutex as StdMutex;

use async_trait::async_trait;

use super::*;
use crate::sink::SinkError;

struct RecordingSink {
    calls: StdMutex<Vec<(String, Option<String>)>>,
    fail: bool,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: StdMutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: StdMutex::new(Vec::new()),
            fail: true,
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionSink for RecordingSink {
    async fn enqueue(&self, url: &str, folder: Option<&str>) -> Result<(), SinkError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), folder.map(str::to_string)));
        if self.fail {
            Err(SinkError::new("sink unavailable"))
        } else {
            Ok(())
        }
    }
}

fn service(sink: Arc<RecordingSink>) -> SchedulerService {
    SchedulerService::new(sink, SchedulerConfig::default())
}

#[tokio::test]
async fn test_add_then_list() {
    let svc = service(RecordingSink::new());

    let before = Utc::now();
    let created = svc
        .add("https://example.com/feed.xml", "0 0 * * *", Some("feeds".to_string()))
        .await
        .unwrap();
    let after = Utc::now();

    assert_eq!(created.id, 1);
    assert!(created.last_run.is_none());

    // next_run is the next occurrence relative to creation time.
    let parsed = clock::parse("0 0 * * *").unwrap();
    let expected_lo = clock::next_fire_after(&parsed, before).unwrap();
    let expected_hi = clock::next_fire_after(&parsed, after).unwrap();
    assert!(created.next_run == expected_lo || created.next_run == expected_hi);

    let listed = svc.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].url, "https://example.com/feed.xml");
    assert_eq!(listed[0].folder.as_deref(), Some("feeds"));
    assert!(listed[0].last_run.is_none());
    assert_eq!(svc.runner_count().await, 1);

    svc.shutdown().await;
}

#[tokio::test]
async fn test_add_rejects_missing_fields() {
    let svc = service(RecordingSink::new());

    let err = svc.add("", "* * * * *", None).await.unwrap_err();
    assert!(matches!(err, SchedulerError::MissingField("url")));

    let err = svc.add("https://example.com", "  ", None).await.unwrap_err();
    assert!(matches!(err, SchedulerError::MissingField("cron")));

    assert!(svc.list().await.is_empty());
    assert_eq!(svc.runner_count().await, 0);
}

#[tokio::test]
async fn test_add_rejects_invalid_cron() {
    let svc = service(RecordingSink::new());

    let err = svc
        .add("https://example.com", "bad cron", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidCron { .. }));

    // Nothing inserted, no runner started.
    assert!(svc.list().await.is_empty());
    assert_eq!(svc.runner_count().await, 0);
}

#[tokio::test]
async fn test_ids_stay_unique_across_removals() {
    let svc = service(RecordingSink::new());

    let a = svc.add("https://a.example", "0 0 * * *", None).await.unwrap();
    let b = svc.add("https://b.example", "0 0 * * *", None).await.unwrap();
    assert_eq!((a.id, b.id), (1, 2));

    svc.remove(&[1]).await;
    let c = svc.add("https://c.example", "0 0 * * *", None).await.unwrap();
    assert_eq!(c.id, 3);

    svc.shutdown().await;
}

#[tokio::test]
async fn test_remove_skips_unknown_ids() {
    let svc = service(RecordingSink::new());
    for url in ["https://a.example", "https://b.example", "https://c.example"] {
        svc.add(url, "0 0 * * *", None).await.unwrap();
    }

    let removed = svc.remove(&[5, 2]).await;
    assert_eq!(removed, vec![2]);

    let ids: Vec<ScheduleId> = svc.list().await.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(svc.runner_count().await, 2);

    svc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_removed_schedule_does_not_fire() {
    let sink = RecordingSink::new();
    let svc = service(sink.clone());

    let created = svc.add("https://a.example", "* * * * *", None).await.unwrap();
    let removed = svc.remove(&[created.id]).await;
    assert_eq!(removed, vec![created.id]);
    assert_eq!(svc.runner_count().await, 0);

    // Well past the original next_run; nothing may fire.
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(sink.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_every_minute_schedule_fires() {
    let sink = RecordingSink::new();
    let svc = service(sink.clone());

    let created = svc
        .add("https://example.com/file.bin", "* * * * *", Some("incoming".to_string()))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(90)).await;

    assert!(sink.call_count() >= 1);
    let (url, folder) = sink.calls().first().cloned().unwrap();
    assert_eq!(url, "https://example.com/file.bin");
    assert_eq!(folder.as_deref(), Some("incoming"));

    let listed = svc.list().await;
    assert!(listed[0].last_run.is_some());
    assert!(listed[0].next_run > created.next_run);

    svc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_failing_sink_does_not_kill_runner() {
    let sink = RecordingSink::failing();
    let svc = service(sink.clone());

    svc.add("https://example.com/file.bin", "* * * * *", None)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(90)).await;

    assert!(sink.call_count() >= 1);
    let listed = svc.list().await;
    assert!(listed[0].last_run.is_some());
    assert_eq!(svc.runner_count().await, 1);

    svc.shutdown().await;
}

#[tokio::test]
async fn test_update_changes_next_run() {
    let svc = service(RecordingSink::new());
    let created = svc.add("https://a.example", "0 0 * * *", None).await.unwrap();

    let before = Utc::now();
    let outcome = svc.update(&[created.id], "30 12 * * *").await.unwrap();
    let after = Utc::now();
    assert_eq!(outcome.updated, vec![created.id]);
    assert!(outcome.skipped.is_empty());

    let listed = svc.list().await;
    assert_eq!(listed[0].cron, "30 12 * * *");
    let parsed = clock::parse("30 12 * * *").unwrap();
    let expected_lo = clock::next_fire_after(&parsed, before).unwrap();
    let expected_hi = clock::next_fire_after(&parsed, after).unwrap();
    assert!(listed[0].next_run == expected_lo || listed[0].next_run == expected_hi);
    assert_eq!(svc.runner_count().await, 1);

    svc.shutdown().await;
}

#[tokio::test]
async fn test_update_skips_unknown_ids() {
    let svc = service(RecordingSink::new());
    let created = svc.add("https://a.example", "0 0 * * *", None).await.unwrap();

    let outcome = svc.update(&[created.id, 99], "15 6 * * *").await.unwrap();
    assert_eq!(outcome.updated, vec![created.id]);
    assert_eq!(outcome.skipped, vec![99]);

    svc.shutdown().await;
}

#[tokio::test]
async fn test_update_rejects_bad_input() {
    let svc = service(RecordingSink::new());
    let created = svc.add("https://a.example", "0 0 * * *", None).await.unwrap();

    let err = svc.update(&[created.id], "").await.unwrap_err();
    assert!(matches!(err, SchedulerError::MissingField("cron")));

    let err = svc.update(&[created.id], "not a cron").await.unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidCron { .. }));

    // The schedule is untouched by the failed updates.
    assert_eq!(svc.list().await[0].cron, "0 0 * * *");

    svc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_stops_old_expression_firing() {
    let sink = RecordingSink::new();
    let svc = service(sink.clone());

    let created = svc.add("https://a.example", "* * * * *", None).await.unwrap();
    // Swap to a yearly expression before the first minute elapses.
    svc.update(&[created.id], "0 0 1 1 *").await.unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(sink.call_count(), 0);
    assert_eq!(svc.runner_count().await, 1);

    svc.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_preserves_last_run() {
    let sink = RecordingSink::new();
    let svc = service(sink.clone());

    let created = svc.add("https://a.example", "* * * * *", None).await.unwrap();
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert!(sink.call_count() >= 1);

    svc.update(&[created.id], "0 0 * * *").await.unwrap();
    let listed = svc.list().await;
    assert!(listed[0].last_run.is_some());

    svc.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_adds_get_distinct_ids() {
    let svc = Arc::new(service(RecordingSink::new()));

    let mut joins = Vec::new();
    for i in 0..10 {
        let svc = svc.clone();
        joins.push(tokio::spawn(async move {
            svc.add(format!("https://example.com/{i}"), "0 0 * * *", None)
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = Vec::new();
    for join in joins {
        ids.push(join.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert_eq!(svc.list().await.len(), 10);

    svc.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_halts_all_runners() {
    let svc = service(RecordingSink::new());
    svc.add("https://a.example", "0 0 * * *", None).await.unwrap();
    svc.add("https://b.example", "0 0 * * *", None).await.unwrap();
    assert_eq!(svc.runner_count().await, 2);

    svc.shutdown().await;
    assert_eq!(svc.runner_count().await, 0);
    assert_eq!(svc.schedule_count().await, 2);
}

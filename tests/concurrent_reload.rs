use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tanya::{MatchEvent, Matcher, MatcherConfig, TemplateId};

fn write_csv(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn queries_keep_resolving_while_reloads_swap_generations() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "faq.csv",
        "question,answer\nJam berapa buka?,Kami buka jam 9\n",
    );

    let matcher = Arc::new(Matcher::new(MatcherConfig::new(dir.path())).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let mut readers = Vec::new();
    for _ in 0..4 {
        let matcher = Arc::clone(&matcher);
        let stop = Arc::clone(&stop);
        readers.push(thread::spawn(move || {
            let mut resolved = 0_u64;
            while !stop.load(Ordering::Relaxed) {
                // Every in-flight query runs against a whole generation,
                // old or new, so the collection is never observably empty.
                let answer = matcher.find_match("jam berapa buka");
                assert_eq!(answer.as_deref(), Some("Kami buka jam 9"));
                resolved += 1;
            }
            resolved
        }));
    }

    for _ in 0..20 {
        matcher.reload().unwrap();
        thread::sleep(Duration::from_millis(1));
    }
    stop.store(true, Ordering::Relaxed);

    let total: u64 = readers.into_iter().map(|reader| reader.join().unwrap()).sum();
    assert!(total > 0);
}

#[test]
fn concurrent_adds_assign_unique_sequential_ids() {
    let dir = tempfile::tempdir().unwrap();
    let matcher = Arc::new(Matcher::new(MatcherConfig::new(dir.path())).unwrap());

    let mut writers = Vec::new();
    for worker in 0..8 {
        let matcher = Arc::clone(&matcher);
        writers.push(thread::spawn(move || {
            for i in 0..25 {
                let question = format!("Pertanyaan {worker} nomor {i}?");
                assert!(matcher.add_template(&question, "jawaban", "Stress", 1));
            }
        }));
    }
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(matcher.template_count(), 200);
    let ids: HashSet<TemplateId> = matcher
        .all_templates()
        .iter()
        .map(|template| template.id)
        .collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn snapshots_outlive_the_generations_that_made_them() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "faq.csv",
        "question,answer\nJam berapa buka?,Kami buka jam 9\n",
    );

    let matcher = Matcher::new(MatcherConfig::new(dir.path())).unwrap();
    let before = matcher.all_templates();

    fs::remove_file(dir.path().join("faq.csv")).unwrap();
    matcher.reload().unwrap();

    assert_eq!(matcher.template_count(), 0);
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].question, "Jam berapa buka?");
}

#[test]
fn match_and_reload_events_stream_to_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "faq.csv",
        "question,answer\nJam berapa buka?,Kami buka jam 9\n",
    );

    let matcher = Matcher::new(MatcherConfig::new(dir.path())).unwrap();
    let stream = matcher.subscribe();

    matcher.reload().unwrap();
    let event = stream.recv_timeout(Duration::from_secs(1)).unwrap();
    let MatchEvent::Reloaded {
        version,
        template_count,
    } = event
    else {
        panic!("expected reload event, got {event:?}");
    };
    assert!(version >= 2);
    assert_eq!(template_count, 1);

    let _ = matcher.find_match("jam berapa buka");
    let event = stream.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(matches!(event, MatchEvent::Resolved { .. }));

    assert!(matcher.add_template("Apa itu AI?", "Kecerdasan buatan", "General", 1));
    let event = stream.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(matches!(event, MatchEvent::TemplateAdded { .. }));

    // Publishing with no live subscriber is not a drop.
    drop(stream);
    matcher.reload().unwrap();
    assert_eq!(matcher.dropped_events(), 0);
}

#[test]
fn slow_subscribers_lose_events_without_blocking_writers() {
    let dir = tempfile::tempdir().unwrap();
    let matcher =
        Matcher::new(MatcherConfig::new(dir.path()).with_event_capacity(1)).unwrap();
    let stream = matcher.subscribe();

    // The first event fills the bounded channel; the second is dropped.
    assert!(matcher.add_template("Q satu?", "A", "General", 1));
    assert!(matcher.add_template("Q dua?", "B", "General", 1));

    assert_eq!(matcher.dropped_events(), 1);
    assert!(matches!(
        stream.try_recv(),
        Some(MatchEvent::TemplateAdded { .. })
    ));
    assert!(stream.try_recv().is_none());
}

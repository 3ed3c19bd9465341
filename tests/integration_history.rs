use chrono::{DateTime, Duration, Local, TimeZone};
use proptest::prelude::*;

use thinktype::classifier::{Personality, PersonalityModel};
use thinktype::history::{export_csv, import_csv, SessionRecord, CSV_HEADER};
use thinktype::session::SessionTracker;

const PANGRAM: &str = "The quick brown fox jumps over the lazy dog.";

fn at(secs: i64) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 8, 20, 14, 0, 0).unwrap() + Duration::seconds(secs)
}

fn play(tracker: &mut SessionTracker, model: &PersonalityModel, typed: &str, start: i64, end: i64) {
    tracker.start_attempt();
    tracker.observe_input(typed, at(start));
    tracker
        .submit(at(end), PANGRAM, Some("tester"), model)
        .unwrap();
}

#[test]
fn exported_history_round_trips() {
    let model = PersonalityModel::train().unwrap();
    let mut tracker = SessionTracker::default();
    play(&mut tracker, &model, PANGRAM, 0, 10);
    play(&mut tracker, &model, "The quick brwn fox", 20, 45);
    play(&mut tracker, &model, "Teh quikc", 60, 62);

    let csv = tracker.export_history_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], CSV_HEADER.join(","));

    let imported = import_csv(&csv).unwrap();
    assert_eq!(imported.as_slice(), tracker.history());
}

#[test]
fn pangram_scenario() {
    let model = PersonalityModel::train().unwrap();
    let mut tracker = SessionTracker::default();
    play(&mut tracker, &model, PANGRAM, 0, 10);

    let record = &tracker.history()[0];
    assert_eq!(record.accuracy_percent, 100.0);
    assert_eq!(record.words_per_minute, 54.0);
    assert_eq!(record.hesitations, 0);
    assert_eq!(record.total_time_secs, 10.0);
}

#[test]
fn reset_leaves_header_only() {
    let model = PersonalityModel::train().unwrap();
    let mut tracker = SessionTracker::default();
    for i in 0..3 {
        play(&mut tracker, &model, PANGRAM, i * 100, i * 100 + 12);
    }
    tracker.reset_history();

    let csv = tracker.export_history_csv().unwrap();
    assert_eq!(csv.lines().collect::<Vec<_>>(), vec![CSV_HEADER.join(",")]);
    assert!(import_csv(&csv).unwrap().is_empty());
}

fn finite() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO
}

prop_compose! {
    fn arb_record()(
        offset_ms in 0i64..1_000_000_000,
        user_name in proptest::option::of("[a-zA-Z0-9 ,;'\"\n\r]{1,16}"),
        average_delay_secs in finite(),
        total_time_secs in finite(),
        hesitations in any::<u32>(),
        words_per_minute in finite(),
        chars_per_minute in finite(),
        accuracy_percent in finite(),
        personality in prop::sample::select(Personality::ALL.to_vec()),
    ) -> SessionRecord {
        SessionRecord {
            timestamp: at(0) + Duration::milliseconds(offset_ms),
            user_name,
            average_delay_secs,
            total_time_secs,
            hesitations,
            words_per_minute,
            chars_per_minute,
            accuracy_percent,
            personality,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn any_history_survives_export_and_import(
        records in prop::collection::vec(arb_record(), 0..8),
    ) {
        let csv = export_csv(&records).unwrap();
        let header = CSV_HEADER.join(",");
        prop_assert_eq!(csv.lines().next(), Some(header.as_str()));
        prop_assert_eq!(import_csv(&csv).unwrap(), records);
    }
}

//! Line-count and ordering properties of sessions.

use proptest::prelude::*;
use std::time::Duration;
use stepwatch::report::parse_duration;
use stepwatch::{SharedBuffer, StepConfig};

fn parse_row(line: &str) -> (Duration, Duration, u64, u64, String) {
    let cols: Vec<&str> = line.split('\t').collect();
    assert_eq!(cols.len(), 5, "unexpected row: {line:?}");
    (
        parse_duration(cols[0]).expect("during column"),
        parse_duration(cols[1]).expect("total column"),
        cols[2].trim().parse().expect("memBytes column"),
        cols[3].trim().parse().expect("memAllocs column"),
        cols[4].to_string(),
    )
}

proptest! {
    #[test]
    fn prop_steps_then_stop_writes_n_plus_two_lines(
        labels in prop::collection::vec("[a-z ]{1,12}", 0..20)
    ) {
        let buffer = SharedBuffer::new();
        let config = StepConfig::new().enabled(true).with_writer(buffer.clone());

        let mut session = config.start("prop");
        for label in &labels {
            session.step(label);
        }
        session.stop("end");

        let lines = buffer.lines();
        prop_assert_eq!(lines.len(), labels.len() + 2);
        prop_assert!(lines[0].starts_with("   during\t"));
        prop_assert!(lines[0].ends_with("\tprop"));

        let mut expected = labels.clone();
        expected.push("end".to_string());
        for (line, label) in lines[1..].iter().zip(&expected) {
            let (_, _, _, _, row_label) = parse_row(line);
            prop_assert_eq!(&row_label, label);
        }
    }

    #[test]
    fn prop_disabled_writes_nothing(steps in 0usize..50, condition in any::<bool>()) {
        let buffer = SharedBuffer::new();
        // Either the flag is off, or the condition rejects the session.
        let config = StepConfig::new()
            .enabled(condition)
            .with_condition(move || !condition)
            .with_writer(buffer.clone());

        let mut session = config.start("off");
        prop_assert!(!session.is_active());
        for i in 0..steps {
            session.step(&i.to_string());
        }
        session.stop("end");
        session.stop("end");

        prop_assert!(buffer.is_empty());
    }
}

#[test]
fn test_total_is_non_decreasing() {
    let buffer = SharedBuffer::new();
    let config = StepConfig::new().enabled(true).with_writer(buffer.clone());

    let mut session = config.start("monotonic");
    for i in 0..10 {
        let _work: Vec<u32> = (0..1000 * i).collect();
        session.step(&format!("step {i}"));
    }
    session.stop("done");

    let totals: Vec<Duration> = buffer.lines()[1..]
        .iter()
        .map(|line| parse_row(line).1)
        .collect();
    assert_eq!(totals.len(), 11);
    // Rounding to three decimals can only tie, never reorder.
    for pair in totals.windows(2) {
        assert!(pair[0] <= pair[1], "total went backwards: {:?}", pair);
    }
}

#[test]
fn test_header_precedes_data() {
    let buffer = SharedBuffer::new();
    let config = StepConfig::new().enabled(true).with_writer(buffer.clone());

    let mut session = config.start("order");
    assert_eq!(buffer.lines().len(), 1);
    session.step("a");

    let lines = buffer.lines();
    assert!(lines[0].contains("memAllocs"));
    assert_eq!(parse_row(&lines[1]).4, "a");
}

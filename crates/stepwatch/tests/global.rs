//! The process-wide default configuration.
//!
//! Everything touching the global lives in one test so nothing races.

use stepwatch::SharedBuffer;

#[test]
fn test_global_configuration_lifecycle() {
    let out = SharedBuffer::new();
    stepwatch::set_writer(out.clone());

    // Disabled by default.
    assert!(!stepwatch::is_enabled());
    let mut session = stepwatch::start("off");
    assert!(!session.is_active());
    session.step("a");
    session.stop("b");
    assert!(out.is_empty());

    stepwatch::set_enabled(true);
    let mut session = stepwatch::start("on");
    assert!(session.is_active());
    session.step("a");
    session.stop("b");
    assert_eq!(out.lines().len(), 3);
    out.clear();

    // Condition is read at start only.
    stepwatch::set_condition(|| false);
    let mut rejected = stepwatch::start("rejected");
    assert!(!rejected.is_active());
    rejected.stop("x");
    assert!(out.is_empty());

    // The enable flag is live, the writer is captured.
    stepwatch::set_condition(|| true);
    let mut session = stepwatch::start("captured");
    stepwatch::set_writer(std::io::sink());
    session.step("old writer");

    stepwatch::set_enabled(false);
    session.step("silenced");
    session.stop("silenced");

    stepwatch::set_enabled(true);
    session.stop("back on");

    let lines = out.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("\tcaptured"));
    assert!(lines[1].ends_with("\told writer"));
    assert!(lines[2].ends_with("\tback on"));
}

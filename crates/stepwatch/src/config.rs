//! Gating configuration: enable flag, condition predicate and report sink

use crate::alloc::{AllocCounter, NoAllocCounter};
use crate::session::Session;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

/// Predicate evaluated once per session start.
pub type Condition = Arc<dyn Fn() -> bool + Send + Sync>;

/// Destination for report lines.
pub type Sink = Arc<Mutex<dyn Write + Send>>;

/// Global configuration instance
static GLOBAL_CONFIG: OnceLock<RwLock<StepConfig>> = OnceLock::new();

/// Get the process-wide default configuration.
///
/// Disabled until [`set_enabled`] is called. Meant to be configured once
/// during startup. Sessions keep the condition, sink and counter they
/// started with; the enable flag is read on every step.
pub fn global_config() -> &'static RwLock<StepConfig> {
    GLOBAL_CONFIG.get_or_init(|| RwLock::new(StepConfig::new()))
}

/// Turn step analysis on or off.
///
/// Also silences, or resumes, sessions already started from the global
/// configuration.
pub fn set_enabled(enabled: bool) {
    global_config()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .set_enabled(enabled);
}

/// Check whether the global configuration is enabled.
pub fn is_enabled() -> bool {
    global_config()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_enabled()
}

/// Replace the global start condition.
pub fn set_condition<F>(condition: F)
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    global_config()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .condition = Arc::new(condition);
}

/// Replace the global report sink.
pub fn set_writer<W>(writer: W)
where
    W: Write + Send + 'static,
{
    global_config()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .sink = Arc::new(Mutex::new(writer));
}

/// Replace the global allocation counter source.
pub fn set_alloc_counter<C>(counter: C)
where
    C: AllocCounter + 'static,
{
    global_config()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .alloc_counter = Arc::new(counter);
}

/// Start a session using the global configuration.
///
/// Returns [`Session::Inactive`] when analysis is disabled or the condition
/// rejects this run.
pub fn start(title: &str) -> Session {
    // Release the lock before running the condition.
    let config = global_config()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    config.start(title)
}

/// Settings that decide whether a session records anything, and where it
/// writes.
#[derive(Clone)]
pub struct StepConfig {
    /// Shared with every session started from this configuration
    enabled: Arc<AtomicBool>,
    condition: Condition,
    sink: Sink,
    alloc_counter: Arc<dyn AllocCounter>,
}

impl StepConfig {
    /// Create a disabled configuration writing to standard output.
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(false)),
            condition: Arc::new(|| true),
            sink: Arc::new(Mutex::new(io::stdout())),
            alloc_counter: Arc::new(NoAllocCounter),
        }
    }

    /// Set whether sessions are recorded.
    ///
    /// Gives this configuration its own flag, detached from any clone.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Arc::new(AtomicBool::new(enabled));
        self
    }

    /// Set the condition evaluated at each session start.
    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.condition = Arc::new(condition);
        self
    }

    /// Set the report sink.
    pub fn with_writer<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.sink = Arc::new(Mutex::new(writer));
        self
    }

    /// Set the allocation counter source.
    pub fn with_alloc_counter<C>(mut self, counter: C) -> Self
    where
        C: AllocCounter + 'static,
    {
        self.alloc_counter = Arc::new(counter);
        self
    }

    /// Enable or disable recording.
    ///
    /// Takes effect immediately in sessions started from this configuration:
    /// their steps become no-ops while the flag is off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Check if recording is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Decide whether a session started now should record.
    ///
    /// The condition is only evaluated when the flag is on.
    pub fn should_record(&self) -> bool {
        self.is_enabled() && (self.condition)()
    }

    /// Start a session with this configuration.
    pub fn start(&self, title: &str) -> Session {
        Session::start(self, title)
    }

    pub(crate) fn enabled_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }

    pub(crate) fn sink(&self) -> Sink {
        Arc::clone(&self.sink)
    }

    pub(crate) fn alloc_counter(&self) -> Arc<dyn AllocCounter> {
        Arc::clone(&self.alloc_counter)
    }
}

impl Default for StepConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepConfig")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Shared Buffer
// =============================================================================

/// In-memory sink that can be cloned and read back after a session.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written lines, without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Check whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_is_disabled() {
        let config = StepConfig::default();
        assert!(!config.is_enabled());
        assert!(!config.should_record());
    }

    #[test]
    fn test_enabled_with_default_condition() {
        let config = StepConfig::new().enabled(true);
        assert!(config.should_record());
    }

    #[test]
    fn test_condition_rejects() {
        let config = StepConfig::new().enabled(true).with_condition(|| false);
        assert!(!config.should_record());
    }

    #[test]
    fn test_condition_not_evaluated_when_disabled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let config = StepConfig::new().with_condition(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!config.should_record());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_enabled() {
        let config = StepConfig::new();
        config.set_enabled(true);
        assert!(config.is_enabled());
        config.set_enabled(false);
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_clones_share_flag_until_rebuilt() {
        let config = StepConfig::new();
        let shared = config.clone();
        config.set_enabled(true);
        assert!(shared.is_enabled());

        let detached = shared.clone().enabled(false);
        assert!(config.is_enabled());
        assert!(!detached.is_enabled());
    }

    #[test]
    fn test_shared_buffer_roundtrip() {
        let buffer = SharedBuffer::new();
        assert!(buffer.is_empty());

        let mut writer = buffer.clone();
        writer.write_all(b"first\nsecond\n").unwrap();

        assert_eq!(buffer.lines(), vec!["first", "second"]);

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_debug_hides_closures() {
        let config = StepConfig::new().enabled(true);
        let debug = format!("{:?}", config);
        assert!(debug.contains("enabled: true"));
    }
}

//! Hand-off of committed grid changes to an external store
//!
//! The editor never writes anywhere itself. After every committed mutation
//! it builds a [`GridChange`] and passes it to a [`GridSink`]; scheduling
//! the actual write (debouncing, retries) is the sink's business.

use gridspan_core::GridStats;

/// A committed grid state, ready for the external store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridChange {
    /// Serialized snapshot
    pub snapshot_json: String,
    /// Counts over visible cells
    pub stats: GridStats,
    /// Monotonic commit counter, starting at 1
    pub revision: u64,
}

/// Receiver of committed grid changes
pub trait GridSink {
    /// Called once per pushed change
    fn grid_changed(&mut self, change: &GridChange);
}

impl<F> GridSink for F
where
    F: FnMut(&GridChange),
{
    fn grid_changed(&mut self, change: &GridChange) {
        self(change)
    }
}

/// Sink that keeps every change in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub changes: Vec<GridChange>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent change
    pub fn last(&self) -> Option<&GridChange> {
        self.changes.last()
    }
}

impl GridSink for MemorySink {
    fn grid_changed(&mut self, change: &GridChange) {
        self.changes.push(change.clone());
    }
}

/// Sink that drops every change
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl GridSink for NullSink {
    fn grid_changed(&mut self, _change: &GridChange) {}
}

/// Remembers the last snapshot the editor wrote, so the store echoing it
/// straight back is not mistaken for an external edit
#[derive(Debug, Clone, Default)]
pub(crate) struct EchoGuard {
    last_written: Option<String>,
}

impl EchoGuard {
    pub(crate) fn mark(&mut self, json: &str) {
        self.last_written = Some(json.to_string());
    }

    pub(crate) fn is_echo(&self, json: &str) -> bool {
        self.last_written.as_deref() == Some(json)
    }

    pub(crate) fn clear(&mut self) {
        self.last_written = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(revision: u64) -> GridChange {
        GridChange {
            snapshot_json: format!("{{\"rev\":{}}}", revision),
            stats: GridStats::default(),
            revision,
        }
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |c: &GridChange| seen.push(c.revision);
            sink.grid_changed(&change(1));
            sink.grid_changed(&change(2));
        }
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        assert!(sink.last().is_none());
        sink.grid_changed(&change(7));
        assert_eq!(sink.last().map(|c| c.revision), Some(7));
    }

    #[test]
    fn test_echo_guard() {
        let mut guard = EchoGuard::default();
        assert!(!guard.is_echo("{}"));
        guard.mark("{}");
        assert!(guard.is_echo("{}"));
        assert!(!guard.is_echo("{ }"));
        guard.clear();
        assert!(!guard.is_echo("{}"));
    }
}

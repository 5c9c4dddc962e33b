//! Message sinks.
//!
//! Engine progress is reported as single-line strings through a capability
//! the caller supplies, so the engine runs identically under a terminal, a
//! host application panel, or a test harness.

use std::sync::Mutex;

/// Receives one progress line at a time.
pub trait MessageSink {
    fn send(&self, line: &str);
}

/// Prints every line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn send(&self, line: &str) {
        println!("{}", line);
    }
}

/// Swallows every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn send(&self, _line: &str) {}
}

/// Collects lines in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink lock").clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl MessageSink for MemorySink {
    fn send(&self, line: &str) {
        self.lines.lock().expect("sink lock").push(line.to_string());
    }
}

/// Counted noun for progress lines: `0 rows`, `1 row`, `2 rows`.
pub fn plural(noun: &str, count: usize) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_appends_s_except_for_one() {
        assert_eq!(plural("noodle", 0), "0 noodles");
        assert_eq!(plural("noodle", 1), "1 noodle");
        assert_eq!(plural("noodle", 2), "2 noodles");
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.send("first");
        sink.send("second");
        assert_eq!(sink.lines(), ["first", "second"]);
        assert!(sink.contains("seco"));
        assert!(!sink.contains("third"));
    }
}

//! Telemetry system for voicerag
//!
//! Collects index, search and tool events and prints a session summary.

use colored::Colorize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    // Engine events
    IndexBuilt {
        documents: usize,
        dimension: usize,
        duration_ms: u64,
        timestamp: Instant,
    },
    SearchStarted {
        query: String,
        timestamp: Instant,
    },
    SearchCompleted {
        results: usize,
        duration_ms: u64,
        success: bool,
        timestamp: Instant,
    },
    SlotSkipped {
        slot: usize,
        timestamp: Instant,
    },

    // Tool events
    ToolStarted {
        tool: String,
        timestamp: Instant,
    },
    ToolCompleted {
        tool: String,
        duration_ms: u64,
        success: bool,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default)]
pub struct TelemetryStats {
    pub documents_indexed: usize,
    pub index_build_ms: u64,
    pub searches: usize,
    pub searches_succeeded: usize,
    pub searches_failed: usize,
    pub total_search_ms: u64,
    pub slots_skipped: usize,
    pub tools_executed: usize,
    pub tools_succeeded: usize,
    pub tools_failed: usize,
}

impl TelemetryStats {
    /// Average latency of completed searches
    pub fn average_search_ms(&self) -> f64 {
        let completed = self.searches_succeeded + self.searches_failed;
        if completed == 0 {
            0.0
        } else {
            self.total_search_ms as f64 / completed as f64
        }
    }
}

/// Most events kept for `recent_events`; running totals live in `TelemetryStats`
pub const MAX_RETAINED_EVENTS: usize = 1024;

/// Telemetry collector
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

// A poisoned lock only means a panic happened mid-update; the counters are still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_RETAINED_EVENTS))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = lock(&self.stats);
            match &event {
                TelemetryEvent::IndexBuilt {
                    documents,
                    duration_ms,
                    ..
                } => {
                    stats.documents_indexed = *documents;
                    stats.index_build_ms = *duration_ms;
                }
                TelemetryEvent::SearchStarted { .. } => {
                    stats.searches += 1;
                }
                TelemetryEvent::SearchCompleted {
                    duration_ms,
                    success,
                    ..
                } => {
                    stats.total_search_ms += duration_ms;
                    if *success {
                        stats.searches_succeeded += 1;
                    } else {
                        stats.searches_failed += 1;
                    }
                }
                TelemetryEvent::SlotSkipped { .. } => {
                    stats.slots_skipped += 1;
                }
                TelemetryEvent::ToolStarted { .. } => {
                    stats.tools_executed += 1;
                }
                TelemetryEvent::ToolCompleted { success, .. } => {
                    if *success {
                        stats.tools_succeeded += 1;
                    } else {
                        stats.tools_failed += 1;
                    }
                }
            }
        }

        let mut events = lock(&self.events);
        if events.len() == MAX_RETAINED_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        lock(&self.stats).clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Number of retained events (at most [`MAX_RETAINED_EVENTS`])
    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = lock(&self.events);
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }

    /// Fraction of completed searches that succeeded
    pub fn search_success_rate(&self) -> f64 {
        let stats = lock(&self.stats);
        let total = stats.searches_succeeded + stats.searches_failed;
        if total == 0 {
            1.0
        } else {
            stats.searches_succeeded as f64 / total as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: crate::cli::Verbosity,
}

impl TelemetryDisplay {
    /// Create a new display
    pub fn new(collector: TelemetryCollector, verbosity: crate::cli::Verbosity) -> Self {
        Self {
            collector,
            verbosity,
        }
    }

    /// Render summary statistics
    pub fn summary(&self) -> String {
        let stats = self.collector.get_stats();
        let elapsed = self.collector.elapsed();

        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "📊 Session Summary".bold()));
        out.push_str("─────────────────────────────────────\n");
        out.push_str(&format!("Duration:          {:?}\n", elapsed));
        out.push_str(&format!(
            "Documents:         {} (indexed in {}ms)\n",
            stats.documents_indexed, stats.index_build_ms
        ));
        out.push_str(&format!("Searches:          {}\n", stats.searches));
        out.push_str(&format!(
            "Success rate:      {:.1}%\n",
            self.collector.search_success_rate() * 100.0
        ));
        out.push_str(&format!("Avg latency:       {:.1}ms\n", stats.average_search_ms()));
        if stats.slots_skipped > 0 {
            out.push_str(&format!(
                "Skipped slots:     {}\n",
                stats.slots_skipped.to_string().yellow()
            ));
        }
        out.push_str(&format!(
            "Tool calls:        {} ({} failed)\n",
            stats.tools_executed, stats.tools_failed
        ));
        out
    }

    /// Display summary statistics unless running quiet
    pub fn display_summary(&self) {
        if self.verbosity.show_progress() {
            println!("{}", self.summary());
        }
    }

    /// Check if should show detailed output
    pub fn should_show_details(&self) -> bool {
        self.verbosity.show_events()
    }
}

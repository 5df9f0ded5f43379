use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use tracing::debug;

/// Nested section timer.
///
/// `time` wraps a closure and records how long it took. Sections may nest;
/// a parent section's line notes how much of its time was not spent in timed
/// children. Lines are collected until the outermost section finishes, then
/// emitted outermost-first at `debug` level and kept for [`Watch::take_report`].
///
/// Nesting is tracked per thread, so one watch can be shared by every
/// repository of a session. Finished trees from all threads go to one report.
pub struct Watch {
    enabled: bool,
    state: Mutex<WatchState>,
}

#[derive(Default)]
struct WatchState {
    /// Open section trees keyed by the thread running them.
    open: HashMap<ThreadId, SectionStack>,
    /// Completed reports awaiting `take_report`.
    report: Vec<String>,
}

#[derive(Default)]
struct SectionStack {
    depth: usize,
    /// Time already attributed to finished sections, per depth.
    recorded: Vec<Duration>,
    /// Lines of the tree currently open, innermost first.
    pending: Vec<String>,
}

/// Finishes its section on drop, including while unwinding.
struct Section<'a> {
    watch: &'a Watch,
    name: &'a str,
    started: Instant,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        self.watch.on_finish(self.name, self.started.elapsed());
    }
}

impl Watch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: Mutex::new(WatchState::default()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `f` as a named section.
    pub fn time<R>(&self, name: &str, f: impl FnOnce() -> R) -> R {
        if !self.enabled {
            return f();
        }
        self.on_start();
        let _section = Section {
            watch: self,
            name,
            started: Instant::now(),
        };
        f()
    }

    /// Drain every line reported so far, outermost section first.
    pub fn take_report(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().report)
    }

    fn lock(&self) -> MutexGuard<'_, WatchState> {
        self.state.lock().expect("watch mutex poisoned")
    }

    fn on_start(&self) {
        let mut state = self.lock();
        let stack = state.open.entry(thread::current().id()).or_default();
        stack.depth += 1;
        let needed = stack.depth + 1;
        if stack.recorded.len() < needed {
            stack.recorded.resize(needed, Duration::ZERO);
        }
    }

    fn on_finish(&self, name: &str, elapsed: Duration) {
        let thread = thread::current().id();
        let mut state = self.lock();
        let Some(stack) = state.open.get_mut(&thread) else {
            return;
        };

        stack.depth = stack.depth.saturating_sub(1);
        let depth = stack.depth;
        stack.recorded[depth] += elapsed;
        let inner = std::mem::take(&mut stack.recorded[depth + 1]);

        let total_ms = elapsed.as_millis();
        let inner_ms = inner.as_millis();
        let missing_ms = total_ms.saturating_sub(inner_ms);
        let time = format!("{total_ms}ms");
        let indent = "  ".repeat(depth);
        let line = if inner_ms > 0 && missing_ms > 0 {
            format!("{indent}{time:>7} [{name}] (missing: {missing_ms}ms)")
        } else {
            format!("{indent}{time:>7} [{name}]")
        };
        stack.pending.push(line);

        if depth > 0 {
            return;
        }
        let mut lines = state
            .open
            .remove(&thread)
            .map(|stack| stack.pending)
            .unwrap_or_default();
        lines.reverse();
        for line in &lines {
            debug!(target: "cellar::watch", "{line}");
        }
        state.report.extend(lines);
    }
}

impl Default for Watch {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Watch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watch")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Barrier;
    use std::thread::sleep;

    #[test]
    fn disabled_watch_only_runs_closure() {
        let watch = Watch::disabled();
        assert_eq!(watch.time("noop", || 7), 7);
        assert!(watch.take_report().is_empty());
    }

    #[test]
    fn single_section_reports_one_line() {
        let watch = Watch::new(true);
        let out = watch.time("load", || "done");
        assert_eq!(out, "done");

        let report = watch.take_report();
        assert_eq!(report.len(), 1);
        assert!(report[0].ends_with("[load]"));
        assert!(watch.take_report().is_empty());
    }

    #[test]
    fn nested_sections_report_outermost_first() {
        let watch = Watch::new(true);
        watch.time("outer", || {
            watch.time("first", || ());
            watch.time("second", || watch.time("deep", || ()));
        });

        let report = watch.take_report();
        assert_eq!(report.len(), 4);
        assert!(report[0].contains("[outer]"));
        // Finish order was first, deep, second, outer.
        assert!(report[1].contains("[second]"));
        assert!(report[2].contains("[deep]"));
        assert!(report[3].contains("[first]"));

        // Two spaces of indent per level ahead of the 7-wide time column.
        assert_eq!(report[0].find('['), Some(8));
        assert_eq!(report[1].find('['), Some(10));
        assert_eq!(report[2].find('['), Some(12));
    }

    #[test]
    fn parent_reports_unattributed_time() {
        let watch = Watch::new(true);
        watch.time("outer", || {
            sleep(Duration::from_millis(20));
            watch.time("inner", || sleep(Duration::from_millis(20)));
        });

        let report = watch.take_report();
        assert!(report[0].contains("[outer] (missing: "));
        assert!(!report[1].contains("missing"));
    }

    #[test]
    fn consecutive_trees_accumulate_until_taken() {
        let watch = Watch::new(true);
        watch.time("a", || ());
        watch.time("b", || ());
        let report = watch.take_report();
        assert_eq!(report.len(), 2);
        assert!(report[0].contains("[a]"));
        assert!(report[1].contains("[b]"));
    }

    #[test]
    fn concurrent_sections_do_not_nest() {
        let watch = Watch::new(true);
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            scope.spawn(|| {
                watch.time("outer", || {
                    // Hold "outer" open while the other thread times its section.
                    barrier.wait();
                    barrier.wait();
                })
            });
            scope.spawn(|| {
                barrier.wait();
                watch.time("other", || sleep(Duration::from_millis(5)));
                barrier.wait();
            });
        });

        let report = watch.take_report();
        assert_eq!(report.len(), 2);
        for line in &report {
            assert_eq!(line.find('['), Some(8), "unexpected nesting: {line}");
            assert!(!line.contains("missing"));
        }
        assert!(report[0].contains("[other]"));
        assert!(report[1].contains("[outer]"));
    }

    #[test]
    fn panicking_section_still_finishes() {
        let watch = Watch::new(true);
        let result = catch_unwind(AssertUnwindSafe(|| {
            watch.time("boom", || -> u32 { panic!("section failed") })
        }));
        assert!(result.is_err());

        watch.time("after", || ());
        let report = watch.take_report();
        assert_eq!(report.len(), 2);
        assert!(report[0].contains("[boom]"));
        assert!(report[1].contains("[after]"));
        assert_eq!(report[1].find('['), Some(8));
    }
}

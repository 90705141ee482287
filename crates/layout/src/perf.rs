use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const PHASE_TRAVERSE: &str = "traverse";
pub const PHASE_MARGIN_COLLAPSE: &str = "margin_collapse";

/// Trait for measuring layout performance.
///
/// Without the "profiling" feature the engine never takes timings, so the
/// no-op implementation costs nothing.
pub trait Profiler: Send + Sync {
    fn record(&self, phase: &str, duration: Duration);
    /// Record one resolved node tree.
    fn count_session(&self);
    fn reset(&self);
    fn phase_total(&self, phase: &str) -> Option<Duration>;
}

/// A no-op profiler for production use.
pub struct NoOpProfiler;

impl Profiler for NoOpProfiler {
    #[inline(always)]
    fn record(&self, _phase: &str, _duration: Duration) {}
    #[inline(always)]
    fn count_session(&self) {}
    #[inline(always)]
    fn reset(&self) {}
    #[inline(always)]
    fn phase_total(&self, _phase: &str) -> Option<Duration> {
        None
    }
}

/// Accumulates per-phase durations across sessions.
pub struct DebugProfiler {
    phases: Mutex<BTreeMap<String, Duration>>,
    sessions: AtomicUsize,
}

impl DebugProfiler {
    pub fn new() -> Self {
        Self {
            phases: Mutex::new(BTreeMap::new()),
            sessions: AtomicUsize::new(0),
        }
    }

    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::Acquire)
    }

    pub fn log_summary(&self) {
        let sessions = self.sessions();
        if sessions == 0 {
            return;
        }
        log::info!("=== Layout Profile ({} sessions) ===", sessions);
        if let Ok(phases) = self.phases.lock() {
            for (phase, total) in phases.iter() {
                log::info!(
                    "{}: {:?} total, {:?} per session",
                    phase,
                    total,
                    *total / sessions as u32
                );
            }
        }
    }
}

impl Default for DebugProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler for DebugProfiler {
    fn record(&self, phase: &str, duration: Duration) {
        if let Ok(mut g) = self.phases.lock() {
            *g.entry(phase.to_string()).or_default() += duration;
        }
    }

    fn count_session(&self) {
        self.sessions.fetch_add(1, Ordering::Release);
    }

    fn reset(&self) {
        if let Ok(mut g) = self.phases.lock() {
            g.clear();
        }
        self.sessions.store(0, Ordering::Release);
    }

    fn phase_total(&self, phase: &str) -> Option<Duration> {
        self.phases.lock().ok()?.get(phase).copied()
    }
}

/// Times one phase and reports it to the profiler when dropped.
pub struct PhaseTimer<'a> {
    #[cfg(feature = "profiling")]
    profiler: &'a dyn Profiler,
    #[cfg(feature = "profiling")]
    phase: &'static str,
    #[cfg(feature = "profiling")]
    start: instant::Instant,
    #[cfg(not(feature = "profiling"))]
    _marker: std::marker::PhantomData<&'a ()>,
}

impl<'a> PhaseTimer<'a> {
    #[cfg(feature = "profiling")]
    pub fn start(profiler: &'a dyn Profiler, phase: &'static str) -> Self {
        Self {
            profiler,
            phase,
            start: instant::Instant::now(),
        }
    }

    #[cfg(not(feature = "profiling"))]
    #[inline(always)]
    pub fn start(_profiler: &'a dyn Profiler, _phase: &'static str) -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "profiling")]
impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        self.profiler.record(self.phase, self.start.elapsed());
    }
}

use std::time::{Duration, Instant};

/// Per-step durations of one file's pipeline run
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<(&'static str, Duration)>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` and records how long it took under `name`.
    pub fn time<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.steps.push((name, start.elapsed()));
        out
    }

    /// One-line summary, e.g. `decode_raw=12.001ms render=40.210ms total=52.211ms`.
    pub fn summary(&self) -> String {
        let total: Duration = self.steps.iter().map(|(_, d)| *d).sum();
        self.steps
            .iter()
            .map(|(name, d)| (*name, *d))
            .chain(std::iter::once(("total", total)))
            .map(|(name, d)| format!("{}={:.3}ms", name, d.as_secs_f64() * 1000.0))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

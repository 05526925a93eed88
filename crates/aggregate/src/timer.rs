use std::time::Instant;

use tracing::debug;

/// Logs elapsed time per pipeline stage.
pub struct StageTimer {
    label: &'static str,
    started: Instant,
    last: Instant,
}

impl StageTimer {
    pub fn new(label: &'static str) -> Self {
        let now = Instant::now();
        Self {
            label,
            started: now,
            last: now,
        }
    }

    pub fn tick(&mut self, stage: &str) {
        let now = Instant::now();
        let step_ms = now.duration_since(self.last).as_secs_f64() * 1000.0;
        let total_ms = now.duration_since(self.started).as_secs_f64() * 1000.0;
        debug!(
            label = self.label,
            stage,
            step_ms = %format!("{step_ms:.3}"),
            total_ms = %format!("{total_ms:.3}"),
            "stage complete"
        );
        self.last = now;
    }

    pub fn total_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

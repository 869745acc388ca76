use serde::{Deserialize, Serialize};

/// Number of work-in-progress stages.
pub const STAGES: usize = 3;

/// Work-in-progress buffers of a factory unit, newest first.
///
/// Stage 0 holds items 25% complete, stage 1 50%, stage 2 75%. Advancing
/// moves every stage one slot toward completion and emits whatever was in
/// the last one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    stages: [f64; STAGES],
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stages(stages: [f64; STAGES]) -> Self {
        Self {
            stages: stages.map(crate::resources::non_negative),
        }
    }

    pub fn stages(&self) -> [f64; STAGES] {
        self.stages
    }

    /// Fraction complete of items in `stage`.
    pub fn completion(stage: usize) -> f64 {
        (stage + 1) as f64 / (STAGES + 1) as f64
    }

    pub fn total(&self) -> f64 {
        self.stages.iter().sum()
    }

    pub fn is_drained(&self) -> bool {
        self.total() <= 0.0
    }

    /// Place new work into the newest stage.
    pub fn start(&mut self, quantity: f64) {
        self.stages[0] += crate::resources::non_negative(quantity);
    }

    /// Shift every stage one step and return the items that finished.
    pub fn advance(&mut self) -> f64 {
        let completed = self.stages[STAGES - 1];
        self.stages.rotate_right(1);
        self.stages[0] = 0.0;
        completed
    }
}

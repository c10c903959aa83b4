use serde::{Deserialize, Serialize};

/// Progress of the most recent batch.
///
/// `completed` never exceeds `total`; `is_done` becomes true once every image
/// in the batch has a recorded item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    pub is_done: bool,
}

impl BatchProgress {
    /// Fresh progress for a batch of `total` images.
    pub fn start(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            is_done: false,
        }
    }

    /// Count one finished image. Saturates at `total`.
    pub fn record_completion(&mut self) {
        if self.completed < self.total {
            self.completed += 1;
        }
        if self.completed == self.total {
            self.is_done = true;
        }
    }

    /// Mark the batch finished, including an empty one.
    pub fn finish(&mut self) {
        self.completed = self.total;
        self.is_done = true;
    }

    /// A batch has started and not yet finished.
    pub fn in_flight(&self) -> bool {
        self.total > 0 && !self.is_done
    }

    /// Completion in `[0, 1]`; an empty batch counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

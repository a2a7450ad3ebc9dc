/// Counts the root comments posted by the current session in one thread
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QuotaTracker {
    max: usize,
    posted: usize,
}

impl QuotaTracker {
    pub fn new(max: usize) -> QuotaTracker {
        QuotaTracker { max, posted: 0 }
    }

    pub fn may_post(&self) -> bool {
        self.posted < self.max
    }

    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.posted)
    }

    pub fn posted(&self) -> usize {
        self.posted
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Must be called exactly once per successfully posted root comment
    pub fn increment(&mut self) {
        self.posted += 1;
    }

    pub(crate) fn reset_to(&mut self, posted: usize) {
        self.posted = posted;
    }
}

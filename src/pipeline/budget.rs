//! The finite call budget shared across providers within one request.

/// Counts down the live provider invocations permitted for one generation
/// request. Owned by the orchestrator, passed into each stage execution,
/// decremented only on a confirmed attempt. Never shared across requests.
#[derive(Debug)]
pub struct CallBudget {
    remaining: u32,
}

impl CallBudget {
    pub fn new(max_calls: u32) -> Self {
        Self {
            remaining: max_calls,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether at least `units` live calls are still permitted.
    pub fn has(&self, units: u32) -> bool {
        self.remaining >= units
    }

    /// Consume one unit for a confirmed attempt. Returns false (and leaves
    /// the budget untouched) when already exhausted.
    pub fn try_consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

use crate::models::Millis;

/// Fixed-period schedule for a background job.
///
/// There is no catch-up: after a long pause the job runs once and the next
/// run is one full period later.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Millis,
    next_due: Millis,
}

impl Interval {
    /// First run is due immediately.
    pub fn starting_now(period: Millis, now: Millis) -> Self {
        Self {
            period: period.max(1),
            next_due: now,
        }
    }

    /// First run is due one period from now.
    pub fn starting_after(period: Millis, now: Millis) -> Self {
        let period = period.max(1);
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn is_due(&self, now: Millis) -> bool {
        now >= self.next_due
    }

    /// Returns true and reschedules when the job is due.
    pub fn poll(&mut self, now: Millis) -> bool {
        if self.is_due(now) {
            self.next_due = now + self.period;
            true
        } else {
            false
        }
    }

    /// Milliseconds until the next run, zero if already due.
    pub fn remaining(&self, now: Millis) -> Millis {
        (self.next_due - now).max(0)
    }
}

use crate::models::{Millis, Task};

pub const HOUR_MS: Millis = 60 * 60 * 1000;
pub const DAY_MS: Millis = 24 * HOUR_MS;

/// A task expires 24 hours after it was (re)posted.
pub fn is_expired(task: &Task, now: Millis) -> bool {
    now - task.posted_at >= DAY_MS
}

/// Whether the task should show the URGENT badge right now.
///
/// The `urgent` flag is permanent, but the badge only lasts for the first
/// hour after `urgent_at`. Sorting uses the flag, not this window.
pub fn in_urgency_window(task: &Task, now: Millis) -> bool {
    task.urgent && now - task.urgent_at < HOUR_MS
}

/// Milliseconds left before the task expires, clamped at zero.
pub fn time_left(task: &Task, now: Millis) -> Millis {
    (task.posted_at + DAY_MS - now).max(0)
}

use crate::models::{Millis, Task};
use crate::urgency::is_expired;

/// Builds the list of tasks to show.
///
/// Expired tasks are dropped, then the neighborhood filter (empty means all)
/// and the case-insensitive search over title, description and category are
/// applied. Urgent tasks come first, newest first within each group. The sort
/// is stable so ties keep their order from `all`.
pub fn visible_tasks<'a>(
    all: &'a [Task],
    neighborhood: Option<&str>,
    query: &str,
    now: Millis,
) -> Vec<&'a Task> {
    let neighborhood = neighborhood.filter(|n| !n.is_empty());
    let query = query.to_lowercase();

    let mut visible: Vec<&Task> = all
        .iter()
        .filter(|t| !is_expired(t, now))
        .filter(|t| neighborhood.map_or(true, |n| t.neighborhood == n))
        .filter(|t| query.is_empty() || matches_query(t, &query))
        .collect();

    visible.sort_by(|a, b| {
        b.urgent
            .cmp(&a.urgent)
            .then_with(|| b.posted_at.cmp(&a.posted_at))
    });
    visible
}

/// `query` must already be lowercase.
fn matches_query(task: &Task, query: &str) -> bool {
    let haystack = format!("{}{}{}", task.title, task.description, task.category.label());
    haystack.to_lowercase().contains(query)
}

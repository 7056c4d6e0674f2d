use neighborly::filter::visible_tasks;
use neighborly::models::{Category, Task};
use neighborly::urgency::DAY_MS;

const NOW: i64 = 10_000;

fn task(id: &str, urgent: bool, posted_at: i64) -> Task {
    Task {
        id: id.into(),
        title: format!("Task {}", id),
        description: String::new(),
        category: Category::Other,
        time_needed_minutes: 10,
        payment: "Free".into(),
        contact: String::new(),
        location: String::new(),
        safe_point: String::new(),
        neighborhood: "My Street".into(),
        posted_at,
        urgent,
        urgent_at: if urgent { posted_at } else { 0 },
    }
}

fn ids(tasks: Vec<&Task>) -> Vec<&str> {
    tasks.into_iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn test_urgent_first_even_if_older() {
    let all = vec![task("a", true, 100), task("b", false, 200)];
    assert_eq!(ids(visible_tasks(&all, None, "", NOW)), vec!["a", "b"]);
}

#[test]
fn test_newest_first_within_group() {
    let all = vec![
        task("old", false, 100),
        task("urgent-old", true, 50),
        task("new", false, 300),
        task("urgent-new", true, 250),
    ];
    assert_eq!(
        ids(visible_tasks(&all, None, "", NOW)),
        vec!["urgent-new", "urgent-old", "new", "old"]
    );
}

#[test]
fn test_equal_keys_keep_source_order() {
    let all = vec![
        task("x", false, 100),
        task("y", false, 100),
        task("z", false, 100),
    ];
    assert_eq!(ids(visible_tasks(&all, None, "", NOW)), vec!["x", "y", "z"]);
}

#[test]
fn test_neighborhood_filter() {
    let mut elm = task("elm", false, 100);
    elm.neighborhood = "Elm Street".into();
    let all = vec![elm, task("mine", false, 200)];

    assert_eq!(ids(visible_tasks(&all, Some("Elm Street"), "", NOW)), vec!["elm"]);
    assert_eq!(ids(visible_tasks(&all, Some(""), "", NOW)), vec!["mine", "elm"]);
    assert_eq!(ids(visible_tasks(&all, None, "", NOW)), vec!["mine", "elm"]);
    assert!(visible_tasks(&all, Some("Nowhere"), "", NOW).is_empty());
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let mut dog = task("dog", false, 100);
    dog.title = "Walk My Dog".into();
    let all = vec![dog, task("other", false, 200)];

    for q in ["dog", "DOG", "walk my", "y d"] {
        assert_eq!(ids(visible_tasks(&all, None, q, NOW)), vec!["dog"], "query {q:?}");
    }
}

#[test]
fn test_search_covers_description_and_category() {
    let mut repair = task("repair", false, 100);
    repair.category = Category::Repair;
    let mut desc = task("desc", false, 200);
    desc.description = "Need a LADDER for the gutter".into();
    let mut pets = task("pets", false, 300);
    pets.category = Category::PetCare;
    let all = vec![repair, desc, pets];

    assert_eq!(ids(visible_tasks(&all, None, "repair", NOW)), vec!["repair"]);
    assert_eq!(ids(visible_tasks(&all, None, "ladder", NOW)), vec!["desc"]);
    assert_eq!(ids(visible_tasks(&all, None, "pet care", NOW)), vec!["pets"]);
}

#[test]
fn test_expired_tasks_never_visible() {
    let all = vec![task("stale", true, NOW - DAY_MS), task("live", false, NOW - DAY_MS + 1)];
    assert_eq!(ids(visible_tasks(&all, None, "", NOW)), vec!["live"]);
}

#[test]
fn test_visible_tasks_is_idempotent() {
    let all = vec![
        task("a", false, 300),
        task("b", true, 100),
        task("c", false, 300),
        task("d", true, 100),
    ];
    let first = ids(visible_tasks(&all, None, "task", NOW));
    let second = ids(visible_tasks(&all, None, "task", NOW));
    assert_eq!(first, second);
    assert_eq!(first, vec!["b", "d", "a", "c"]);
}

#[test]
fn test_search_matches_query_as_typed() {
    let mut sitting = task("a", false, 200);
    sitting.title = "Dogsitting".into();
    let mut walk = task("b", false, 100);
    walk.title = "Walk my dog".into();
    let all = vec![sitting, walk];

    assert_eq!(ids(visible_tasks(&all, None, " dog", NOW)), vec!["b"]);
    assert!(visible_tasks(&all, None, "   ", NOW).is_empty());
    assert_eq!(ids(visible_tasks(&all, None, "", NOW)), vec!["a", "b"]);
}

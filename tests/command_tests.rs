use neighborly::board::Board;
use neighborly::clock::ManualClock;
use neighborly::commands::*;
use neighborly::config::Config;
use neighborly::models::{Category, NewTask};
use neighborly::storage::MemoryStore;
use neighborly::urgency::{DAY_MS, HOUR_MS};

const T0: i64 = 1_700_000_000_000;

fn with_test_board<F>(f: F)
where
    F: FnOnce(&mut Board<MemoryStore>, &ManualClock),
{
    let clock = ManualClock::new(T0);
    let mut board = Board::with_clock(MemoryStore::new(), Config::default(), Box::new(clock.clone()));
    f(&mut board, &clock);
}

fn post(board: &mut Board<MemoryStore>, title: &str) -> Option<String> {
    let new = NewTask {
        title: title.into(),
        category: Category::Errands,
        ..NewTask::default()
    };
    cmd_post(board, new, true)
}

#[test]
fn test_post_and_list() {
    with_test_board(|board, _| {
        let id = post(board, "Pick up groceries").unwrap();
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].id, id);
        assert_eq!(board.tasks()[0].title, "Pick up groceries");
        assert!(post(board, "   ").is_none());
        assert_eq!(board.tasks().len(), 1);
    });
}

#[test]
fn test_repost_and_delete() {
    with_test_board(|board, clock| {
        let id = post(board, "Borrow a ladder").unwrap();
        clock.advance(HOUR_MS);
        cmd_repost(board, &id, true);
        assert_eq!(board.tasks().len(), 2);
        assert_eq!(board.tasks()[0].posted_at, T0 + HOUR_MS);

        cmd_delete(board, &id, true);
        assert_eq!(board.tasks().len(), 1);
        assert_ne!(board.tasks()[0].id, id);

        cmd_delete(board, "t_missing", true);
        assert_eq!(board.tasks().len(), 1);
    });
}

#[test]
fn test_helped_with_remove() {
    with_test_board(|board, _| {
        let id = post(board, "Feed the cat").unwrap();
        cmd_helped(board, &id, Some("Ana".into()), true, true);
        assert!(board.tasks().is_empty());
        assert_eq!(board.helpers().get("Ana"), Some(&1));

        let id = post(board, "Feed the cat again").unwrap();
        cmd_helped(board, &id, None, false, true);
        assert_eq!(board.helpers().get("Helper"), Some(&1));
        assert_eq!(board.tasks().len(), 1);
    });
}

#[test]
fn test_skills_and_thanks() {
    with_test_board(|board, _| {
        cmd_skill_add(board, "Ben", "Plumbing", true);
        cmd_skill_add(board, "", "Nothing", true);
        assert_eq!(board.skills().len(), 1);

        cmd_thank(board, "You're the best", true);
        cmd_thank(board, &"x".repeat(141), true);
        assert_eq!(board.thanks().len(), 1);
    });
}

#[test]
fn test_sweep() {
    with_test_board(|board, clock| {
        post(board, "Old news").unwrap();
        clock.advance(DAY_MS);
        cmd_sweep(board, true);
        assert!(board.tasks().is_empty());
    });
}

#[test]
fn test_reset_forced() {
    with_test_board(|board, _| {
        post(board, "Something").unwrap();
        cmd_skill_add(board, "Ben", "Plumbing", true);
        cmd_reset(board, true);
        assert!(board.tasks().is_empty());
        assert!(board.skills().is_empty());
    });
}

#[test]
fn test_human_duration() {
    assert_eq!(human_duration(0), "<1m");
    assert_eq!(human_duration(59_999), "<1m");
    assert_eq!(human_duration(5 * 60_000), "5m");
    assert_eq!(human_duration(2 * HOUR_MS + 5 * 60_000), "2h 05m");
    assert_eq!(human_duration(-10), "<1m");
}

use neighborly::board::Board;
use neighborly::clock::ManualClock;
use neighborly::config::Config;
use neighborly::models::{Category, NewTask};
use neighborly::storage::MemoryStore;
use neighborly::tui::app::{App, InputMode, ViewMode, ADD_STEPS};
use neighborly::urgency::DAY_MS;

const T0: i64 = 1_700_000_000_000;

fn app() -> (App<MemoryStore>, ManualClock) {
    let clock = ManualClock::new(T0);
    let board = Board::with_clock(MemoryStore::new(), Config::default(), Box::new(clock.clone()));
    (App::new(board), clock)
}

fn type_line(app: &mut App<MemoryStore>, text: &str) {
    for c in text.chars() {
        app.push_char(c);
    }
    app.handle_input();
}

fn seed(app: &mut App<MemoryStore>, title: &str, neighborhood: &str) -> String {
    let id = app
        .board
        .create_task(NewTask {
            title: title.into(),
            neighborhood: neighborhood.into(),
            ..NewTask::default()
        })
        .unwrap();
    app.drain_events();
    id
}

#[test]
fn test_post_wizard_creates_task() {
    let (mut app, _) = app();
    app.start_add();
    assert_eq!(app.input_mode, InputMode::Adding);

    let answers = ["Walk my dog", "Evening walk", "pet care", "30", "Coffee", "", "Park", "Library", "Elm Street", "y"];
    assert_eq!(answers.len(), ADD_STEPS.len());
    for a in answers {
        type_line(&mut app, a);
    }

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.visible_ids.len(), 1);
    let t = &app.board.tasks()[0];
    assert_eq!(t.title, "Walk my dog");
    assert_eq!(t.category, Category::PetCare);
    assert_eq!(t.time_needed_minutes, 30);
    assert_eq!(t.neighborhood, "Elm Street");
    assert!(t.urgent);
}

#[test]
fn test_post_wizard_requires_title() {
    let (mut app, _) = app();
    app.start_add();
    app.handle_input();
    assert_eq!(app.input_mode, InputMode::Adding);
    assert_eq!(app.add_state.step, 0);
    assert!(app.status.is_some());
}

#[test]
fn test_helped_prompt_then_confirm_remove() {
    let (mut app, _) = app();
    seed(&mut app, "Carry boxes", "");

    app.start_help();
    assert_eq!(app.input_mode, InputMode::Helping);
    type_line(&mut app, "Ana");
    assert_eq!(app.input_mode, InputMode::ConfirmRemove);
    app.push_char('y');

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.visible_ids.is_empty());
    assert_eq!(app.board.helpers().get("Ana"), Some(&1));
}

#[test]
fn test_helped_cancel_keeps_task_but_counts() {
    let (mut app, _) = app();
    seed(&mut app, "Carry boxes", "");

    app.start_help();
    app.handle_input();
    app.cancel_input();

    assert_eq!(app.visible_ids.len(), 1);
    assert_eq!(app.board.helpers().get("Helper"), Some(&1));
}

#[test]
fn test_helped_nickname_cancel_uses_placeholder() {
    let (mut app, _) = app();
    seed(&mut app, "Carry boxes", "");

    app.start_help();
    for c in "Ana".chars() {
        app.push_char(c);
    }
    app.cancel_input();
    assert_eq!(app.input_mode, InputMode::ConfirmRemove);
    app.cancel_input();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.visible_ids.len(), 1);
    assert_eq!(app.board.helpers().get("Helper"), Some(&1));
    assert!(app.board.helpers().get("Ana").is_none());
}

#[test]
fn test_helped_nickname_cancel_then_remove() {
    let (mut app, _) = app();
    seed(&mut app, "Carry boxes", "");

    app.start_help();
    app.cancel_input();
    app.push_char('y');

    assert!(app.visible_ids.is_empty());
    assert_eq!(app.board.helpers().get("Helper"), Some(&1));
}

#[test]
fn test_post_wizard_accepts_cli_category_names() {
    let (mut app, _) = app();
    app.start_add();
    let answers = ["Borrow a drill", "", "lend-borrow", "", "", "", "", "", "", ""];
    for a in answers {
        type_line(&mut app, a);
    }
    assert_eq!(app.board.tasks()[0].category, Category::LendBorrow);
}

#[test]
fn test_thank_validation_keeps_prompt_open() {
    let (mut app, _) = app();
    app.start_thank();
    app.handle_input();
    assert_eq!(app.input_mode, InputMode::Thanking);
    type_line(&mut app, "Thanks for the soup");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.board.thanks().len(), 1);
}

#[test]
fn test_add_skill_two_steps() {
    let (mut app, _) = app();
    app.start_add_skill();
    type_line(&mut app, "Ben");
    assert_eq!(app.skill_nick.as_deref(), Some("Ben"));
    type_line(&mut app, "Knife sharpening");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.board.skills()[0].skill_text, "Knife sharpening");
}

#[test]
fn test_search_and_neighborhood_filter() {
    let (mut app, clock) = app();
    seed(&mut app, "Walk My Dog", "Elm Street");
    clock.advance(1);
    seed(&mut app, "Fix bike", "Oak Lane");
    assert_eq!(app.visible_ids.len(), 2);

    app.start_search();
    for c in "DOG".chars() {
        app.push_char(c);
    }
    assert_eq!(app.visible_ids.len(), 1);
    app.cancel_input();
    assert_eq!(app.visible_ids.len(), 2);

    // newest neighborhood first
    app.cycle_neighborhood();
    assert_eq!(app.neighborhood_filter.as_deref(), Some("Oak Lane"));
    assert_eq!(app.visible_ids.len(), 1);
    app.clear_filters();
    assert_eq!(app.visible_ids.len(), 2);
}

#[test]
fn test_tick_drops_expired_from_view() {
    let (mut app, clock) = app();
    seed(&mut app, "Soon gone", "");
    clock.advance(DAY_MS);
    let report = app.on_tick();
    assert_eq!(report.swept, 1);
    assert!(app.visible_ids.is_empty());
    assert!(app.selected_id().is_none());
}

#[test]
fn test_view_cycles() {
    let (mut app, _) = app();
    for expected in [ViewMode::Leaderboard, ViewMode::Skills, ViewMode::Thanks, ViewMode::Tasks] {
        app.toggle_view();
        assert_eq!(app.view_mode, expected);
    }
}

#[test]
fn test_render_uses_selection_snapshot() {
    use ratatui::{backend::TestBackend, Terminal};

    let (mut app, clock) = app();
    seed(&mut app, "Older task", "");
    clock.advance(1);
    seed(&mut app, "Newer task", "");
    app.next();
    assert_eq!(app.selected_id(), Some(app.board.tasks()[1].id.as_str()));

    // Older task expires before the next reload.
    clock.advance(DAY_MS - 1);
    let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();
    terminal.draw(|f| neighborly::tui::ui::ui(f, &mut app)).unwrap();

    let buffer = terminal.backend().buffer();
    let highlighted = (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .find(|line| line.contains(">>"))
        .unwrap();
    assert!(highlighted.contains("Older task"));
}

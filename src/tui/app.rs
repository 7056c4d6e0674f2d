use std::sync::mpsc::Receiver;

use ratatui::widgets::TableState;

use crate::board::{Board, TickReport};
use crate::error::BoardError;
use crate::events::BoardEvent;
use crate::models::{Category, NewTask};
use crate::storage::KeyValueStore;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    /// Multi-step "Post Task" wizard.
    Adding,
    /// Asking for the helper's nickname.
    Helping,
    /// Asking whether a helped task should leave the board.
    ConfirmRemove,
    Thanking,
    /// Two-step nickname + skill entry.
    AddingSkill,
    Searching,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ViewMode {
    Tasks,
    Leaderboard,
    Skills,
    Thanks,
}

impl ViewMode {
    fn next(self) -> Self {
        match self {
            ViewMode::Tasks => ViewMode::Leaderboard,
            ViewMode::Leaderboard => ViewMode::Skills,
            ViewMode::Skills => ViewMode::Thanks,
            ViewMode::Thanks => ViewMode::Tasks,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Tasks => "Tasks",
            ViewMode::Leaderboard => "Top Helpers",
            ViewMode::Skills => "Skills",
            ViewMode::Thanks => "Thank-yous",
        }
    }
}

/// Prompts of the "Post Task" wizard, in order.
pub const ADD_STEPS: [&str; 10] = [
    "Title",
    "Description (Optional)",
    "Category: Errands, Repair, Pet Care, Lend/Borrow, Other",
    "Minutes Needed",
    "Payment (e.g. Free, Coffee, $10)",
    "Contact (Optional)",
    "Location (Optional)",
    "Safe Meeting Point (Optional)",
    "Neighborhood (Optional)",
    "Urgent? (y/N)",
];

/// Answers collected by the "Post Task" wizard so far.
#[derive(Default)]
pub struct AddState {
    pub step: usize,
    pub task: NewTask,
}

pub struct App<S: KeyValueStore> {
    pub board: Board<S>,
    events: Receiver<BoardEvent>,
    /// Ids of the tasks currently on screen, in display order.
    pub visible_ids: Vec<String>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Nickname typed in the first step of skill entry.
    pub skill_nick: Option<String>,
    /// Task being marked helped and the nickname entered for it.
    pub helping: Option<(String, String)>,
    pub neighborhood_filter: Option<String>,
    pub search: String,
    /// Last validation failure or notice, shown in the footer.
    pub status: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(mut board: Board<S>) -> App<S> {
        let events = board.subscribe();
        let mut app = App {
            board,
            events,
            visible_ids: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            skill_nick: None,
            helping: None,
            neighborhood_filter: None,
            search: String::new(),
            status: None,
        };
        app.reload();
        app
    }

    /// Rebuilds the visible task list and keeps the selection in range.
    pub fn reload(&mut self) {
        self.visible_ids = self
            .board
            .visible_tasks(self.neighborhood_filter.as_deref(), &self.search)
            .into_iter()
            .map(|t| t.id.clone())
            .collect();

        if self.visible_ids.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible_ids.len() {
                self.state.select(Some(self.visible_ids.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Applies pending change events. Returns true if anything changed.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;
        while self.events.try_recv().is_ok() {
            changed = true;
        }
        if changed {
            self.reload();
        }
        changed
    }

    /// Runs due timer jobs, then refreshes from their events.
    ///
    /// Reloads even without events so urgency badges and expiry countdowns
    /// stay current.
    pub fn on_tick(&mut self) -> TickReport {
        let report = self.board.tick();
        if !self.drain_events() {
            self.reload();
        }
        report
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.visible_ids.get(i))
            .map(String::as_str)
    }

    pub fn next(&mut self) {
        if self.view_mode != ViewMode::Tasks || self.visible_ids.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible_ids.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.view_mode != ViewMode::Tasks || self.visible_ids.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.visible_ids.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.next();
    }

    /// Steps through "all neighborhoods" and each known neighborhood.
    pub fn cycle_neighborhood(&mut self) {
        let all = self.board.neighborhoods();
        self.neighborhood_filter = match &self.neighborhood_filter {
            None => all.first().cloned(),
            Some(current) => all
                .iter()
                .position(|n| n == current)
                .and_then(|i| all.get(i + 1))
                .cloned(),
        };
        self.reload();
    }

    pub fn clear_filters(&mut self) {
        self.neighborhood_filter = None;
        self.search.clear();
        self.reload();
    }

    pub fn repost_selected(&mut self) {
        if self.view_mode != ViewMode::Tasks { return; }
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.board.repost(&id);
            self.state.select(Some(0));
            self.drain_events();
        }
    }

    pub fn delete_selected(&mut self) {
        if self.view_mode != ViewMode::Tasks { return; }
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.board.delete_task(&id);
            self.drain_events();
        }
    }

    pub fn sweep(&mut self) {
        let removed = self.board.sweep_expired();
        self.status = Some(format!("Removed {} expired task(s)", removed));
        self.drain_events();
    }

    // ---- Starting prompts ----

    pub fn start_add(&mut self) {
        self.add_state = AddState::default();
        self.begin_input(InputMode::Adding);
    }

    pub fn start_help(&mut self) {
        if self.view_mode != ViewMode::Tasks { return; }
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.helping = Some((id, String::new()));
            self.begin_input(InputMode::Helping);
        }
    }

    pub fn start_thank(&mut self) {
        self.begin_input(InputMode::Thanking);
    }

    pub fn start_add_skill(&mut self) {
        self.skill_nick = None;
        self.begin_input(InputMode::AddingSkill);
    }

    pub fn start_search(&mut self) {
        self.begin_input(InputMode::Searching);
        self.input_buffer = self.search.clone();
    }

    fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input_buffer.clear();
        self.status = None;
    }

    pub fn cancel_input(&mut self) {
        // Dismissing either help prompt keeps the task; the help still counts.
        match self.input_mode {
            InputMode::Helping => {
                if let Some((_, nick)) = self.helping.as_mut() {
                    nick.clear();
                }
                self.input_buffer.clear();
                self.input_mode = InputMode::ConfirmRemove;
                return;
            }
            InputMode::ConfirmRemove => self.finish_help(false),
            InputMode::Searching => {
                self.search.clear();
                self.reload();
            }
            _ => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.helping = None;
    }

    pub fn push_char(&mut self, c: char) {
        if self.input_mode == InputMode::ConfirmRemove {
            match c {
                'y' | 'Y' => self.finish_help(true),
                'n' | 'N' => self.finish_help(false),
                _ => {}
            }
            return;
        }
        self.input_buffer.push(c);
        if self.input_mode == InputMode::Searching {
            self.search = self.input_buffer.clone();
            self.reload();
        }
    }

    pub fn pop_char(&mut self) {
        self.input_buffer.pop();
        if self.input_mode == InputMode::Searching {
            self.search = self.input_buffer.clone();
            self.reload();
        }
    }

    // ---- Resolving prompts ----

    /// Handles Enter for the current input mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Helping => {
                if let Some((_, nick)) = self.helping.as_mut() {
                    *nick = self.input_buffer.trim().to_string();
                }
                self.input_buffer.clear();
                self.input_mode = InputMode::ConfirmRemove;
            }
            InputMode::ConfirmRemove => self.finish_help(false),
            InputMode::Thanking => {
                let text = self.input_buffer.clone();
                let result = self.board.add_thank(&text).map(|_| "Thank-you posted".to_string());
                self.finish(result);
            }
            InputMode::AddingSkill => match self.skill_nick.take() {
                None => {
                    if !self.input_buffer.trim().is_empty() {
                        self.skill_nick = Some(self.input_buffer.trim().to_string());
                        self.input_buffer.clear();
                    }
                }
                Some(nick) => {
                    let skill = self.input_buffer.clone();
                    let result = self.board.add_skill(&nick, &skill).map(|_| format!("Skill added for {}", nick));
                    if result.is_err() {
                        self.skill_nick = Some(nick);
                    }
                    self.finish(result);
                }
            },
            InputMode::Searching => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            InputMode::Normal => {}
        }
    }

    fn handle_adding_input(&mut self) {
        let value = self.input_buffer.trim().to_string();
        let task = &mut self.add_state.task;
        match self.add_state.step {
            0 => {
                if value.is_empty() {
                    self.status = Some("Add a short title".to_string());
                    return;
                }
                task.title = value;
            }
            1 => task.description = value,
            2 => task.category = Category::from_label(&value),
            3 => {
                if value.is_empty() {
                    task.time_needed_minutes = 0;
                } else if let Ok(m) = value.parse::<u32>() {
                    task.time_needed_minutes = m;
                } else {
                    self.status = Some("Minutes must be a whole number".to_string());
                    return;
                }
            }
            4 => task.payment = value,
            5 => task.contact = value,
            6 => task.location = value,
            7 => task.safe_point = value,
            8 => task.neighborhood = value,
            _ => {
                task.urgent = matches!(value.to_lowercase().as_str(), "y" | "yes");
                let new = std::mem::take(&mut self.add_state.task);
                let result = self.board.create_task(new).map(|id| format!("Task posted ({})", id));
                self.state.select(Some(0));
                self.finish(result);
                return;
            }
        }
        self.status = None;
        self.add_state.step += 1;
        self.input_buffer.clear();
    }

    fn finish_help(&mut self, remove: bool) {
        if let Some((id, nick)) = self.helping.take() {
            let result = self
                .board
                .mark_helped(&id, &nick, remove)
                .map(|count| format!("Thanks for helping! Helps so far: {}", count));
            self.finish(result);
        } else {
            self.input_mode = InputMode::Normal;
        }
    }

    /// Leaves input mode unless the action failed validation, in which case
    /// the prompt stays open with the error shown.
    fn finish(&mut self, result: Result<String, BoardError>) {
        match result {
            Ok(msg) => {
                self.status = Some(msg);
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            Err(e) if e.is_validation() => {
                self.status = Some(e.to_string());
            }
            Err(e) => {
                self.status = Some(e.to_string());
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
        }
        self.drain_events();
    }
}

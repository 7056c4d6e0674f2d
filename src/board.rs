use std::sync::mpsc::Receiver;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{BoardError, BoardResult};
use crate::events::{BoardEvent, EventBus};
use crate::filter::visible_tasks;
use crate::leaderboard::{record_help, top_helpers};
use crate::models::{HelperTally, Millis, NewTask, Skill, Task, ThankYou};
use crate::storage::{self, keys, KeyValueStore};
use crate::timers::Interval;
use crate::urgency::{in_urgency_window, is_expired};

pub const MAX_THANK_CHARS: usize = 140;

/// Everything the board knows, as loaded from storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Most recently posted first.
    pub tasks: Vec<Task>,
    pub helpers: HelperTally,
    /// Most recently added first.
    pub skills: Vec<Skill>,
    /// Most recently posted first.
    pub thanks: Vec<ThankYou>,
}

impl BoardState {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            tasks: storage::load(store, keys::TASKS, Vec::new()),
            helpers: storage::load(store, keys::HELPERS, HelperTally::new()),
            skills: storage::load(store, keys::SKILLS, Vec::new()),
            thanks: storage::load(store, keys::THANKS, Vec::new()),
        }
    }
}

/// What a call to [`Board::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub swept: usize,
    pub flushed: bool,
}

/// The board controller. Owns the state and is the only thing that mutates it.
///
/// Every change is written through to the store right away and announced to
/// subscribers. Write failures are logged and retried by the next flush.
pub struct Board<S: KeyValueStore> {
    store: S,
    state: BoardState,
    config: Config,
    clock: Box<dyn Clock>,
    events: EventBus,
    sweep_timer: Interval,
    flush_timer: Interval,
}

impl<S: KeyValueStore> Board<S> {
    /// Loads the board from `store` using the wall clock.
    pub fn open(store: S, config: Config) -> Self {
        Self::with_clock(store, config, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, config: Config, clock: Box<dyn Clock>) -> Self {
        let state = BoardState::load(&store);
        let now = clock.now_ms();
        let sweep_timer = Interval::starting_now(config.sweep_period_ms(), now);
        let flush_timer = Interval::starting_after(config.flush_period_ms(), now);
        debug!(
            tasks = state.tasks.len(),
            helpers = state.helpers.len(),
            skills = state.skills.len(),
            thanks = state.thanks.len(),
            "board loaded"
        );
        Self {
            store,
            state,
            config,
            clock,
            events: EventBus::new(),
            sweep_timer,
            flush_timer,
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receives an event after every change to the board.
    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        self.events.subscribe()
    }

    // ---- Tasks ----

    /// Validates and posts a new task at the top of the board.
    pub fn create_task(&mut self, new: NewTask) -> BoardResult<String> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(BoardError::validation("title", "add a short title"));
        }
        let now = self.now();
        let neighborhood = match new.neighborhood.trim() {
            "" => self.config.default_neighborhood.clone(),
            n => n.to_string(),
        };
        let task = Task {
            id: self.fresh_id(),
            title: title.to_string(),
            description: new.description.trim().to_string(),
            category: new.category,
            time_needed_minutes: if new.time_needed_minutes == 0 {
                self.config.default_minutes
            } else {
                new.time_needed_minutes
            },
            payment: new.payment.trim().to_string(),
            contact: new.contact.trim().to_string(),
            location: new.location.trim().to_string(),
            safe_point: new.safe_point.trim().to_string(),
            neighborhood,
            posted_at: now,
            urgent: new.urgent,
            urgent_at: if new.urgent { now } else { 0 },
        };
        let id = task.id.clone();
        debug!(id = %id, urgent = task.urgent, "task created");
        self.state.tasks.insert(0, task);
        self.persist(keys::TASKS);
        self.events.emit(BoardEvent::TasksChanged);
        Ok(id)
    }

    /// Purges tasks older than 24 hours. Returns how many were removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.now();
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| !is_expired(t, now));
        let removed = before - self.state.tasks.len();
        if removed > 0 {
            info!(removed, "swept expired tasks");
            self.persist(keys::TASKS);
            self.events.emit(BoardEvent::TasksChanged);
        }
        removed
    }

    /// Posts a fresh copy of a task. Does nothing if the task is gone.
    ///
    /// The copy keeps the original's urgency flag and timestamp.
    pub fn repost(&mut self, id: &str) -> Option<String> {
        let original = self.task(id)?.clone();
        let new_id = self.fresh_id();
        let copy = Task {
            id: new_id.clone(),
            posted_at: self.now(),
            ..original
        };
        debug!(from = %id, to = %new_id, "task reposted");
        self.state.tasks.insert(0, copy);
        self.persist(keys::TASKS);
        self.events.emit(BoardEvent::TasksChanged);
        Some(new_id)
    }

    /// Credits `nickname` with one helped task and optionally takes the task
    /// off the board. Returns the helper's new count.
    ///
    /// A blank nickname is credited to the configured placeholder. The credit
    /// is kept even if the task has disappeared in the meantime, in which case
    /// `NotFound` is returned.
    pub fn mark_helped(&mut self, id: &str, nickname: &str, remove: bool) -> BoardResult<u32> {
        let nickname = match nickname.trim() {
            "" => self.config.default_helper.clone(),
            n => n.to_string(),
        };
        let count = record_help(&mut self.state.helpers, &nickname);
        self.persist(keys::HELPERS);
        self.events.emit(BoardEvent::HelpersChanged);
        debug!(id, helper = %nickname, count, "marked helped");

        if self.task(id).is_none() {
            warn!(id, "marked helped on a missing task");
            return Err(BoardError::NotFound { id: id.to_string() });
        }
        if remove {
            self.delete_task(id);
        }
        Ok(count)
    }

    /// Removes a task. Returns false if there was nothing to remove.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            return false;
        }
        debug!(id, "task deleted");
        self.persist(keys::TASKS);
        self.events.emit(BoardEvent::TasksChanged);
        true
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    /// Tasks to display for the given filter and search text.
    pub fn visible_tasks(&self, neighborhood: Option<&str>, query: &str) -> Vec<&Task> {
        visible_tasks(&self.state.tasks, neighborhood, query, self.now())
    }

    /// Whether the URGENT badge should be shown for `task` right now.
    pub fn shows_urgent(&self, task: &Task) -> bool {
        in_urgency_window(task, self.now())
    }

    /// Known neighborhoods: those in use first, then the configured ones.
    pub fn neighborhoods(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let in_use = self.state.tasks.iter().map(|t| {
            if t.neighborhood.is_empty() {
                self.config.default_neighborhood.as_str()
            } else {
                t.neighborhood.as_str()
            }
        });
        for n in in_use.chain(self.config.neighborhoods.iter().map(String::as_str)) {
            if !seen.iter().any(|s| s == n) {
                seen.push(n.to_string());
            }
        }
        seen
    }

    // ---- Helpers, skills and thanks ----

    pub fn helpers(&self) -> &HelperTally {
        &self.state.helpers
    }

    /// Leaderboard using the configured size.
    pub fn top_helpers(&self) -> Vec<(String, u32)> {
        top_helpers(&self.state.helpers, self.config.leaderboard_limit)
    }

    pub fn add_skill(&mut self, nickname: &str, skill_text: &str) -> BoardResult<()> {
        let nickname = nickname.trim();
        let skill_text = skill_text.trim();
        if nickname.is_empty() {
            return Err(BoardError::validation("nickname", "enter a nickname"));
        }
        if skill_text.is_empty() {
            return Err(BoardError::validation("skill", "describe the skill"));
        }
        let skill = Skill {
            nickname: nickname.to_string(),
            skill_text: skill_text.to_string(),
            added_at: self.now(),
        };
        self.state.skills.insert(0, skill);
        self.persist(keys::SKILLS);
        self.events.emit(BoardEvent::SkillsChanged);
        Ok(())
    }

    pub fn skills(&self) -> &[Skill] {
        &self.state.skills
    }

    /// Posts an anonymous thank-you of at most 140 characters.
    pub fn add_thank(&mut self, text: &str) -> BoardResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BoardError::validation("thank-you", "write a short message"));
        }
        let len = text.chars().count();
        if len > MAX_THANK_CHARS {
            return Err(BoardError::validation(
                "thank-you",
                format!("{} characters, max is {}", len, MAX_THANK_CHARS),
            ));
        }
        let thank = ThankYou {
            text: text.to_string(),
            posted_at: self.now(),
        };
        self.state.thanks.insert(0, thank);
        self.persist(keys::THANKS);
        self.events.emit(BoardEvent::ThanksChanged);
        Ok(())
    }

    pub fn thanks(&self) -> &[ThankYou] {
        &self.state.thanks
    }

    // ---- Persistence and timers ----

    /// Writes all four collections. Every collection is attempted; the first
    /// failure is returned.
    pub fn flush(&mut self) -> BoardResult<()> {
        let mut first_err = None;
        for key in keys::ALL {
            if let Err(e) = self.save_key(key) {
                warn!(error = %e, "flush failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Runs the sweep and flush jobs that are due.
    pub fn tick(&mut self) -> TickReport {
        let now = self.now();
        let mut report = TickReport::default();
        if self.sweep_timer.poll(now) {
            report.swept = self.sweep_expired();
        }
        if self.flush_timer.poll(now) {
            report.flushed = self.flush().is_ok();
        }
        report
    }

    /// Milliseconds until the next timer job is due.
    pub fn next_tick_in(&self) -> Millis {
        let now = self.now();
        self.sweep_timer
            .remaining(now)
            .min(self.flush_timer.remaining(now))
    }

    /// Deletes everything, in storage and in memory.
    pub fn reset(&mut self) -> BoardResult<()> {
        storage::delete_all(&mut self.store)?;
        self.state = BoardState::default();
        info!("board reset");
        for event in [
            BoardEvent::TasksChanged,
            BoardEvent::HelpersChanged,
            BoardEvent::SkillsChanged,
            BoardEvent::ThanksChanged,
        ] {
            self.events.emit(event);
        }
        Ok(())
    }

    fn save_key(&mut self, key: &str) -> BoardResult<()> {
        match key {
            keys::TASKS => storage::save(&mut self.store, key, &self.state.tasks),
            keys::HELPERS => storage::save(&mut self.store, key, &self.state.helpers),
            keys::SKILLS => storage::save(&mut self.store, key, &self.state.skills),
            keys::THANKS => storage::save(&mut self.store, key, &self.state.thanks),
            _ => Ok(()),
        }
    }

    fn persist(&mut self, key: &str) {
        if let Err(e) = self.save_key(key) {
            warn!(error = %e, "write failed, will retry on next flush");
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let raw = Uuid::new_v4().simple().to_string();
            let id = format!("t_{}", &raw[..9]);
            if self.task(&id).is_none() {
                return id;
            }
        }
    }
}

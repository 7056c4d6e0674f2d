use std::sync::mpsc::{self, Receiver, Sender};

/// What part of the board changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEvent {
    TasksChanged,
    HelpersChanged,
    SkillsChanged,
    ThanksChanged,
}

/// Fan-out of change events to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<BoardEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `event` to every live subscriber, forgetting dropped ones.
    pub fn emit(&mut self, event: BoardEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

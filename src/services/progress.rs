use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ParseWarning,
    TargetStarted,
    EntryProgress,
    EntryFailed,
    TargetCompleted,
    RunCompleted,
    Fatal,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub phase: Phase,
    pub current: usize,
    pub total: usize,
    pub message: String,
    pub severity: Severity,
}

impl StatusEvent {
    pub fn new(
        phase: Phase,
        current: usize,
        total: usize,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        StatusEvent {
            phase,
            current,
            total,
            message: message.into(),
            severity,
        }
    }
}

/// Receives status updates from a run. Invoked synchronously.
pub trait StatusObserver {
    fn notify(&mut self, event: StatusEvent);
}

impl<F> StatusObserver for F
where
    F: FnMut(StatusEvent),
{
    fn notify(&mut self, event: StatusEvent) {
        self(event)
    }
}

pub struct NoopObserver;

impl StatusObserver for NoopObserver {
    fn notify(&mut self, _event: StatusEvent) {}
}

/// Keeps every event; used by callers that want the log after the run.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    pub events: Vec<StatusEvent>,
}

impl CollectingObserver {
    pub fn of_phase(&self, phase: Phase) -> Vec<&StatusEvent> {
        self.events.iter().filter(|e| e.phase == phase).collect()
    }
}

impl StatusObserver for CollectingObserver {
    fn notify(&mut self, event: StatusEvent) {
        self.events.push(event);
    }
}

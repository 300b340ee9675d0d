//! Instrumented tasks that log when they start and finish.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use leo::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Started,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub node: String,
    pub kind: EventKind,
    pub at: Instant,
}

/// Shared log of task start/finish events across runs.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A task that records its start, sleeps for `work`, records its finish
    /// and succeeds.
    pub fn task(&self, name: &str, work: Duration) -> Task {
        self.build(name, work, None)
    }

    /// Like [`Recorder::task`], but fails with `message` after finishing.
    pub fn failing_task(&self, name: &str, work: Duration, message: &str) -> Task {
        self.build(name, work, Some(message.to_string()))
    }

    /// A synchronous task that blocks its thread for `work`.
    pub fn blocking_task(&self, name: &str, work: Duration) -> Task {
        let recorder = self.clone();
        let name = name.to_string();
        Task::blocking(move || {
            recorder.push(&name, EventKind::Started);
            std::thread::sleep(work);
            recorder.push(&name, EventKind::Finished);
            Ok(())
        })
    }

    fn build(&self, name: &str, work: Duration, failure: Option<String>) -> Task {
        let recorder = self.clone();
        let name = name.to_string();
        Task::from_async(move || {
            let recorder = recorder.clone();
            let name = name.clone();
            let failure = failure.clone();
            async move {
                recorder.push(&name, EventKind::Started);
                tokio::time::sleep(work).await;
                recorder.push(&name, EventKind::Finished);
                match failure {
                    Some(message) => Err(anyhow!(message)),
                    None => Ok(()),
                }
            }
        })
    }

    fn push(&self, node: &str, kind: EventKind) {
        self.events.lock().unwrap().push(Event {
            node: node.to_string(),
            kind,
            at: Instant::now(),
        });
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Node names in the order they started.
    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == EventKind::Started)
            .map(|e| e.node)
            .collect()
    }

    pub fn times_started(&self, node: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.kind == EventKind::Started && e.node == node)
            .count()
    }

    /// First recorded start of `node`.
    pub fn start_of(&self, node: &str) -> Option<Instant> {
        self.first(node, EventKind::Started)
    }

    /// First recorded finish of `node`.
    pub fn finish_of(&self, node: &str) -> Option<Instant> {
        self.first(node, EventKind::Finished)
    }

    fn first(&self, node: &str, kind: EventKind) -> Option<Instant> {
        self.events()
            .into_iter()
            .find(|e| e.kind == kind && e.node == node)
            .map(|e| e.at)
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

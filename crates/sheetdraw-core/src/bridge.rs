//! Serialization bridge between the engine and the host.
//!
//! Mutations only record events on the engine. Once per tick the bridge
//! drains them and, if anything changed, serializes the whole scene once and
//! hands that same snapshot to every subscriber.

use crate::engine::GraphicsEngine;
use std::collections::VecDeque;

/// Handle returned by [`ChangeBridge::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&str)>;

/// Coalescing change notifier.
#[derive(Default)]
pub struct ChangeBridge {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl std::fmt::Debug for ChangeBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBridge")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ChangeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for scene snapshots.
    pub fn subscribe(&mut self, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Release a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Release every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drain the engine's events and notify once if there were any.
    pub fn flush(&mut self, engine: &mut dyn GraphicsEngine) -> Option<String> {
        let events = engine.take_events();
        if events.is_empty() {
            return None;
        }

        let json = match engine.to_document().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize scene: {}", e);
                return None;
            }
        };

        log::debug!(
            "Scene changed ({} events), notifying {} listeners",
            events.len(),
            self.listeners.len()
        );
        for (_, listener) in &mut self.listeners {
            listener(&json);
        }
        Some(json)
    }
}

/// Work postponed to the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Load a scene document into the engine without emitting changes.
    Load(String),
}

#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<Deferred>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Deferred) {
        self.tasks.push_back(task);
    }

    /// Take every queued task, oldest first.
    pub fn drain(&mut self) -> Vec<Deferred> {
        self.tasks.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

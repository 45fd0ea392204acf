//! Selection state with synchronous subscriber notification
//!
//! Every setter updates its field and then calls each subscriber with the
//! store. There is no batching: N mutations produce N notifications.

use crate::snapshot::SelectionSnapshot;
use std::collections::BTreeMap;
use tracing::debug;

/// Handle returned by [`SelectionStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn Fn(&SelectionStore<T>)>;

/// Observer list keyed by subscription id, notified in registration order
struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, callback: Subscriber<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }
}

/// Project level, tick map and the uploaded template.
///
/// `T` is the handle type of the uploaded template file; the browser client
/// uses `web_sys::File`.
pub struct SelectionStore<T> {
    project_level: String,
    ticks: BTreeMap<String, bool>,
    template: Option<T>,
    subscribers: Subscribers<T>,
}

impl<T> Default for SelectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionStore<T> {
    pub fn new() -> Self {
        Self {
            project_level: String::new(),
            ticks: BTreeMap::new(),
            template: None,
            subscribers: Subscribers::new(),
        }
    }

    /// Register a callback; it runs after every mutation
    pub fn subscribe(&mut self, callback: impl Fn(&SelectionStore<T>) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.entries.len()
    }

    /// Set the project level. An empty string restores the placeholder.
    pub fn set_project_level(&mut self, value: impl Into<String>) {
        self.project_level = value.into();
        debug!(project_level = %self.project_level, "project level changed");
        self.emit();
    }

    /// Set one tick. Ids are not validated.
    pub fn set_tick(&mut self, id: impl Into<String>, value: bool) {
        let id = id.into();
        debug!(tick = %id, value, "tick changed");
        self.ticks.insert(id, value);
        self.emit();
    }

    /// Apply server-provided tick values, one notification per tick
    pub fn apply_ticks(&mut self, ticks: &BTreeMap<String, bool>) {
        for (id, value) in ticks {
            self.set_tick(id.clone(), *value);
        }
    }

    pub fn set_template(&mut self, file: Option<T>) {
        self.template = file;
        self.emit();
    }

    pub fn template(&self) -> Option<&T> {
        self.template.as_ref()
    }

    pub fn project_level(&self) -> &str {
        &self.project_level
    }

    /// Current tick value, absent ids read false
    pub fn tick(&self, id: &str) -> bool {
        self.ticks.get(id).copied().unwrap_or(false)
    }

    /// Detached copy of the current selections
    pub fn snapshot(&self) -> SelectionSnapshot {
        let project_level = if self.project_level.is_empty() {
            None
        } else {
            Some(self.project_level.clone())
        };
        SelectionSnapshot::new(project_level, self.ticks.clone())
    }

    fn emit(&self) {
        for (_, callback) in &self.subscribers.entries {
            callback(self);
        }
    }
}

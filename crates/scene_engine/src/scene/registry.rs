//! Name-keyed participant registry with stable insertion order

use std::collections::HashMap;
use std::rc::Rc;

use super::object::ObjectId;
use super::participant::SharedParticipant;

/// Where a registered participant is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Drawable but not ready; waiting to be inserted into the scene
    Parked,
    /// Inserted and started; receives messages and frame callbacks
    Started,
}

pub(crate) struct Entry {
    pub name: String,
    pub participant: SharedParticipant,
    pub lifecycle: Lifecycle,
    /// Objects handed to the render pipeline on insertion
    pub inserted: Vec<ObjectId>,
}

/// Participants in registration order
///
/// Re-registering a name replaces the entry in place, so it keeps its
/// original position in iteration order.
#[derive(Default)]
pub(crate) struct ParticipantRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ParticipantRegistry {
    /// Insert or overwrite; returns the entry that was replaced
    pub fn insert(&mut self, name: &str, participant: SharedParticipant, lifecycle: Lifecycle) -> Option<Entry> {
        let entry = Entry {
            name: name.to_owned(),
            participant,
            lifecycle,
            inserted: Vec::new(),
        };

        match self.index.get(name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], entry)),
            None => {
                self.index.insert(name.to_owned(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.index.get(name).map(|&slot| &mut self.entries[slot])
    }

    pub fn participant(&self, name: &str) -> Option<SharedParticipant> {
        self.get(name).map(|entry| Rc::clone(&entry.participant))
    }

    pub fn lifecycle(&self, name: &str) -> Option<Lifecycle> {
        self.get(name).map(|entry| entry.lifecycle)
    }

    pub fn set_lifecycle(&mut self, name: &str, lifecycle: Lifecycle) {
        if let Some(entry) = self.get_mut(name) {
            entry.lifecycle = lifecycle;
        }
    }

    /// Names and handles in registration order, optionally filtered by lifecycle
    pub fn snapshot(&self, lifecycle: Option<Lifecycle>) -> Vec<(String, SharedParticipant)> {
        self.entries
            .iter()
            .filter(|entry| lifecycle.map_or(true, |wanted| entry.lifecycle == wanted))
            .map(|entry| (entry.name.clone(), Rc::clone(&entry.participant)))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

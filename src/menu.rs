//! Open/close coordination for dropdown menus.
//!
//! Every toggle-style control (theme, color, music, petals) registers its
//! menu id here. Opening a menu exclusively closes all the others. Each state
//! change is broadcast as the full open set, so a listener can always
//! reconcile its own visibility from the latest broadcast alone.

use fnv::FnvHashMap;
use std::collections::BTreeSet;

pub type OpenSet = BTreeSet<String>;

/// Callbacks a mounted menu component hands to the registry.
pub struct MenuListener {
    on_close: Box<dyn FnMut()>,
    on_update: Box<dyn FnMut(&OpenSet)>,
}

impl MenuListener {
    pub fn new(on_close: impl FnMut() + 'static, on_update: impl FnMut(&OpenSet) + 'static) -> Self {
        Self {
            on_close: Box::new(on_close),
            on_update: Box::new(on_update),
        }
    }

    /// A listener that only cares about being told to close.
    pub fn on_close(on_close: impl FnMut() + 'static) -> Self {
        Self::new(on_close, |_| {})
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exclusivity {
    Exclusive,
    Shared,
}

#[derive(Default)]
pub struct MenuRegistry {
    open: OpenSet,
    listeners: FnvHashMap<String, MenuListener>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener for `id`, replacing any previous one.
    pub fn register(&mut self, id: &str, listener: MenuListener) {
        if self.listeners.insert(id.to_string(), listener).is_some() {
            log::debug!("[menu] listener for {} replaced", id);
        }
    }

    /// Detach `id`. A menu that is still open is released first so it never
    /// lingers in the open set after its component is gone.
    pub fn unregister(&mut self, id: &str) {
        self.listeners.remove(id);
        if self.open.remove(id) {
            self.broadcast();
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.listeners.contains_key(id)
    }

    pub fn open(&mut self, id: &str, exclusivity: Exclusivity) {
        if exclusivity == Exclusivity::Exclusive {
            let others: Vec<String> = self.open.iter().filter(|o| *o != id).cloned().collect();
            for other in &others {
                self.open.remove(other);
            }
            // Registered-but-closed menus are told too; they may be mid-animation.
            let mut ids: Vec<&String> = self.listeners.keys().filter(|k| *k != id).collect();
            ids.sort();
            let ids: Vec<String> = ids.into_iter().cloned().collect();
            for other in ids {
                if let Some(l) = self.listeners.get_mut(&other) {
                    (l.on_close)();
                }
            }
            if !others.is_empty() {
                log::debug!("[menu] {} closed {:?}", id, others);
            }
        }
        self.open.insert(id.to_string());
        self.broadcast();
    }

    pub fn close(&mut self, id: &str) {
        if self.open.remove(id) {
            if let Some(l) = self.listeners.get_mut(id) {
                (l.on_close)();
            }
        }
        self.broadcast();
    }

    /// Open if closed, close if open. Returns the new open state of `id`.
    pub fn toggle(&mut self, id: &str, exclusivity: Exclusivity) -> bool {
        if self.is_open(id) {
            self.close(id);
            false
        } else {
            self.open(id, exclusivity);
            true
        }
    }

    pub fn close_all(&mut self) {
        let ids: Vec<String> = std::mem::take(&mut self.open).into_iter().collect();
        for id in &ids {
            if let Some(l) = self.listeners.get_mut(id) {
                (l.on_close)();
            }
        }
        self.broadcast();
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    pub fn open_menus(&self) -> &OpenSet {
        &self.open
    }

    fn broadcast(&mut self) {
        let snapshot = self.open.clone();
        for l in self.listeners.values_mut() {
            (l.on_update)(&snapshot);
        }
    }
}

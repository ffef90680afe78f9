//! Keyboard listener registration.
//!
//! A widget that listens to global keys holds a [`Registration`] for as long
//! as it is mounted. Dropping the registration (or unmounting) removes the
//! listener, so nothing keeps routing keys to a widget that is gone.

use crate::search::state::SearchKey;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: Vec<(ListenerId, &'static str)>,
}

/// Set of currently registered global key listeners
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &'static str) -> Registration {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.live.push((id, name));
        Registration {
            id,
            registry: self.clone(),
        }
    }

    fn deregister(&self, id: ListenerId) {
        self.inner.lock().live.retain(|(live, _)| *live != id);
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.inner.lock().live.iter().any(|(live, _)| *live == id)
    }

    /// Names of the live listeners, in registration order
    pub fn listeners(&self) -> Vec<&'static str> {
        self.inner.lock().live.iter().map(|(_, name)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live listener; deregisters on drop
#[derive(Debug)]
pub struct Registration {
    id: ListenerId,
    registry: KeyRegistry,
}

impl Registration {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}

/// Owned by the search widget: its mount state plus key translation
#[derive(Debug, Default)]
pub struct InputController {
    registration: Option<Registration>,
}

impl InputController {
    pub fn mount(&mut self, registry: &KeyRegistry) {
        if self.registration.is_none() {
            self.registration = Some(registry.register("search"));
        }
    }

    pub fn unmount(&mut self) {
        self.registration = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|r| r.registry.is_registered(r.id))
    }

    /// Map a terminal key press to a widget key, if it is one
    pub fn translate(&self, key: &KeyEvent) -> Option<SearchKey> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S')
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(SearchKey::Open)
            }
            KeyCode::Esc => Some(SearchKey::Escape),
            KeyCode::Up => Some(SearchKey::ArrowUp),
            KeyCode::Down => Some(SearchKey::ArrowDown),
            KeyCode::Enter => Some(SearchKey::Enter),
            _ => None,
        }
    }
}

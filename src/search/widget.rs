//! The search widget: state machine + text input + delayed navigation.

use crate::api::ResultItem;
use crate::error::Result;
use crate::route::Route;
use crate::search::input::{InputController, KeyRegistry};
use crate::search::state::{Focus, SearchKey, SearchRequest, SearchState, Transition};
use crate::tui::search::TextInput;
use crossterm::event::KeyEvent;
use std::time::{Duration, Instant};

/// A committed selection waiting for its collapse delay to pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub route: Route,
    pub due: Instant,
}

/// What handling one key produced
#[derive(Debug, Default)]
pub struct KeyOutcome {
    /// The widget used the key; nobody else should see it
    pub consumed: bool,
    /// A search to send
    pub request: Option<SearchRequest>,
    pub transition: Option<Transition>,
}

impl KeyOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed(transition: Transition) -> Self {
        Self {
            consumed: true,
            request: None,
            transition: Some(transition),
        }
    }
}

pub struct SearchWidget {
    state: SearchState,
    input: TextInput,
    controller: InputController,
    navigation_delay: Duration,
    pending: Option<PendingNavigation>,
}

impl SearchWidget {
    pub fn new(limit: Option<usize>, navigation_delay: Duration) -> Self {
        Self {
            state: SearchState::new(limit),
            input: TextInput::default(),
            controller: InputController::default(),
            navigation_delay,
            pending: None,
        }
    }

    pub fn mount(&mut self, registry: &KeyRegistry) {
        self.controller.mount(registry);
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
        self.pending = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.is_mounted()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// Input focus follows the active flag
    pub fn has_focus(&self) -> bool {
        self.state.is_active()
    }

    pub fn navigation_delay(&self) -> Duration {
        self.navigation_delay
    }

    pub fn pending_navigation(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    /// Open or close from an outside trigger (e.g. a toolbar button)
    pub fn toggle(&mut self) {
        self.state.toggle();
    }

    /// Replace the whole input text, as if pasted
    pub fn set_text(&mut self, text: &str) -> Option<SearchRequest> {
        self.input.set(text);
        self.state.set_query(text)
    }

    /// Route a key press through the widget.
    ///
    /// `focus` describes where focus sat before this key; the caller derives
    /// it from [`has_focus`](Self::has_focus) and its own inputs.
    pub fn handle_key(&mut self, key: &KeyEvent, focus: Focus, now: Instant) -> KeyOutcome {
        if !self.is_mounted() {
            return KeyOutcome::ignored();
        }

        let widget_key = self.controller.translate(key);

        if focus != Focus::SearchInput {
            return match widget_key {
                Some(k @ SearchKey::Open) => match self.state.handle_key(k, focus) {
                    Transition::Ignored => KeyOutcome::ignored(),
                    t => KeyOutcome::consumed(t),
                },
                _ => KeyOutcome::ignored(),
            };
        }

        match widget_key {
            Some(SearchKey::Open) | None => {
                if !TextInput::is_editing_key(key) {
                    return KeyOutcome::ignored();
                }
                let request = if self.input.handle_key(key) {
                    self.state.set_query(&self.input.value)
                } else {
                    None
                };
                KeyOutcome {
                    consumed: true,
                    request,
                    transition: None,
                }
            }
            Some(k) => {
                let transition = self.state.handle_key(k, focus);
                if let Transition::Selected(item) = &transition {
                    self.commit(item, now);
                }
                KeyOutcome::consumed(transition)
            }
        }
    }

    fn commit(&mut self, item: &ResultItem, now: Instant) {
        self.input.set(&item.name);
        self.pending = Some(PendingNavigation {
            route: Route::profile(item.id.clone()),
            due: now + self.navigation_delay,
        });
    }

    /// Hand a search response to the state machine
    pub fn apply_response(&mut self, seq: u64, outcome: Result<Vec<ResultItem>>) -> bool {
        self.state.apply_response(seq, outcome)
    }

    /// Yield the pending route once its delay has elapsed
    pub fn poll_navigation(&mut self, now: Instant) -> Option<Route> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.route),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mounted(registry: &KeyRegistry) -> SearchWidget {
        let mut widget = SearchWidget::new(Some(10), Duration::from_millis(500));
        widget.mount(registry);
        widget
    }

    fn focus_of(widget: &SearchWidget) -> Focus {
        if widget.has_focus() {
            Focus::SearchInput
        } else {
            Focus::Elsewhere
        }
    }

    #[test]
    fn unmounted_widget_ignores_keys() {
        let mut widget = SearchWidget::new(None, Duration::ZERO);
        let outcome = widget.handle_key(&key(KeyCode::Char('s')), Focus::Elsewhere, Instant::now());
        assert!(!outcome.consumed);
        assert!(!widget.has_focus());
    }

    #[test]
    fn s_opens_then_types() {
        let registry = KeyRegistry::new();
        let mut widget = mounted(&registry);
        let now = Instant::now();

        let opened = widget.handle_key(&key(KeyCode::Char('s')), focus_of(&widget), now);
        assert_eq!(opened.transition, Some(Transition::Opened));
        assert!(opened.request.is_none());
        assert!(widget.has_focus());

        let typed = widget.handle_key(&key(KeyCode::Char('s')), focus_of(&widget), now);
        assert!(typed.consumed);
        assert_eq!(typed.request.map(|r| r.query), Some("s".to_string()));
        assert_eq!(widget.input().value, "s");
    }

    #[test]
    fn s_in_another_input_is_not_consumed() {
        let registry = KeyRegistry::new();
        let mut widget = mounted(&registry);
        let outcome =
            widget.handle_key(&key(KeyCode::Char('S')), Focus::OtherTextInput, Instant::now());
        assert!(!outcome.consumed);
        assert!(!widget.has_focus());
    }

    #[test]
    fn erasing_to_empty_clears_without_request() {
        let registry = KeyRegistry::new();
        let mut widget = mounted(&registry);
        let now = Instant::now();
        widget.handle_key(&key(KeyCode::Char('s')), Focus::Elsewhere, now);
        widget.handle_key(&key(KeyCode::Char('K')), Focus::SearchInput, now);

        let outcome = widget.handle_key(&key(KeyCode::Backspace), Focus::SearchInput, now);
        assert!(outcome.consumed);
        assert!(outcome.request.is_none());
        assert!(widget.state().results().is_empty());
        assert!(widget.has_focus());
    }

    #[test]
    fn enter_schedules_navigation_after_delay() {
        let registry = KeyRegistry::new();
        let mut widget = mounted(&registry);
        let t0 = Instant::now();

        let req = widget.set_text("Keta").unwrap();
        widget.apply_response(
            req.seq,
            Ok(vec![
                ResultItem::new("GH0101", "Keta"),
                ResultItem::new("GH0102", "Ketu South"),
            ]),
        );
        widget.handle_key(&key(KeyCode::Down), Focus::SearchInput, t0);
        widget.handle_key(&key(KeyCode::Down), Focus::SearchInput, t0);
        let outcome = widget.handle_key(&key(KeyCode::Enter), Focus::SearchInput, t0);

        assert!(matches!(outcome.transition, Some(Transition::Selected(_))));
        assert!(!widget.has_focus());
        assert_eq!(widget.input().value, "Ketu South");

        assert_eq!(widget.poll_navigation(t0 + Duration::from_millis(499)), None);
        assert_eq!(
            widget.poll_navigation(t0 + Duration::from_millis(500)),
            Some(Route::profile("GH0102"))
        );
        assert_eq!(widget.poll_navigation(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn unmount_cancels_pending_navigation() {
        let registry = KeyRegistry::new();
        let mut widget = mounted(&registry);
        let t0 = Instant::now();
        let req = widget.set_text("Keta").unwrap();
        widget.apply_response(req.seq, Ok(vec![ResultItem::new("GH0101", "Keta")]));
        widget.handle_key(&key(KeyCode::Down), Focus::SearchInput, t0);
        widget.handle_key(&key(KeyCode::Enter), Focus::SearchInput, t0);
        assert!(widget.pending_navigation().is_some());

        widget.unmount();
        assert!(registry.is_empty());
        assert_eq!(widget.poll_navigation(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn late_response_after_selection_keeps_widget_closed() {
        let registry = KeyRegistry::new();
        let mut widget = mounted(&registry);
        let t0 = Instant::now();
        let req = widget.set_text("Keta").unwrap();
        widget.apply_response(req.seq, Ok(vec![ResultItem::new("GH0101", "Keta")]));
        widget.handle_key(&key(KeyCode::Down), Focus::SearchInput, t0);
        widget.handle_key(&key(KeyCode::Enter), Focus::SearchInput, t0);
        assert!(!widget.has_focus());

        let late = vec![ResultItem::new("GH0102", "Ketu South")];
        assert!(!widget.apply_response(req.seq, Ok(late)));
        assert!(!widget.has_focus());
        assert_eq!(widget.input().value, "Keta");
        assert_eq!(
            widget.poll_navigation(t0 + Duration::from_millis(500)),
            Some(Route::profile("GH0101"))
        );
    }
}

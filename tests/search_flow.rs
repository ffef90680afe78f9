//! End-to-end search behavior: widget, background workers and the channel.

use crossbeam_channel::unbounded;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use geoprofile::api::{JoinQuery, ProfileApi, Record, ResultItem};
use geoprofile::search::{spawn_search, Focus, KeyRegistry, SearchResponse, SearchStatus, SearchWidget};
use geoprofile::{ProfileError, Result, Route};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Answers by query text; the one-letter query is deliberately slow
struct FakeSearchApi;

impl ProfileApi for FakeSearchApi {
    fn search(&self, query: &str) -> Result<Vec<ResultItem>> {
        match query {
            "K" => {
                thread::sleep(Duration::from_millis(150));
                Ok(vec![ResultItem::new("KE", "Kenya")])
            }
            "Ke" | "Ket" | "Keta" => Ok(vec![
                ResultItem::new("GH0101", "Keta"),
                ResultItem::new("GH0102", "Ketu South"),
            ]),
            "boom" => Err(ProfileError::Status {
                url: "http://localhost/api/attrs/search/?q=boom".to_string(),
                status: 500,
            }),
            _ => Ok(Vec::new()),
        }
    }

    fn attrs(&self, _kind: &str) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    fn join(&self, _query: &JoinQuery) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn focus_of(widget: &SearchWidget) -> Focus {
    if widget.has_focus() {
        Focus::SearchInput
    } else {
        Focus::Elsewhere
    }
}

struct Harness {
    api: Arc<dyn ProfileApi>,
    widget: SearchWidget,
    tx: crossbeam_channel::Sender<SearchResponse>,
    rx: crossbeam_channel::Receiver<SearchResponse>,
    _registry: KeyRegistry,
}

impl Harness {
    fn new() -> Self {
        let registry = KeyRegistry::new();
        let mut widget = SearchWidget::new(Some(10), Duration::from_millis(500));
        widget.mount(&registry);
        let (tx, rx) = unbounded();
        Self {
            api: Arc::new(FakeSearchApi),
            widget,
            tx,
            rx,
            _registry: registry,
        }
    }

    /// Press a key and send whatever request it produced; returns the spawned count
    fn press(&mut self, code: KeyCode, now: Instant) -> usize {
        let focus = focus_of(&self.widget);
        let outcome = self.widget.handle_key(&key(code), focus, now);
        match outcome.request {
            Some(request) => {
                spawn_search(Arc::clone(&self.api), request, self.tx.clone());
                1
            }
            None => 0,
        }
    }

    /// Apply `count` responses in arrival order; returns how many were applied
    fn drain(&mut self, count: usize) -> usize {
        (0..count)
            .filter_map(|_| self.rx.recv_timeout(Duration::from_secs(5)).ok())
            .map(|response| self.widget.apply_response(response.seq, response.outcome))
            .filter(|applied| *applied)
            .count()
    }
}

#[test]
fn slow_stale_response_never_overwrites_newer_results() {
    let mut h = Harness::new();
    let now = Instant::now();

    h.press(KeyCode::Char('s'), now);
    assert!(h.widget.has_focus());

    let mut spawned = h.press(KeyCode::Char('K'), now);
    spawned += h.press(KeyCode::Char('e'), now);
    assert_eq!(spawned, 2);

    // "Ke" lands first, the slow "K" answer arrives later and is discarded
    assert_eq!(h.drain(spawned), 1);

    let names: Vec<&str> = h.widget.state().results().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Keta", "Ketu South"]);
    assert_eq!(h.widget.state().status(), &SearchStatus::Ready);
}

#[test]
fn ketu_south_is_chosen_with_arrows_and_enter() {
    let mut h = Harness::new();
    let t0 = Instant::now();

    h.press(KeyCode::Char('s'), t0);
    let spawned: usize = "Keta".chars().map(|c| h.press(KeyCode::Char(c), t0)).sum();
    h.drain(spawned);
    assert_eq!(h.widget.input().value, "Keta");

    h.press(KeyCode::Down, t0);
    assert_eq!(h.widget.state().highlighted(), Some(0));
    h.press(KeyCode::Down, t0);
    h.press(KeyCode::Down, t0);
    assert_eq!(h.widget.state().highlighted(), Some(1));

    h.press(KeyCode::Enter, t0);
    assert!(!h.widget.has_focus());
    assert_eq!(h.widget.input().value, "Ketu South");
    assert_eq!(h.widget.state().highlighted(), None);

    assert_eq!(h.widget.poll_navigation(t0 + Duration::from_millis(499)), None);
    assert_eq!(
        h.widget.poll_navigation(t0 + Duration::from_millis(500)),
        Some(Route::profile("GH0102"))
    );
    assert_eq!(h.widget.poll_navigation(t0 + Duration::from_secs(1)), None);
}

#[test]
fn failed_search_is_reported_inline() {
    let mut h = Harness::new();
    let now = Instant::now();
    h.press(KeyCode::Char('s'), now);
    let spawned: usize = "boom"
        .chars()
        .map(|c| h.press(KeyCode::Char(c), now))
        .sum();
    assert_eq!(h.drain(spawned), 1);

    match h.widget.state().status() {
        SearchStatus::Failed(message) => assert!(message.contains("HTTP 500"), "{}", message),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(h.widget.state().results().is_empty());
}

#[test]
fn empty_results_are_not_a_failure() {
    let mut h = Harness::new();
    let now = Instant::now();
    h.press(KeyCode::Char('s'), now);
    let spawned = h.press(KeyCode::Char('z'), now);
    h.drain(spawned);
    assert_eq!(h.widget.state().status(), &SearchStatus::NoResults);
}

#[test]
fn other_inputs_keep_the_s_key() {
    let mut h = Harness::new();
    let outcome = h
        .widget
        .handle_key(&key(KeyCode::Char('s')), Focus::OtherTextInput, Instant::now());
    assert!(!outcome.consumed);
    assert!(!h.widget.has_focus());
}

#[test]
fn unmounted_widget_ignores_keys() {
    let mut h = Harness::new();
    h.widget.unmount();
    let outcome = h
        .widget
        .handle_key(&key(KeyCode::Char('s')), Focus::Elsewhere, Instant::now());
    assert!(!outcome.consumed);
    assert!(!h.widget.has_focus());
}

//! Search interaction state machine.
//!
//! Two visible states: inactive (input blurred, results hidden) and active
//! (input focused, results shown, zero or one highlighted result). The
//! highlight is part of the state rather than something recovered from the
//! rendered view, and every issued request carries a sequence number so only
//! the newest response can land.

use crate::api::ResultItem;
use crate::error::Result;
use crate::text::normalize_query;

/// Keys the widget reacts to while the input controller is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// `S`: open the widget
    Open,
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
}

/// Where keyboard focus currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Not inside any text input
    Elsewhere,
    /// Inside this widget's input
    SearchInput,
    /// Inside some other text input on the page
    OtherTextInput,
}

/// What the last search produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Nothing searched yet, or the query is empty
    Idle,
    /// A request is in flight
    Pending,
    /// Results are available
    Ready,
    /// The request succeeded but matched nothing
    NoResults,
    /// The request failed; the message is shown inline
    Failed(String),
}

/// A search the caller must send to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    /// Normalized query text
    pub query: String,
}

/// Result of feeding a key to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The key does not apply in the current state
    Ignored,
    Opened,
    Closed,
    /// Highlight moved to this index
    Highlighted(usize),
    /// The highlighted result was committed; the widget is now inactive
    Selected(ResultItem),
}

#[derive(Debug, Clone)]
pub struct SearchState {
    active: bool,
    query: String,
    results: Vec<ResultItem>,
    highlighted: Option<usize>,
    status: SearchStatus,
    issued_seq: u64,
    limit: Option<usize>,
}

impl SearchState {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            active: false,
            query: String::new(),
            results: Vec::new(),
            highlighted: None,
            status: SearchStatus::Idle,
            issued_seq: 0,
            limit,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&ResultItem> {
        self.highlighted.and_then(|i| self.results.get(i))
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Sequence number of the most recently issued request
    pub fn issued_seq(&self) -> u64 {
        self.issued_seq
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The input text changed.
    ///
    /// An empty query activates the widget with no results and no request.
    /// Anything else issues exactly one request. Either way the sequence
    /// number moves on, so responses to earlier text are discarded.
    pub fn set_query(&mut self, text: &str) -> Option<SearchRequest> {
        self.query = text.to_string();
        self.issued_seq += 1;
        self.active = true;

        if text.is_empty() {
            self.results.clear();
            self.highlighted = None;
            self.status = SearchStatus::Idle;
            return None;
        }

        self.status = SearchStatus::Pending;
        Some(SearchRequest {
            seq: self.issued_seq,
            query: normalize_query(text),
        })
    }

    /// Apply a response; returns `false` if it answered a superseded request.
    pub fn apply_response(&mut self, seq: u64, outcome: Result<Vec<ResultItem>>) -> bool {
        if seq != self.issued_seq {
            return false;
        }

        self.highlighted = None;
        match outcome {
            Ok(mut results) => {
                if let Some(limit) = self.limit {
                    results.truncate(limit);
                }
                self.status = if results.is_empty() {
                    SearchStatus::NoResults
                } else {
                    SearchStatus::Ready
                };
                self.results = results;
            }
            Err(e) => {
                self.results.clear();
                self.status = SearchStatus::Failed(e.inline_message());
            }
        }
        self.active = true;
        true
    }

    /// Flip between active and inactive. Never triggers a fetch.
    pub fn toggle(&mut self) {
        if self.active {
            self.close();
        } else {
            self.active = true;
        }
    }

    fn close(&mut self) {
        self.active = false;
        self.highlighted = None;
    }

    /// Feed a global key press given the current focus target
    pub fn handle_key(&mut self, key: SearchKey, focus: Focus) -> Transition {
        match key {
            SearchKey::Open => {
                if !self.active && focus == Focus::Elsewhere {
                    self.active = true;
                    Transition::Opened
                } else {
                    Transition::Ignored
                }
            }
            _ if !self.active || focus != Focus::SearchInput => Transition::Ignored,
            SearchKey::Escape => {
                self.close();
                Transition::Closed
            }
            SearchKey::ArrowDown => match self.highlighted {
                None if !self.results.is_empty() => self.highlight(0),
                Some(i) if i + 1 < self.results.len() => self.highlight(i + 1),
                _ => Transition::Ignored,
            },
            SearchKey::ArrowUp => match self.highlighted {
                Some(i) if i > 0 => self.highlight(i - 1),
                _ => Transition::Ignored,
            },
            SearchKey::Enter => match self.highlighted_item().cloned() {
                Some(item) => {
                    // The input now shows the committed name; answers to the
                    // typed text no longer apply.
                    self.query = item.name.clone();
                    self.issued_seq += 1;
                    self.close();
                    Transition::Selected(item)
                }
                None => Transition::Ignored,
            },
        }
    }

    fn highlight(&mut self, index: usize) -> Transition {
        self.highlighted = Some(index);
        Transition::Highlighted(index)
    }
}

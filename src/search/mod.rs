//! Location search: the interaction state machine, the widget that wraps it,
//! key listener registration and background requests.

pub mod input;
pub mod state;
pub mod widget;
pub mod worker;

pub use input::{InputController, KeyRegistry, Registration};
pub use state::{Focus, SearchKey, SearchRequest, SearchState, SearchStatus, Transition};
pub use widget::{KeyOutcome, PendingNavigation, SearchWidget};
pub use worker::{search_blocking, spawn_search, SearchResponse};

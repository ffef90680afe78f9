//! GeoProfile - terminal profile browser for geographic statistics
//!
//! Search for a country or region, then page through chart sections
//! (agriculture, climate, health, poverty) drawn from a statistics API.
//!
//! # Features
//!
//! - **Location search**: keyboard-driven search widget with stale-response protection
//! - **Profile pages**: topic registry, header map config and per-section chart configs
//! - **Independent sections**: each section's data is fetched in parallel and fails alone
//! - **Terminal UI**: ratatui front end; the same library backs a scriptable CLI
//!
//! # Example
//!
//! ```no_run
//! use geoprofile::{AppConfig, HttpApi, ProfilePage, Store};
//!
//! fn main() -> geoprofile::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let api = HttpApi::from_config(&config)?;
//!
//!     let mut store = Store::new(config.focus.clone());
//!     store.fetch_vars(&api, &config.attr_kinds)?;
//!
//!     let page = ProfilePage::load(&api, &store, "040AF00079")?;
//!     for topic in &page.topics {
//!         println!("{}: {} sections", topic.title, topic.sections.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod profile;
pub mod route;
pub mod search;
pub mod store;
pub mod text;
pub mod tui;

// Re-export main types
pub use api::{DataNeed, HttpApi, JoinQuery, ProfileApi, Record, ResultItem};
pub use config::AppConfig;
pub use error::{ProfileError, Result};
pub use profile::{ChartConfig, ProfilePage, SectionOutcome, SectionView, Topic, TopicView};
pub use route::Route;
pub use search::{SearchState, SearchStatus, SearchWidget};
pub use store::{Attrs, Store};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Interactive terminal profile browser.

pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

pub use app::{App, BgMessage};

use crate::api::{HttpApi, ProfileApi};
use crate::config::AppConfig;
use crate::error::Result;
use crate::logging;
use crate::route::Route;
use crate::store::Store;
use std::sync::Arc;

/// Load attrs, take over the terminal and run until the user quits.
///
/// `start` opens a profile immediately instead of the empty home screen.
pub fn run(config: &AppConfig, start: Option<Route>) -> Result<()> {
    let api: Arc<dyn ProfileApi> = Arc::new(HttpApi::from_config(config)?);

    let mut store = Store::new(config.focus.clone());
    store.fetch_vars(api.as_ref(), &config.attr_kinds)?;

    let mut app = App::new(api, store, config);
    if let Some(route) = start {
        app.navigate(route);
    }

    logging::info("TUI", "Entering terminal UI");
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    logging::info("TUI", "Terminal restored");
    result
}

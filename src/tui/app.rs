use crate::api::ProfileApi;
use crate::config::AppConfig;
use crate::error::Result;
use crate::logging;
use crate::profile::{ChartConfig, ProfilePage, SectionView, TopicView};
use crate::route::Route;
use crate::search::{spawn_search, Focus, KeyRegistry, SearchResponse, SearchWidget};
use crate::store::Store;
use crate::tui::search::{matches_pattern, TextInput};
use crate::tui::table::ScrollState;
use crate::tui::ui;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Messages from background threads
pub enum BgMessage {
    Search(SearchResponse),
    ProfileLoaded {
        seq: u64,
        id: String,
        result: Result<ProfilePage>,
    },
}

impl From<SearchResponse> for BgMessage {
    fn from(response: SearchResponse) -> Self {
        BgMessage::Search(response)
    }
}

pub struct App {
    api: Arc<dyn ProfileApi>,
    store: Store,

    // Sub-states
    pub search: SearchWidget,
    pub filter: TextInput,
    pub filter_focused: bool,
    pub scroll: ScrollState,
    registry: KeyRegistry,

    // Current page
    pub route: Route,
    pub page: Option<ProfilePage>,
    pub loading: Option<String>,
    load_seq: u64,
    pub topic: usize,
    /// Years back from the latest for time-driven charts
    pub year_back: usize,

    pub status_message: String,

    // Channel
    bg_receiver: Receiver<BgMessage>,
    bg_sender: Sender<BgMessage>,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn ProfileApi>, store: Store, config: &AppConfig) -> Self {
        let (tx, rx) = unbounded();
        let registry = KeyRegistry::new();
        let mut search = SearchWidget::new(config.search_limit, config.navigation_delay);
        search.mount(&registry);

        Self {
            api,
            store,
            search,
            filter: TextInput::default(),
            filter_focused: false,
            scroll: ScrollState::default(),
            registry,
            route: Route::Home,
            page: None,
            loading: None,
            load_seq: 0,
            topic: 0,
            year_back: 0,
            status_message: "Press s to search".to_string(),
            bg_receiver: rx,
            bg_sender: tx,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                self.search.unmount();
                logging::info("TUI", &format!("Quit with {} key listeners", self.registry.len()));
                return Ok(());
            }
        }
    }

    /// Drain background messages and fire any due navigation
    pub fn tick(&mut self, now: Instant) {
        self.process_messages();
        if let Some(route) = self.search.poll_navigation(now) {
            self.navigate(route);
        }
    }

    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.bg_receiver.try_recv() {
            self.apply_message(msg);
        }
    }

    fn apply_message(&mut self, msg: BgMessage) {
        match msg {
            BgMessage::Search(response) => {
                let count = response.outcome.as_ref().map_or(0, Vec::len);
                let applied = self.search.apply_response(response.seq, response.outcome);
                logging::log_search_response(
                    response.seq,
                    self.search.state().issued_seq(),
                    count,
                    applied,
                );
            }
            BgMessage::ProfileLoaded { seq, id, result } => {
                if seq != self.load_seq {
                    logging::debug("TUI", &format!("Ignoring superseded load of {}", id));
                    return;
                }
                self.loading = None;
                match result {
                    Ok(page) => {
                        self.status_message =
                            format!("{} loaded in {} ms", page.header.title, page.elapsed.as_millis());
                        self.page = Some(page);
                        self.topic = 0;
                        self.year_back = 0;
                        self.scroll.reset(self.visible_sections().len());
                    }
                    Err(e) => {
                        logging::error("TUI", &format!("Loading {} failed: {}", id, e));
                        self.status_message = e.inline_message();
                    }
                }
            }
        }
    }

    /// Switch the current route, loading the profile in the background
    pub fn navigate(&mut self, route: Route) {
        logging::log_navigation(&route.path());
        self.route = route.clone();

        let Route::Profile(id) = route else {
            self.page = None;
            self.loading = None;
            return;
        };

        self.load_seq += 1;
        self.loading = Some(id.clone());
        self.status_message = format!("Loading {}...", id);

        let seq = self.load_seq;
        let api = Arc::clone(&self.api);
        let store = self.store.clone();
        let tx = self.bg_sender.clone();
        thread::spawn(move || {
            let result = ProfilePage::load(api.as_ref(), &store, &id);
            let _ = tx.send(BgMessage::ProfileLoaded { seq, id, result });
        });
    }

    /// Where keyboard focus sits, as the search widget sees it
    pub fn focus(&self) -> Focus {
        if self.search.has_focus() {
            Focus::SearchInput
        } else if self.filter_focused {
            Focus::OtherTextInput
        } else {
            Focus::Elsewhere
        }
    }

    pub fn current_topic(&self) -> Option<&TopicView> {
        self.page.as_ref()?.topics.get(self.topic)
    }

    /// Sections of the current topic that pass the title filter
    pub fn visible_sections(&self) -> Vec<&SectionView> {
        let Some(topic) = self.current_topic() else {
            return Vec::new();
        };
        topic
            .sections
            .iter()
            .filter(|s| matches_pattern(&s.title, &self.filter.value))
            .collect()
    }

    /// Year shown for a time-driven chart, `None` for charts without one
    pub fn chart_year(&self, chart: &ChartConfig) -> Option<i64> {
        chart.time.as_ref()?;
        let years = chart.years();
        let index = years.len().checked_sub(1 + self.year_back).unwrap_or(0);
        years.get(index).copied()
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let focus = self.focus();
        let outcome = self.search.handle_key(&key, focus, now);
        if let Some(request) = outcome.request {
            spawn_search(Arc::clone(&self.api), request, self.bg_sender.clone());
        }
        // The open overlay owns the keyboard even for keys it has no use for
        if outcome.consumed || focus == Focus::SearchInput {
            return;
        }

        if self.filter_focused {
            self.handle_filter_key(key);
        } else {
            self.handle_page_key(key);
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                self.filter_focused = false;
            }
            _ => {
                if self.filter.handle_key(&key) {
                    let total = self.visible_sections().len();
                    self.scroll.clamp(total);
                }
            }
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        let total = self.visible_sections().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.switch_topic(1),
            KeyCode::BackTab | KeyCode::Left => self.switch_topic(-1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll.select_next(total),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(total),
            KeyCode::Home => self.scroll.select_first(),
            KeyCode::End => self.scroll.select_last(total),
            KeyCode::Char('[') => self.year_back += 1,
            KeyCode::Char(']') => self.year_back = self.year_back.saturating_sub(1),
            KeyCode::Char('/') => self.filter_focused = true,
            KeyCode::Esc if !self.filter.value.is_empty() => {
                self.filter.clear();
                self.scroll.reset(self.visible_sections().len());
            }
            _ => {}
        }
    }

    fn switch_topic(&mut self, step: isize) {
        let count = self.page.as_ref().map_or(0, |p| p.topics.len());
        if count == 0 {
            return;
        }
        self.topic = (self.topic as isize + step).rem_euclid(count as isize) as usize;
        self.scroll.reset(self.visible_sections().len());
    }
}

#[cfg(test)]
impl App {
    /// Block until one background message arrives and apply it
    pub(crate) fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.bg_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.apply_message(msg);
                true
            }
            Err(_) => false,
        }
    }
}

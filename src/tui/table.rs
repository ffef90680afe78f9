/// Selection and scroll position within the section list of one topic
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    /// How many sections fit on screen; updated on every draw
    pub visible_rows: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 2,
        }
    }
}

impl ScrollState {
    pub fn reset(&mut self, total: usize) {
        self.selected = if total == 0 { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let jump = self.visible_rows.max(1);
        let i = match self.selected {
            Some(i) => (i + jump).min(total - 1),
            None => (jump - 1).min(total - 1),
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.max(1);
        let i = match self.selected {
            Some(i) => i.saturating_sub(jump),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self) {
        self.selected = Some(0);
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    /// Keep the selection inside `total` after the list shrank (filtering)
    pub fn clamp(&mut self, total: usize) {
        match self.selected {
            _ if total == 0 => self.reset(0),
            Some(i) if i >= total => {
                self.selected = Some(total - 1);
                self.ensure_visible(total - 1);
            }
            None => self.reset(total),
            Some(_) => {}
        }
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_clamps_and_scrolls() {
        let mut state = ScrollState::default();
        state.visible_rows = 2;
        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.selected, Some(2));
        assert_eq!(state.scroll_offset, 1);

        state.select_prev();
        state.select_prev();
        state.select_prev();
        assert_eq!(state.selected, Some(0));
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn paging_moves_a_screen_at_a_time() {
        let mut state = ScrollState::default();
        state.visible_rows = 2;
        state.reset(5);
        state.page_down(5);
        assert_eq!(state.selected, Some(2));
        state.page_down(5);
        assert_eq!(state.selected, Some(4));
        state.page_up();
        assert_eq!(state.selected, Some(2));
    }

    #[test]
    fn clamp_after_shrinking() {
        let mut state = ScrollState::default();
        state.select_last(5);
        state.clamp(2);
        assert_eq!(state.selected, Some(1));
        state.clamp(0);
        assert_eq!(state.selected, None);
    }
}

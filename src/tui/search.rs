use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text input with a byte-offset cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor_pos: usize,
}

impl TextInput {
    /// Replace the contents and park the cursor at the end
    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_pos = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    /// Cursor position in characters, for placing the terminal cursor
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor_pos].chars().count()
    }

    /// Apply an editing key. Returns `true` if the text changed.
    ///
    /// Keys that are not editing keys are left for the caller.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.value.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
                true
            }
            KeyCode::Backspace => {
                if self.cursor_pos == 0 {
                    return false;
                }
                let prev = self.prev_boundary();
                self.value.remove(prev);
                self.cursor_pos = prev;
                true
            }
            KeyCode::Delete => {
                if self.cursor_pos >= self.value.len() {
                    return false;
                }
                self.value.remove(self.cursor_pos);
                true
            }
            KeyCode::Left => {
                self.cursor_pos = self.prev_boundary();
                false
            }
            KeyCode::Right => {
                if self.cursor_pos < self.value.len() {
                    self.cursor_pos = self.value[self.cursor_pos..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor_pos + i)
                        .unwrap_or(self.value.len());
                }
                false
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                false
            }
            KeyCode::End => {
                self.cursor_pos = self.value.len();
                false
            }
            _ => false,
        }
    }

    /// Whether `key` is one this input consumes (editing or cursor movement)
    pub fn is_editing_key(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(_) => !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT),
            KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => true,
            _ => false,
        }
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Check if a label matches a filter pattern (case-insensitive).
/// Supports `*` wildcards: `*suffix`, `prefix*`, `*text*`, or plain substring.
pub fn matches_pattern(label: &str, pattern: &str) -> bool {
    let pattern = pattern.trim().to_lowercase();
    let name = label.to_lowercase();
    if pattern.is_empty() {
        return true;
    }

    let has_leading_star = pattern.starts_with('*');
    let has_trailing_star = pattern.ends_with('*');

    match (has_leading_star, has_trailing_star) {
        (true, true) if pattern.len() > 2 => name.contains(&pattern[1..pattern.len() - 1]),
        (true, true) => true,
        (true, false) => name.ends_with(&pattern[1..]),
        (false, true) => name.starts_with(&pattern[..pattern.len() - 1]),
        (false, false) => name.contains(&pattern),
    }
}

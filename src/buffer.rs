//! Editable text held by a window.

/// Content store for one window.
///
/// The session manager only reads the full text, replaces it wholesale on
/// load, and reads or clears the modified flag. Everything else (cursor,
/// line edits, clipboard) is driven by the front end directly.
pub trait TextBuffer {
    fn text(&self) -> String;
    fn set_text(&mut self, content: &str);
    fn is_modified(&self) -> bool;
    fn set_modified(&mut self, modified: bool);

    fn cut(&mut self, clipboard: &mut Clipboard);
    fn copy(&self, clipboard: &mut Clipboard);
    fn paste(&mut self, clipboard: &Clipboard);
}

/// Clipboard shared by every window of the process.
#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    contents: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: String) {
        self.contents = Some(text);
    }

    pub fn get(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

/// Line-oriented buffer with a current line.
///
/// Lines are split on `\n` only, so `\r\n` files keep their `\r` and
/// `text()` returns exactly what was loaded. There is always at least one
/// line. The selection is `selection_len` lines starting at the current line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    contents: Vec<String>,
    curr_line: usize,
    selection_len: usize,
    modified: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        LineBuffer {
            contents: vec![String::new()],
            curr_line: 0,
            selection_len: 1,
            modified: false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.contents.len()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.contents.get(row).map(|s| s.as_str())
    }

    pub fn current_line(&self) -> usize {
        self.curr_line
    }

    pub fn current_text(&self) -> &str {
        &self.contents[self.curr_line]
    }

    /// Moves to `line`, clamped to the last line.
    pub fn set_current_line(&mut self, line: usize) {
        self.curr_line = line.min(self.contents.len() - 1);
    }

    /// Sets how many lines cut and copy take, starting at the current line.
    pub fn select_lines(&mut self, count: usize) {
        self.selection_len = count.max(1);
    }

    pub fn replace_current(&mut self, line: String) {
        if self.contents[self.curr_line] != line {
            self.contents[self.curr_line] = line;
            self.modified = true;
        }
    }

    pub fn insert_below(&mut self, line: String) {
        self.curr_line += 1;
        self.contents.insert(self.curr_line, line);
        self.modified = true;
    }

    pub fn insert_above(&mut self, line: String) {
        self.contents.insert(self.curr_line, line);
        self.modified = true;
    }

    pub fn delete_current(&mut self) {
        self.contents.remove(self.curr_line);
        if self.contents.is_empty() {
            self.contents.push(String::new());
        }
        if self.curr_line > 0 {
            self.curr_line -= 1;
        }
        self.modified = true;
    }

    /// Returns `(first, last)` line numbers of `radius` lines of context
    /// around the current line, clamped to the buffer.
    pub fn context(&self, radius: usize) -> (usize, usize) {
        let first = self.curr_line.saturating_sub(radius);
        let last = (self.curr_line + radius).min(self.contents.len() - 1);
        (first, last)
    }

    fn selection_end(&self) -> usize {
        (self.curr_line + self.selection_len).min(self.contents.len())
    }
}

impl TextBuffer for LineBuffer {
    fn text(&self) -> String {
        self.contents.join("\n")
    }

    fn set_text(&mut self, content: &str) {
        self.contents = content.split('\n').map(|s| s.to_owned()).collect();
        self.curr_line = 0;
        self.selection_len = 1;
        self.modified = true;
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    fn cut(&mut self, clipboard: &mut Clipboard) {
        let end = self.selection_end();
        let removed: Vec<String> = self.contents.drain(self.curr_line..end).collect();
        clipboard.set(removed.join("\n"));

        if self.contents.is_empty() {
            self.contents.push(String::new());
        }
        self.set_current_line(self.curr_line);
        self.selection_len = 1;
        self.modified = true;
    }

    fn copy(&self, clipboard: &mut Clipboard) {
        clipboard.set(self.contents[self.curr_line..self.selection_end()].join("\n"));
    }

    fn paste(&mut self, clipboard: &Clipboard) {
        let text = match clipboard.get() {
            Some(t) => t,
            None => return,
        };
        for line in text.split('\n') {
            self.insert_below(line.to_owned());
        }
    }
}

use std::collections::VecDeque;
use std::io::{self, stdin, stdout, Write};
use std::path::PathBuf;

use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;

use crate::error::{EditorError, Result};
use crate::presentation::{CloseChoice, Console, Presentation};

const CLOSE_QUESTION: &str = "[c] Close without saving  [n] Cancel  [s] Save: ";

/// How a line prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Line(String),
    /// Esc, or Ctrl-D on an empty line.
    Cancelled,
    /// Standard input reached end of file.
    Closed,
}

impl Input {
    fn into_line(self) -> Option<String> {
        match self {
            Input::Line(line) => Some(line),
            Input::Cancelled | Input::Closed => None,
        }
    }
}

/// What a key did to the line being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Changed,
    Submit,
    Cancel,
    Clear,
    Older,
    Newer,
}

/// Text and cursor of the line being edited.
#[derive(Debug, Default)]
struct LineState {
    buf: Vec<char>,
    cursor: usize,
}

impl LineState {
    fn with_text(text: &str) -> Self {
        let buf: Vec<char> = text.chars().collect();
        let cursor = buf.len();
        LineState { buf, cursor }
    }

    fn text(&self) -> String {
        self.buf.iter().collect()
    }

    fn handle(&mut self, key: Key) -> Edit {
        match key {
            Key::Char('\n') | Key::Char('\r') => return Edit::Submit,
            Key::Char(c) => {
                self.buf.insert(self.cursor, c);
                self.cursor += 1;
            }
            Key::Ctrl('c') => return Edit::Clear,
            Key::Ctrl('d') if self.buf.is_empty() => return Edit::Cancel,
            Key::Esc => return Edit::Cancel,
            Key::Up => return Edit::Older,
            Key::Down => return Edit::Newer,
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.buf.len()),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.buf.len(),
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buf.remove(self.cursor);
                }
            }
            Key::Delete => {
                if self.cursor < self.buf.len() {
                    self.buf.remove(self.cursor);
                }
            }
            _ => {}
        }
        Edit::Changed
    }
}

/// Recently entered commands, oldest first.
#[derive(Debug)]
struct History {
    entries: VecDeque<String>,
    capacity: usize,
    item: usize, // Index into entries; == len when not browsing
}

impl History {
    fn new(capacity: usize) -> Self {
        History {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            item: 0,
        }
    }

    fn push(&mut self, line: String) {
        if self.capacity > 0 && !line.is_empty() {
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(line);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.item = self.entries.len();
    }

    fn older(&mut self) -> Option<&str> {
        if self.item == 0 {
            return None;
        }
        self.item -= 1;
        self.entries.get(self.item).map(|s| s.as_str())
    }

    /// Moves towards the present. `Some("")` past the newest entry.
    fn newer(&mut self) -> Option<&str> {
        if self.item + 1 < self.entries.len() {
            self.item += 1;
            self.entries.get(self.item).map(|s| s.as_str())
        } else {
            self.reset();
            Some("")
        }
    }
}

pub struct Terminal {
    history: History,
}

impl Terminal {
    pub fn new(history_size: usize) -> Self {
        Terminal {
            history: History::new(history_size),
        }
    }

    pub fn new_no_history() -> Self {
        Self::new(0)
    }

    fn run_line<W, I>(
        &mut self,
        out: &mut W,
        keys: I,
        prompt: &str,
        initial: &str,
        use_history: bool,
    ) -> io::Result<Input>
    where
        W: Write,
        I: IntoIterator<Item = io::Result<Key>>,
    {
        let mut line = LineState::with_text(initial);
        redraw(out, prompt, &line)?;

        for key in keys {
            match line.handle(key?) {
                Edit::Changed => {}
                Edit::Submit => {
                    write!(out, "\r\n")?;
                    out.flush()?;
                    let text = line.text();
                    if use_history {
                        self.history.push(text.clone());
                    }
                    return Ok(Input::Line(text));
                }
                Edit::Cancel => {
                    write!(out, "\r\n")?;
                    out.flush()?;
                    self.history.reset();
                    return Ok(Input::Cancelled);
                }
                Edit::Clear => {
                    line = LineState::default();
                    self.history.reset();
                }
                Edit::Older if use_history => {
                    if let Some(item) = self.history.older() {
                        line = LineState::with_text(item);
                    }
                }
                Edit::Newer if use_history => {
                    if let Some(item) = self.history.newer() {
                        line = LineState::with_text(item);
                    }
                }
                Edit::Older | Edit::Newer => {}
            }
            redraw(out, prompt, &line)?;
        }

        write!(out, "\r\n")?;
        out.flush()?;
        Ok(Input::Closed)
    }

    fn read_raw(&mut self, prompt: &str, initial: &str, use_history: bool) -> Result<Input> {
        let mut stdout = stdout().into_raw_mode()?;
        Ok(self.run_line(&mut stdout, stdin().keys(), prompt, initial, use_history)?)
    }
}

fn redraw<W: Write>(out: &mut W, prompt: &str, line: &LineState) -> io::Result<()> {
    write!(
        out,
        "\r{}{}{}",
        termion::clear::CurrentLine,
        prompt,
        line.text()
    )?;
    let back = line.buf.len() - line.cursor;
    if back > 0 {
        write!(out, "{}", termion::cursor::Left(back as u16))?;
    }
    out.flush()
}

/// Waits for one of the close prompt keys. Esc, Ctrl-C, or closed input
/// cancel.
fn read_close_choice<I>(keys: I) -> io::Result<CloseChoice>
where
    I: IntoIterator<Item = io::Result<Key>>,
{
    for key in keys {
        match key? {
            Key::Char('c') | Key::Char('C') => return Ok(CloseChoice::Discard),
            Key::Char('s') | Key::Char('S') => return Ok(CloseChoice::Save),
            Key::Char('n') | Key::Char('N') | Key::Esc | Key::Ctrl('c') => {
                return Ok(CloseChoice::Cancel)
            }
            _ => {}
        }
    }
    Ok(CloseChoice::Cancel)
}

/// File names are taken as typed. Only an empty answer cancels.
fn chosen_path(answer: Input) -> Option<PathBuf> {
    answer.into_line().filter(|s| !s.is_empty()).map(PathBuf::from)
}

impl Presentation for Terminal {
    fn confirm_close(&mut self, title: &str) -> Result<CloseChoice> {
        println!("Save changes to {} before closing?", title);
        let mut stdout = stdout().into_raw_mode()?;
        write!(stdout, "{}", CLOSE_QUESTION)?;
        stdout.flush()?;

        let choice = read_close_choice(stdin().keys())?;
        write!(stdout, "\r\n")?;
        stdout.flush()?;
        Ok(choice)
    }

    fn choose_file(&mut self, prompt: &str) -> Result<Option<PathBuf>> {
        let answer = self.read_raw(&format!("{} ", prompt), "", false)?;
        Ok(chosen_path(answer))
    }

    fn report_error(&mut self, err: &EditorError) {
        println!("{}", err);
    }
}

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        // Esc at the command prompt just discards the typed command.
        match self.read_raw(prompt, "", true)? {
            Input::Line(line) => Ok(Some(line)),
            Input::Cancelled => Ok(Some(String::new())),
            Input::Closed => Ok(None),
        }
    }

    fn edit_line(&mut self, prompt: &str, line: &str) -> Result<Option<String>> {
        Ok(self.read_raw(prompt, line, false)?.into_line())
    }
}

impl io::Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        stdout().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        stdout().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(text: &str) -> Vec<io::Result<Key>> {
        text.chars().map(|c| Ok(Key::Char(c))).collect()
    }

    fn run(term: &mut Terminal, input: Vec<io::Result<Key>>, initial: &str) -> Input {
        let mut out = Vec::new();
        term.run_line(&mut out, input, "> ", initial, true).unwrap()
    }

    fn line(text: &str) -> Input {
        Input::Line(text.to_string())
    }

    #[test]
    fn typed_line_is_returned() {
        let mut term = Terminal::new(10);
        assert_eq!(run(&mut term, keys("hello\n"), ""), line("hello"));
    }

    #[test]
    fn editing_keys_move_and_delete() {
        let mut term = Terminal::new(10);
        let mut input = keys("ac");
        input.push(Ok(Key::Left));
        input.extend(keys("b"));
        input.push(Ok(Key::Home));
        input.push(Ok(Key::Delete));
        input.push(Ok(Key::End));
        input.push(Ok(Key::Backspace));
        input.extend(keys("\n"));
        assert_eq!(run(&mut term, input, ""), line("b"));
    }

    #[test]
    fn initial_text_can_be_edited() {
        let mut term = Terminal::new_no_history();
        let mut input = vec![Ok(Key::Backspace)];
        input.extend(keys("X\r"));
        assert_eq!(run(&mut term, input, "line"), line("linX"));
    }

    #[test]
    fn escape_and_eof_cancel() {
        let mut term = Terminal::new(10);
        let mut input = keys("abc");
        input.push(Ok(Key::Esc));
        assert_eq!(run(&mut term, input, ""), Input::Cancelled);
        assert_eq!(run(&mut term, keys("abc"), ""), Input::Closed);
    }

    #[test]
    fn ctrl_c_clears_the_line() {
        let mut term = Terminal::new(10);
        let mut input = keys("junk");
        input.push(Ok(Key::Ctrl('c')));
        input.extend(keys("ok\n"));
        assert_eq!(run(&mut term, input, ""), line("ok"));
    }

    #[test]
    fn history_recalls_previous_lines() {
        let mut term = Terminal::new(10);
        run(&mut term, keys("first\n"), "");
        run(&mut term, keys("second\n"), "");

        let input = vec![Ok(Key::Up), Ok(Key::Up), Ok(Key::Down), Ok(Key::Char('\n'))];
        assert_eq!(run(&mut term, input, ""), line("second"));
    }

    #[test]
    fn history_is_bounded() {
        let mut history = History::new(2);
        history.push("a".to_string());
        history.push("b".to_string());
        history.push("c".to_string());
        assert_eq!(history.older(), Some("c"));
        assert_eq!(history.older(), Some("b"));
        assert_eq!(history.older(), None);
    }

    #[test]
    fn chosen_path_keeps_surrounding_spaces() {
        assert_eq!(chosen_path(line(" notes.txt ")), Some(PathBuf::from(" notes.txt ")));
        assert_eq!(chosen_path(line("   ")), Some(PathBuf::from("   ")));
        assert_eq!(chosen_path(line("")), None);
        assert_eq!(chosen_path(Input::Cancelled), None);
    }

    #[test]
    fn close_choice_ignores_other_keys() {
        assert_eq!(read_close_choice(keys("xqs")).unwrap(), CloseChoice::Save);
        assert_eq!(read_close_choice(keys("c")).unwrap(), CloseChoice::Discard);
        assert_eq!(read_close_choice(keys("n")).unwrap(), CloseChoice::Cancel);
        assert_eq!(read_close_choice(vec![Ok(Key::Esc)]).unwrap(), CloseChoice::Cancel);
        assert_eq!(read_close_choice(Vec::new()).unwrap(), CloseChoice::Cancel);
    }
}

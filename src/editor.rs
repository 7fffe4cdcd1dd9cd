use std::path::{Path, PathBuf};

use tracing::debug;

use crate::buffer::{Clipboard, LineBuffer, TextBuffer};
use crate::config::Config;
use crate::error::{EditorError, Result};
use crate::menu::{self, Action};
use crate::presentation::Console;
use crate::session::{SaveOutcome, SessionId, SessionManager};

const OPEN_PROMPT: &str = "Select file to open...";

const LINE_HELP: &[(&str, &str)] = &[
    ("NUM", "Set current line"),
    ("?", "Print this help"),
    ("c [NUM]", "Print context, defaults to the configured number of lines"),
    ("d", "Delete current line"),
    ("e", "Edit current line"),
    ("i", "Insert new line below current line"),
    ("I", "Insert new line above current line"),
    ("m", "Print window data"),
    ("p [NUM]", "Print current line. If given a number, will set the current line and print it"),
    ("b", "List open windows"),
    ("s NUM", "Switch to window NUM"),
];

/// Command loop over a set of windows. One command is handled to
/// completion before the next is read.
pub struct Editor<C> {
    sessions: SessionManager<LineBuffer>,
    console: C,
    clipboard: Clipboard,
    active: SessionId,
    context_lines: usize,
}

impl<C: Console> Editor<C> {
    pub fn new(console: C, config: &Config) -> Self {
        Editor {
            sessions: SessionManager::new(),
            console,
            clipboard: Clipboard::new(),
            active: SessionId::new(0),
            context_lines: config.context_lines,
        }
    }

    /// Creates one window per path, or a single empty window when there are
    /// none. The last window created becomes active.
    pub fn open_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        if paths.is_empty() {
            self.active = self.sessions.create_session();
            return Ok(());
        }
        for path in paths {
            let id = self.sessions.create_session();
            self.active = self.sessions.open_file(id, path)?;
        }
        Ok(())
    }

    pub fn sessions(&self) -> &SessionManager<LineBuffer> {
        &self.sessions
    }

    pub fn active(&self) -> SessionId {
        self.active
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Reads and runs commands until the last window closes.
    pub fn run(&mut self) -> Result<()> {
        if self.sessions.live_count() == 0 {
            self.open_paths::<PathBuf>(&[])?;
        }

        while !self.sessions.is_terminated() {
            let prompt = self.prompt()?;
            let line = match self.console.read_line(&prompt)? {
                Some(line) => line,
                None => {
                    return Err(EditorError::Terminal(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "input closed",
                    )))
                }
            };

            match self.handle_command(&line) {
                Ok(()) => {}
                Err(e @ EditorError::Terminal(_)) => return Err(e),
                Err(e) => self.console.report_error(&e),
            }
        }
        Ok(())
    }

    pub fn handle_command(&mut self, line: &str) -> Result<()> {
        let cmd: Vec<&str> = line.split_whitespace().collect();
        if cmd.is_empty() {
            return Ok(());
        }

        if let Some(entry) = menu::lookup(cmd[0]) {
            debug!(window = %self.active, command = entry.command, "menu");
            return self.activate(entry.action, &cmd[1..], path_operand(line));
        }

        match cmd[0] {
            "?" => self.print_help(),
            "b" => self.list_windows(),
            "c" => self.context(&cmd[1..]),
            "d" => {
                self.buffer_mut()?.delete_current();
                Ok(())
            }
            "e" => self.edit_mode(),
            "i" => self.insert(true),
            "I" => self.insert(false),
            "m" => self.metadata(),
            "p" => self.print_line(&cmd[1..]),
            "s" => self.switch(&cmd[1..]),
            _ => {
                if let Ok(line) = cmd[0].parse::<usize>() {
                    self.buffer_mut()?.set_current_line(line);
                } else {
                    writeln!(self.console, "Unknown command {}, ? for help", cmd[0])?;
                }
                Ok(())
            }
        }
    }

    /// `path` is the rest of the line after the command word, taken verbatim
    /// so file names may contain spaces.
    fn activate(&mut self, action: Action, args: &[&str], path: Option<&str>) -> Result<()> {
        match action {
            Action::New => {
                self.active = self.sessions.create_session();
                self.announce()
            }
            Action::Open => {
                let path = match path {
                    Some(p) => PathBuf::from(p),
                    None => match self.console.choose_file(OPEN_PROMPT)? {
                        Some(p) => p,
                        None => return Ok(()),
                    },
                };
                self.active = self.sessions.open_file(self.active, path)?;
                self.announce()
            }
            Action::Save => {
                let outcome = match path {
                    Some(path) => self.sessions.save_file(self.active, path)?,
                    None => self.sessions.save(self.active, &mut self.console)?,
                };
                self.saved(outcome)
            }
            Action::SaveAs => {
                let outcome = match path {
                    Some(path) => self.sessions.save_file(self.active, path)?,
                    None => self.sessions.save_as(self.active, &mut self.console)?,
                };
                self.saved(outcome)
            }
            Action::Quit => {
                if self.sessions.close_interactive(self.active, &mut self.console)?.is_some() {
                    self.window_closed()?;
                }
                Ok(())
            }
            Action::Cut => {
                let count = count_arg(args);
                let buffer = self.sessions.session_mut(self.active)?.buffer_mut();
                buffer.select_lines(count);
                buffer.cut(&mut self.clipboard);
                Ok(())
            }
            Action::Copy => {
                let count = count_arg(args);
                let buffer = self.sessions.session_mut(self.active)?.buffer_mut();
                buffer.select_lines(count);
                buffer.copy(&mut self.clipboard);
                Ok(())
            }
            Action::Paste => {
                let buffer = self.sessions.session_mut(self.active)?.buffer_mut();
                buffer.paste(&self.clipboard);
                Ok(())
            }
        }
    }

    fn saved(&mut self, outcome: SaveOutcome) -> Result<()> {
        match outcome {
            SaveOutcome::Saved => writeln!(self.console, "Saved!")?,
            SaveOutcome::Closed(_) => self.window_closed()?,
            SaveOutcome::Cancelled => {}
        }
        Ok(())
    }

    /// Moves focus to the lowest numbered window still open.
    fn window_closed(&mut self) -> Result<()> {
        let next = self.sessions.ids().next();
        if let Some(next) = next {
            self.active = next;
            self.announce()?;
        }
        Ok(())
    }

    fn announce(&mut self) -> Result<()> {
        let title = self.sessions.session(self.active)?.title();
        writeln!(self.console, "Window {}: {}", self.active, title)?;
        Ok(())
    }

    fn prompt(&self) -> Result<String> {
        let session = self.sessions.session(self.active)?;
        let dirty = if session.is_dirty() { "*" } else { "" };
        Ok(format!(
            "{}:{}{} > ",
            self.active,
            session.buffer().current_line(),
            dirty
        ))
    }

    fn buffer(&self) -> Result<&LineBuffer> {
        Ok(self.sessions.session(self.active)?.buffer())
    }

    fn buffer_mut(&mut self) -> Result<&mut LineBuffer> {
        Ok(self.sessions.session_mut(self.active)?.buffer_mut())
    }

    fn print_help(&mut self) -> Result<()> {
        for (keys, text) in LINE_HELP {
            writeln!(self.console, "{:>14} - {}", keys, text)?;
        }
        write!(self.console, "{}", menu::render_help())?;
        Ok(())
    }

    fn list_windows(&mut self) -> Result<()> {
        let ids: Vec<SessionId> = self.sessions.ids().collect();
        for id in ids {
            let session = self.sessions.session(id)?;
            let marker = if id == self.active { ">" } else { " " };
            let dirty = if session.is_dirty() { " *" } else { "" };
            let title = session.title();
            writeln!(self.console, "{}{}: {}{}", marker, id, title, dirty)?;
        }
        Ok(())
    }

    fn switch(&mut self, args: &[&str]) -> Result<()> {
        let id = match args.first().and_then(|a| a.parse::<u32>().ok()) {
            Some(n) => SessionId::new(n),
            None => {
                writeln!(self.console, "Usage: s NUM")?;
                return Ok(());
            }
        };
        self.sessions.session(id)?;
        self.active = id;
        self.announce()
    }

    fn print_line(&mut self, args: &[&str]) -> Result<()> {
        if let Some(line) = args.first().and_then(|a| a.parse().ok()) {
            self.buffer_mut()?.set_current_line(line);
        }
        let text = self.buffer()?.current_text().to_owned();
        writeln!(self.console, "{}", text)?;
        Ok(())
    }

    fn context(&mut self, args: &[&str]) -> Result<()> {
        let radius = args
            .first()
            .and_then(|a| a.parse().ok())
            .unwrap_or(self.context_lines);

        let buffer = self.sessions.session(self.active)?.buffer();
        let (first, last) = buffer.context(radius);
        for row in first..=last {
            let text = buffer.line(row).unwrap_or_default();
            writeln!(self.console, "{}: {}", row, text)?;
        }
        Ok(())
    }

    fn edit_mode(&mut self) -> Result<()> {
        let (row, text) = {
            let buffer = self.buffer()?;
            (buffer.current_line(), buffer.current_text().to_owned())
        };
        if let Some(edited) = self.console.edit_line(&format!("{} # ", row), &text)? {
            self.buffer_mut()?.replace_current(edited);
        }
        Ok(())
    }

    fn insert(&mut self, below: bool) -> Result<()> {
        let new_line = match self.console.edit_line("+ ", "")? {
            Some(line) => line,
            None => return Ok(()),
        };
        let buffer = self.buffer_mut()?;
        if below {
            buffer.insert_below(new_line);
        } else {
            buffer.insert_above(new_line);
        }
        Ok(())
    }

    fn metadata(&mut self) -> Result<()> {
        let session = self.sessions.session(self.active)?;
        let lines = [
            format!("Window: {}", self.active),
            format!("File: {}", session.title()),
            format!("Lines: {}", session.buffer().line_count()),
            format!("Current Line: {}", session.buffer().current_line()),
            format!("Modified: {}", if session.is_dirty() { "yes" } else { "no" }),
        ];
        for line in lines {
            writeln!(self.console, "{}", line)?;
        }
        Ok(())
    }
}

/// Everything after the command word and one separating whitespace
/// character, or `None` when that is blank.
fn path_operand(line: &str) -> Option<&str> {
    let (_, rest) = line.trim_start().split_once(char::is_whitespace)?;
    if rest.trim().is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn count_arg(args: &[&str]) -> usize {
    args.first().and_then(|a| a.parse().ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_operand_keeps_spaces() {
        assert_eq!(path_operand("o my notes.txt"), Some("my notes.txt"));
        assert_eq!(path_operand("  saveas /tmp/a b/c.txt "), Some("/tmp/a b/c.txt "));
        assert_eq!(path_operand("o"), None);
        assert_eq!(path_operand("w   "), None);
    }
}

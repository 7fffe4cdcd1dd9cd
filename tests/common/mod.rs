#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

use ged::presentation::{CloseChoice, Console, Presentation};
use ged::EditorError;

/// Front end that answers from queues and records what was shown.
#[derive(Default)]
pub struct Scripted {
    pub lines: VecDeque<String>,
    pub edits: VecDeque<Option<String>>,
    pub choices: VecDeque<CloseChoice>,
    pub files: VecDeque<Option<PathBuf>>,
    pub chooser_broken: bool,
    pub prompts_shown: Vec<String>,
    pub errors: Vec<String>,
    pub output: Vec<u8>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(lines: &[&str]) -> Self {
        Scripted {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn choose(mut self, choice: CloseChoice) -> Self {
        self.choices.push_back(choice);
        self
    }

    pub fn pick_file(mut self, path: Option<PathBuf>) -> Self {
        self.files.push_back(path);
        self
    }

    /// Every file chooser fails as if the terminal went away.
    pub fn break_chooser(mut self) -> Self {
        self.chooser_broken = true;
        self
    }

    pub fn edit(mut self, line: Option<&str>) -> Self {
        self.edits.push_back(line.map(|s| s.to_string()));
        self
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Presentation for Scripted {
    fn confirm_close(&mut self, title: &str) -> ged::Result<CloseChoice> {
        self.prompts_shown.push(title.to_string());
        Ok(self.choices.pop_front().expect("unexpected close prompt"))
    }

    fn choose_file(&mut self, _prompt: &str) -> ged::Result<Option<PathBuf>> {
        if self.chooser_broken {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "chooser closed").into());
        }
        Ok(self.files.pop_front().expect("unexpected file chooser"))
    }

    fn report_error(&mut self, err: &EditorError) {
        self.errors.push(err.to_string());
    }
}

impl Console for Scripted {
    fn read_line(&mut self, _prompt: &str) -> ged::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn edit_line(&mut self, _prompt: &str, _line: &str) -> ged::Result<Option<String>> {
        Ok(self.edits.pop_front().expect("unexpected line edit"))
    }
}

impl io::Write for Scripted {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

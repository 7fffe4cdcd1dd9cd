use std::path::PathBuf;

use crate::error::{EditorError, Result};

/// Answer to "Save changes to file before closing?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    /// Close without saving.
    Discard,
    Cancel,
    Save,
}

/// The parts of the front end the session manager needs to talk to.
pub trait Presentation {
    /// Shows the three-way close prompt for the window titled `title` and
    /// waits for an answer.
    fn confirm_close(&mut self, title: &str) -> Result<CloseChoice>;

    /// Asks for a path. `None` means the user cancelled.
    fn choose_file(&mut self, prompt: &str) -> Result<Option<PathBuf>>;

    fn report_error(&mut self, err: &EditorError);
}

/// Line-based front end the editor loop runs on.
pub trait Console: Presentation + std::io::Write {
    /// Reads one command. `None` when input is closed or cancelled.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Lets the user edit `line`. `None` leaves the line as it was.
    fn edit_line(&mut self, prompt: &str, line: &str) -> Result<Option<String>>;
}

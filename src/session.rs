//! Document windows and their open/save/close lifecycle.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::{Application, Lifecycle};
use crate::buffer::TextBuffer;
use crate::error::{EditorError, Result};
use crate::fileio;
use crate::presentation::{CloseChoice, Presentation};

pub const UNTITLED: &str = "Untitled";

const SAVE_PROMPT: &str = "Select location to save...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u32);

impl SessionId {
    pub fn new(id: u32) -> Self {
        SessionId(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for the close prompt currently shown for a window.
#[derive(Debug)]
pub struct ClosePrompt {
    title: String,
}

impl ClosePrompt {
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// One open document window.
#[derive(Debug)]
pub struct Session<B> {
    id: SessionId,
    buffer: B,
    current_path: Option<PathBuf>,
    closing: bool,
    prompt: Option<ClosePrompt>,
}

impl<B: TextBuffer> Session<B> {
    fn new(id: SessionId, buffer: B) -> Self {
        Session {
            id,
            buffer,
            current_path: None,
            closing: false,
            prompt: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn prompt(&self) -> Option<&ClosePrompt> {
        self.prompt.as_ref()
    }

    /// Window title: the bound path, or `Untitled`.
    pub fn title(&self) -> String {
        match &self.current_path {
            Some(p) => p.display().to_string(),
            None => UNTITLED.to_string(),
        }
    }
}

/// Result of asking a window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    /// The buffer was clean and the window is gone.
    Closed(Lifecycle),
    /// A prompt is now pending; answer it with `resolve_close`.
    Prompt,
    /// A prompt was already pending. Nothing changed.
    AlreadyPrompting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseResolution {
    Closed(Lifecycle),
    Cancelled,
    /// The window is marked closing. Run a save; success closes it.
    SaveRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The save finished a close sequence and the window is gone.
    Closed(Lifecycle),
    /// The user dismissed the file chooser.
    Cancelled,
}

/// Owns every window and the application context.
#[derive(Debug)]
pub struct SessionManager<B> {
    app: Application,
    sessions: BTreeMap<SessionId, Session<B>>,
    next_id: u32,
}

impl<B: TextBuffer + Default> Default for SessionManager<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: TextBuffer + Default> SessionManager<B> {
    pub fn new() -> Self {
        SessionManager {
            app: Application::new(),
            sessions: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn create_session(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, Session::new(id, B::default()));
        self.app.register();
        info!(window = %id, live = self.app.live_count(), "window created");
        id
    }

    pub fn session(&self, id: SessionId) -> Result<&Session<B>> {
        self.sessions.get(&id).ok_or(EditorError::UnknownSession(id))
    }

    pub fn session_mut(&mut self, id: SessionId) -> Result<&mut Session<B>> {
        self.sessions.get_mut(&id).ok_or(EditorError::UnknownSession(id))
    }

    /// Live windows in creation order.
    pub fn ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    pub fn live_count(&self) -> usize {
        self.app.live_count()
    }

    pub fn is_terminated(&self) -> bool {
        self.app.is_terminated()
    }

    /// Opens `path` into `target`, or into a fresh window when `target` has
    /// unsaved changes or is already bound to a file. Returns the window that
    /// received the file.
    ///
    /// The path is bound before reading. A file that cannot be read leaves the
    /// buffer untouched, so opening a nonexistent path starts a new file.
    pub fn open_file<P: AsRef<Path>>(&mut self, target: SessionId, path: P) -> Result<SessionId> {
        let path = path.as_ref();
        let target = {
            let session = self.session(target)?;
            if session.is_dirty() || session.current_path.is_some() {
                self.create_session()
            } else {
                target
            }
        };

        let session = self.session_mut(target)?;
        session.current_path = Some(path.to_owned());

        let data = match fileio::read_whole_file(path) {
            Ok(data) => data,
            Err(e) => {
                debug!(window = %target, path = %path.display(), error = %e, "open failed, starting new file");
                return Ok(target);
            }
        };

        let (text, lossy) = match String::from_utf8(data) {
            Ok(text) => (text, false),
            Err(e) => {
                warn!(window = %target, path = %path.display(), "file is not valid UTF-8, decoding lossily");
                (String::from_utf8_lossy(e.as_bytes()).into_owned(), true)
            }
        };

        // A lossy decode already differs from the bytes on disk, so the
        // window starts dirty and closing it asks before anything is lost.
        session.buffer.set_text(&text);
        session.buffer.set_modified(lossy);
        info!(window = %target, path = %path.display(), bytes = text.len(), "opened");
        Ok(target)
    }

    pub fn buffer_text(&self, id: SessionId) -> Result<String> {
        Ok(self.session(id)?.buffer.text())
    }

    /// Writes the buffer plus one trailing newline to `path`.
    ///
    /// When the window is closing, a successful write closes it. Otherwise
    /// the buffer is marked clean and `path` becomes the window's file. A
    /// failed write leaves the window open and ends any close sequence.
    pub fn save_file<P: AsRef<Path>>(&mut self, id: SessionId, path: P) -> Result<SaveOutcome> {
        let path = path.as_ref();
        let session = self.session_mut(id)?;
        let text = session.buffer.text();

        if let Err(source) = fileio::write_whole_file(path, &text) {
            warn!(window = %id, path = %path.display(), error = %source, "save failed");
            session.closing = false;
            return Err(EditorError::Write {
                path: path.to_owned(),
                source,
            });
        }
        info!(window = %id, path = %path.display(), bytes = text.len() + 1, "saved");

        if session.closing {
            return Ok(SaveOutcome::Closed(self.close_session(id)?));
        }

        session.buffer.set_modified(false);
        session.current_path = Some(path.to_owned());
        Ok(SaveOutcome::Saved)
    }

    /// Saves to the bound path, or asks for one when the window is untitled.
    pub fn save(&mut self, id: SessionId, ui: &mut dyn Presentation) -> Result<SaveOutcome> {
        match self.session(id)?.current_path.clone() {
            Some(path) => self.save_file(id, path),
            None => self.save_as(id, ui),
        }
    }

    /// Always asks for a destination.
    pub fn save_as(&mut self, id: SessionId, ui: &mut dyn Presentation) -> Result<SaveOutcome> {
        self.session(id)?;
        let chosen = match ui.choose_file(SAVE_PROMPT) {
            Ok(chosen) => chosen,
            Err(e) => {
                self.session_mut(id)?.closing = false;
                return Err(e);
            }
        };
        match chosen {
            Some(path) => self.save_file(id, path),
            None => {
                let session = self.session_mut(id)?;
                if session.closing {
                    debug!(window = %id, "save cancelled, close abandoned");
                }
                session.closing = false;
                Ok(SaveOutcome::Cancelled)
            }
        }
    }

    /// Entry point for both window close and Quit.
    pub fn request_close(&mut self, id: SessionId) -> Result<CloseRequest> {
        let session = self.session_mut(id)?;
        if session.prompt.is_some() {
            debug!(window = %id, "close prompt already pending");
            return Ok(CloseRequest::AlreadyPrompting);
        }
        if !session.is_dirty() {
            return Ok(CloseRequest::Closed(self.close_session(id)?));
        }

        session.prompt = Some(ClosePrompt {
            title: session.title(),
        });
        debug!(window = %id, "asking to save before close");
        Ok(CloseRequest::Prompt)
    }

    /// Applies the user's answer to the pending close prompt.
    pub fn resolve_close(&mut self, id: SessionId, choice: CloseChoice) -> Result<CloseResolution> {
        let session = self.session_mut(id)?;
        if session.prompt.take().is_none() {
            return Err(EditorError::NoPendingPrompt(id));
        }
        debug!(window = %id, ?choice, "close prompt answered");

        match choice {
            CloseChoice::Discard => Ok(CloseResolution::Closed(self.close_session(id)?)),
            CloseChoice::Cancel => {
                session.closing = false;
                Ok(CloseResolution::Cancelled)
            }
            CloseChoice::Save => {
                session.closing = true;
                Ok(CloseResolution::SaveRequested)
            }
        }
    }

    /// Runs the whole close flow against a front end: prompt if dirty, then
    /// discard, cancel, or save-and-close.
    pub fn close_interactive(&mut self, id: SessionId, ui: &mut dyn Presentation) -> Result<Option<Lifecycle>> {
        let title = match self.request_close(id)? {
            CloseRequest::Closed(lifecycle) => return Ok(Some(lifecycle)),
            CloseRequest::AlreadyPrompting => return Ok(None),
            CloseRequest::Prompt => self.session(id)?.title(),
        };

        let choice = match ui.confirm_close(&title) {
            Ok(choice) => choice,
            Err(e) => {
                // Drop the prompt so the window can be closed again.
                self.resolve_close(id, CloseChoice::Cancel)?;
                return Err(e);
            }
        };

        match self.resolve_close(id, choice)? {
            CloseResolution::Closed(lifecycle) => Ok(Some(lifecycle)),
            CloseResolution::Cancelled => Ok(None),
            CloseResolution::SaveRequested => match self.save(id, ui) {
                Ok(SaveOutcome::Closed(lifecycle)) => Ok(Some(lifecycle)),
                Ok(_) => Ok(None),
                Err(e @ EditorError::Write { .. }) => {
                    ui.report_error(&e);
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Releases the window and its prompt. Returns `Lifecycle::Exit` when it
    /// was the last one.
    pub fn close_session(&mut self, id: SessionId) -> Result<Lifecycle> {
        self.sessions
            .remove(&id)
            .ok_or(EditorError::UnknownSession(id))?;
        let lifecycle = self.app.release();
        info!(window = %id, live = self.app.live_count(), "window closed");
        Ok(lifecycle)
    }
}

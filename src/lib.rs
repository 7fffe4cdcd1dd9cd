//! A small multi-window line editor.

pub mod app;
pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod fileio;
pub mod logging;
pub mod menu;
pub mod presentation;
pub mod session;
pub mod terminal;

pub use error::{EditorError, Result};

//! File and Edit menus.
//!
//! Each entry can be invoked by its command word or its accelerator key at
//! the prompt. The help screen is rendered from the same tables.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    Cut,
    Copy,
    Paste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub command: &'static str,
    pub accelerator: Option<&'static str>,
    pub action: Action,
}

impl MenuEntry {
    const fn new(
        label: &'static str,
        command: &'static str,
        accelerator: Option<&'static str>,
        action: Action,
    ) -> Self {
        MenuEntry {
            label,
            command,
            accelerator,
            action,
        }
    }

    fn matches(&self, word: &str) -> bool {
        self.command == word || self.accelerator == Some(word)
    }
}

#[derive(Debug)]
pub struct Menu {
    pub name: &'static str,
    pub entries: &'static [MenuEntry],
}

pub const FILE_MENU: Menu = Menu {
    name: "File",
    entries: &[
        MenuEntry::new("New", "new", Some("n"), Action::New),
        MenuEntry::new("Open...", "open", Some("o"), Action::Open),
        MenuEntry::new("Save", "save", Some("w"), Action::Save),
        MenuEntry::new("Save As...", "saveas", None, Action::SaveAs),
        MenuEntry::new("Quit", "quit", Some("q"), Action::Quit),
    ],
};

pub const EDIT_MENU: Menu = Menu {
    name: "Edit",
    entries: &[
        MenuEntry::new("Cut", "cut", Some("x"), Action::Cut),
        MenuEntry::new("Copy", "copy", Some("y"), Action::Copy),
        MenuEntry::new("Paste", "paste", Some("v"), Action::Paste),
    ],
};

pub const MENU_BAR: &[Menu] = &[FILE_MENU, EDIT_MENU];

/// Finds the entry whose command or accelerator is `word`.
pub fn lookup(word: &str) -> Option<&'static MenuEntry> {
    MENU_BAR
        .iter()
        .flat_map(|menu| menu.entries.iter())
        .find(|entry| entry.matches(word))
}

/// Renders the menus as help lines, one entry per line.
pub fn render_help() -> String {
    let mut out = String::new();
    for menu in MENU_BAR {
        let _ = writeln!(out, "{}:", menu.name);
        for entry in menu.entries {
            let keys = match entry.accelerator {
                Some(accel) => format!("{}, {}", accel, entry.command),
                None => entry.command.to_string(),
            };
            let _ = writeln!(out, "{:>14} - {}", keys, entry.label);
        }
    }
    out
}

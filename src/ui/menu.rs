/// Menu commands and their keyboard shortcuts
///
/// One table drives both the menu bar and the key handler, so a command
/// always has the same label and shortcut wherever it shows up.

use crate::state::data::{FALSE_SYMBOL, TRUE_SYMBOL};

/// Every user-facing command of the tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Open,
    Print,
    Exit,
    TagTrue,
    TagFalse,
    Previous,
    Next,
    ZoomIn,
    ZoomOut,
    NormalSize,
    FitToWindow,
    ClearSelection,
    About,
}

/// Top-level menus, in menu bar order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    File,
    Edit,
    View,
    Help,
}

impl Menu {
    pub const ALL: [Menu; 4] = [Menu::File, Menu::Edit, Menu::View, Menu::Help];

    pub fn title(self) -> &'static str {
        match self {
            Menu::File => "File",
            Menu::Edit => "Edit",
            Menu::View => "View",
            Menu::Help => "Help",
        }
    }

    pub fn commands(self) -> &'static [Command] {
        match self {
            Menu::File => &[Command::Open, Command::Print, Command::Exit],
            Menu::Edit => &[Command::TagTrue, Command::TagFalse],
            Menu::View => &[
                Command::Previous,
                Command::Next,
                Command::ZoomIn,
                Command::ZoomOut,
                Command::NormalSize,
                Command::FitToWindow,
                Command::ClearSelection,
            ],
            Menu::Help => &[Command::About],
        }
    }
}

/// A key press, reduced to what the shortcut table cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Ctrl, or Cmd on macOS
    pub command: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

impl Command {
    pub fn label(self) -> String {
        match self {
            Command::Open => "Open...".into(),
            Command::Print => "Print...".into(),
            Command::Exit => "Exit".into(),
            Command::TagTrue => format!("Set Main Tag to '{}'", TRUE_SYMBOL),
            Command::TagFalse => format!("Set Main Tag to '{}'", FALSE_SYMBOL),
            Command::Previous => "Show Previous".into(),
            Command::Next => "Show Next".into(),
            Command::ZoomIn => "Zoom In (25%)".into(),
            Command::ZoomOut => "Zoom Out (25%)".into(),
            Command::NormalSize => "Normal Size".into(),
            Command::FitToWindow => "Fit to Window".into(),
            Command::ClearSelection => "Clear Selection".into(),
            Command::About => "About".into(),
        }
    }

    /// Shortcut as shown next to the label
    pub fn shortcut(self) -> Option<&'static str> {
        match self {
            Command::Open => Some("Ctrl+O"),
            Command::Exit => Some("Ctrl+Q"),
            Command::TagTrue => Some("Ctrl+Shift+T"),
            Command::TagFalse => Some("Ctrl+Shift+F"),
            Command::Previous => Some("Ctrl+P"),
            Command::Next => Some("Ctrl+N"),
            Command::ZoomIn => Some("Ctrl++"),
            Command::ZoomOut => Some("Ctrl+-"),
            Command::NormalSize => Some("Ctrl+S"),
            Command::FitToWindow => Some("Ctrl+W"),
            Command::ClearSelection => Some("Esc"),
            Command::Print | Command::About => None,
        }
    }

    /// Resolve a key press that may already have been consumed by a
    /// focused widget. Plain keys belong to the widget; command-modified
    /// keys and Escape are still shortcuts.
    pub fn for_shortcut(press: KeyPress, captured: bool) -> Option<Command> {
        if captured && !press.command && press.key != Key::Escape {
            return None;
        }
        Self::for_key(press)
    }

    /// Resolve a key press to the command bound to it
    pub fn for_key(press: KeyPress) -> Option<Command> {
        let ch = match press.key {
            Key::Escape => {
                return (!press.command && !press.shift).then_some(Command::ClearSelection)
            }
            Key::Char(ch) => ch.to_ascii_lowercase(),
        };
        if !press.command {
            return None;
        }

        match (ch, press.shift) {
            // '+' usually needs shift, so accept both it and the bare '=' key
            ('+', _) | ('=', _) => Some(Command::ZoomIn),
            ('-', false) => Some(Command::ZoomOut),
            ('t', true) => Some(Command::TagTrue),
            ('f', true) => Some(Command::TagFalse),
            ('o', false) => Some(Command::Open),
            ('q', false) => Some(Command::Exit),
            ('p', false) => Some(Command::Previous),
            ('n', false) => Some(Command::Next),
            ('s', false) => Some(Command::NormalSize),
            ('w', false) => Some(Command::FitToWindow),
            _ => None,
        }
    }
}

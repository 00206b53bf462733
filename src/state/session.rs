/// The tagging workflow as an explicit state value
///
/// Every user action goes through `Session::dispatch`, which returns the
/// next session together with the side effects the shell has to carry out
/// (persist the table, show or clear the image). Nothing in here touches a
/// window, so the workflow is tested without one.

use std::path::PathBuf;

use tracing::debug;

use super::data::{MainTag, Record};
use super::table::{RecordTable, TableError};

/// A user action against the tagging workflow
#[derive(Debug, Clone)]
pub enum Action {
    /// A freshly loaded table replaces the current one
    Load(RecordTable),
    /// A row was selected in the navigation list
    Select(usize),
    /// The navigation list lost its selection
    ClearSelection,
    Next,
    Previous,
    /// The sub-tag text input changed
    EditSubTag(String),
    /// A main tag was chosen from the picker; tags the selected row
    PickMainTag(MainTag),
    /// Enter pressed in the sub-tag input; tags the row as false + note
    SubmitSubTag,
    /// Shortcut: tag the selected row true with no sub tag
    TagTrue,
    /// Shortcut: tag the selected row false with no sub tag
    TagFalse,
}

/// Side effect requested by an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the whole table back to its source file
    Persist,
    /// Decode and display this image
    ShowImage(PathBuf),
    /// Reset the image view to the blank placeholder
    ClearImage,
}

/// Where the workflow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoFile,
    NoSelection,
    Selected(usize),
}

/// The tagging application state
#[derive(Debug, Clone, Default)]
pub struct Session {
    table: Option<RecordTable>,
    selected: Option<usize>,
    sub_tag: String,
    main_tag: MainTag,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action, returning the new state and the effects to run
    pub fn dispatch(mut self, action: Action) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match action {
            Action::Load(table) => {
                self.table = Some(table);
                self.selected = None;
                self.sub_tag.clear();
                effects.push(Effect::ClearImage);
            }
            Action::Select(index) => {
                self.select(index, &mut effects);
            }
            Action::ClearSelection => {
                if self.table.is_some() {
                    self.selected = None;
                    effects.push(Effect::ClearImage);
                }
            }
            Action::Next => self.step(1, &mut effects),
            Action::Previous => self.step(-1, &mut effects),
            Action::EditSubTag(text) => {
                self.sub_tag = text;
            }
            Action::PickMainTag(tag) => {
                self.main_tag = tag;
                self.assign(tag, &mut effects);
            }
            Action::SubmitSubTag => {
                self.assign(MainTag::False, &mut effects);
            }
            Action::TagTrue => {
                if self.selected.is_some() {
                    self.sub_tag.clear();
                    self.main_tag = MainTag::True;
                    self.assign(MainTag::True, &mut effects);
                }
            }
            Action::TagFalse => {
                if self.selected.is_some() {
                    self.sub_tag.clear();
                    self.main_tag = MainTag::False;
                    self.assign(MainTag::False, &mut effects);
                }
            }
        }

        (self, effects)
    }

    /// Load a listing and, only if it loads, replace the current table
    /// with it. On error the session is left exactly as it was.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<Vec<Effect>, TableError> {
        let table = RecordTable::load(path)?;
        let (session, effects) = std::mem::take(self).dispatch(Action::Load(table));
        *self = session;
        Ok(effects)
    }

    /// Write the table back to disk
    pub fn persist(&self) -> Result<(), TableError> {
        match &self.table {
            Some(table) => table.save(),
            None => Ok(()),
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.table, self.selected) {
            (None, _) => Phase::NoFile,
            (Some(_), None) => Phase::NoSelection,
            (Some(_), Some(index)) => Phase::Selected(index),
        }
    }

    pub fn table(&self) -> Option<&RecordTable> {
        self.table.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&Record> {
        let index = self.selected?;
        self.table.as_ref()?.get(index)
    }

    pub fn sub_tag(&self) -> &str {
        &self.sub_tag
    }

    /// The main tag currently shown in the picker
    pub fn main_tag(&self) -> MainTag {
        self.main_tag
    }

    fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, RecordTable::len)
    }

    fn select(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Some(record) = self.table.as_ref().and_then(|table| table.get(index)) else {
            return;
        };
        effects.push(Effect::ShowImage(PathBuf::from(&record.filename)));
        self.selected = Some(index);
        debug!("Selected row {}", index);
    }

    fn step(&mut self, delta: isize, effects: &mut Vec<Effect>) {
        let count = self.row_count();
        if count == 0 {
            return;
        }

        let target = match self.selected {
            None => 0,
            Some(current) => current.saturating_add_signed(delta).min(count - 1),
        };
        if self.selected != Some(target) {
            self.select(target, effects);
        }
    }

    fn assign(&mut self, tag: MainTag, effects: &mut Vec<Effect>) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(table) = self.table.as_mut() else {
            return;
        };

        let value = tag.compose(&self.sub_tag);
        if !table.set_tag(index, value) {
            return;
        }
        effects.push(Effect::Persist);
        self.sub_tag.clear();
        self.step(1, effects);
    }
}

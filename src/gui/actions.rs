use std::path::PathBuf;

use crate::spreadsheet::TemplateStyle;

// Panels push actions here instead of taking `&mut PipApp`; the app applies them after drawing
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    // Queue
    BeginEdit(usize),
    CommitEdit,
    CancelEdit,
    Remove(usize),
    RequestClear,
    Submit,

    // Import
    BrowseFile,
    ImportPath(PathBuf),
    SaveTemplate(TemplateStyle),

    // Modals
    OpenSettings,
    OpenReceiverScript,
}

pub struct ActionQueue {
    actions: Vec<UiAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: UiAction) {
        self.actions.push(action);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, UiAction> {
        self.actions.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

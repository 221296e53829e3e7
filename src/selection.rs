//! Which entry is being edited, and its unsaved changes.
//!
//! The controller never talks to the server. When moving away from a dirty
//! entry the caller asks for [`SelectionController::pending_flush`], saves
//! it, and only then switches with [`SelectionController::select`].

use crate::entry::{EditBuffer, Entry, EntryField, EntryStatus};
use crate::error::{Result, TermbaseError};
use crate::types::EntryId;

#[derive(Debug, Clone, Default)]
pub enum Selection {
    #[default]
    None,
    Selected(Box<EditBuffer>),
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match &self.state {
            Selection::None => None,
            Selection::Selected(buffer) => Some(buffer.as_ref()),
        }
    }

    fn buffer_mut(&mut self) -> Result<&mut EditBuffer> {
        match &mut self.state {
            Selection::None => Err(TermbaseError::NoSelection),
            Selection::Selected(buffer) => Ok(buffer.as_mut()),
        }
    }

    pub fn selected_id(&self) -> Option<EntryId> {
        self.buffer().and_then(EditBuffer::id)
    }

    pub fn is_selected(&self, id: EntryId) -> bool {
        self.selected_id() == Some(id)
    }

    pub fn status(&self) -> Option<EntryStatus> {
        self.buffer().map(EditBuffer::status)
    }

    /// The working copy, if it has unsaved edits
    pub fn pending_flush(&self) -> Option<&Entry> {
        self.buffer()
            .filter(|buffer| buffer.is_modified())
            .map(EditBuffer::working)
    }

    /// Start editing `entry`. Reselecting the current entry keeps its edits
    /// and returns false.
    pub fn select(&mut self, entry: Entry) -> bool {
        if entry.id.is_some() && self.selected_id() == entry.id {
            return false;
        }
        tracing::debug!("selected glossary entry {}", entry.label());
        self.state = Selection::Selected(Box::new(EditBuffer::new(entry)));
        true
    }

    pub fn clear(&mut self) {
        self.state = Selection::None;
    }

    /// Drop the selection if it is `id`, edits included. Used once the entry
    /// no longer exists remotely.
    pub fn forget(&mut self, id: EntryId) -> bool {
        if self.is_selected(id) {
            self.clear();
            true
        } else {
            false
        }
    }

    pub fn update_field(&mut self, field: EntryField, value: impl Into<String>) -> Result<EntryStatus> {
        let buffer = self.buffer_mut()?;
        buffer.update_field(field, value)?;
        Ok(buffer.status())
    }

    pub fn reset_field(&mut self, field: EntryField) -> Result<EntryStatus> {
        let buffer = self.buffer_mut()?;
        buffer.reset_field(field);
        Ok(buffer.status())
    }

    pub fn reset_entry(&mut self) -> Result<()> {
        self.buffer_mut()?.reset();
        Ok(())
    }

    /// Record a successful save of the selected entry
    pub fn commit(&mut self, saved: Entry) -> Result<()> {
        self.buffer_mut()?.commit(saved);
        Ok(())
    }
}

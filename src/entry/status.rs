//! Dirty tracking for the entry being edited.
//!
//! An [`EditBuffer`] keeps an immutable `pristine` snapshot next to the
//! `working` copy. Every field update recomputes only that field's bit in a
//! [`DirtyFields`] mask, so reading the status never walks whole entries.

use crate::error::Result;
use crate::types::EntryId;

use super::{Entry, EntryField};

/// Bitmask of fields whose working value differs from the pristine value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFields(u8);

impl DirtyFields {
    const fn bit(field: EntryField) -> u8 {
        match field {
            EntryField::SourceContent => 1 << 0,
            EntryField::TargetContent => 1 << 1,
            EntryField::TargetComment => 1 << 2,
            EntryField::PartOfSpeech => 1 << 3,
            EntryField::Description => 1 << 4,
        }
    }

    const SOURCE_MASK: u8 = Self::bit(EntryField::SourceContent)
        | Self::bit(EntryField::PartOfSpeech)
        | Self::bit(EntryField::Description);

    const TRANSLATION_MASK: u8 =
        Self::bit(EntryField::TargetContent) | Self::bit(EntryField::TargetComment);

    pub fn empty() -> Self {
        DirtyFields(0)
    }

    pub fn set(&mut self, field: EntryField, dirty: bool) {
        if dirty {
            self.0 |= Self::bit(field);
        } else {
            self.0 &= !Self::bit(field);
        }
    }

    pub fn contains(self, field: EntryField) -> bool {
        self.0 & Self::bit(field) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn any_source(self) -> bool {
        self.0 & Self::SOURCE_MASK != 0
    }

    pub fn any_translation(self) -> bool {
        self.0 & Self::TRANSLATION_MASK != 0
    }

    pub fn iter(self) -> impl Iterator<Item = EntryField> {
        EntryField::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Full diff of every field. Used when a pristine snapshot is replaced.
    pub fn diff(working: &Entry, pristine: &Entry) -> Self {
        let mut dirty = DirtyFields::empty();
        for field in EntryField::ALL {
            dirty.set(field, working.field(field) != pristine.field(field));
        }
        dirty
    }
}

/// Modification and validity flags of an edit buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStatus {
    /// Description, part of speech or source content changed
    pub is_src_modified: bool,
    /// Translation content or comment changed
    pub is_trans_modified: bool,
    /// Trimmed source content is non-empty
    pub is_src_valid: bool,
}

impl Default for EntryStatus {
    fn default() -> Self {
        Self {
            is_src_modified: false,
            is_trans_modified: false,
            is_src_valid: true,
        }
    }
}

impl EntryStatus {
    pub fn from_parts(dirty: DirtyFields, working: &Entry) -> Self {
        Self {
            is_src_modified: dirty.any_source(),
            is_trans_modified: dirty.any_translation(),
            is_src_valid: !working.source_term.content.trim().is_empty(),
        }
    }

    /// Whether there are unsaved edits
    pub fn is_modified(&self) -> bool {
        self.is_src_modified || self.is_trans_modified
    }
}

/// Pristine/working pair for the one entry being edited
#[derive(Debug, Clone)]
pub struct EditBuffer {
    pristine: Entry,
    working: Entry,
    dirty: DirtyFields,
}

impl EditBuffer {
    pub fn new(entry: Entry) -> Self {
        Self {
            working: entry.clone(),
            pristine: entry,
            dirty: DirtyFields::empty(),
        }
    }

    pub fn id(&self) -> Option<EntryId> {
        self.pristine.id
    }

    pub fn pristine(&self) -> &Entry {
        &self.pristine
    }

    pub fn working(&self) -> &Entry {
        &self.working
    }

    pub fn dirty(&self) -> DirtyFields {
        self.dirty
    }

    pub fn status(&self) -> EntryStatus {
        EntryStatus::from_parts(self.dirty, &self.working)
    }

    pub fn is_modified(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn update_field(&mut self, field: EntryField, value: impl Into<String>) -> Result<()> {
        self.working.set_field(field, value)?;
        self.dirty
            .set(field, self.working.field(field) != self.pristine.field(field));
        Ok(())
    }

    /// Restore one field from the pristine snapshot
    pub fn reset_field(&mut self, field: EntryField) {
        let original = self.pristine.field(field).to_string();
        // Only fails for translation fields when no target term exists, in
        // which case there is nothing to restore.
        if self.working.set_field(field, original).is_ok() {
            self.dirty.set(field, false);
        }
    }

    /// Discard every unsaved edit
    pub fn reset(&mut self) {
        self.working = self.pristine.clone();
        self.dirty = DirtyFields::empty();
    }

    /// Adopt `saved` as the new pristine snapshot after a successful save.
    /// Edits made to `working` since the save was issued stay dirty.
    pub fn commit(&mut self, saved: Entry) {
        if self.working.id.is_none() {
            self.working.id = saved.id;
        }
        self.pristine = saved;
        self.dirty = DirtyFields::diff(&self.working, &self.pristine);
    }
}

//! Glossary entries as the editing layer sees them.
//!
//! An [`Entry`] pairs a source-language [`Term`] with an optional translation
//! in the currently selected target locale. The wire shape lives in
//! [`mapper`]; dirty tracking over an edit buffer lives in [`status`].

pub mod mapper;
pub mod status;

use serde::{Deserialize, Serialize};

use crate::enum_display_fromstr;
use crate::error::{Result, TermbaseError};
use crate::types::EntryId;

pub use mapper::{GlossaryEntryDto, GlossaryTermDto, empty_entry, from_wire, to_dto};
pub use status::{DirtyFields, EditBuffer, EntryStatus};

/// One term in one locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub content: String,
    pub locale: String,
    pub comment: Option<String>,
    /// Only ever set on source terms
    pub reference: Option<String>,
    /// Display-formatted modification date
    pub last_modified: Option<String>,
    pub last_modified_by: Option<String>,
}

impl Term {
    /// A blank term for `locale`, used when no translation exists yet
    pub fn empty(locale: &str) -> Self {
        Term {
            content: String::new(),
            locale: locale.to_string(),
            comment: Some(String::new()),
            ..Default::default()
        }
    }
}

/// A glossary entry. Empty `part_of_speech` / `description` mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// `None` until the entry has been created remotely
    pub id: Option<EntryId>,
    pub source_term: Term,
    /// Present whenever a target locale is selected
    pub target_term: Option<Term>,
    pub part_of_speech: String,
    pub description: String,
    /// Number of translations, not counting the source term
    pub terms_count: u32,
}

/// Editable fields of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    SourceContent,
    TargetContent,
    TargetComment,
    PartOfSpeech,
    Description,
}

enum_display_fromstr!(
    EntryField,
    TermbaseError::invalid_field,
    {
        SourceContent => "src",
        TargetContent => "trans",
        TargetComment => "comment",
        PartOfSpeech => "pos",
        Description => "description",
    }
);

impl EntryField {
    pub const ALL: [EntryField; 5] = [
        EntryField::SourceContent,
        EntryField::TargetContent,
        EntryField::TargetComment,
        EntryField::PartOfSpeech,
        EntryField::Description,
    ];

    /// Whether the field belongs to the translation rather than the source
    pub fn is_translation(self) -> bool {
        matches!(self, EntryField::TargetContent | EntryField::TargetComment)
    }
}

impl Entry {
    /// Current value of `field`; missing values read as empty strings
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::SourceContent => &self.source_term.content,
            EntryField::TargetContent => self
                .target_term
                .as_ref()
                .map(|t| t.content.as_str())
                .unwrap_or(""),
            EntryField::TargetComment => self
                .target_term
                .as_ref()
                .and_then(|t| t.comment.as_deref())
                .unwrap_or(""),
            EntryField::PartOfSpeech => &self.part_of_speech,
            EntryField::Description => &self.description,
        }
    }

    /// Overwrite `field`. Translation fields need a target term, which exists
    /// only while a target locale is selected.
    pub fn set_field(&mut self, field: EntryField, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        match field {
            EntryField::SourceContent => self.source_term.content = value,
            EntryField::PartOfSpeech => self.part_of_speech = value,
            EntryField::Description => self.description = value,
            EntryField::TargetContent | EntryField::TargetComment => {
                let target = self.target_term.as_mut().ok_or_else(|| {
                    TermbaseError::InvalidEntry(
                        "cannot edit a translation without a target locale".to_string(),
                    )
                })?;
                if field == EntryField::TargetContent {
                    target.content = value;
                } else {
                    target.comment = Some(value);
                }
            }
        }
        Ok(())
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Display label used in logs and notifications
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("#{id} '{}'", self.source_term.content),
            None => format!("new entry '{}'", self.source_term.content),
        }
    }
}

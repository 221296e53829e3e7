#[macro_use]
pub mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod entry;
pub mod error;
pub mod gateway;
pub mod notification;
pub mod prefetch;
pub mod query;
pub mod selection;
pub mod session;
pub mod types;

pub use config::Config;
pub use entry::{Entry, EntryField, EntryStatus, GlossaryEntryDto, Term};
pub use error::{Result, TermbaseError};
pub use gateway::{EntryPage, GlossaryGateway, GlossaryStats, HttpGateway, ImportRequest};
pub use notification::{Notification, Severity};
pub use prefetch::{Debouncer, VisibleRange, fetch_targets};
pub use query::{FetchOutcome, FetchTicket, PageRequest, QueryState, SortSpec, UrlState};
pub use selection::{Selection, SelectionController};
pub use session::GlossarySession;
pub use types::{EntryId, GLOSSARY_PAGE_SIZE, page_for};

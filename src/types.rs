use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TermbaseError;

/// Directory holding local termbase settings.
pub const TERMBASE_DIR: &str = ".termbase";

/// Number of entries per remote page. Fixed by the server API.
pub const GLOSSARY_PAGE_SIZE: usize = 1000;

pub const DEFAULT_SRC_LOCALE: &str = "en-US";

/// Quiescence window for scroll events before an evaluation runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// How far past the visible range neighbouring pages are preloaded.
pub const DEFAULT_PREFETCH_THRESHOLD: usize = 250;

/// Column the server sorts by when no sort is given.
pub const DEFAULT_SORT_COLUMN: &str = "src_content";

/// Stable identifier of an entry in the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(id: u64) -> Self {
        EntryId(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        EntryId(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = TermbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(EntryId)
            .map_err(|_| TermbaseError::InvalidEntry(format!("'{s}' is not a valid entry id")))
    }
}

/// Compute the 1-based page holding `index`.
pub fn page_for(index: usize, page_size: usize) -> u32 {
    (index / page_size) as u32 + 1
}

/// First absolute index covered by `page`.
pub fn page_offset(page: u32, page_size: usize) -> usize {
    (page.saturating_sub(1) as usize) * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_for_boundaries() {
        assert_eq!(page_for(0, GLOSSARY_PAGE_SIZE), 1);
        assert_eq!(page_for(999, GLOSSARY_PAGE_SIZE), 1);
        assert_eq!(page_for(1000, GLOSSARY_PAGE_SIZE), 2);
        assert_eq!(page_for(2050, GLOSSARY_PAGE_SIZE), 3);
    }

    #[test]
    fn test_page_for_matches_floor_division() {
        for index in (0..10_000).step_by(37) {
            assert_eq!(
                page_for(index, GLOSSARY_PAGE_SIZE) as usize,
                index / GLOSSARY_PAGE_SIZE + 1
            );
        }
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, GLOSSARY_PAGE_SIZE), 0);
        assert_eq!(page_offset(3, GLOSSARY_PAGE_SIZE), 2000);
    }

    #[test]
    fn test_entry_id_parse() {
        assert_eq!("42".parse::<EntryId>().unwrap(), EntryId::new(42));
        assert_eq!(" 7 ".parse::<EntryId>().unwrap(), EntryId::new(7));
        assert!("abc".parse::<EntryId>().is_err());
        assert!("-1".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_entry_id_serde_is_transparent() {
        let json = serde_json::to_string(&EntryId::new(7)).unwrap();
        assert_eq!(json, "7");
        let id: EntryId = serde_json::from_str("12").unwrap();
        assert_eq!(id.get(), 12);
    }
}

//! Page-indexed store of loaded glossary entries.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::entry::Entry;
use crate::types::{EntryId, page_for, page_offset};

/// Entries keyed by id, with an index of which ids each page holds.
///
/// Pages are tracked in an [`LruCache`]. Unbounded unless a page limit is
/// given, in which case the least recently used page is dropped together
/// with its entries once the limit is exceeded.
pub struct PageCache {
    page_size: usize,
    pages: LruCache<u32, Vec<EntryId>>,
    entries: HashMap<EntryId, Entry>,
    total_count: usize,
}

impl PageCache {
    pub fn new(page_size: usize, max_pages: Option<NonZeroUsize>) -> Self {
        let pages = match max_pages {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            page_size,
            pages,
            entries: HashMap::new(),
            total_count: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// No entries have been loaded at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn set_total_count(&mut self, total: usize) {
        self.total_count = total;
    }

    pub fn contains_page(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    /// Cached page numbers, ascending
    pub fn pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.pages.iter().map(|(page, _)| *page).collect();
        pages.sort_unstable();
        pages
    }

    /// Store the entries of `page`, replacing what it held before. Returns the
    /// page evicted to make room, if any.
    pub fn insert_page(&mut self, page: u32, entries: Vec<Entry>) -> Option<u32> {
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.id {
                Some(id) => {
                    ids.push(id);
                    self.entries.insert(id, entry);
                }
                None => tracing::warn!("dropping glossary entry without id on page {}", page),
            }
        }

        let (dropped_page, dropped_ids) = self.pages.push(page, ids)?;
        self.release(dropped_ids);

        if dropped_page == page {
            None
        } else {
            tracing::debug!("evicted glossary page {} from cache", dropped_page);
            Some(dropped_page)
        }
    }

    /// Drop the entries of `ids` that no cached page lists any more. After a
    /// reorder an id can move from one page to another.
    fn release(&mut self, ids: Vec<EntryId>) {
        let referenced: HashSet<EntryId> = self
            .pages
            .iter()
            .flat_map(|(_, page_ids)| page_ids.iter().copied())
            .collect();
        for id in ids.into_iter().filter(|id| !referenced.contains(id)) {
            self.entries.remove(&id);
        }
    }

    /// Mark `page` as recently used
    pub fn touch(&mut self, page: u32) {
        self.pages.promote(&page);
    }

    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        if index >= self.total_count {
            return None;
        }
        let page = page_for(index, self.page_size);
        let ids = self.pages.peek(&page)?;
        ids.get(index - page_offset(page, self.page_size)).copied()
    }

    /// Entry shown at absolute `index`, if its page is loaded
    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.id_at(index).and_then(|id| self.entries.get(&id))
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    /// Replace a cached entry with a freshly saved version. Entries not in the
    /// cache are left out; they show up with their page.
    pub fn update(&mut self, entry: Entry) -> bool {
        match entry.id.and_then(|id| self.entries.get_mut(&id)) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        self.entries.remove(&id)
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.entries.clear();
        self.total_count = 0;
    }
}

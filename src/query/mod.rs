//! The paginated window over the remote glossary.
//!
//! [`QueryState`] owns the query parameters (locales, filter, sort), the
//! current scroll position and the [`PageCache`]. It decides which pages
//! need fetching and merges responses back in, discarding responses that
//! belong to a query which has since been invalidated.
//!
//! Fetching itself happens elsewhere: [`QueryState::begin_fetch`] hands out a
//! [`FetchTicket`] describing the request, and the response is fed back with
//! [`QueryState::complete_fetch`].

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;

use crate::config::Config;
use crate::entry::{Entry, from_wire};
use crate::error::Result;
use crate::gateway::EntryPage;
use crate::types::{EntryId, GLOSSARY_PAGE_SIZE, page_for, page_offset};

pub mod cache;
pub mod sort;
pub mod url;

pub use cache::PageCache;
pub use sort::SortSpec;
pub use url::UrlState;

/// Parameters of one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub src_locale: String,
    pub target_locale: Option<String>,
    pub filter: String,
    pub sort: SortSpec,
    pub page: u32,
    pub page_size: usize,
}

impl PageRequest {
    /// Query parameters in the order the server documents them. Empty
    /// optional parameters are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("srcLocale", self.src_locale.clone())];
        if let Some(locale) = self.target_locale.as_ref().filter(|l| !l.is_empty()) {
            pairs.push(("transLocale", locale.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("sizePerPage", self.page_size.to_string()));
        if !self.filter.is_empty() {
            pairs.push(("filter", self.filter.clone()));
        }
        if !self.sort.is_empty() {
            pairs.push(("sort", self.sort.to_param()));
        }
        pairs
    }
}

/// An issued page request. Carries what is needed to recognise a stale
/// response when it comes back.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub page: u32,
    pub request: PageRequest,
    generation: u64,
    seq: u64,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Merged { page: u32, entries: usize },
    /// The query changed while the request was in flight
    Discarded { page: u32 },
}

pub struct QueryState {
    src_locale: String,
    target_locale: Option<String>,
    filter: String,
    sort: SortSpec,
    index: usize,
    page_size: usize,
    cache: PageCache,
    /// Pages merged since the last invalidation
    loaded: BTreeSet<u32>,
    invalidated: bool,
    invalidated_page: Option<u32>,
    in_flight: BTreeSet<u32>,
    generation: u64,
    next_seq: u64,
    latest_seq: HashMap<u32, u64>,
}

impl QueryState {
    pub fn new(src_locale: &str, page_size: usize, max_pages: Option<NonZeroUsize>) -> Self {
        Self {
            src_locale: src_locale.to_string(),
            target_locale: None,
            filter: String::new(),
            sort: SortSpec::new(),
            index: 0,
            page_size,
            cache: PageCache::new(page_size, max_pages),
            loaded: BTreeSet::new(),
            invalidated: false,
            invalidated_page: None,
            in_flight: BTreeSet::new(),
            generation: 0,
            next_seq: 0,
            latest_seq: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut state = Self::new(
            &config.locale.source,
            GLOSSARY_PAGE_SIZE,
            config.cache.max_pages,
        );
        state.target_locale = config.locale.target.clone();
        state
    }

    pub fn page_for(&self, index: usize) -> u32 {
        page_for(index, self.page_size)
    }

    /// Whether the page holding `index` should be requested now.
    ///
    /// In order: fetch when nothing is cached yet; never while any fetch is
    /// outstanding; fetch when the page was not loaded; otherwise fetch only
    /// if the data was invalidated.
    pub fn should_fetch(&self, index: usize) -> bool {
        if self.cache.is_empty() {
            return true;
        }
        if !self.in_flight.is_empty() {
            return false;
        }
        if !self.loaded.contains(&self.page_for(index)) {
            return true;
        }
        self.invalidated
    }

    /// Any page request outstanding
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Start a fetch for the page holding `index` if one is needed and that
    /// page has no request outstanding already.
    pub fn begin_fetch(&mut self, index: usize) -> Option<FetchTicket> {
        if !self.should_fetch(index) {
            return None;
        }
        let page = self.page_for(index);
        if !self.in_flight.insert(page) {
            return None;
        }

        Some(self.issue(page))
    }

    /// Request the page in view unconditionally, for use right after the
    /// query parameters changed. Outstanding requests do not hold it back; an
    /// older request for the same page is superseded and its response
    /// discarded.
    pub fn begin_refetch(&mut self) -> FetchTicket {
        let page = self.page_for(self.index);
        self.in_flight.insert(page);
        self.issue(page)
    }

    fn issue(&mut self, page: u32) -> FetchTicket {
        self.next_seq += 1;
        self.latest_seq.insert(page, self.next_seq);
        tracing::debug!(
            "fetching glossary page {} (generation {})",
            page,
            self.generation
        );

        FetchTicket {
            page,
            request: self.page_request(page),
            generation: self.generation,
            seq: self.next_seq,
        }
    }

    /// Settle `ticket` with the gateway's answer. The page leaves the
    /// in-flight set whatever the outcome, unless a newer request for it is
    /// still outstanding.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        response: Result<EntryPage>,
    ) -> Result<FetchOutcome> {
        let latest = self.latest_seq.get(&ticket.page) == Some(&ticket.seq);
        if latest {
            self.in_flight.remove(&ticket.page);
        }

        let page_data = response.inspect_err(|e| {
            tracing::warn!("glossary page {} failed to load: {}", ticket.page, e);
        })?;

        if !latest || ticket.generation != self.generation {
            tracing::debug!("discarding stale response for glossary page {}", ticket.page);
            return Ok(FetchOutcome::Discarded { page: ticket.page });
        }

        let target = ticket.request.target_locale.as_deref();
        let entries: Vec<Entry> = page_data
            .results
            .iter()
            .map(|dto| from_wire(dto, target))
            .collect();
        let count = entries.len();
        self.merge(ticket.page, entries, page_data.total_count);

        Ok(FetchOutcome::Merged {
            page: ticket.page,
            entries: count,
        })
    }

    /// Store a page of entries and the reported total. Clears the
    /// invalidation once the page that was current when it happened, or the
    /// page now in view, has been reloaded.
    pub fn merge(&mut self, page: u32, entries: Vec<Entry>, total_count: usize) {
        self.cache.set_total_count(total_count);
        if let Some(evicted) = self.cache.insert_page(page, entries) {
            self.loaded.remove(&evicted);
        }
        self.loaded.insert(page);

        if self.invalidated
            && (self.invalidated_page == Some(page) || self.page_for(self.index) == page)
        {
            self.invalidated = false;
            self.invalidated_page = None;
        }
    }

    /// Forget which pages are loaded so each is requested again on next view.
    /// Cached entries stay visible until replaced. Responses to requests
    /// already in flight will be discarded.
    pub fn invalidate(&mut self) {
        self.loaded.clear();
        self.invalidated = true;
        self.invalidated_page = Some(self.page_for(self.index));
        self.generation += 1;
        tracing::debug!("glossary query invalidated (generation {})", self.generation);
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    fn page_request(&self, page: u32) -> PageRequest {
        PageRequest {
            src_locale: self.src_locale.clone(),
            target_locale: self.target_locale.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            page,
            page_size: self.page_size,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
        let page = self.page_for(index);
        self.cache.touch(page);
    }

    pub fn src_locale(&self) -> &str {
        &self.src_locale
    }

    pub fn set_src_locale(&mut self, locale: &str) {
        if self.src_locale != locale {
            self.src_locale = locale.to_string();
            self.invalidate();
        }
    }

    pub fn target_locale(&self) -> Option<&str> {
        self.target_locale.as_deref()
    }

    /// Returns whether the locale changed
    pub fn set_target_locale(&mut self, locale: Option<String>) -> bool {
        let locale = locale.filter(|l| !l.is_empty());
        if self.target_locale == locale {
            return false;
        }
        self.target_locale = locale;
        self.invalidate();
        true
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns whether the filter changed
    pub fn set_filter(&mut self, filter: &str) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter.to_string();
        self.invalidate();
        true
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Returns whether the sort changed
    pub fn set_sort(&mut self, sort: SortSpec) -> bool {
        if self.sort == sort {
            return false;
        }
        self.sort = sort;
        self.invalidate();
        true
    }

    /// Flip one column's direction and invalidate. Returns the new direction.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        let ascending = self.sort.toggle(column);
        self.invalidate();
        ascending
    }

    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.cache.entry_at(index)
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.cache.get(id)
    }

    pub fn update_entry(&mut self, entry: Entry) -> bool {
        self.cache.update(entry)
    }

    pub fn remove_entry(&mut self, id: EntryId) -> Option<Entry> {
        self.cache.remove(id)
    }

    pub fn total_count(&self) -> usize {
        self.cache.total_count()
    }

    /// Pages merged since the last invalidation, ascending
    pub fn loaded_pages(&self) -> Vec<u32> {
        self.loaded.iter().copied().collect()
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current listing parameters in URL form
    pub fn url_state(&self) -> UrlState {
        UrlState {
            src_locale: Some(self.src_locale.clone()),
            locale: self.target_locale.clone(),
            filter: Some(self.filter.clone()),
            sort: (!self.sort.is_empty()).then(|| self.sort.to_param()),
            index: Some(self.index),
            page: None,
        }
    }

    /// Adopt the parameters present in `state`. An explicit `index` wins over
    /// `page`; a `page` alone scrolls to its first entry.
    pub fn apply_url_state(&mut self, state: &UrlState) -> Result<()> {
        if let Some(sort) = &state.sort {
            self.set_sort(SortSpec::parse(sort)?);
        }
        if let Some(src) = &state.src_locale {
            self.set_src_locale(src);
        }
        if state.locale.is_some() {
            self.set_target_locale(state.locale.clone());
        }
        if let Some(filter) = &state.filter {
            self.set_filter(filter);
        }
        match (state.index, state.page) {
            (Some(index), _) => self.set_index(index),
            (None, Some(page)) => self.set_index(page_offset(page, self.page_size)),
            (None, None) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{GlossaryEntryDto, GlossaryTermDto};
    use crate::error::TermbaseError;

    const PAGE: usize = 10;

    fn state() -> QueryState {
        QueryState::new("en-US", PAGE, None)
    }

    fn page_of(first_id: u64, len: u64, total: usize) -> EntryPage {
        EntryPage {
            results: (first_id..first_id + len)
                .map(|id| GlossaryEntryDto {
                    id: Some(EntryId::new(id)),
                    src_lang: "en-US".to_string(),
                    glossary_terms: vec![GlossaryTermDto {
                        content: format!("term-{id}"),
                        locale: "en-US".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                })
                .collect(),
            total_count: total,
        }
    }

    fn load(state: &mut QueryState, index: usize, first_id: u64, total: usize) {
        let ticket = state.begin_fetch(index).unwrap();
        state
            .complete_fetch(&ticket, Ok(page_of(first_id, PAGE as u64, total)))
            .unwrap();
    }

    #[test]
    fn test_empty_cache_always_fetches() {
        let mut state = state();
        assert!(state.should_fetch(0));
        let _ticket = state.begin_fetch(0).unwrap();
        // still empty: the first rule wins over the in-flight rule
        assert!(state.should_fetch(55));
    }

    #[test]
    fn test_no_fetch_while_loading_once_cache_has_data() {
        let mut state = state();
        load(&mut state, 0, 0, 100);

        let _ticket = state.begin_fetch(15).unwrap();
        assert!(state.is_loading());
        assert!(!state.should_fetch(35));
        assert!(state.begin_fetch(35).is_none());
    }

    #[test]
    fn test_loaded_page_is_not_refetched() {
        let mut state = state();
        load(&mut state, 0, 0, 100);
        assert!(!state.should_fetch(5));
        assert!(state.should_fetch(10));
    }

    #[test]
    fn test_invalidate_forces_refetch_of_loaded_page() {
        let mut state = state();
        load(&mut state, 0, 0, 100);
        state.invalidate();
        assert!(state.should_fetch(5));
        assert!(state.loaded_pages().is_empty());

        // cached entries remain visible until replaced
        assert!(state.entry_at(3).is_some());

        load(&mut state, 0, 500, 100);
        assert!(!state.is_invalidated());
        assert!(!state.should_fetch(5));
        assert_eq!(state.entry_at(0).unwrap().id, Some(EntryId::new(500)));
    }

    #[test]
    fn test_one_request_per_page() {
        let mut state = state();
        assert!(state.begin_fetch(3).is_some());
        assert!(state.begin_fetch(7).is_none());
        assert!(state.begin_fetch(12).is_some());
    }

    #[test]
    fn test_failed_fetch_clears_in_flight() {
        let mut state = state();
        load(&mut state, 0, 0, 100);
        let ticket = state.begin_fetch(25).unwrap();
        let result = state.complete_fetch(
            &ticket,
            Err(TermbaseError::FetchFailure("503 Service Unavailable".to_string())),
        );
        assert!(matches!(result, Err(TermbaseError::FetchFailure(_))));
        assert!(!state.is_loading());
        assert!(state.should_fetch(25));
    }

    #[test]
    fn test_response_after_invalidate_is_discarded() {
        let mut state = state();
        load(&mut state, 0, 0, 100);

        let ticket = state.begin_fetch(10).unwrap();
        state.set_filter("dog");
        let outcome = state
            .complete_fetch(&ticket, Ok(page_of(10, PAGE as u64, 100)))
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Discarded { page: 2 });
        assert!(state.entry_at(10).is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_refetch_ignores_outstanding_requests() {
        let mut state = state();
        load(&mut state, 0, 0, 100);
        let old = state.begin_fetch(15).unwrap();

        state.toggle_sort("pos");
        assert!(state.begin_fetch(0).is_none());
        let fresh = state.begin_refetch();
        assert_eq!(fresh.page, 1);
        assert_eq!(fresh.request.sort.to_param(), "pos");

        let outcome = state
            .complete_fetch(&old, Ok(page_of(10, PAGE as u64, 100)))
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Discarded { page: 2 });
        assert!(state.is_loading());

        let outcome = state
            .complete_fetch(&fresh, Ok(page_of(900, PAGE as u64, 100)))
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Merged { page: 1, entries: 10 });
        assert!(!state.is_loading());
        assert!(!state.is_invalidated());
        assert_eq!(state.entry_at(0).unwrap().id, Some(EntryId::new(900)));
    }

    #[test]
    fn test_refetch_supersedes_request_for_same_page() {
        let mut state = state();
        load(&mut state, 0, 0, 100);
        state.set_filter("cat");
        let first = state.begin_refetch();
        state.set_filter("dog");
        let second = state.begin_refetch();

        // the superseded answer neither merges nor ends the newer request
        let outcome = state
            .complete_fetch(&first, Ok(page_of(100, PAGE as u64, 100)))
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Discarded { page: 1 });
        assert!(state.is_loading());

        state
            .complete_fetch(&second, Ok(page_of(200, PAGE as u64, 100)))
            .unwrap();
        assert!(!state.is_loading());
        assert_eq!(state.entry_at(0).unwrap().id, Some(EntryId::new(200)));
    }

    #[test]
    fn test_request_carries_current_parameters() {
        let mut state = state();
        state.set_target_locale(Some("de".to_string()));
        state.set_filter("cat");
        state.toggle_sort("pos");
        let ticket = state.begin_fetch(2500).unwrap();

        assert_eq!(ticket.page, 251);
        assert_eq!(
            ticket.request.query_pairs(),
            vec![
                ("srcLocale", "en-US".to_string()),
                ("transLocale", "de".to_string()),
                ("page", "251".to_string()),
                ("sizePerPage", "10".to_string()),
                ("filter", "cat".to_string()),
                ("sort", "pos".to_string()),
            ]
        );
    }

    #[test]
    fn test_translation_mapped_with_request_locale() {
        let mut state = state();
        state.set_target_locale(Some("de".to_string()));
        load(&mut state, 0, 0, 5);
        let entry = state.entry_at(0).unwrap();
        assert_eq!(entry.target_term.as_ref().unwrap().locale, "de");
    }

    #[test]
    fn test_bounded_cache_forgets_evicted_pages() {
        let mut state = QueryState::new("en-US", PAGE, NonZeroUsize::new(2));
        load(&mut state, 0, 0, 100);
        load(&mut state, 10, 10, 100);
        state.set_index(0);
        load(&mut state, 20, 20, 100);

        assert_eq!(state.loaded_pages(), vec![1, 3]);
        assert!(state.should_fetch(15));
        assert!(state.entry_at(15).is_none());
    }

    #[test]
    fn test_url_state_round_trip() {
        let mut state = state();
        let url = UrlState::parse("locale=fr&filter=tree&sort=-src_content&page=3");
        state.apply_url_state(&url).unwrap();

        assert_eq!(state.target_locale(), Some("fr"));
        assert_eq!(state.filter(), "tree");
        assert_eq!(state.sort().to_param(), "-src_content");
        assert_eq!(state.index(), 20);

        let back = state.url_state();
        assert_eq!(back.locale.as_deref(), Some("fr"));
        assert_eq!(back.index, Some(20));
    }

    #[test]
    fn test_apply_url_state_rejects_bad_sort() {
        let mut state = state();
        let url = UrlState::parse("sort=pos,,src");
        assert!(state.apply_url_state(&url).is_err());
    }
}

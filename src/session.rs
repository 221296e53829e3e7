//! The glossary editing session.
//!
//! [`GlossarySession`] ties the paginated [`QueryState`], the
//! [`SelectionController`] and a [`GlossaryGateway`] together and exposes the
//! commands a front end issues: scrolling, selecting and editing entries,
//! sorting, filtering, and the mutating operations. Failures are returned to
//! the caller and also queued as [`Notification`]s for display.

use futures::future::join_all;

use crate::config::{Config, PrefetchConfig};
use crate::entry::{Entry, EntryField, EntryStatus, Term, empty_entry, from_wire, to_dto};
use crate::error::{Result, TermbaseError};
use crate::gateway::{EntryPage, GlossaryGateway, GlossaryStats, ImportRequest};
use crate::notification::Notification;
use crate::prefetch::{Debouncer, VisibleRange, fetch_targets};
use crate::query::{FetchOutcome, FetchTicket, QueryState, SortSpec, UrlState};
use crate::selection::SelectionController;
use crate::types::EntryId;

pub struct GlossarySession<G> {
    gateway: G,
    query: QueryState,
    selection: SelectionController,
    prefetch: PrefetchConfig,
    stats: Option<GlossaryStats>,
    stats_loading: bool,
    notifications: Vec<Notification>,
}

impl<G: GlossaryGateway> GlossarySession<G> {
    pub fn new(gateway: G, config: &Config) -> Self {
        Self::with_query(gateway, QueryState::from_config(config), config.prefetch)
    }

    pub fn with_query(gateway: G, query: QueryState, prefetch: PrefetchConfig) -> Self {
        Self {
            gateway,
            query,
            selection: SelectionController::new(),
            prefetch,
            stats: None,
            stats_loading: false,
            notifications: Vec::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn stats(&self) -> Option<&GlossaryStats> {
        self.stats.as_ref()
    }

    pub fn is_stats_loading(&self) -> bool {
        self.stats_loading
    }

    pub fn is_loading(&self) -> bool {
        self.query.is_loading()
    }

    /// Entry displayed at `index`, or `None` while its page is not loaded
    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.query.entry_at(index)
    }

    /// The working copy of the selected entry
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selection.buffer().map(|buffer| buffer.working())
    }

    pub fn status(&self) -> Option<EntryStatus> {
        self.selection.status()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Current listing parameters, for writing back into the address bar
    pub fn url_state(&self) -> UrlState {
        self.query.url_state()
    }

    fn report(&mut self, error: &TermbaseError) {
        self.notifications.push(Notification::from_error(error));
    }

    /// Low-level half of a fetch, for callers that run the request
    /// themselves. Returns `None` when no request is needed.
    pub fn begin_page_fetch(&mut self, index: usize) -> Option<FetchTicket> {
        self.query.begin_fetch(index)
    }

    /// Settle a ticket from [`Self::begin_page_fetch`]. A failure is reported
    /// as a notification and yields `None`.
    pub fn finish_page_fetch(
        &mut self,
        ticket: &FetchTicket,
        response: Result<EntryPage>,
    ) -> Option<FetchOutcome> {
        match self.query.complete_fetch(ticket, response) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Check each index and fetch the pages that need it, concurrently.
    /// Returns the number of pages merged.
    async fn fetch_indices(&mut self, indices: &[usize]) -> usize {
        let total = self.query.total_count();
        let known_total = !self.query.cache().is_empty();
        let tickets: Vec<FetchTicket> = indices
            .iter()
            .filter(|&&index| !known_total || index < total)
            .filter_map(|&index| self.query.begin_fetch(index))
            .collect();
        self.run_tickets(tickets).await
    }

    async fn run_tickets(&mut self, tickets: Vec<FetchTicket>) -> usize {
        if tickets.is_empty() {
            return 0;
        }

        let gateway = &self.gateway;
        let responses = join_all(
            tickets
                .iter()
                .map(|ticket| gateway.fetch_entries(&ticket.request)),
        )
        .await;

        let mut merged = 0;
        for (ticket, response) in tickets.iter().zip(responses) {
            if let Some(FetchOutcome::Merged { .. }) = self.finish_page_fetch(ticket, response) {
                merged += 1;
            }
        }
        merged
    }

    /// Fetch the page holding `index` if it needs fetching
    pub async fn fetch_if_needed(&mut self, index: usize) -> usize {
        self.fetch_indices(&[index]).await
    }

    /// Load the page in view under the current parameters, even while other
    /// pages are still loading. Answers to older requests are discarded.
    async fn refetch_current(&mut self) -> usize {
        let ticket = self.query.begin_refetch();
        self.run_tickets(vec![ticket]).await
    }

    /// Reload the page in view if the query was invalidated, otherwise only
    /// if it is missing
    async fn reload_current(&mut self) -> usize {
        if self.query.is_invalidated() {
            self.refetch_current().await
        } else {
            let index = self.query.index();
            self.fetch_if_needed(index).await
        }
    }

    /// The view settled on `range`: remember the position and preload around
    /// it. Indices past the end of a known collection are skipped.
    pub async fn scrolled_to(&mut self, range: VisibleRange) -> usize {
        self.query.set_index(range.start);
        let targets = fetch_targets(range, self.prefetch.threshold);
        self.fetch_indices(&targets).await
    }

    /// Drive prefetching from debounced scroll events until the sender side
    /// closes.
    pub async fn run_prefetch(&mut self, debouncer: &mut Debouncer<VisibleRange>) {
        while let Some(range) = debouncer.next().await {
            self.scrolled_to(range).await;
        }
    }

    /// Invalidate and reload the page in view
    pub async fn refresh(&mut self) -> usize {
        self.query.invalidate();
        self.refetch_current().await
    }

    /// Reload per-locale term counts. On success the page in view is reloaded
    /// too, as counts only change when entries do.
    pub async fn load_stats(&mut self) -> Result<()> {
        self.stats_loading = true;
        let result = self.gateway.fetch_stats().await;
        self.stats_loading = false;

        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                self.reload_current().await;
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Restore listing parameters from a URL, then load stats and the page
    /// in view. The page is loaded even when stats are unavailable.
    pub async fn initial_load(&mut self, url: &UrlState) -> Result<()> {
        self.query.apply_url_state(url)?;
        self.reload_stats_and_page().await
    }

    async fn reload_stats_and_page(&mut self) -> Result<()> {
        let result = self.load_stats().await;
        if result.is_err() {
            self.reload_current().await;
        }
        result
    }

    async fn after_mutation(&mut self) {
        self.query.invalidate();
        // a stats failure has already been reported
        let _ = self.reload_stats_and_page().await;
    }

    /// Save `entry` and refresh. On failure nothing local changes.
    async fn persist(&mut self, entry: &Entry) -> Result<Entry> {
        let dto = to_dto(entry);
        let response = self.gateway.save_entries(std::slice::from_ref(&dto)).await;
        let saved = match response {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("failed to save {}: {}", entry.label(), e);
                self.report(&e);
                return Err(e);
            }
        };

        let target = self.query.target_locale().map(str::to_string);
        let saved = saved
            .first()
            .map(|dto| from_wire(dto, target.as_deref()))
            .unwrap_or_else(|| entry.clone());
        tracing::info!("saved glossary entry {}", saved.label());

        self.query.update_entry(saved.clone());
        self.after_mutation().await;
        Ok(saved)
    }

    /// Select `id` for editing. Unsaved edits of the previous selection are
    /// saved first; if that save fails the previous selection is kept, edits
    /// included, and the error is returned.
    pub async fn select_entry(&mut self, id: EntryId) -> Result<()> {
        if self.selection.is_selected(id) {
            return Ok(());
        }
        let entry = self
            .query
            .entry(id)
            .cloned()
            .ok_or_else(|| TermbaseError::EntryNotLoaded(id.to_string()))?;

        self.flush_selection().await?;
        self.selection.select(entry);
        Ok(())
    }

    /// Deselect, saving unsaved edits first
    pub async fn clear_selection(&mut self) -> Result<()> {
        self.flush_selection().await?;
        self.selection.clear();
        Ok(())
    }

    async fn flush_selection(&mut self) -> Result<()> {
        let Some(dirty) = self.selection.pending_flush().cloned() else {
            return Ok(());
        };
        tracing::debug!("flushing unsaved edits of {}", dirty.label());
        let saved = self.persist(&dirty).await?;
        self.selection.commit(saved)
    }

    pub fn update_field(&mut self, field: EntryField, value: impl Into<String>) -> Result<EntryStatus> {
        self.selection.update_field(field, value)
    }

    pub fn reset_field(&mut self, field: EntryField) -> Result<EntryStatus> {
        self.selection.reset_field(field)
    }

    pub fn reset_entry(&mut self) -> Result<()> {
        self.selection.reset_entry()
    }

    /// Save the selected entry. Its source content must not be blank.
    pub async fn save_entry(&mut self) -> Result<Entry> {
        let buffer = self.selection.buffer().ok_or(TermbaseError::NoSelection)?;
        let valid = buffer.status().is_src_valid;
        let working = buffer.working().clone();
        if !valid {
            let err = TermbaseError::InvalidEntry("source term must not be empty".to_string());
            self.report(&err);
            return Err(err);
        }

        let saved = self.persist(&working).await?;
        self.selection.commit(saved.clone())?;
        Ok(saved)
    }

    /// A blank entry in the current source locale, with a translation slot
    /// when a target locale is selected
    pub fn new_entry(&self) -> Entry {
        let mut entry = empty_entry(self.query.src_locale());
        if let Some(locale) = self.query.target_locale() {
            entry.target_term = Some(Term::empty(locale));
        }
        entry
    }

    /// Create a new entry remotely
    pub async fn create_entry(&mut self, entry: Entry) -> Result<Entry> {
        if entry.source_term.content.trim().is_empty() {
            let err = TermbaseError::InvalidEntry("source term must not be empty".to_string());
            self.report(&err);
            return Err(err);
        }
        let saved = self.persist(&entry).await?;
        self.notifications
            .push(Notification::info(format!("Created glossary entry {}", saved.label())));
        Ok(saved)
    }

    /// Delete an entry remotely. A selected entry is deselected without
    /// saving.
    pub async fn delete_entry(&mut self, id: EntryId) -> Result<()> {
        if let Err(e) = self.gateway.delete_entry(id).await {
            tracing::warn!("failed to delete glossary entry {}: {}", id, e);
            self.report(&e);
            return Err(e);
        }
        tracing::info!("deleted glossary entry {}", id);

        self.selection.forget(id);
        self.query.remove_entry(id);
        self.after_mutation().await;
        Ok(())
    }

    pub async fn import_file(&mut self, request: &ImportRequest) -> Result<()> {
        if let Err(e) = self.gateway.import_file(request).await {
            tracing::warn!("failed to import {}: {}", request.file_name, e);
            self.report(&e);
            return Err(e);
        }
        tracing::info!(
            "imported {} into {}",
            request.file_name,
            request.trans_locale
        );
        self.notifications
            .push(Notification::info(format!("Imported {}", request.file_name)));
        self.after_mutation().await;
        Ok(())
    }

    /// Flip the sort direction of `column` and reload. Returns the new
    /// direction.
    pub async fn toggle_sort(&mut self, column: &str) -> bool {
        let ascending = self.query.toggle_sort(column);
        self.refetch_current().await;
        ascending
    }

    /// Replace the sort order. Returns whether it changed.
    pub async fn set_sort(&mut self, sort: SortSpec) -> bool {
        let changed = self.query.set_sort(sort);
        if changed {
            self.refetch_current().await;
        }
        changed
    }

    /// Apply a new filter. Ignored while a page request is outstanding;
    /// returns whether it was applied.
    pub async fn set_filter(&mut self, filter: &str) -> bool {
        if self.query.is_loading() {
            tracing::debug!("ignoring filter change while glossary is loading");
            return false;
        }
        if self.query.set_filter(filter) {
            self.refetch_current().await;
        }
        true
    }

    /// Switch the translation locale. Unsaved edits are saved first, since
    /// they belong to the previous locale's translation.
    pub async fn change_target_locale(&mut self, locale: Option<String>) -> Result<()> {
        self.flush_selection().await?;
        if self.query.set_target_locale(locale) {
            self.selection.clear();
            self.refetch_current().await;
        }
        Ok(())
    }
}

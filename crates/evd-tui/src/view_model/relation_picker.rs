// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Relation picker view model
//!
//! A search-driven combobox that attaches records of another collection to
//! the record being edited. The view model owns the query buffer and its
//! debouncer, both remote lookups, the reconciled option list, the selection
//! and the panel state. Every transition happens synchronously inside one of
//! the public methods; remote lookups run on spawned tasks and re-enter
//! through [`RelationPickerViewModel::process_pending_completions`] or
//! [`RelationPickerViewModel::wait_for_completion`].
//!
//! Fetch failures never escape: they are logged and shown as "no candidates".

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossterm::event::KeyEvent;
use evd_api_contract::{ExtraParams, RecordId, RelationOption, SearchQuery, MAX_PAGE_SIZE};
use evd_client_api::OptionSource;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::debug;

use super::accessibility::{self, AccessibilityInput, AccessibilityTree};
use super::debounce::QueryDebouncer;
use super::input::{PickerKey, PickerKeyResult};
use super::interaction::{InteractionState, Transition};
use super::option_sources::{
    spawn_search_lookup, spawn_selection_lookup, CompletionOutcome, PickerMsg, ResolverSlot,
    SearchKey, SelectionKey,
};
use super::reconcile::{reconcile, ReconcileCache, ReconcileKey, ReconciledOptions};
use super::selection::{Selection, SelectionChange, SelectionMode};

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_BULK_LIMIT: u32 = MAX_PAGE_SIZE;

static NEXT_PICKER_ID: AtomicU64 = AtomicU64::new(1);

/// Host-supplied configuration of one picker
#[derive(Debug, Clone, PartialEq)]
pub struct PickerProps {
    pub label: String,
    /// Collection name, e.g. `tags`
    pub endpoint: String,
    pub placeholder: Option<String>,
    pub debounce_ms: u64,
    pub extra_params: ExtraParams,
    pub disabled: bool,
    /// Fetch one bulk page and filter it locally instead of searching server-side
    pub client_side_filtering: bool,
    pub mode: SelectionMode,
    pub search_limit: u32,
    pub bulk_limit: u32,
}

impl PickerProps {
    pub fn new(label: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            endpoint: endpoint.into(),
            placeholder: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            extra_params: ExtraParams::new(),
            disabled: false,
            client_side_filtering: false,
            mode: SelectionMode::Single,
            search_limit: DEFAULT_SEARCH_LIMIT,
            bulk_limit: DEFAULT_BULK_LIMIT,
        }
    }

    pub fn multi(mut self) -> Self {
        self.mode = SelectionMode::Multi;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_extra_params(mut self, extra_params: ExtraParams) -> Self {
        self.extra_params = extra_params;
        self
    }

    pub fn with_client_side_filtering(mut self, enabled: bool) -> Self {
        self.client_side_filtering = enabled;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Page sizes are clamped to what the API accepts
    pub fn with_limits(mut self, search_limit: u32, bulk_limit: u32) -> Self {
        self.search_limit = search_limit.clamp(1, MAX_PAGE_SIZE);
        self.bulk_limit = bulk_limit.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// Clickable parts of a rendered picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMouseAction {
    Input,
    Candidate(usize),
    RemoveChip(RecordId),
    /// Inside the panel but not on a candidate
    Panel,
    /// Anywhere else inside the picker's bounds, such as the label or status row
    Surface,
}

/// Host capability: map a pointer position to a picker action, `None` when outside the widget
pub trait PointerRegion {
    fn hit(&self, column: u16, row: u16) -> Option<PickerMouseAction>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedChip {
    pub id: RecordId,
    pub label: String,
}

/// What the candidate panel currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelView<'a> {
    Hidden,
    Loading,
    NoResults,
    Candidates {
        options: &'a [RelationOption],
        focused: Option<usize>,
    },
}

pub type ChangeCallback = Box<dyn FnMut(&SelectionChange) + Send>;

pub struct RelationPickerViewModel {
    instance_id: String,
    props: PickerProps,
    source: Arc<dyn OptionSource>,

    selection: Selection,
    selection_revision: u64,
    on_change: Option<ChangeCallback>,

    query: String,
    debounced_query: String,
    debouncer: QueryDebouncer,

    selection_lookup: ResolverSlot<SelectionKey>,
    search_lookup: ResolverSlot<SearchKey>,
    reconciled: ReconcileCache,
    known_labels: HashMap<RecordId, String>,

    interaction: InteractionState,
    input_focused: bool,
    started: bool,

    tx: UnboundedSender<PickerMsg>,
    rx: UnboundedReceiver<PickerMsg>,

    pub needs_redraw: bool,
}

impl std::fmt::Debug for RelationPickerViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationPickerViewModel")
            .field("instance_id", &self.instance_id)
            .field("props", &self.props)
            .field("selection", &self.selection)
            .field("query", &self.query)
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

impl RelationPickerViewModel {
    pub fn new(props: PickerProps, source: Arc<dyn OptionSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let instance_id = format!(
            "relation-picker-{}",
            NEXT_PICKER_ID.fetch_add(1, Ordering::Relaxed)
        );
        Self {
            instance_id,
            selection: Selection::new(props.mode),
            debouncer: QueryDebouncer::from_millis(props.debounce_ms),
            props,
            source,
            selection_revision: 0,
            on_change: None,
            query: String::new(),
            debounced_query: String::new(),
            selection_lookup: ResolverSlot::new("selection"),
            search_lookup: ResolverSlot::new("search"),
            reconciled: ReconcileCache::new(),
            known_labels: HashMap::new(),
            interaction: InteractionState::new(),
            input_focused: false,
            started: false,
            tx,
            rx,
            needs_redraw: true,
        }
    }

    /// Register the host callback invoked after every selection mutation
    pub fn on_change(&mut self, callback: impl FnMut(&SelectionChange) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Issue the initial lookups. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        self.started = true;
        self.sync_selection_lookup();
        self.sync_search_lookup();
        self.refresh_candidates();
    }

    // Host-driven updates

    /// Replace the bound ids from the host form; does not call back
    pub fn set_value(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        let next = Selection::from_ids(self.props.mode, ids);
        if next == self.selection {
            return;
        }
        self.selection = next;
        self.selection_revision += 1;
        self.sync_selection_lookup();
        self.refresh_candidates();
    }

    pub fn set_extra_params(&mut self, extra_params: ExtraParams) {
        if self.props.extra_params == extra_params {
            return;
        }
        self.props.extra_params = extra_params;
        self.sync_search_lookup();
    }

    pub fn set_client_side_filtering(&mut self, enabled: bool) {
        if self.props.client_side_filtering == enabled {
            return;
        }
        self.props.client_side_filtering = enabled;
        self.sync_search_lookup();
        self.refresh_candidates();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.props.disabled = disabled;
        if disabled && self.interaction.close() {
            self.needs_redraw = true;
        }
    }

    // Input handling

    pub fn handle_key_event(&mut self, key: &KeyEvent) -> PickerKeyResult {
        match PickerKey::from_key_event(key) {
            Some(picker_key) => self.handle_key(picker_key),
            None => PickerKeyResult::Ignored,
        }
    }

    pub fn handle_key(&mut self, key: PickerKey) -> PickerKeyResult {
        if self.props.disabled {
            return PickerKeyResult::Ignored;
        }
        self.input_focused = true;
        let count = self.visible_candidates().len();

        let changed = match key {
            PickerKey::Char(c) => {
                let mut query = self.query.clone();
                query.push(c);
                self.set_query(query);
                true
            }
            PickerKey::Backspace => {
                let mut query = self.query.clone();
                if query.pop().is_none() {
                    return PickerKeyResult::Consumed { changed: false };
                }
                self.set_query(query);
                true
            }
            PickerKey::Down => self.interaction.arrow_down(count),
            PickerKey::Up => self.interaction.arrow_up(count),
            PickerKey::Enter => {
                let was_open = self.interaction.is_open();
                match self.interaction.enter(count) {
                    Transition::Commit(index) => self.select_candidate(index),
                    _ => !was_open,
                }
            }
            PickerKey::Escape => {
                if !self.interaction.escape() {
                    return PickerKeyResult::Ignored;
                }
                true
            }
            PickerKey::Tab | PickerKey::BackTab => {
                self.interaction.tab();
                self.input_focused = false;
                self.needs_redraw = true;
                return PickerKeyResult::Ignored;
            }
        };

        if changed {
            self.needs_redraw = true;
        }
        PickerKeyResult::Consumed { changed }
    }

    /// Pointer press at a terminal cell. Returns true if picker state changed.
    pub fn handle_pointer_down(
        &mut self,
        column: u16,
        row: u16,
        region: &dyn PointerRegion,
    ) -> bool {
        let changed = match region.hit(column, row) {
            None => {
                self.input_focused = false;
                self.interaction.pointer_outside()
            }
            Some(_) if self.props.disabled => false,
            Some(PickerMouseAction::Input) => self.focus_input(),
            Some(PickerMouseAction::Candidate(index)) => {
                let count = self.visible_candidates().len();
                self.interaction.focus(index, count);
                self.select_candidate(index)
            }
            Some(PickerMouseAction::RemoveChip(id)) => self.remove(id),
            Some(PickerMouseAction::Panel | PickerMouseAction::Surface) => false,
        };
        if changed {
            self.needs_redraw = true;
        }
        changed
    }

    /// Focusing the input opens the panel
    pub fn focus_input(&mut self) -> bool {
        if self.props.disabled {
            return false;
        }
        self.input_focused = true;
        let opened = self.interaction.open();
        if opened {
            self.needs_redraw = true;
        }
        opened
    }

    pub fn blur(&mut self) {
        self.input_focused = false;
        if self.interaction.close() {
            self.needs_redraw = true;
        }
    }

    // Selection

    /// Commit the candidate at `index` of the current candidate list
    pub fn select_candidate(&mut self, index: usize) -> bool {
        let Some(option) = self.visible_candidates().get(index).cloned() else {
            return false;
        };
        self.known_labels.insert(option.id, option.name.clone());

        let changed = self.selection.select(option.id);
        self.set_query(String::new());
        self.input_focused = true;
        match self.props.mode {
            SelectionMode::Single => {
                self.interaction.close();
            }
            SelectionMode::Multi => {
                self.interaction.open();
            }
        }
        debug!(picker = %self.instance_id, id = option.id, name = %option.name, "Candidate selected");
        if changed {
            self.selection_changed();
        }
        self.needs_redraw = true;
        true
    }

    pub fn remove(&mut self, id: RecordId) -> bool {
        if !self.selection.remove(id) {
            return false;
        }
        debug!(picker = %self.instance_id, id, "Selection removed");
        self.selection_changed();
        true
    }

    /// Empty the selection; the query buffer is left as-is
    pub fn clear(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        debug!(picker = %self.instance_id, "Selection cleared");
        self.selection_changed();
        true
    }

    // Time and completions

    /// Apply finished lookups and release a debounced query whose quiet period elapsed
    pub fn tick(&mut self) {
        self.process_pending_completions();
        if let Some(debounced) = self.debouncer.poll(Instant::now()) {
            self.apply_debounced_query(debounced);
        }
    }

    /// Deadline of the pending debounced query, for hosts that sleep between events
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Apply every completion already delivered. Returns how many were applied.
    pub fn process_pending_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            if self.apply_completion(msg) == CompletionOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next completion and apply it
    ///
    /// Waits forever when nothing is in flight.
    pub async fn wait_for_completion(&mut self) -> Option<CompletionOutcome> {
        let msg = self.rx.recv().await?;
        Some(self.apply_completion(msg))
    }

    /// Drive debounce timers and lookups until nothing is pending
    pub async fn settle(&mut self) {
        loop {
            self.tick();
            if let Some(deadline) = self.debouncer.deadline() {
                tokio::time::sleep_until(deadline).await;
                continue;
            }
            if !self.is_loading() {
                break;
            }
            self.wait_for_completion().await;
        }
    }

    // Read-only state

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn props(&self) -> &PickerProps {
        &self.props
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.ids()
    }

    pub fn reconciled(&self) -> &ReconciledOptions {
        self.reconciled.value()
    }

    pub fn candidates(&self) -> &[RelationOption] {
        &self.reconciled.value().candidates
    }

    /// Candidates the panel is showing; none while a search is in flight
    pub fn visible_candidates(&self) -> &[RelationOption] {
        if self.search_lookup.is_loading() {
            &[]
        } else {
            self.candidates()
        }
    }

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn is_open(&self) -> bool {
        self.interaction.is_open()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.interaction.focused_index()
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn is_search_loading(&self) -> bool {
        self.search_lookup.is_loading()
    }

    pub fn is_selection_loading(&self) -> bool {
        self.selection_lookup.is_loading()
    }

    pub fn is_loading(&self) -> bool {
        self.is_search_loading() || self.is_selection_loading()
    }

    /// Selected records with their best known labels, in selection order
    pub fn selected_chips(&self) -> Vec<SelectedChip> {
        self.selection
            .ids()
            .into_iter()
            .map(|id| SelectedChip {
                id,
                label: self.label_for(id),
            })
            .collect()
    }

    pub fn label_for(&self, id: RecordId) -> String {
        self.reconciled
            .value()
            .label_of(id)
            .map(str::to_string)
            .or_else(|| self.known_labels.get(&id).cloned())
            .unwrap_or_else(|| format!("#{}", id))
    }

    pub fn panel(&self) -> PanelView<'_> {
        if !self.interaction.is_open() {
            PanelView::Hidden
        } else if self.search_lookup.is_loading() {
            PanelView::Loading
        } else if self.candidates().is_empty() {
            PanelView::NoResults
        } else {
            PanelView::Candidates {
                options: self.candidates(),
                focused: self.interaction.focused_index(),
            }
        }
    }

    pub fn status_message(&self) -> String {
        accessibility::status_message(
            self.search_lookup.is_loading(),
            self.candidates().len(),
            &self.query,
        )
    }

    pub fn accessibility(&self) -> AccessibilityTree {
        accessibility::bind(&AccessibilityInput {
            instance_id: &self.instance_id,
            label: &self.props.label,
            open: self.interaction.is_open(),
            focused_index: self.interaction.focused_index(),
            candidates: self.candidates(),
            search_loading: self.search_lookup.is_loading(),
            query: &self.query,
            disabled: self.props.disabled,
            multi: self.props.mode == SelectionMode::Multi,
        })
    }

    // Internals

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.interaction.open();
        self.debouncer.push(self.query.clone(), Instant::now());
        if self.props.client_side_filtering {
            self.refresh_candidates();
        }
    }

    fn apply_debounced_query(&mut self, debounced: String) {
        if debounced == self.debounced_query {
            return;
        }
        debug!(picker = %self.instance_id, query = %debounced, "Debounced query");
        self.debounced_query = debounced;
        self.sync_search_lookup();
    }

    fn selection_changed(&mut self) {
        self.selection_revision += 1;
        self.sync_selection_lookup();
        self.refresh_candidates();
        let change = self.selection.to_change();
        debug!(picker = %self.instance_id, ?change, "Selection changed");
        if let Some(callback) = self.on_change.as_mut() {
            callback(&change);
        }
        self.needs_redraw = true;
    }

    fn sync_selection_lookup(&mut self) {
        if !self.started {
            return;
        }
        let ids = self.selection.ids();
        if ids.is_empty() {
            self.selection_lookup.reset();
            return;
        }
        let key = SelectionKey {
            endpoint: self.props.endpoint.clone(),
            ids,
        };
        if let Some(ticket) = self.selection_lookup.begin(key) {
            spawn_selection_lookup(self.source.clone(), ticket, self.tx.clone());
            self.needs_redraw = true;
        }
    }

    fn search_key(&self) -> SearchKey {
        let query = if self.props.client_side_filtering {
            SearchQuery::new(self.props.bulk_limit)
        } else {
            SearchQuery::new(self.props.search_limit).with_name(&self.debounced_query)
        };
        SearchKey {
            endpoint: self.props.endpoint.clone(),
            query: query.with_extra(self.props.extra_params.clone()),
        }
    }

    fn sync_search_lookup(&mut self) {
        if !self.started {
            return;
        }
        if let Some(ticket) = self.search_lookup.begin(self.search_key()) {
            spawn_search_lookup(self.source.clone(), ticket, self.tx.clone());
            self.needs_redraw = true;
        }
    }

    fn apply_completion(&mut self, msg: PickerMsg) -> CompletionOutcome {
        let outcome = match msg {
            PickerMsg::SelectionResolved { ticket, result } => {
                let outcome = self.selection_lookup.complete(ticket, result);
                if outcome == CompletionOutcome::Applied {
                    for option in self.selection_lookup.data() {
                        self.known_labels.insert(option.id, option.name.clone());
                    }
                }
                outcome
            }
            PickerMsg::SearchResolved { ticket, result } => self.search_lookup.complete(ticket, result),
        };
        if outcome == CompletionOutcome::Applied {
            self.refresh_candidates();
            self.needs_redraw = true;
        }
        outcome
    }

    fn refresh_candidates(&mut self) {
        let local_filter = self.props.client_side_filtering.then(|| self.query.clone());
        let key = ReconcileKey {
            selection_revision: self.selection_lookup.revision(),
            search_revision: self.search_lookup.revision(),
            selected_revision: self.selection_revision,
            local_filter: local_filter.clone(),
        };
        let selected = self.selection.ids();
        let selection_data = self.selection_lookup.data();
        let search_data = self.search_lookup.data();
        let recomputed = self.reconciled.refresh(key, || {
            // Results of an older selection stay in the slot until the new lookup lands
            let still_selected: Vec<RelationOption> = selection_data
                .iter()
                .filter(|option| selected.contains(&option.id))
                .cloned()
                .collect();
            reconcile(&still_selected, search_data, &selected, local_filter.as_deref())
        });
        if recomputed {
            self.interaction.reset_focus();
            self.needs_redraw = true;
        }
    }
}

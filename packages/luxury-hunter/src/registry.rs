//! In-memory item registry.
//!
//! Holds the priced and unpriced collections, the operator's exchange rate and
//! the progress of the latest batch. All state sits behind one lock, so an
//! item insertion and its progress increment are observed together. Progress
//! is additionally published on a `watch` channel for live displays.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::input::parse_numeric_input;
use crate::pricing::{PriceRules, DEFAULT_EXCHANGE_RATE};
use crate::types::{BatchProgress, Item, ItemField, ItemId, ItemPatch};

/// Shareable summary text for one priced item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedSummary {
    pub id: ItemId,
    pub text: String,
}

/// Point-in-time copy of the whole registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    pub priced: Vec<Item>,
    pub unpriced: Vec<Item>,
    pub progress: BatchProgress,
    pub exchange_rate: f64,

    /// Summaries of `priced`, same order, at `exchange_rate`
    pub summaries: Vec<PricedSummary>,
}

struct RegistryState {
    priced: Vec<Item>,
    unpriced: Vec<Item>,
    progress: BatchProgress,
    exchange_rate: f64,
}

/// Process-lifetime store of analyzed items.
pub struct Registry {
    state: RwLock<RegistryState>,
    progress_tx: watch::Sender<BatchProgress>,
    rules: PriceRules,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry with the default fee rules and exchange rate.
    pub fn new() -> Self {
        Self::with_rules(PriceRules::default())
    }

    pub fn with_rules(rules: PriceRules) -> Self {
        let (progress_tx, _) = watch::channel(BatchProgress::default());
        Self {
            state: RwLock::new(RegistryState {
                priced: Vec::new(),
                unpriced: Vec::new(),
                progress: BatchProgress::default(),
                exchange_rate: DEFAULT_EXCHANGE_RATE,
            }),
            progress_tx,
            rules,
        }
    }

    pub fn with_exchange_rate(self, exchange_rate: f64) -> Self {
        self.set_exchange_rate(exchange_rate);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn rules(&self) -> PriceRules {
        self.rules
    }

    /// Priced items in completion order.
    pub fn priced(&self) -> Vec<Item> {
        self.read().priced.clone()
    }

    /// Unpriced items in completion order.
    pub fn unpriced(&self) -> Vec<Item> {
        self.read().unpriced.clone()
    }

    pub fn len(&self) -> usize {
        let state = self.read();
        state.priced.len() + state.unpriced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn progress(&self) -> BatchProgress {
        self.read().progress
    }

    /// Receiver that sees every progress change.
    pub fn watch_progress(&self) -> watch::Receiver<BatchProgress> {
        self.progress_tx.subscribe()
    }

    /// A batch has started and not yet finished.
    pub fn is_processing(&self) -> bool {
        self.read().progress.in_flight()
    }

    pub fn exchange_rate(&self) -> f64 {
        self.read().exchange_rate
    }

    /// Set the exchange rate used by every summary from now on.
    pub fn set_exchange_rate(&self, exchange_rate: f64) {
        self.write().exchange_rate = exchange_rate;
        debug!(exchange_rate, "Exchange rate updated");
    }

    /// Set the exchange rate from operator text; unparseable text sets 0.
    pub fn set_exchange_rate_input(&self, raw: &str) -> f64 {
        let exchange_rate = parse_numeric_input(raw);
        self.set_exchange_rate(exchange_rate);
        exchange_rate
    }

    /// Look an item up in either collection.
    pub fn get(&self, id: ItemId) -> Option<Item> {
        let state = self.read();
        state
            .priced
            .iter()
            .chain(state.unpriced.iter())
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Summary of a priced item at the current exchange rate.
    pub fn summary_for(&self, id: ItemId) -> Option<String> {
        let state = self.read();
        state
            .priced
            .iter()
            .find(|item| item.id() == id)
            .map(|item| item.summary(&self.rules, state.exchange_rate))
    }

    /// Summaries of every priced item at the current exchange rate.
    pub fn summaries(&self) -> Vec<PricedSummary> {
        let state = self.read();
        self.summarize(&state)
    }

    fn summarize(&self, state: &RegistryState) -> Vec<PricedSummary> {
        state
            .priced
            .iter()
            .map(|item| PricedSummary {
                id: item.id(),
                text: item.summary(&self.rules, state.exchange_rate),
            })
            .collect()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.read();
        RegistrySnapshot {
            priced: state.priced.clone(),
            unpriced: state.unpriced.clone(),
            progress: state.progress,
            exchange_rate: state.exchange_rate,
            summaries: self.summarize(&state),
        }
    }

    /// Reset progress for a batch of `total` images. Items are kept.
    pub(crate) fn begin_batch(&self, total: usize) {
        let mut state = self.write();
        state.progress = BatchProgress::start(total);
        self.progress_tx.send_replace(state.progress);
    }

    /// Insert a finished item and count it, atomically.
    pub(crate) fn record(&self, item: Item) {
        let mut state = self.write();
        if item.has_price() {
            state.priced.push(item);
        } else {
            state.unpriced.push(item);
        }
        state.progress.record_completion();
        self.progress_tx.send_replace(state.progress);
    }

    pub(crate) fn finish_batch(&self) {
        let mut state = self.write();
        state.progress.finish();
        self.progress_tx.send_replace(state.progress);
    }

    /// Apply `patch` to the item with `id`, wherever it lives.
    ///
    /// The item stays in its collection even when the price edit would
    /// classify it differently. Returns false for an unknown id.
    pub fn update(&self, id: ItemId, patch: &ItemPatch) -> bool {
        let mut state = self.write();
        let state = &mut *state;
        match state
            .priced
            .iter_mut()
            .chain(state.unpriced.iter_mut())
            .find(|item| item.id() == id)
        {
            Some(item) => {
                item.apply(patch);
                debug!(item_id = %id, "Item updated");
                true
            }
            None => false,
        }
    }

    /// Apply one raw form edit.
    pub fn edit_field(&self, id: ItemId, field: ItemField, raw: &str) -> bool {
        self.update(id, &ItemPatch::from_field(field, raw))
    }

    /// Remove the item with `id`. Unknown ids are a no-op returning false.
    pub fn delete(&self, id: ItemId) -> bool {
        let mut state = self.write();
        let before = state.priced.len() + state.unpriced.len();
        state.priced.retain(|item| item.id() != id);
        state.unpriced.retain(|item| item.id() != id);
        let removed = state.priced.len() + state.unpriced.len() < before;
        if removed {
            debug!(item_id = %id, "Item deleted");
        }
        removed
    }

    /// Drop every item and reset progress. The exchange rate is kept.
    pub fn clear(&self) {
        let mut state = self.write();
        let dropped = state.priced.len() + state.unpriced.len();
        state.priced.clear();
        state.unpriced.clear();
        state.progress = BatchProgress::default();
        self.progress_tx.send_replace(state.progress);
        info!(dropped, "Registry cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractionResult, ImageSource};

    fn item(result: ExtractionResult) -> Item {
        Item::from_extraction(ImageSource::File("photo.jpg".into()), result)
    }

    fn bag(price: f64) -> Item {
        item(ExtractionResult::priced("Chanel", "Bag", "AS1234", price))
    }

    #[test]
    fn record_routes_by_classification() {
        let registry = Registry::new();
        registry.begin_batch(3);
        registry.record(bag(500.0));
        registry.record(bag(0.0));
        registry.record(item(ExtractionResult::sentinel()));

        assert_eq!(registry.priced().len(), 1);
        assert_eq!(registry.unpriced().len(), 2);
        assert_eq!(
            registry.progress(),
            BatchProgress {
                total: 3,
                completed: 3,
                is_done: true
            }
        );
    }

    #[test]
    fn summaries_follow_exchange_rate() {
        let registry = Registry::new();
        let chanel = bag(500.0);
        let id = chanel.id();
        registry.record(chanel);

        assert!(registry.summary_for(id).unwrap().ends_with("515 * 37 = 19055"));

        registry.set_exchange_rate(36.0);
        assert!(registry.summary_for(id).unwrap().ends_with("515 * 36 = 18540"));

        assert_eq!(registry.set_exchange_rate_input("abc"), 0.0);
        assert_eq!(registry.summaries()[0].text.lines().last(), Some("💰付台幣: 515 * 0 = 0"));
    }

    #[test]
    fn price_edit_does_not_reclassify() {
        let registry = Registry::new();
        let chanel = bag(500.0);
        let id = chanel.id();
        registry.record(chanel);

        assert!(registry.edit_field(id, ItemField::ListedPrice, "0"));
        assert_eq!(registry.priced().len(), 1);
        assert!(registry.unpriced().is_empty());
        assert!(registry.summary_for(id).unwrap().contains("💰付歐元: 0+15 = 15"));
    }

    #[test]
    fn unpriced_items_are_editable() {
        let registry = Registry::new();
        let unknown = item(ExtractionResult::sentinel());
        let id = unknown.id();
        registry.record(unknown);

        assert!(registry.update(id, &ItemPatch::new().brand("Loewe").listed_price(890.0)));
        let edited = registry.get(id).unwrap();
        assert_eq!(edited.brand, "Loewe");
        assert!(!edited.has_price());
        assert_eq!(registry.summary_for(id), None);
    }

    #[test]
    fn unknown_id_is_noop() {
        let registry = Registry::new();
        registry.record(bag(500.0));

        let stranger = ItemId::new();
        assert!(!registry.update(stranger, &ItemPatch::new().brand("x")));
        assert!(!registry.delete(stranger));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let registry = Registry::new();
        let chanel = bag(500.0);
        let id = chanel.id();
        registry.record(chanel);

        assert!(registry.delete(id));
        assert!(!registry.delete(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_resets_items_and_progress() {
        let registry = Registry::new().with_exchange_rate(35.5);
        registry.begin_batch(1);
        registry.record(bag(500.0));

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.progress(), BatchProgress::default());
        assert_eq!(registry.exchange_rate(), 35.5);
    }

    #[test]
    fn watch_sees_progress() {
        let registry = Registry::new();
        let rx = registry.watch_progress();

        registry.begin_batch(2);
        assert!(registry.is_processing());
        registry.record(bag(500.0));
        assert_eq!(rx.borrow().completed, 1);

        registry.record(bag(800.0));
        assert!(rx.borrow().is_done);
        assert!(!registry.is_processing());
    }

    #[test]
    fn snapshot_serializes() {
        let registry = Registry::new();
        registry.record(bag(500.0));

        let value = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(value["priced"][0]["brand"], "Chanel");
        assert_eq!(value["exchangeRate"], 37.0);
        assert_eq!(value["progress"]["total"], 0);
        assert!(value["summaries"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("品牌: Chanel"));
    }
}

use std::sync::Arc;

use grocer_core::{Clock, DomainResult, ItemId, SessionId, SystemClock};
use grocer_inventory::{AddItem, Inventory, InventoryCommand, Item, NewItem};
use grocer_spending::{DailyCount, SpendLedger};

use crate::config::TrackerConfig;
use crate::report::Dashboard;

/// One user's grocery list and purchase history.
///
/// Every mutation reads the clock once and hands that instant to the model,
/// so a purchase and its ledger entry always share a timestamp.
pub struct GrocerySession {
    id: SessionId,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    inventory: Inventory,
    ledger: SpendLedger,
}

impl core::fmt::Debug for GrocerySession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GrocerySession")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("inventory", &self.inventory)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl GrocerySession {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_clock(SessionId::new(), config, Arc::new(SystemClock))
    }

    pub fn with_clock(id: SessionId, config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            id,
            config,
            clock,
            inventory: Inventory::new(id),
            ledger: SpendLedger::new(id),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn ledger(&self) -> &SpendLedger {
        &self.ledger
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Add a pending item. Only fails when `strict_input` is on.
    pub fn add_item(&mut self, input: NewItem) -> DomainResult<ItemId> {
        if input.price.amount() < 0.0 {
            tracing::warn!(session = %self.id, name = %input.name, "item added with negative price");
        }

        let item_id = ItemId::new();
        let command = InventoryCommand::AddItem(AddItem {
            item_id,
            item: input,
            strict: self.config.strict_input,
            occurred_at: self.clock.now(),
        });
        self.inventory.dispatch(&command)?;

        tracing::debug!(session = %self.id, %item_id, "item added");
        Ok(item_id)
    }

    /// Buy the first pending item called `name` and record the purchase.
    pub fn mark_as_bought(&mut self, name: &str) -> Option<Item> {
        let now = self.clock.now();
        let item = self.inventory.mark_as_bought(name, now)?.clone();
        self.record(item, now)
    }

    pub fn mark_as_bought_by_id(&mut self, id: ItemId) -> Option<Item> {
        let now = self.clock.now();
        let item = self.inventory.mark_as_bought_by_id(id, now)?.clone();
        self.record(item, now)
    }

    pub fn mark_as_opened(&mut self, name: &str) -> Option<Item> {
        let now = self.clock.now();
        let item = self.inventory.mark_as_opened(name, now)?.clone();
        tracing::info!(session = %self.id, item = %item.name(), "item opened");
        Some(item)
    }

    pub fn mark_as_opened_by_id(&mut self, id: ItemId) -> Option<Item> {
        let now = self.clock.now();
        let item = self.inventory.mark_as_opened_by_id(id, now)?.clone();
        tracing::info!(session = %self.id, item = %item.name(), "item opened");
        Some(item)
    }

    pub fn all_items(&self) -> Vec<&Item> {
        self.inventory.items(None)
    }

    pub fn pending_items(&self) -> Vec<&Item> {
        self.inventory.items(Some(false))
    }

    pub fn bought_items(&self) -> Vec<&Item> {
        self.inventory.items(Some(true))
    }

    /// Items inside the configured expiry window.
    pub fn expiring_items(&self) -> Vec<&Item> {
        self.inventory.expiring_items(
            self.config.expiry_window_days,
            self.config.include_bought_in_expiring,
            self.config.expiry_mode,
            self.clock.now(),
        )
    }

    pub fn opened_items_expiring_tomorrow(&self) -> Vec<&Item> {
        self.inventory
            .opened_items_expiring_tomorrow(&self.config.shelf_life, self.clock.now())
    }

    pub fn total_spent(&self) -> f64 {
        self.ledger.total_spent()
    }

    pub fn daily_counts(&self) -> Vec<DailyCount> {
        self.ledger.daily_counts()
    }

    /// Full snapshot for one render pass.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(self)
    }

    fn record(&mut self, item: Item, now: chrono::DateTime<chrono::Utc>) -> Option<Item> {
        tracing::info!(
            session = %self.id,
            item = %item.name(),
            price = item.price().amount(),
            "purchase recorded"
        );
        self.ledger.record_purchase(item.clone(), now);
        Some(item)
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use grocer_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Entity, ItemId, SessionId};
use grocer_events::Event;

use crate::expiry::ExpiryMode;
use crate::item::{Item, NewItem};
use crate::price::Price;
use crate::shelf_life::ShelfLifePolicy;

/// How a mutation addresses its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRef {
    /// First eligible item whose name matches, ignoring case.
    Name(String),
    /// Exactly this item.
    Id(ItemId),
}

impl ItemRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    fn matches(&self, item: &Item) -> bool {
        match self {
            ItemRef::Name(name) => item.matches_name(name),
            ItemRef::Id(id) => item.id_typed() == *id,
        }
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItem {
    pub item_id: ItemId,
    pub item: NewItem,
    /// Validate the input instead of passing it through.
    pub strict: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkBought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkBought {
    pub target: ItemRef,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOpened {
    pub target: ItemRef,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    MarkBought(MarkBought),
    MarkOpened(MarkOpened),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub expiry_date: Option<NaiveDate>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemBought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBought {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOpened {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    ItemBought(ItemBought),
    ItemOpened(ItemOpened),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::ItemBought(_) => "inventory.item.bought",
            InventoryEvent::ItemOpened(_) => "inventory.item.opened",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded(e) => e.occurred_at,
            InventoryEvent::ItemBought(e) => e.occurred_at,
            InventoryEvent::ItemOpened(e) => e.occurred_at,
        }
    }
}

/// Aggregate root: the grocery list of one session.
///
/// Items keep insertion order (the display order) and names are not unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    id: SessionId,
    items: Vec<Item>,
    version: u64,
}

impl Inventory {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| *item.id() == id)
    }

    /// Run a command through decide/apply and return the applied events.
    pub fn dispatch(&mut self, command: &InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        grocer_events::execute(self, command)
    }

    /// Append a pending item. No validation: whatever the form sent is kept.
    pub fn add_item(&mut self, input: NewItem, now: DateTime<Utc>) -> &Item {
        let event = Self::decide_add(ItemId::new(), input, now);
        self.apply(&InventoryEvent::ItemAdded(event));
        &self.items[self.items.len() - 1]
    }

    /// Like [`Inventory::add_item`], but rejects blank names and invalid prices.
    pub fn try_add_item(&mut self, input: NewItem, now: DateTime<Utc>) -> DomainResult<&Item> {
        input.validate()?;
        Ok(self.add_item(input, now))
    }

    /// Mark the first pending item called `name` (any case) as bought.
    ///
    /// Returns `None` without touching anything when no pending item matches.
    pub fn mark_as_bought(&mut self, name: &str, now: DateTime<Utc>) -> Option<&Item> {
        self.mark_bought(&ItemRef::name(name), now)
    }

    pub fn mark_as_bought_by_id(&mut self, id: ItemId, now: DateTime<Utc>) -> Option<&Item> {
        self.mark_bought(&ItemRef::Id(id), now)
    }

    /// Mark the first bought, unopened item called `name` (any case) as opened.
    pub fn mark_as_opened(&mut self, name: &str, now: DateTime<Utc>) -> Option<&Item> {
        self.mark_opened(&ItemRef::name(name), now)
    }

    pub fn mark_as_opened_by_id(&mut self, id: ItemId, now: DateTime<Utc>) -> Option<&Item> {
        self.mark_opened(&ItemRef::Id(id), now)
    }

    /// All items (`None`) or only bought / only pending ones, in insertion order.
    pub fn items(&self, bought: Option<bool>) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| bought.is_none_or(|b| item.is_bought() == b))
            .collect()
    }

    pub fn expiring_items(
        &self,
        window_days: u32,
        include_bought: bool,
        mode: ExpiryMode,
        now: DateTime<Utc>,
    ) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.is_expiring_soon(window_days, mode, now))
            .filter(|item| include_bought || !item.is_bought())
            .collect()
    }

    /// Opened items with exactly one calendar day left.
    ///
    /// Items already at zero or below are not reported here.
    pub fn opened_items_expiring_tomorrow(
        &self,
        policy: &ShelfLifePolicy,
        now: DateTime<Utc>,
    ) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.days_until_opened_expiry(policy, now) == Some(1))
            .collect()
    }

    fn mark_bought(&mut self, target: &ItemRef, now: DateTime<Utc>) -> Option<&Item> {
        let Some(event) = self.decide_bought(target, now) else {
            tracing::debug!(item = ?target, "no pending item matched");
            return None;
        };
        let id = event.item_id;
        self.apply(&InventoryEvent::ItemBought(event));
        self.get(id)
    }

    fn mark_opened(&mut self, target: &ItemRef, now: DateTime<Utc>) -> Option<&Item> {
        let Some(event) = self.decide_opened(target, now) else {
            tracing::debug!(item = ?target, "no bought, unopened item matched");
            return None;
        };
        let id = event.item_id;
        self.apply(&InventoryEvent::ItemOpened(event));
        self.get(id)
    }

    fn decide_add(item_id: ItemId, input: NewItem, now: DateTime<Utc>) -> ItemAdded {
        ItemAdded {
            item_id,
            name: input.name,
            category: input.category,
            price: input.price,
            expiry_date: input.expiry_date,
            occurred_at: now,
        }
    }

    fn decide_bought(&self, target: &ItemRef, now: DateTime<Utc>) -> Option<ItemBought> {
        self.items
            .iter()
            .find(|item| target.matches(item) && !item.is_bought())
            .map(|item| ItemBought {
                item_id: item.id_typed(),
                occurred_at: now,
            })
    }

    fn decide_opened(&self, target: &ItemRef, now: DateTime<Utc>) -> Option<ItemOpened> {
        self.items
            .iter()
            .find(|item| target.matches(item) && item.is_bought() && !item.is_opened())
            .map(|item| ItemOpened {
                item_id: item.id_typed(),
                occurred_at: now,
            })
    }

    fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id_typed() == id)
    }
}

impl AggregateRoot for Inventory {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                let input = NewItem {
                    name: e.name.clone(),
                    category: e.category.clone(),
                    price: e.price,
                    expiry_date: e.expiry_date,
                };
                self.items.push(Item::with_id(e.item_id, input, e.occurred_at));
            }
            InventoryEvent::ItemBought(e) => {
                if let Some(item) = self.item_mut(e.item_id) {
                    item.mark_bought(e.occurred_at);
                }
            }
            InventoryEvent::ItemOpened(e) => {
                if let Some(item) = self.item_mut(e.item_id) {
                    item.mark_opened(e.occurred_at);
                }
            }
        }

        // +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::MarkBought(cmd) => Ok(self
                .decide_bought(&cmd.target, cmd.occurred_at)
                .map(InventoryEvent::ItemBought)
                .into_iter()
                .collect()),
            InventoryCommand::MarkOpened(cmd) => Ok(self
                .decide_opened(&cmd.target, cmd.occurred_at)
                .map(InventoryEvent::ItemOpened)
                .into_iter()
                .collect()),
        }
    }
}

impl Inventory {
    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<InventoryEvent>, DomainError> {
        if self.get(cmd.item_id).is_some() {
            return Err(DomainError::invariant("item id already present"));
        }
        if cmd.strict {
            cmd.item.validate()?;
        }
        Ok(vec![InventoryEvent::ItemAdded(Self::decide_add(
            cmd.item_id,
            cmd.item.clone(),
            cmd.occurred_at,
        ))])
    }
}

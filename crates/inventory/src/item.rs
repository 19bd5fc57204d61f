use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use grocer_core::{DomainError, DomainResult, Entity, ItemId};

use crate::expiry::{DEFAULT_EXPIRY_WINDOW_DAYS, ExpiryMode, days_until};
use crate::price::Price;
use crate::shelf_life::ShelfLifePolicy;

/// Form input for a new grocery item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub expiry_date: Option<NaiveDate>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price: price.into(),
            expiry_date: None,
        }
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// Strict-mode checks. The default add path does not call this.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        self.price.validate()?;
        Ok(())
    }
}

/// Where an item is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Pending,
    Bought,
    Opened,
}

/// A single grocery entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    category: String,
    price: Price,
    added_at: DateTime<Utc>,
    bought_at: Option<DateTime<Utc>>,
    opened_at: Option<DateTime<Utc>>,
    expiry_date: Option<NaiveDate>,
}

impl Item {
    /// Create a pending item with a fresh identifier.
    pub fn new(input: NewItem, added_at: DateTime<Utc>) -> Self {
        Self::with_id(ItemId::new(), input, added_at)
    }

    pub fn with_id(id: ItemId, input: NewItem, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            category: input.category,
            price: input.price,
            added_at,
            bought_at: None,
            opened_at: None,
            expiry_date: input.expiry_date,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn bought_at(&self) -> Option<DateTime<Utc>> {
        self.bought_at
    }

    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    pub fn is_bought(&self) -> bool {
        self.bought_at.is_some()
    }

    pub fn is_opened(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn state(&self) -> ItemState {
        match (self.bought_at, self.opened_at) {
            (_, Some(_)) => ItemState::Opened,
            (Some(_), None) => ItemState::Bought,
            (None, None) => ItemState::Pending,
        }
    }

    /// Case-insensitive name comparison used by every name-based lookup.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Record the purchase time.
    ///
    /// Calling this again overwrites the first purchase time; `Inventory` only
    /// calls it on pending items.
    pub fn mark_bought(&mut self, at: DateTime<Utc>) {
        self.bought_at = Some(at);
    }

    /// Record the opening time. Same overwrite behaviour as [`Item::mark_bought`].
    pub fn mark_opened(&mut self, at: DateTime<Utc>) {
        self.opened_at = Some(at);
    }

    pub fn is_expiring_soon(&self, window_days: u32, mode: ExpiryMode, now: DateTime<Utc>) -> bool {
        match self.expiry_date {
            Some(expiry) => mode.is_within(expiry, window_days, now),
            None => false,
        }
    }

    /// Three-day, calendar-date check.
    pub fn is_expiring_soon_default(&self, now: DateTime<Utc>) -> bool {
        self.is_expiring_soon(DEFAULT_EXPIRY_WINDOW_DAYS, ExpiryMode::DateWindow, now)
    }

    /// Calendar days until the printed expiry date (negative once passed).
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expiry_date.map(|expiry| days_until(expiry, now))
    }

    /// Date an opened item should be used by.
    pub fn opened_expiry_date(&self, policy: &ShelfLifePolicy) -> Option<NaiveDate> {
        let opened_at = self.opened_at?;
        let shelf_life = i64::from(policy.shelf_life_days(&self.name));
        Some(opened_at.date_naive() + Duration::days(shelf_life))
    }

    pub fn days_until_opened_expiry(&self, policy: &ShelfLifePolicy, now: DateTime<Utc>) -> Option<i64> {
        self.opened_expiry_date(policy)
            .map(|expiry| days_until(expiry, now))
    }

    /// Display adapter; `track_opened` controls the trailing `Opened:` segment.
    pub fn display(&self, track_opened: bool) -> ItemDisplay<'_> {
        ItemDisplay {
            item: self,
            track_opened,
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Renders an item as `"{name} ({category}) - {status} | ${price} | Expiry: {date}"`.
#[derive(Debug, Clone, Copy)]
pub struct ItemDisplay<'a> {
    item: &'a Item,
    track_opened: bool,
}

impl core::fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let item = self.item;
        let status = if item.is_bought() { "✅ Bought" } else { "🕒 Pending" };
        write!(
            f,
            "{} ({}) - {} | ${} | Expiry: ",
            item.name, item.category, status, item.price
        )?;
        match item.expiry_date {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d"))?,
            None => f.write_str("N/A")?,
        }
        if self.track_opened {
            f.write_str(" | Opened: ")?;
            match item.opened_at {
                Some(at) => write!(f, "{}", at.format("%Y-%m-%d"))?,
                None => f.write_str("Not opened")?,
            }
        }
        Ok(())
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.display(true), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 10, 30, 0).unwrap()
    }

    fn milk() -> Item {
        Item::new(NewItem::new("Milk", "Dairy", 1.99), day(1))
    }

    #[test]
    fn new_items_start_pending() {
        let item = milk();
        assert_eq!(item.state(), ItemState::Pending);
        assert_eq!(item.added_at(), day(1));
        assert!(item.bought_at().is_none());
        assert!(item.opened_at().is_none());
    }

    #[test]
    fn lifecycle_moves_through_states() {
        let mut item = milk();
        item.mark_bought(day(2));
        assert_eq!(item.state(), ItemState::Bought);
        item.mark_opened(day(3));
        assert_eq!(item.state(), ItemState::Opened);
    }

    #[test]
    fn marking_bought_twice_overwrites_the_purchase_time() {
        let mut item = milk();
        item.mark_bought(day(2));
        item.mark_bought(day(5));
        assert_eq!(item.bought_at(), Some(day(5)));
    }

    #[test]
    fn marking_opened_twice_overwrites_the_opening_time() {
        let mut item = milk();
        item.mark_bought(day(2));
        item.mark_opened(day(3));
        item.mark_opened(day(4));
        assert_eq!(item.opened_at(), Some(day(4)));
    }

    #[test]
    fn no_expiry_date_is_never_expiring() {
        let item = milk();
        assert!(!item.is_expiring_soon(365, ExpiryMode::DateWindow, day(1)));
        assert!(!item.is_expiring_soon(365, ExpiryMode::Unclamped, day(1)));
        assert_eq!(item.days_until_expiry(day(1)), None);
    }

    #[test]
    fn default_expiry_check_uses_three_day_date_window() {
        let today = day(10).date_naive();
        let on = |offset: i64| {
            Item::new(
                NewItem::new("Yogurt", "Dairy", 0.8).with_expiry(today + Duration::days(offset)),
                day(1),
            )
        };
        assert!(on(0).is_expiring_soon_default(day(10)));
        assert!(on(3).is_expiring_soon_default(day(10)));
        assert!(!on(4).is_expiring_soon_default(day(10)));
        assert!(!on(-1).is_expiring_soon_default(day(10)));
        assert!(on(-1).is_expiring_soon(3, ExpiryMode::Unclamped, day(10)));
    }

    #[test]
    fn opened_expiry_depends_on_the_name() {
        let policy = ShelfLifePolicy::default();

        let mut cheese = Item::new(NewItem::new("Cheese Block", "Dairy", 4.0), day(1));
        cheese.mark_bought(day(1));
        cheese.mark_opened(day(3));
        assert_eq!(
            cheese.opened_expiry_date(&policy),
            Some(day(3).date_naive() + Duration::days(7))
        );

        let mut milk = milk();
        milk.mark_bought(day(1));
        milk.mark_opened(day(3));
        assert_eq!(
            milk.opened_expiry_date(&policy),
            Some(day(3).date_naive() + Duration::days(3))
        );
    }

    #[test]
    fn unopened_items_have_no_opened_expiry() {
        let policy = ShelfLifePolicy::default();
        let mut item = milk();
        item.mark_bought(day(2));
        assert_eq!(item.opened_expiry_date(&policy), None);
        assert_eq!(item.days_until_opened_expiry(&policy, day(2)), None);
    }

    #[test]
    fn days_until_opened_expiry_counts_calendar_days() {
        let policy = ShelfLifePolicy::default();
        let mut item = milk();
        item.mark_bought(day(1));
        item.mark_opened(day(1));
        assert_eq!(item.days_until_opened_expiry(&policy, day(1)), Some(3));
        assert_eq!(item.days_until_opened_expiry(&policy, day(3)), Some(1));
        assert_eq!(item.days_until_opened_expiry(&policy, day(4)), Some(0));
        assert_eq!(item.days_until_opened_expiry(&policy, day(6)), Some(-2));
    }

    #[test]
    fn display_matches_the_list_format() {
        let expiry = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let mut item = Item::new(NewItem::new("Milk", "Dairy", 1.5).with_expiry(expiry), day(1));
        assert_eq!(
            item.display(false).to_string(),
            "Milk (Dairy) - 🕒 Pending | $1.50 | Expiry: 2024-05-20"
        );
        assert_eq!(
            item.to_string(),
            "Milk (Dairy) - 🕒 Pending | $1.50 | Expiry: 2024-05-20 | Opened: Not opened"
        );

        item.mark_bought(day(2));
        item.mark_opened(day(4));
        assert_eq!(
            item.to_string(),
            "Milk (Dairy) - ✅ Bought | $1.50 | Expiry: 2024-05-20 | Opened: 2024-05-04"
        );
    }

    #[test]
    fn display_without_expiry_shows_na() {
        let item = Item::new(NewItem::new("Bread", "Bakery", 2.0), day(1));
        assert_eq!(
            item.display(false).to_string(),
            "Bread (Bakery) - 🕒 Pending | $2.00 | Expiry: N/A"
        );
    }

    #[test]
    fn strict_validation_rejects_blank_names_and_bad_prices() {
        assert!(NewItem::new("Eggs", "Dairy", 3.0).validate().is_ok());
        assert!(NewItem::new("  ", "Dairy", 3.0).validate().is_err());
        assert!(NewItem::new("Eggs", "Dairy", -1.0).validate().is_err());
    }
}

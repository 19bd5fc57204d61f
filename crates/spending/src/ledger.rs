use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use grocer_core::{AggregateRoot, SessionId};
use grocer_inventory::Item;

/// Number of purchases recorded on one day (one bar of the purchases chart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Bucket key for a day, `YYYY-MM-DD`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Aggregate root: purchase history of one session.
///
/// Purchases are bucketed by the day they were recorded, not by any date on
/// the item. The running total only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendLedger {
    id: SessionId,
    entries_by_date: BTreeMap<NaiveDate, Vec<Item>>,
    total_spent: f64,
    version: u64,
}

impl SpendLedger {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            entries_by_date: BTreeMap::new(),
            total_spent: 0.0,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    /// Record a purchase in today's bucket and add its price to the total.
    pub fn record_purchase(&mut self, item: Item, now: DateTime<Utc>) {
        let price = item.price().amount();
        if price < 0.0 {
            tracing::warn!(item = %item.name(), price, "recording purchase with negative price");
        }

        self.total_spent += price;
        self.entries_by_date
            .entry(now.date_naive())
            .or_default()
            .push(item);
        self.version += 1;
    }

    pub fn total_spent(&self) -> f64 {
        self.total_spent
    }

    /// Total number of purchases recorded so far.
    pub fn purchase_count(&self) -> usize {
        self.entries_by_date.values().map(Vec::len).sum()
    }

    /// Purchases recorded on `date`, in recording order.
    pub fn entries_on(&self, date: NaiveDate) -> &[Item] {
        self.entries_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Purchases per day, oldest day first.
    pub fn daily_counts(&self) -> Vec<DailyCount> {
        self.entries_by_date
            .iter()
            .map(|(date, items)| DailyCount {
                date: *date,
                count: items.len(),
            })
            .collect()
    }
}

impl AggregateRoot for SpendLedger {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

//! Presentation-facing read models.
//!
//! Everything here is derived from a session on demand; nothing is cached.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use grocer_core::{ItemId, SessionId};
use grocer_inventory::{Item, ItemState, Price};
use grocer_spending::DailyCount;

use crate::context::GrocerySession;

/// How urgent an expiry date is, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum ExpiryNotice {
    /// Passed this many days ago.
    Expired(i64),
    Today,
    Tomorrow,
    InDays(i64),
}

impl ExpiryNotice {
    /// `None` when the item has no expiry date.
    pub fn classify(item: &Item, now: DateTime<Utc>) -> Option<Self> {
        item.days_until_expiry(now).map(Self::from_days)
    }

    pub fn from_days(days: i64) -> Self {
        match days {
            d if d < 0 => ExpiryNotice::Expired(-d),
            0 => ExpiryNotice::Today,
            1 => ExpiryNotice::Tomorrow,
            d => ExpiryNotice::InDays(d),
        }
    }

    pub fn is_urgent(self) -> bool {
        !matches!(self, ExpiryNotice::InDays(_))
    }
}

impl core::fmt::Display for ExpiryNotice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExpiryNotice::Expired(_) => f.write_str("❌ Expired"),
            ExpiryNotice::Today => f.write_str("⚠️ Expires today"),
            ExpiryNotice::Tomorrow => f.write_str("⚠️ Expires tomorrow"),
            ExpiryNotice::InDays(days) => write!(f, "📅 Expires in {days} days"),
        }
    }
}

/// Headline for the money-spent panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "total", rename_all = "snake_case")]
pub enum SpendingSummary {
    Nothing,
    Spent(f64),
    /// Negative or non-finite total; only reachable through unvalidated prices.
    Inconsistent(f64),
}

impl SpendingSummary {
    pub fn from_total(total: f64) -> Self {
        if !total.is_finite() || total < 0.0 {
            SpendingSummary::Inconsistent(total)
        } else if total == 0.0 {
            SpendingSummary::Nothing
        } else {
            SpendingSummary::Spent(total)
        }
    }
}

impl core::fmt::Display for SpendingSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SpendingSummary::Nothing => f.write_str("You haven't spent anything yet."),
            SpendingSummary::Spent(total) => write!(f, "Total spent: ${total:.2}"),
            SpendingSummary::Inconsistent(_) => f.write_str("⚠️ Spending total seems off."),
        }
    }
}

/// Flattened item for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub state: ItemState,
    pub expiry_date: Option<NaiveDate>,
    pub opened_expiry_date: Option<NaiveDate>,
    /// The list line, e.g. `Milk (Dairy) - 🕒 Pending | $1.50 | Expiry: N/A`.
    pub line: String,
}

impl ItemView {
    fn from_item(item: &Item, session: &GrocerySession) -> Self {
        let config = session.config();
        Self {
            id: item.id_typed(),
            name: item.name().to_string(),
            category: item.category().to_string(),
            price: item.price(),
            state: item.state(),
            expiry_date: item.expiry_date(),
            opened_expiry_date: item.opened_expiry_date(&config.shelf_life),
            line: item.display(config.track_opened).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringEntry {
    pub item: ItemView,
    pub notice: ExpiryNotice,
    /// e.g. `⚠️ Expires tomorrow: Milk (Dairy) - ... (Already bought)`.
    pub message: String,
}

/// Full render state of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub session_id: SessionId,
    pub generated_at: DateTime<Utc>,
    pub pending: Vec<ItemView>,
    pub bought: Vec<ItemView>,
    pub expiring: Vec<ExpiringEntry>,
    pub opened_expiring_tomorrow: Vec<ItemView>,
    pub total_spent: f64,
    pub spending: SpendingSummary,
    /// Feed for the purchases-per-day chart.
    pub daily_counts: Vec<DailyCount>,
}

impl Dashboard {
    pub fn build(session: &GrocerySession) -> Self {
        let now = session.now();
        let view = |item: &&Item| ItemView::from_item(item, session);

        let expiring = session
            .expiring_items()
            .into_iter()
            .filter_map(|item| {
                let notice = ExpiryNotice::classify(item, now)?;
                let item = ItemView::from_item(item, session);
                let suffix = if item.state == ItemState::Pending { "" } else { " (Already bought)" };
                let message = format!("{notice}: {}{suffix}", item.line);
                Some(ExpiringEntry {
                    item,
                    notice,
                    message,
                })
            })
            .collect();

        let total_spent = session.total_spent();
        Self {
            session_id: session.id(),
            generated_at: now,
            pending: session.pending_items().iter().map(view).collect(),
            bought: session.bought_items().iter().map(view).collect(),
            expiring,
            opened_expiring_tomorrow: session
                .opened_items_expiring_tomorrow()
                .iter()
                .map(view)
                .collect(),
            total_spent,
            spending: SpendingSummary::from_total(total_spent),
            daily_counts: session.daily_counts(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use grocer_core::FixedClock;
    use grocer_inventory::NewItem;

    use crate::config::TrackerConfig;

    #[test]
    fn notices_bucket_days_left() {
        assert_eq!(ExpiryNotice::from_days(-3), ExpiryNotice::Expired(3));
        assert_eq!(ExpiryNotice::from_days(0), ExpiryNotice::Today);
        assert_eq!(ExpiryNotice::from_days(1), ExpiryNotice::Tomorrow);
        assert_eq!(ExpiryNotice::from_days(3), ExpiryNotice::InDays(3));
        assert!(ExpiryNotice::Today.is_urgent());
        assert!(!ExpiryNotice::InDays(2).is_urgent());
        assert_eq!(ExpiryNotice::InDays(2).to_string(), "📅 Expires in 2 days");
    }

    #[test]
    fn notice_is_absent_without_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let item = Item::new(NewItem::new("Salt", "Pantry", 0.5), now);
        assert_eq!(ExpiryNotice::classify(&item, now), None);
    }

    #[test]
    fn spending_summary_headlines() {
        assert_eq!(SpendingSummary::from_total(0.0), SpendingSummary::Nothing);
        assert_eq!(
            SpendingSummary::from_total(12.346).to_string(),
            "Total spent: $12.35"
        );
        assert_eq!(
            SpendingSummary::from_total(-1.0).to_string(),
            "⚠️ Spending total seems off."
        );
        assert!(matches!(
            SpendingSummary::from_total(f64::NAN),
            SpendingSummary::Inconsistent(_)
        ));
        assert_eq!(
            SpendingSummary::Nothing.to_string(),
            "You haven't spent anything yet."
        );
    }

    #[test]
    fn dashboard_labels_bought_items_in_the_expiring_list() {
        let session = {
            let clock = Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 2, 28, 23, 30, 0).unwrap(),
            ));
            let mut s = GrocerySession::with_clock(
                SessionId::new(),
                TrackerConfig {
                    include_bought_in_expiring: true,
                    track_opened: false,
                    ..TrackerConfig::default()
                },
                clock,
            );
            let tomorrow = s.now().date_naive() + Duration::days(1);
            s.add_item(NewItem::new("Milk", "Dairy", 1.5).with_expiry(tomorrow))
                .unwrap();
            s.mark_as_bought("milk");
            s
        };

        let dashboard = session.dashboard();
        assert_eq!(dashboard.expiring.len(), 1);
        let entry = &dashboard.expiring[0];
        assert_eq!(entry.notice, ExpiryNotice::Tomorrow);
        assert!(entry.message.starts_with("⚠️ Expires tomorrow: Milk"));
        assert!(entry.message.ends_with("Expiry: 2024-02-29 (Already bought)"));
        assert!(entry.item.line.starts_with("Milk (Dairy) - ✅ Bought | $1.50 | Expiry: "));
        assert!(!entry.item.line.contains("Opened"));
    }
}

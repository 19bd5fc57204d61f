//! Grocery inventory domain module.
//!
//! This crate contains the item lifecycle (pending → bought → opened), expiry
//! and shelf-life rules, and the `Inventory` aggregate. It is deterministic
//! domain logic only: no IO, and the current instant is always passed in.

pub mod expiry;
pub mod inventory;
pub mod item;
pub mod price;
pub mod shelf_life;

pub use expiry::{DEFAULT_EXPIRY_WINDOW_DAYS, ExpiryMode, days_until};
pub use inventory::{
    AddItem, Inventory, InventoryCommand, InventoryEvent, ItemAdded, ItemBought, ItemOpened,
    ItemRef, MarkBought, MarkOpened,
};
pub use item::{Item, ItemDisplay, ItemState, NewItem};
pub use price::Price;
pub use shelf_life::{DEFAULT_SLOW_SPOILING_MARKERS, ShelfLifePolicy};

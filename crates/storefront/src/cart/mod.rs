//! Shopper cart runtime.
//!
//! [`CartStore`] applies cart actions and persists the result. A background
//! task from [`spawn_flush_task`] writes pending changes on a fixed timer.

mod clock;
mod flush;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use flush::{FlushHandle, spawn_flush_task};
pub use store::{CART_KEY, CartStore, CartUpdate, DEVICE_ID_KEY, PRIVACY_KEY};

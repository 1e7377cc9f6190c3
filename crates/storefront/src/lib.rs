//! Cantera Storefront library.
//!
//! Shopper-side runtime: the persisted cart, runtime translations and
//! read-only access to the hosted content tables.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod state;
pub mod storage;

pub use error::StorefrontError;
pub use state::Storefront;

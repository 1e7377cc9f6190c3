//! Cantera Core - Shared types and pure domain logic.
//!
//! This crate provides the pieces used across all Cantera components:
//! - `storefront` - Cart persistence and runtime translations
//! - `admin` - Content management against the hosted table store
//! - `cli` - Command-line tools for audits, cart and content
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. Callers pass in the current time and settings.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, locales and statuses
//! - [`cart`] - Cart model, reducer and persisted-record migration
//! - [`content`] - Rows of the hosted content tables
//! - [`i18n`] - Locale dictionaries, typed keys and the translation auditor

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod content;
pub mod i18n;
pub mod types;

pub use types::*;

//! Cantera Admin library.
//!
//! Back-office operations against the hosted content store:
//! - Slug-addressed repositories for products, projects and articles
//! - Pushing and pulling the `translations` table
//! - Filling missing translation keys through a translation API
//!
//! # Security
//!
//! This crate uses the content store's service-role key, which bypasses
//! row-level security. Only run it from trusted machines.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub use error::AdminError;
pub use state::AdminState;

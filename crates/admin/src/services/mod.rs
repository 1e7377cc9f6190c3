//! Translation workflows built on the content tables.
//!
//! - [`translate`] - machine translation client
//! - [`fill`] - filling keys the audit reports as missing
//! - [`sync`] - pushing locale files to the `translations` table and back

pub mod fill;
pub mod sync;
pub mod translate;

pub use fill::{FillOutcome, FilledEntry, fill_missing};
pub use sync::{
    PushPlan, PushSummary, TranslationUpdate, plan_push, pull, push, rows_to_dictionaries,
};
pub use translate::{Translate, TranslateClient, TranslateError};

//! Runtime translations and locale files.
//!
//! - [`files`] - reading and writing `<locale>.json` dictionaries
//! - [`translator`] - lookups with remote tables, bundled fallback and caching

pub mod files;
mod translator;

pub use files::{LocaleFileError, load_dir, write_dictionary};
pub use translator::{TranslationSource, Translator};

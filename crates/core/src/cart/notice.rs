//! Non-fatal signals produced by cart operations.
//!
//! Notices are shown to the shopper as toasts. None of them abort the
//! operation that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProductId;
use crate::i18n::TranslationKey;

/// Severity of a [`CartNotice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Something the shopper should be told about after a cart operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartNotice {
    /// A quantity was reduced to the per-item maximum.
    QuantityCapped {
        id: ProductId,
        name: String,
        requested: u32,
        max: u32,
    },
    /// The action referenced a line that is not in the cart.
    UnknownItem { id: ProductId },
    /// Durable storage is full; the cart now lives only for this session.
    StorageFallback,
    /// The cart could not be saved at all.
    PersistFailed { reason: String },
    /// A stored cart had passed its expiry and was discarded.
    Expired { expired_at: DateTime<Utc> },
    /// A stored cart could not be read and was discarded.
    Discarded { reason: String },
}

impl CartNotice {
    /// How prominently the notice should be shown.
    #[must_use]
    pub const fn level(&self) -> NoticeLevel {
        match self {
            Self::QuantityCapped { .. } | Self::StorageFallback => NoticeLevel::Warning,
            Self::UnknownItem { .. } | Self::Expired { .. } | Self::Discarded { .. } => {
                NoticeLevel::Info
            }
            Self::PersistFailed { .. } => NoticeLevel::Error,
        }
    }

    /// Message template for this notice.
    #[must_use]
    pub const fn translation_key(&self) -> TranslationKey {
        match self {
            Self::QuantityCapped { .. } => TranslationKey::CartNoticeQuantityCapped,
            Self::UnknownItem { .. } => TranslationKey::CartNoticeUnknownItem,
            Self::StorageFallback => TranslationKey::CartNoticeStorageFallback,
            Self::PersistFailed { .. } => TranslationKey::CartNoticePersistFailed,
            Self::Expired { .. } => TranslationKey::CartNoticeExpired,
            Self::Discarded { .. } => TranslationKey::CartNoticeDiscarded,
        }
    }

    /// Values substituted into the message template.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::QuantityCapped {
                name,
                requested,
                max,
                ..
            } => vec![
                ("name", name.clone()),
                ("requested", requested.to_string()),
                ("max", max.to_string()),
            ],
            Self::UnknownItem { id } => vec![("id", id.to_string())],
            Self::PersistFailed { reason } | Self::Discarded { reason } => {
                vec![("reason", reason.clone())]
            }
            Self::Expired { expired_at } => {
                vec![("date", expired_at.format("%Y-%m-%d").to_string())]
            }
            Self::StorageFallback => Vec::new(),
        }
    }
}

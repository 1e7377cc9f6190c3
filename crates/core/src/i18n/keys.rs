//! Compile-time enumeration of every translation key the site renders.
//!
//! Code never looks up text by a bare string: it names a [`TranslationKey`]
//! variant, so a typo is a compile error instead of a blank label. The locale
//! JSON files are still data and can drift; the auditor checks them against
//! [`TranslationKey::ALL`].

use core::fmt;
use std::collections::BTreeSet;

use thiserror::Error;

/// A string that does not name any declared translation key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown translation key: {0}")]
pub struct UnknownKey(pub String);

/// Macro to declare the translation key enumeration.
///
/// Each entry maps a variant to its dotted key as used in locale files.
macro_rules! translation_keys {
    ($($variant:ident => $key:literal,)+) => {
        /// A declared translation key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum TranslationKey {
            $($variant,)+
        }

        impl TranslationKey {
            /// Every declared key, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The dotted key used in locale files and translation rows.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl ::core::str::FromStr for TranslationKey {
            type Err = UnknownKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(Self::$variant),)+
                    _ => Err(UnknownKey(s.to_owned())),
                }
            }
        }
    };
}

translation_keys! {
    NavHome => "nav.home",
    NavProducts => "nav.products",
    NavProjects => "nav.projects",
    NavArticles => "nav.articles",
    NavAbout => "nav.about",
    NavContact => "nav.contact",
    NavCart => "nav.cart",
    NavLanguage => "nav.language",

    HomeHeroTitle => "home.hero.title",
    HomeHeroSubtitle => "home.hero.subtitle",
    HomeHeroCta => "home.hero.cta",

    ProductsTitle => "products.title",
    ProductsFilterCategory => "products.filter.category",
    ProductsEmpty => "products.empty",
    ProductSku => "product.sku",
    ProductCategory => "product.category",
    ProductPrice => "product.price",
    ProductAddToCart => "product.add_to_cart",
    ProductMaxQuantity => "product.max_quantity",

    ProjectsTitle => "projects.title",
    ProjectsLocation => "projects.location",
    ProjectsCompleted => "projects.completed",

    ArticlesTitle => "articles.title",
    ArticlesReadMore => "articles.read_more",
    ArticlesPublished => "articles.published",

    CartTitle => "cart.title",
    CartEmpty => "cart.empty",
    CartSubtotal => "cart.subtotal",
    CartItemCount => "cart.item_count",
    CartQuantity => "cart.quantity",
    CartRemove => "cart.remove",
    CartClear => "cart.clear",
    CartCheckout => "cart.checkout",
    CartPrivacyMode => "cart.privacy_mode",
    CartNoticeQuantityCapped => "cart.notice.quantity_capped",
    CartNoticeUnknownItem => "cart.notice.unknown_item",
    CartNoticeStorageFallback => "cart.notice.storage_fallback",
    CartNoticePersistFailed => "cart.notice.persist_failed",
    CartNoticeExpired => "cart.notice.expired",
    CartNoticeDiscarded => "cart.notice.discarded",

    ContactTitle => "contact.title",
    ContactName => "contact.name",
    ContactEmail => "contact.email",
    ContactMessage => "contact.message",
    ContactSubmit => "contact.submit",

    FooterCopyright => "footer.copyright",
    FooterAddress => "footer.address",
    ErrorGeneric => "error.generic",
    ErrorNotFound => "error.not_found",
}

impl TranslationKey {
    /// The set of declared dotted keys, for auditing locale files.
    #[must_use]
    pub fn declared() -> BTreeSet<String> {
        Self::ALL.iter().map(|key| key.as_str().to_owned()).collect()
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

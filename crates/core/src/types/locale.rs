//! Supported site locales.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Locale`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The input string is empty.
    #[error("locale cannot be empty")]
    Empty,
    /// The language is not one the site is translated into.
    #[error("unsupported locale: {0}")]
    Unsupported(String),
}

/// A language the site is published in.
///
/// ## Parsing
///
/// Codes are matched case-insensitively and any region suffix is ignored,
/// so `pt-BR`, `PT` and `pt_br` all parse as [`Locale::Pt`].
///
/// ```
/// use cantera_core::Locale;
///
/// assert_eq!(Locale::parse("de-AT"), Ok(Locale::De));
/// assert!(Locale::parse("nl").is_err());
/// ```
///
/// Deserialization goes through the same parser, so stored rows tagged
/// `pt-BR` or `EN` decode like the file names do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Zh,
}

impl Locale {
    /// Every supported locale, primary first.
    pub const ALL: [Self; 7] = [
        Self::En,
        Self::Es,
        Self::Fr,
        Self::De,
        Self::It,
        Self::Pt,
        Self::Zh,
    ];

    /// The locale all content is authored in.
    pub const PRIMARY: Self = Self::En;

    /// Parse a locale from a language tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or names an unsupported language.
    pub fn parse(s: &str) -> Result<Self, LocaleError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::Empty);
        }

        let language = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == language)
            .ok_or_else(|| LocaleError::Unsupported(trimmed.to_owned()))
    }

    /// Two-letter ISO 639-1 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Zh => "zh",
        }
    }

    /// Whether this is the authoring locale.
    #[must_use]
    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_codes() {
        for locale in Locale::ALL {
            assert_eq!(Locale::parse(locale.code()), Ok(locale));
        }
    }

    #[test]
    fn test_parse_region_and_case() {
        assert_eq!(Locale::parse("pt-BR"), Ok(Locale::Pt));
        assert_eq!(Locale::parse("ZH_hans"), Ok(Locale::Zh));
        assert_eq!(Locale::parse(" Fr "), Ok(Locale::Fr));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Locale::parse(""), Err(LocaleError::Empty));
        assert_eq!(
            Locale::parse("nl"),
            Err(LocaleError::Unsupported("nl".to_string()))
        );
    }

    #[test]
    fn test_all_has_seven_distinct_locales() {
        let mut codes: Vec<_> = Locale::ALL.iter().map(|l| l.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 7);
        assert!(Locale::ALL.first().is_some_and(|l| l.is_primary()));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Locale::De).unwrap_or_default();
        assert_eq!(json, "\"de\"");
    }

    #[test]
    fn test_deserialize_accepts_tags() {
        let tags: Vec<Locale> = serde_json::from_str(r#"["pt-BR", "EN", "zh_Hans", "fr"]"#)
            .unwrap_or_default();
        assert_eq!(tags, vec![Locale::Pt, Locale::En, Locale::Zh, Locale::Fr]);
        assert!(serde_json::from_str::<Locale>("\"nl\"").is_err());
    }
}

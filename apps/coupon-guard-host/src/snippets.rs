//! # Snippets
//!
//! Translated message templates for cart errors, embedded at compile time.
//!
//! ## Locale Resolution
//! ```text
//! SnippetTranslator::for_locale("de-DE")
//!      │
//!      ▼
//! en-GB catalog (base, always loaded)
//!      │
//!      ▼
//! merge de-DE catalog on top ──► keys missing in de-DE keep the English text
//!
//! unknown locale ──► en-GB only (logged)
//! ```

use tracing::warn;

use coupon_guard_core::translator::{MessageCatalog, Translator};

use crate::error::HostResult;

/// Locale used when the requested one has no snippets.
pub const FALLBACK_LOCALE: &str = "en-GB";

const SNIPPETS: &[(&str, &str)] = &[
    ("en-GB", include_str!("../resources/snippet/en-GB.json")),
    ("de-DE", include_str!("../resources/snippet/de-DE.json")),
];

/// Locales with embedded snippets.
pub fn available_locales() -> impl Iterator<Item = &'static str> {
    SNIPPETS.iter().map(|(locale, _)| *locale)
}

/// [`Translator`] backed by the embedded snippet files.
#[derive(Debug, Clone)]
pub struct SnippetTranslator {
    locale: String,
    catalog: MessageCatalog,
}

impl SnippetTranslator {
    /// Builds the translator for `locale`, falling back to English.
    pub fn for_locale(locale: &str) -> HostResult<Self> {
        let mut catalog = load(FALLBACK_LOCALE)?.unwrap_or_default();

        let resolved = match load(locale)? {
            Some(localized) => {
                catalog.merge(localized);
                locale.to_string()
            }
            None => {
                warn!(locale, fallback = FALLBACK_LOCALE, "No snippets for locale");
                FALLBACK_LOCALE.to_string()
            }
        };

        Ok(SnippetTranslator {
            locale: resolved,
            catalog,
        })
    }

    /// The locale actually in use.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }
}

impl Translator for SnippetTranslator {
    fn trans(&self, key: &str, params: &[(&str, String)]) -> String {
        self.catalog.trans(key, params)
    }
}

fn load(locale: &str) -> HostResult<Option<MessageCatalog>> {
    SNIPPETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(locale))
        .map(|(_, document)| MessageCatalog::from_json(document))
        .transpose()
        .map_err(Into::into)
}

// =============================================================================
// Unit Tests
// =============================================================================

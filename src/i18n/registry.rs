//! Language registry: Single source of truth for all license languages.
//!
//! Languages are keyed by their classic Mac OS region code, which is the
//! identifier disk image license resources are indexed by. The registry is a
//! lazily built singleton (`OnceLock`) holding the static language table and a
//! lowercase tag index.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::i18n::{Language, LanguageError, LanguageSelector};

/// Numeric language identifier (Mac OS region code).
pub type LanguageId = u16;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Region code used as the language identifier
    pub id: LanguageId,

    /// Tags that select this language (e.g., "en-US", "en"); matched case-insensitively
    pub tags: &'static [&'static str],

    /// Tag shown in warnings and summaries
    pub display_tag: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Native name of the language
    pub native_name: &'static str,

    /// Legacy charsets, primary first
    pub charsets: &'static [&'static str],

    /// Whether the primary charset is a double-byte charset
    pub double_byte_charset: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
    by_tag: HashMap<String, usize>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry::new(LANGUAGES))
    }

    fn new(languages: &'static [LanguageConfig]) -> Self {
        let mut by_tag = HashMap::new();
        for (index, config) in languages.iter().enumerate() {
            for tag in config.tags {
                by_tag.entry(tag.to_ascii_lowercase()).or_insert(index);
            }
        }

        Self { languages, by_tag }
    }

    /// Get a language configuration by its identifier.
    ///
    /// # Arguments
    /// * `id` - The Mac OS region code (e.g., 0 for en-US, 14 for ja-JP)
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if no language has that identifier
    pub fn get_by_id(&self, id: LanguageId) -> Option<&'static LanguageConfig> {
        self.languages.iter().find(|lang| lang.id == id)
    }

    /// Get a language configuration by one of its tags (case-insensitive).
    ///
    /// # Arguments
    /// * `tag` - Any tag listed for the language (e.g., "fr", "fr-FR")
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the tag is known
    /// * `None` otherwise
    pub fn get_by_tag(&self, tag: &str) -> Option<&'static LanguageConfig> {
        self.by_tag
            .get(&tag.trim().to_ascii_lowercase())
            .map(|&index| &self.languages[index])
    }

    /// Get all languages.
    ///
    /// # Returns
    /// A vector of references to every language configuration, in table order.
    pub fn list_all(&self) -> Vec<&'static LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Expand a selector into concrete languages.
    ///
    /// Order follows the selector (or table order for `all`). A language named
    /// twice by the same selector is only returned once.
    ///
    /// # Arguments
    /// * `selector` - `all`, a single tag, or a list of tags
    ///
    /// # Returns
    /// * `Ok(Vec<Language>)` with at least one language
    /// * `Err(LanguageError)` for an empty list, a malformed tag or an unknown tag
    pub fn expand(&self, selector: &LanguageSelector) -> Result<Vec<Language>, LanguageError> {
        let configs: Vec<&'static LanguageConfig> = match selector {
            LanguageSelector::All => self.list_all(),
            LanguageSelector::Tags(tags) => {
                if tags.is_empty() {
                    return Err(LanguageError::EmptySelector);
                }

                tags.iter()
                    .map(|tag| {
                        if !is_well_formed_tag(tag) {
                            return Err(LanguageError::MalformedTag(tag.clone()));
                        }
                        self.get_by_tag(tag)
                            .ok_or_else(|| LanguageError::UnknownTag(tag.clone()))
                    })
                    .collect::<Result<_, _>>()?
            }
        };

        let mut languages: Vec<Language> = Vec::with_capacity(configs.len());
        for config in configs {
            let language = Language::new(config);
            if !languages.contains(&language) {
                languages.push(language);
            }
        }

        Ok(languages)
    }

    /// Human readable name for warning text.
    ///
    /// # Returns
    /// * `Some(String)` such as "French (fr-FR)"
    /// * `None` if `id` is not in the table
    pub fn display_name(&self, id: LanguageId) -> Option<String> {
        self.get_by_id(id)
            .map(|config| format!("{} ({})", config.name, config.display_tag))
    }
}

// Loose BCP 47 shape check (cached for performance)
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn is_well_formed_tag(tag: &str) -> bool {
    let regex =
        TAG_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z]{2,3}(?:-[A-Za-z0-9]{2,8})*$").unwrap());
    regex.is_match(tag.trim())
}

const MAC_ROMAN: &[&str] = &["macintosh"];

static LANGUAGES: &[LanguageConfig] = &[
    LanguageConfig {
        id: 0,
        tags: &["en-US", "en"],
        display_tag: "en-US",
        name: "English",
        native_name: "English",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 1,
        tags: &["fr-FR", "fr"],
        display_tag: "fr-FR",
        name: "French",
        native_name: "Français",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 2,
        tags: &["en-GB"],
        display_tag: "en-GB",
        name: "British English",
        native_name: "English (United Kingdom)",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 3,
        tags: &["de-DE", "de"],
        display_tag: "de-DE",
        name: "German",
        native_name: "Deutsch",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 4,
        tags: &["it-IT", "it"],
        display_tag: "it-IT",
        name: "Italian",
        native_name: "Italiano",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 5,
        tags: &["nl-NL", "nl"],
        display_tag: "nl-NL",
        name: "Dutch",
        native_name: "Nederlands",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 6,
        tags: &["nl-BE"],
        display_tag: "nl-BE",
        name: "Flemish",
        native_name: "Vlaams",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 7,
        tags: &["sv-SE", "sv"],
        display_tag: "sv-SE",
        name: "Swedish",
        native_name: "Svenska",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 8,
        tags: &["es-ES", "es"],
        display_tag: "es-ES",
        name: "Spanish",
        native_name: "Español",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 9,
        tags: &["da-DK", "da"],
        display_tag: "da-DK",
        name: "Danish",
        native_name: "Dansk",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 10,
        tags: &["pt-PT", "pt"],
        display_tag: "pt-PT",
        name: "Portuguese",
        native_name: "Português",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 11,
        tags: &["fr-CA"],
        display_tag: "fr-CA",
        name: "Canadian French",
        native_name: "Français (Canada)",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 12,
        tags: &["nb-NO", "nb", "no"],
        display_tag: "nb-NO",
        name: "Norwegian Bokmål",
        native_name: "Norsk bokmål",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 14,
        tags: &["ja-JP", "ja"],
        display_tag: "ja-JP",
        name: "Japanese",
        native_name: "日本語",
        charsets: &["Shift_JIS"],
        double_byte_charset: true,
    },
    LanguageConfig {
        id: 15,
        tags: &["en-AU"],
        display_tag: "en-AU",
        name: "Australian English",
        native_name: "English (Australia)",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 17,
        tags: &["fi-FI", "fi"],
        display_tag: "fi-FI",
        name: "Finnish",
        native_name: "Suomi",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 18,
        tags: &["fr-CH"],
        display_tag: "fr-CH",
        name: "Swiss French",
        native_name: "Français (Suisse)",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 19,
        tags: &["de-CH"],
        display_tag: "de-CH",
        name: "Swiss German",
        native_name: "Deutsch (Schweiz)",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 49,
        tags: &["ru-RU", "ru"],
        display_tag: "ru-RU",
        name: "Russian",
        native_name: "Русский",
        charsets: &["x-mac-cyrillic"],
        double_byte_charset: false,
    },
    LanguageConfig {
        id: 51,
        tags: &["ko-KR", "ko"],
        display_tag: "ko-KR",
        name: "Korean",
        native_name: "한국어",
        charsets: &["EUC-KR"],
        double_byte_charset: true,
    },
    LanguageConfig {
        id: 52,
        tags: &["zh-CN", "zh-Hans", "zh"],
        display_tag: "zh-CN",
        name: "Simplified Chinese",
        native_name: "简体中文",
        charsets: &["GBK"],
        double_byte_charset: true,
    },
    LanguageConfig {
        id: 53,
        tags: &["zh-TW", "zh-Hant"],
        display_tag: "zh-TW",
        name: "Traditional Chinese",
        native_name: "繁體中文",
        charsets: &["Big5"],
        double_byte_charset: true,
    },
    LanguageConfig {
        id: 71,
        tags: &["pt-BR"],
        display_tag: "pt-BR",
        name: "Brazilian Portuguese",
        native_name: "Português (Brasil)",
        charsets: MAC_ROMAN,
        double_byte_charset: false,
    },
];

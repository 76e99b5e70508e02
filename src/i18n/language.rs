//! Language descriptors and the selectors that expand into them.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::i18n::{LanguageConfig, LanguageId, LanguageRegistry};

/// Errors raised while expanding a language selector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("the language list is empty")]
    EmptySelector,

    #[error("“{0}” is not a well-formed language tag")]
    MalformedTag(String),

    #[error("unknown language tag “{0}”")]
    UnknownTag(String),
}

/// A concrete language resolved from the registry.
///
/// Equality and hashing use the language identifier only.
#[derive(Clone, Copy)]
pub struct Language {
    config: &'static LanguageConfig,
}

impl Language {
    pub(crate) fn new(config: &'static LanguageConfig) -> Self {
        Self { config }
    }

    /// Look up a single language by tag.
    ///
    /// # Example
    /// ```ignore
    /// let french = Language::from_tag("fr")?;
    /// assert_eq!(french.id(), 1);
    /// ```
    pub fn from_tag(tag: &str) -> Result<Language, LanguageError> {
        LanguageRegistry::get()
            .get_by_tag(tag)
            .map(Language::new)
            .ok_or_else(|| LanguageError::UnknownTag(tag.to_string()))
    }

    /// Look up a single language by identifier.
    pub fn from_id(id: LanguageId) -> Option<Language> {
        LanguageRegistry::get().get_by_id(id).map(Language::new)
    }

    pub fn id(&self) -> LanguageId {
        self.config.id
    }

    /// The tag used when printing this language (e.g., "fr-FR").
    pub fn display_tag(&self) -> &'static str {
        self.config.display_tag
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        self.config.name
    }

    /// Name of the language in the language itself.
    pub fn native_name(&self) -> &'static str {
        self.config.native_name
    }

    /// The legacy charset license resources for this language are normally stored in.
    pub fn primary_charset(&self) -> &'static str {
        self.config.charsets.first().copied().unwrap_or("macintosh")
    }

    pub fn is_double_byte(&self) -> bool {
        self.config.double_byte_charset
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("id", &self.id())
            .field("tag", &self.display_tag())
            .finish()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_tag())
    }
}

/// Which languages a license specification applies to.
///
/// Deserializes from `"all"`, a single tag string, or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelector {
    /// Every language in the registry, in table order
    All,

    /// Explicit tags, in the order given
    Tags(Vec<String>),
}

impl LanguageSelector {
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LanguageSelector::Tags(tags.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for LanguageSelector {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            LanguageSelector::All
        } else {
            LanguageSelector::Tags(vec![value.to_string()])
        }
    }
}

impl<'de> Deserialize<'de> for LanguageSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSelector {
            One(String),
            Many(Vec<String>),
        }

        Ok(match RawSelector::deserialize(deserializer)? {
            RawSelector::One(tag) => LanguageSelector::from(tag.as_str()),
            RawSelector::Many(tags) => LanguageSelector::Tags(tags),
        })
    }
}

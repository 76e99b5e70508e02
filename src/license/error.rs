//! Error and warning types for license resolution.
//!
//! Input problems are fatal and reported per specification. Merge anomalies
//! (collisions, competing defaults) are `Warning`s collected in a `Warnings`
//! channel that the caller decides what to do with.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::i18n::{Language, LanguageError, LanguageId, LanguageRegistry};
use crate::license::CharsetError;

/// A problem with one field of one specification.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error("neither `text` nor `file` is set")]
    MissingBody,

    #[error("inline text requires an explicit `charset`")]
    MissingCharset,

    #[error("cannot read “{}”: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Charset(#[from] CharsetError),

    #[error("malformed label file “{}”: {source}", .path.display())]
    MalformedLabels {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("label `{name}` is {length} bytes once encoded (at most 255 allowed)")]
    LabelTooLong { name: &'static str, length: usize },
}

/// The part of a specification a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    Languages,
    Body,
    Labels,
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpecField::Languages => "languages",
            SpecField::Body => "body",
            SpecField::Labels => "labels",
        })
    }
}

/// A `SpecError` tagged with the specification (0-based index) and field it came from.
#[derive(Debug, Error)]
#[error("license specification #{} ({field}): {error}", .index + 1)]
pub struct SpecFailure {
    pub index: usize,
    pub field: SpecField,
    #[source]
    pub error: SpecError,
}

impl SpecFailure {
    pub fn new(index: usize, field: SpecField, error: impl Into<SpecError>) -> Self {
        Self {
            index,
            field,
            error: error.into(),
        }
    }
}

/// Errors that abort resolution.
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("No license specifications were provided.")]
    NoSpecifications,

    #[error("No license specification covers any language.")]
    NoLanguages,

    #[error("{} license specification problem(s):\n{}", .0.len(), bullet_list(.0))]
    InvalidSpecifications(Vec<SpecFailure>),

    #[error("{} warning(s) treated as errors:\n{}", .0.len(), bullet_list(.0))]
    Warnings(Vec<Warning>),
}

fn bullet_list<T: fmt::Display>(entries: &[T]) -> String {
    entries
        .iter()
        .map(|entry| format!("  - {}", entry))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-fatal anomaly found while merging specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Languages claimed by more than one specification; the first claim was kept
    LanguageCollision { languages: Vec<Language> },

    /// More than one language was flagged as default; `chosen` was kept
    MultipleDefaults {
        chosen: LanguageId,
        choices: Vec<Language>,
    },
}

fn join_languages(languages: &[Language]) -> String {
    languages
        .iter()
        .map(Language::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LanguageCollision { languages } => write!(
                f,
                "More than one license body was assigned to the language(s) {}.",
                join_languages(languages)
            ),
            Warning::MultipleDefaults { chosen, choices } => {
                let chosen = LanguageRegistry::get()
                    .display_name(*chosen)
                    .unwrap_or_else(|| chosen.to_string());
                write!(
                    f,
                    "More than one language was designated as the default. Choosing {}. Choices were {}.",
                    chosen,
                    join_languages(choices)
                )
            }
        }
    }
}

/// Append-only collector for non-fatal warnings.
///
/// Each warning is logged when pushed. Whether warnings fail the run is the
/// caller's call, see [`Warnings::into_result`].
#[derive(Debug, Default)]
pub struct Warnings {
    entries: Vec<Warning>,
}

impl Warnings {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it at `warn` level.
    pub fn push(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.entries.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.entries.iter()
    }

    /// Apply the warning policy.
    ///
    /// # Arguments
    /// * `strict` - Whether warnings fail the run
    ///
    /// # Returns
    /// * `Ok(Vec<Warning>)` in lenient mode, or in strict mode with no warnings
    /// * `Err(LicenseError::Warnings)` in strict mode when any warning was recorded
    pub fn into_result(self, strict: bool) -> Result<Vec<Warning>, LicenseError> {
        if strict && !self.entries.is_empty() {
            Err(LicenseError::Warnings(self.entries))
        } else {
            Ok(self.entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(tag: &str) -> Language {
        Language::from_tag(tag).unwrap()
    }

    #[test]
    fn test_collision_message_lists_languages() {
        let warning = Warning::LanguageCollision {
            languages: vec![lang("en"), lang("fr")],
        };
        assert_eq!(
            warning.to_string(),
            "More than one license body was assigned to the language(s) en-US, fr-FR."
        );
    }

    #[test]
    fn test_multiple_defaults_message_names_choice() {
        let warning = Warning::MultipleDefaults {
            chosen: 1,
            choices: vec![lang("fr"), lang("de")],
        };
        let message = warning.to_string();
        assert!(message.contains("Choosing French (fr-FR)."));
        assert!(message.contains("Choices were fr-FR, de-DE."));
    }

    #[test]
    fn test_spec_failure_is_one_based() {
        let failure = SpecFailure::new(2, SpecField::Body, SpecError::MissingCharset);
        assert_eq!(
            failure.to_string(),
            "license specification #3 (body): inline text requires an explicit `charset`"
        );
    }

    #[test]
    fn test_invalid_specifications_lists_every_failure() {
        let error = LicenseError::InvalidSpecifications(vec![
            SpecFailure::new(0, SpecField::Body, SpecError::MissingBody),
            SpecFailure::new(
                1,
                SpecField::Languages,
                LanguageError::UnknownTag("xx".to_string()),
            ),
        ]);
        let message = error.to_string();
        assert!(message.starts_with("2 license specification problem(s)"));
        assert!(message.contains("#1 (body)"));
        assert!(message.contains("#2 (languages)"));
    }

    #[test]
    fn test_warnings_lenient_mode_returns_entries() {
        let mut warnings = Warnings::new();
        warnings.push(Warning::LanguageCollision {
            languages: vec![lang("en")],
        });
        assert_eq!(warnings.len(), 1);

        let entries = warnings.into_result(false).expect("lenient mode never fails");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_warnings_strict_mode_fails() {
        let mut warnings = Warnings::new();
        warnings.push(Warning::LanguageCollision {
            languages: vec![lang("en")],
        });

        let result = warnings.into_result(true);
        assert!(matches!(result, Err(LicenseError::Warnings(ref w)) if w.len() == 1));
    }

    #[test]
    fn test_warnings_strict_mode_without_warnings_succeeds() {
        assert!(Warnings::new().into_result(true).unwrap().is_empty());
    }
}

//! Language registry and language descriptors.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for license languages, keyed by Mac OS region code
//! - `language`: `Language` descriptors and the `LanguageSelector` that expands into them
//!
//! # Example
//!
//! ```rust,ignore
//! use license_content::i18n::{LanguageRegistry, LanguageSelector};
//!
//! let languages = LanguageRegistry::get().expand(&LanguageSelector::tags(["en", "fr"]))?;
//! assert_eq!(languages[1].display_tag(), "fr-FR");
//! ```

mod language;
mod registry;

pub use language::{Language, LanguageError, LanguageSelector};
pub use registry::{LanguageConfig, LanguageId, LanguageRegistry};

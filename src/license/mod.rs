//! License content resolution.
//!
//! # Architecture
//!
//! - `spec`: JSON input types (`LicenseSpec`, `LicenseBody`, labels)
//! - `charset`: `CharsetEncoder` trait and the `encoding_rs` backed default
//! - `body`: loads and encodes one license body
//! - `labels`: `LabelLoader` trait, built-in labels and `STR#` encoding
//! - `merge`: ordered first-claim-wins fold and default language choice
//! - `resolver`: concurrent loading of all specifications, then the merge
//! - `manifest`: serializable summary of the result
//! - `error`: fatal errors and the non-fatal `Warnings` channel
//!
//! # Example
//!
//! ```rust,ignore
//! use license_content::license::{Context, LicenseBody, LicenseSpec, Resolver, Warnings};
//!
//! let specs = vec![LicenseSpec::new("en", LicenseBody::file("LICENSE.rtf")).with_default(true)];
//! let mut warnings = Warnings::new();
//! let content = Resolver::new(Context::with_base_dir("assets"))
//!     .resolve(&specs, &mut warnings)
//!     .await?;
//! ```

mod body;
mod charset;
mod context;
mod error;
mod labels;
mod manifest;
mod merge;
mod resolver;
mod spec;

pub use body::{load_body, EncodedBody, DEFAULT_FILE_CHARSET};
pub use charset::{
    native_charset, CharsetEncoder, CharsetError, DefaultCharsetEncoder, TextSource,
    NATIVE_CHARSET,
};
pub use context::Context;
pub use error::{LicenseError, SpecError, SpecFailure, SpecField, Warning, Warnings};
pub use labels::{builtin_labels, encode_labels, DefaultLabelLoader, LabelLoader};
pub use manifest::{ContentManifest, ManifestItem};
pub use merge::{ContentItem, ResolvedLicenseContent};
pub use resolver::Resolver;
pub use spec::{
    BodyFormat, InlineLabels, LabelSet, LabelsSpec, LicenseBody, LicenseSpec, TextEncoding,
};

//! License specification input types, deserialized from JSON.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::i18n::LanguageSelector;

/// One license body plus the languages it applies to.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseSpec {
    /// Languages this license applies to
    pub languages: LanguageSelector,

    /// Where the license text comes from and how to encode it
    pub body: LicenseBody,

    /// Button labels and prompt; built-in labels when absent
    #[serde(default)]
    pub labels: Option<LabelsSpec>,

    /// Whether this license's first language should be the default language
    #[serde(default)]
    pub default: bool,
}

impl LicenseSpec {
    pub fn new(languages: impl Into<LanguageSelector>, body: LicenseBody) -> Self {
        Self {
            languages: languages.into(),
            body,
            labels: None,
            default: false,
        }
    }

    pub fn with_labels(mut self, labels: LabelsSpec) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }
}

/// License text source. `file` wins over `text` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseBody {
    /// Inline license text
    #[serde(default)]
    pub text: Option<String>,

    /// Path to a license file; relative paths are resolved against the base directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Charset to store the text in. Required for inline text, "UTF-8" for files.
    #[serde(default)]
    pub charset: Option<String>,

    /// How the source represents its bytes
    #[serde(default)]
    pub encoding: Option<TextEncoding>,

    /// Format override; otherwise inferred from the file extension
    #[serde(default, rename = "type")]
    pub format: Option<BodyFormat>,
}

impl LicenseBody {
    /// Inline text stored in the given charset.
    pub fn text(text: impl Into<String>, charset: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            charset: Some(charset.into()),
            ..Self::default()
        }
    }

    /// Text read from a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_format(mut self, format: BodyFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// How a text source represents its bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Literal text
    #[default]
    Text,

    /// Raw bytes in the target charset, base64 encoded
    Base64,

    /// Raw bytes in the target charset, hex encoded
    Hex,
}

/// Format of a license body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BodyFormat {
    #[serde(rename = "rtf", alias = "rich-text")]
    RichText,

    #[serde(rename = "plain", alias = "plain-text", alias = "text")]
    PlainText,
}

impl BodyFormat {
    /// Infer the format from a file name: `.rtf` is rich text, anything else is plain.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("rtf") => BodyFormat::RichText,
            _ => BodyFormat::PlainText,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyFormat::RichText => "rich-text",
            BodyFormat::PlainText => "plain-text",
        }
    }

    /// Four-character resource type the body is stored under.
    pub fn resource_type(&self) -> &'static str {
        match self {
            BodyFormat::RichText => "RTF ",
            BodyFormat::PlainText => "TEXT",
        }
    }
}

/// Where a specification's labels come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LabelsSpec {
    /// JSON file holding a `LabelSet`
    File {
        file: PathBuf,
        #[serde(default)]
        charset: Option<String>,
    },

    /// Labels given inline
    Inline(InlineLabels),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InlineLabels {
    #[serde(flatten)]
    pub labels: LabelSet,

    #[serde(default)]
    pub charset: Option<String>,
}

/// Strings shown by the license agreement dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSet {
    pub language_name: String,
    pub agree: String,
    pub disagree: String,
    pub print: String,
    pub save: String,
    pub message: String,
}

impl LabelSet {
    /// Labels in resource order, paired with their field names.
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("languageName", &self.language_name),
            ("agree", &self.agree),
            ("disagree", &self.disagree),
            ("print", &self.print),
            ("save", &self.save),
            ("message", &self.message),
        ]
    }
}

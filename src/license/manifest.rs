//! Serializable summary of resolved license content.

use base64::Engine as _;
use serde::Serialize;

use crate::i18n::LanguageId;
use crate::license::ResolvedLicenseContent;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifest {
    pub default_language_id: LanguageId,
    pub items: Vec<ManifestItem>,
}

/// One license body; binary payloads are base64 encoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestItem {
    pub languages: Vec<&'static str>,
    pub language_ids: Vec<LanguageId>,
    /// Languages this item actually won
    pub claimed_language_ids: Vec<LanguageId>,
    pub format: &'static str,
    pub resource_type: &'static str,
    pub body: String,
    pub labels: String,
}

impl ResolvedLicenseContent {
    pub fn manifest(&self) -> ContentManifest {
        let engine = base64::engine::general_purpose::STANDARD;

        let items = self
            .items_in_order()
            .iter()
            .enumerate()
            .map(|(index, item)| ManifestItem {
                languages: item.languages.iter().map(|l| l.display_tag()).collect(),
                language_ids: item.language_ids.clone(),
                claimed_language_ids: item
                    .language_ids
                    .iter()
                    .copied()
                    .filter(|&id| self.item_index(id) == Some(index))
                    .collect(),
                format: item.body.format.as_str(),
                resource_type: item.body.format.resource_type(),
                body: engine.encode(&item.body.data),
                labels: engine.encode(&item.labels),
            })
            .collect();

        ContentManifest {
            default_language_id: self.default_language_id(),
            items,
        }
    }
}

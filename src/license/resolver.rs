//! Resolution of license specifications into `ResolvedLicenseContent`.
//!
//! Every specification is loaded concurrently on the current task; the merge
//! only starts once all of them have finished, so its outcome never depends
//! on completion order.

use futures::future::join_all;
use tracing::{debug, info};

use crate::i18n::LanguageRegistry;
use crate::license::merge::merge;
use crate::license::{
    load_body, CharsetEncoder, ContentItem, Context, DefaultCharsetEncoder, DefaultLabelLoader,
    LabelLoader, LicenseError, LicenseSpec, ResolvedLicenseContent, SpecFailure, SpecField,
    Warnings,
};

/// Resolves license specifications using an encoder and a label loader.
pub struct Resolver<E = DefaultCharsetEncoder, L = DefaultLabelLoader> {
    registry: &'static LanguageRegistry,
    encoder: E,
    labels: L,
    context: Context,
}

impl Resolver {
    /// Resolver with the default encoder and built-in label handling.
    ///
    /// # Arguments
    /// * `context` - Base directory relative body and label files are read from
    pub fn new(context: Context) -> Self {
        Self::with_components(context, DefaultCharsetEncoder, DefaultLabelLoader::new())
    }
}

impl<E: CharsetEncoder, L: LabelLoader> Resolver<E, L> {
    /// Resolver with a caller-supplied encoder and label loader.
    ///
    /// # Arguments
    /// * `context` - Base directory relative body and label files are read from
    /// * `encoder` - Charset encoder used for every body
    /// * `labels` - Loader producing each specification's label buffer
    pub fn with_components(context: Context, encoder: E, labels: L) -> Self {
        Self {
            registry: LanguageRegistry::get(),
            encoder,
            labels,
            context,
        }
    }

    /// Load every specification and merge them.
    ///
    /// Fails with every broken specification listed when any of them fails.
    /// Merge anomalies are pushed to `warnings` and do not fail resolution.
    ///
    /// # Arguments
    /// * `specs` - Specifications in priority order; earlier ones win collisions
    /// * `warnings` - Channel receiving collision and multiple-default warnings
    ///
    /// # Returns
    /// * `Ok(ResolvedLicenseContent)` covering every claimed language
    /// * `Err(LicenseError::NoSpecifications)` for an empty slice
    /// * `Err(LicenseError::InvalidSpecifications)` listing every failed specification
    pub async fn resolve(
        &self,
        specs: &[LicenseSpec],
        warnings: &mut Warnings,
    ) -> Result<ResolvedLicenseContent, LicenseError> {
        if specs.is_empty() {
            return Err(LicenseError::NoSpecifications);
        }
        info!("Resolving {} license specification(s)", specs.len());

        let results = join_all(
            specs
                .iter()
                .enumerate()
                .map(|(index, spec)| self.load_item(index, spec)),
        )
        .await;

        let mut items = Vec::with_capacity(specs.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(item) => items.push(item),
                Err(mut errors) => failures.append(&mut errors),
            }
        }

        if !failures.is_empty() {
            debug!("{} specification problem(s), aborting", failures.len());
            return Err(LicenseError::InvalidSpecifications(failures));
        }

        let default_flags = specs.iter().map(|spec| spec.default).collect();
        let outcome = merge(items, default_flags)?;

        for warning in outcome.warnings {
            warnings.push(warning);
        }

        let content = outcome.content;
        info!(
            "Resolved {} language(s) from {} license(s), default language {}",
            content.language_ids().count(),
            content.items_in_order().len(),
            self.registry
                .display_name(content.default_language_id())
                .unwrap_or_else(|| content.default_language_id().to_string())
        );

        Ok(content)
    }

    async fn load_item(
        &self,
        index: usize,
        spec: &LicenseSpec,
    ) -> Result<ContentItem, Vec<SpecFailure>> {
        let languages = self
            .registry
            .expand(&spec.languages)
            .map_err(|e| vec![SpecFailure::new(index, SpecField::Languages, e)])?;
        debug!(
            "License #{} covers {} language(s)",
            index + 1,
            languages.len()
        );

        let (body, labels) = futures::join!(
            load_body(&spec.body, &languages, &self.encoder, &self.context),
            self.labels.load_labels(spec, &languages, &self.context),
        );

        match (body, labels) {
            (Ok(body), Ok(labels)) => Ok(ContentItem::new(body, labels, languages)),
            (body, labels) => {
                let mut failures = Vec::new();
                if let Err(e) = body {
                    failures.push(SpecFailure::new(index, SpecField::Body, e));
                }
                if let Err(e) = labels {
                    failures.push(SpecFailure::new(index, SpecField::Labels, e));
                }
                Err(failures)
            }
        }
    }
}

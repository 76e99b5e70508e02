//! Deterministic merge of loaded license items.
//!
//! Items are folded strictly in specification order and, within an item, in
//! language order. The first item to reach a language claims it; later
//! claimants are recorded as collisions and otherwise ignored.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::debug;

use crate::i18n::{Language, LanguageId};
use crate::license::{EncodedBody, LicenseError, Warning};

/// One specification's loaded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub body: EncodedBody,
    pub labels: Vec<u8>,
    /// Languages in registry-expansion order
    pub languages: Vec<Language>,
    /// Identifiers of `languages`, same order
    pub language_ids: Vec<LanguageId>,
}

impl ContentItem {
    /// Build an item, deriving `language_ids` from `languages`.
    pub fn new(body: EncodedBody, labels: Vec<u8>, languages: Vec<Language>) -> Self {
        let language_ids = languages.iter().map(Language::id).collect();
        Self {
            body,
            labels,
            languages,
            language_ids,
        }
    }
}

/// License content for every language, plus the default language.
///
/// Every key of the language index maps to an item whose `language_ids`
/// contain it, and the default language is always a key.
#[derive(Debug, Clone)]
pub struct ResolvedLicenseContent {
    items_in_order: Vec<ContentItem>,
    by_language_id: BTreeMap<LanguageId, usize>,
    default_language_id: LanguageId,
}

impl ResolvedLicenseContent {
    /// Items in specification order, including items that won no language.
    pub fn items_in_order(&self) -> &[ContentItem] {
        &self.items_in_order
    }

    /// The item that claimed `id`.
    pub fn get(&self, id: LanguageId) -> Option<&ContentItem> {
        self.by_language_id
            .get(&id)
            .map(|&index| &self.items_in_order[index])
    }

    /// Claimed languages in ascending id order with their items.
    pub fn by_language_id(&self) -> impl Iterator<Item = (LanguageId, &ContentItem)> {
        self.by_language_id
            .iter()
            .map(|(&id, &index)| (id, &self.items_in_order[index]))
    }

    /// Claimed language identifiers, ascending.
    pub fn language_ids(&self) -> impl Iterator<Item = LanguageId> + '_ {
        self.by_language_id.keys().copied()
    }

    /// Position in `items_in_order` of the item that claimed `id`.
    pub fn item_index(&self, id: LanguageId) -> Option<usize> {
        self.by_language_id.get(&id).copied()
    }

    /// The default language; always a claimed language.
    pub fn default_language_id(&self) -> LanguageId {
        self.default_language_id
    }

    /// The item that claimed the default language.
    ///
    /// This need not be the item flagged `default`: when that item's first
    /// language was claimed earlier, the earlier claimant is returned.
    pub fn default_item(&self) -> &ContentItem {
        &self.items_in_order[self.by_language_id[&self.default_language_id]]
    }
}

#[derive(Debug)]
pub(crate) struct MergeOutcome {
    pub content: ResolvedLicenseContent,
    pub warnings: Vec<Warning>,
}

/// Fold items into one `ResolvedLicenseContent`.
///
/// `default_flags[i]` is the `default` flag of the specification `items[i]`
/// was loaded from. The side table is consumed here and not kept.
///
/// Items that claim no language are kept in order but skipped for default
/// bookkeeping, even when flagged default.
pub(crate) fn merge(
    items: Vec<ContentItem>,
    default_flags: Vec<bool>,
) -> Result<MergeOutcome, LicenseError> {
    if items.is_empty() {
        return Err(LicenseError::NoSpecifications);
    }
    debug_assert_eq!(items.len(), default_flags.len());

    let mut by_language_id: BTreeMap<LanguageId, usize> = BTreeMap::new();
    let mut collisions: Vec<Language> = Vec::new();
    let mut default_candidates: Vec<Language> = Vec::new();
    let mut default_language_id: Option<LanguageId> = None;

    for (index, (item, is_default)) in items.iter().zip(default_flags).enumerate() {
        let mut claimed = 0usize;

        for language in &item.languages {
            match by_language_id.entry(language.id()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                    claimed += 1;
                }
                Entry::Occupied(_) => {
                    if !collisions.contains(language) {
                        collisions.push(*language);
                    }
                }
            }
        }

        if claimed == 0 {
            debug!("License #{} claims no language and is unused", index + 1);
            continue;
        }
        debug!("License #{} claims {} language(s)", index + 1, claimed);

        if is_default {
            for language in &item.languages {
                if !default_candidates.contains(language) {
                    default_candidates.push(*language);
                }
            }
            if default_language_id.is_none() {
                default_language_id = item.language_ids.first().copied();
            }
        }
    }

    let mut warnings = Vec::new();

    if !collisions.is_empty() {
        warnings.push(Warning::LanguageCollision {
            languages: collisions,
        });
    }

    let default_language_id = match default_language_id {
        Some(id) => {
            if default_candidates.len() > 1 {
                warnings.push(Warning::MultipleDefaults {
                    chosen: id,
                    choices: default_candidates,
                });
            }
            id
        }
        None => items[0]
            .language_ids
            .first()
            .copied()
            .ok_or(LicenseError::NoLanguages)?,
    };

    Ok(MergeOutcome {
        content: ResolvedLicenseContent {
            items_in_order: items,
            by_language_id,
            default_language_id,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageRegistry;
    use crate::license::BodyFormat;
    use proptest::prelude::*;

    fn item(text: &str, tags: &[&str]) -> ContentItem {
        let languages = tags.iter().map(|t| Language::from_tag(t).unwrap()).collect();
        ContentItem::new(
            EncodedBody {
                data: text.as_bytes().to_vec(),
                format: BodyFormat::PlainText,
            },
            Vec::new(),
            languages,
        )
    }

    fn id(tag: &str) -> LanguageId {
        Language::from_tag(tag).unwrap().id()
    }

    fn body_text(item: &ContentItem) -> &str {
        std::str::from_utf8(&item.body.data).unwrap()
    }

    // ==================== Claim Tests ====================

    #[test]
    fn test_disjoint_items_claim_everything_without_warnings() {
        let outcome = merge(
            vec![item("A", &["en", "fr"]), item("B", &["de"])],
            vec![false, false],
        )
        .unwrap();

        let content = outcome.content;
        assert!(outcome.warnings.is_empty());
        assert_eq!(
            content.language_ids().collect::<Vec<_>>(),
            vec![id("en"), id("fr"), id("de")]
        );
        assert_eq!(body_text(content.get(id("fr")).unwrap()), "A");
        assert_eq!(body_text(content.get(id("de")).unwrap()), "B");
    }

    #[test]
    fn test_first_claim_wins() {
        let outcome = merge(
            vec![item("Hello", &["en"]), item("Bonjour", &["en", "fr"])],
            vec![false, false],
        )
        .unwrap();

        let content = &outcome.content;
        assert_eq!(body_text(content.get(id("en")).unwrap()), "Hello");
        assert_eq!(body_text(content.get(id("fr")).unwrap()), "Bonjour");
        assert_eq!(
            outcome.warnings,
            vec![Warning::LanguageCollision {
                languages: vec![Language::from_tag("en").unwrap()],
            }]
        );
    }

    #[test]
    fn test_collisions_are_reported_once_in_first_seen_order() {
        let outcome = merge(
            vec![
                item("A", &["en", "fr"]),
                item("B", &["fr", "en"]),
                item("C", &["fr"]),
            ],
            vec![false, false, false],
        )
        .unwrap();

        match &outcome.warnings[..] {
            [Warning::LanguageCollision { languages }] => {
                let tags: Vec<_> = languages.iter().map(|l| l.display_tag()).collect();
                assert_eq!(tags, vec!["fr-FR", "en-US"]);
            }
            other => panic!("Expected one collision warning, got {:?}", other),
        }
    }

    #[test]
    fn test_unused_item_stays_in_order() {
        let outcome = merge(
            vec![item("A", &["en"]), item("B", &["en"])],
            vec![false, false],
        )
        .unwrap();

        assert_eq!(outcome.content.items_in_order().len(), 2);
        assert_eq!(outcome.content.item_index(id("en")), Some(0));
    }

    // ==================== Default Language Tests ====================

    #[test]
    fn test_default_falls_back_to_first_language_of_first_item() {
        let outcome = merge(
            vec![item("A", &["fr", "en"]), item("B", &["de"])],
            vec![false, false],
        )
        .unwrap();
        assert_eq!(outcome.content.default_language_id(), id("fr"));
        assert_eq!(body_text(outcome.content.default_item()), "A");
    }

    #[test]
    fn test_single_default_uses_its_first_language() {
        let outcome = merge(
            vec![item("A", &["en"]), item("B", &["de"])],
            vec![false, true],
        )
        .unwrap();
        assert_eq!(outcome.content.default_language_id(), id("de"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_two_defaults_first_wins_with_warning() {
        let outcome = merge(
            vec![item("A", &["en"]), item("B", &["de"]), item("C", &["fr"])],
            vec![false, true, true],
        )
        .unwrap();

        assert_eq!(outcome.content.default_language_id(), id("de"));
        match &outcome.warnings[..] {
            [Warning::MultipleDefaults { chosen, choices }] => {
                assert_eq!(*chosen, id("de"));
                assert_eq!(choices.len(), 2);
            }
            other => panic!("Expected multiple-default warning, got {:?}", other),
        }
    }

    #[test]
    fn test_default_spanning_several_languages_warns() {
        let outcome = merge(vec![item("A", &["en", "fr"])], vec![true]).unwrap();
        assert_eq!(outcome.content.default_language_id(), id("en"));
        assert!(matches!(
            &outcome.warnings[..],
            [Warning::MultipleDefaults { choices, .. }] if choices.len() == 2
        ));
    }

    #[test]
    fn test_unused_default_item_is_ignored() {
        let outcome = merge(
            vec![item("A", &["fr"]), item("B", &["fr"])],
            vec![false, true],
        )
        .unwrap();

        // Item B claimed nothing, so its default flag never counts
        assert_eq!(outcome.content.default_language_id(), id("fr"));
        assert_eq!(outcome.content.item_index(id("fr")), Some(0));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(outcome.warnings[0], Warning::LanguageCollision { .. }));
    }

    #[test]
    fn test_default_whose_first_language_collided_keeps_that_language() {
        let outcome = merge(
            vec![item("A", &["en"]), item("B", &["en", "fr"])],
            vec![false, true],
        )
        .unwrap();

        let content = &outcome.content;
        // B is used (it claimed fr) but en still belongs to A
        assert_eq!(content.default_language_id(), id("en"));
        assert_eq!(content.item_index(id("en")), Some(0));
        assert_eq!(content.item_index(id("fr")), Some(1));
        assert_eq!(body_text(content.default_item()), "A");
        assert_eq!(
            outcome.warnings,
            vec![
                Warning::LanguageCollision {
                    languages: vec![Language::from_tag("en").unwrap()],
                },
                Warning::MultipleDefaults {
                    chosen: id("en"),
                    choices: vec![
                        Language::from_tag("en").unwrap(),
                        Language::from_tag("fr").unwrap(),
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let result = merge(Vec::new(), Vec::new());
        assert!(matches!(result, Err(LicenseError::NoSpecifications)));
    }

    #[test]
    fn test_item_without_languages_is_rejected() {
        let result = merge(vec![item("A", &[])], vec![false]);
        assert!(matches!(result, Err(LicenseError::NoLanguages)));
    }

    // ==================== Properties ====================

    fn arb_items() -> impl Strategy<Value = Vec<(Vec<usize>, bool)>> {
        let pool = LanguageRegistry::get().list_all().len();
        prop::collection::vec(
            (prop::collection::vec(0..pool, 1..5), any::<bool>()),
            1..6,
        )
    }

    fn build(specs: &[(Vec<usize>, bool)]) -> (Vec<ContentItem>, Vec<bool>) {
        let all = LanguageRegistry::get().list_all();
        let items = specs
            .iter()
            .enumerate()
            .map(|(i, (indices, _))| {
                let mut languages: Vec<Language> = Vec::new();
                for &idx in indices {
                    let language = Language::from_id(all[idx].id).unwrap();
                    if !languages.contains(&language) {
                        languages.push(language);
                    }
                }
                ContentItem::new(
                    EncodedBody {
                        data: i.to_string().into_bytes(),
                        format: BodyFormat::PlainText,
                    },
                    Vec::new(),
                    languages,
                )
            })
            .collect();
        let flags = specs.iter().map(|(_, default)| *default).collect();
        (items, flags)
    }

    proptest! {
        #[test]
        fn prop_every_key_maps_to_earliest_claimant(specs in arb_items()) {
            let (items, flags) = build(&specs);
            let outcome = merge(items.clone(), flags).unwrap();
            let content = &outcome.content;

            for item in &items {
                for &lang_id in &item.language_ids {
                    let earliest = items.iter().position(|i| i.language_ids.contains(&lang_id));
                    prop_assert_eq!(content.item_index(lang_id), earliest);
                }
            }
            for (lang_id, item) in content.by_language_id() {
                prop_assert!(item.language_ids.contains(&lang_id));
            }
        }

        #[test]
        fn prop_default_is_always_claimed(specs in arb_items()) {
            let (items, flags) = build(&specs);
            let outcome = merge(items, flags).unwrap();
            let default_id = outcome.content.default_language_id();
            prop_assert!(outcome.content.get(default_id).is_some());
        }

        #[test]
        fn prop_collision_warning_iff_overlap(specs in arb_items()) {
            let (items, flags) = build(&specs);
            let total: usize = items.iter().map(|i| i.language_ids.len()).sum();
            let outcome = merge(items, flags).unwrap();
            let distinct = outcome.content.language_ids().count();
            let has_collision = outcome
                .warnings
                .iter()
                .any(|w| matches!(w, Warning::LanguageCollision { .. }));
            prop_assert_eq!(has_collision, total != distinct);
        }
    }
}

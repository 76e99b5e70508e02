//! Label strings for the license agreement dialog.
//!
//! Labels are stored as a `STR#` payload: a big-endian `u16` count followed
//! by Pascal strings (one length byte, then the bytes) in resource order.

use tracing::debug;

use crate::i18n::Language;
use crate::license::{
    CharsetEncoder, Context, DefaultCharsetEncoder, LabelSet, LabelsSpec, LicenseSpec, SpecError,
    TextEncoding, TextSource,
};

/// Loads the encoded label buffer for a specification's languages.
#[allow(async_fn_in_trait)]
pub trait LabelLoader {
    async fn load_labels(
        &self,
        spec: &LicenseSpec,
        languages: &[Language],
        context: &Context,
    ) -> Result<Vec<u8>, SpecError>;
}

/// Reads inline or file labels, falling back to built-in labels.
///
/// Labels are encoded in the charset given by the labels entry, or the first
/// language's primary charset.
#[derive(Debug, Clone, Default)]
pub struct DefaultLabelLoader<E = DefaultCharsetEncoder> {
    encoder: E,
}

impl DefaultLabelLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: CharsetEncoder> DefaultLabelLoader<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self { encoder }
    }
}

impl<E: CharsetEncoder> LabelLoader for DefaultLabelLoader<E> {
    async fn load_labels(
        &self,
        spec: &LicenseSpec,
        languages: &[Language],
        context: &Context,
    ) -> Result<Vec<u8>, SpecError> {
        let (labels, charset) = match &spec.labels {
            None => (builtin_labels(languages.first()), None),
            Some(LabelsSpec::File { file, charset }) => {
                let path = context.resolve_path(file);
                let raw = tokio::fs::read(&path)
                    .await
                    .map_err(|source| SpecError::UnreadableFile {
                        path: path.clone(),
                        source,
                    })?;
                let labels: LabelSet = serde_json::from_slice(&raw)
                    .map_err(|source| SpecError::MalformedLabels { path, source })?;
                (labels, charset.as_deref())
            }
            Some(LabelsSpec::Inline(inline)) => (inline.labels.clone(), inline.charset.as_deref()),
        };

        let charset = match charset {
            Some(charset) => charset,
            None => languages
                .first()
                .map(Language::primary_charset)
                .unwrap_or("macintosh"),
        };

        encode_labels(&labels, charset, languages, &self.encoder)
    }
}

/// Encode a label set as a `STR#` payload.
pub fn encode_labels<E: CharsetEncoder>(
    labels: &LabelSet,
    charset: &str,
    languages: &[Language],
    encoder: &E,
) -> Result<Vec<u8>, SpecError> {
    let entries = labels.entries();
    let mut out = Vec::with_capacity(2 + entries.iter().map(|(_, s)| s.len() + 1).sum::<usize>());
    out.extend_from_slice(&(entries.len() as u16).to_be_bytes());

    for (name, value) in entries {
        let bytes = encoder.encode(
            charset,
            TextSource::Text(value.to_string()),
            TextEncoding::Text,
            languages,
        )?;
        let length = u8::try_from(bytes.len()).map_err(|_| SpecError::LabelTooLong {
            name,
            length: bytes.len(),
        })?;
        out.push(length);
        out.extend_from_slice(&bytes);
    }

    Ok(out)
}

struct BuiltinLabels {
    prefix: &'static str,
    language_name: &'static str,
    agree: &'static str,
    disagree: &'static str,
    print: &'static str,
    save: &'static str,
    message: &'static str,
}

const BUILTIN_LABELS: &[BuiltinLabels] = &[
    BuiltinLabels {
        prefix: "en",
        language_name: "English",
        agree: "Agree",
        disagree: "Disagree",
        print: "Print",
        save: "Save...",
        message: "If you agree with the terms of this license, press \"Agree\" to install the software. If you do not agree, press \"Disagree\".",
    },
    BuiltinLabels {
        prefix: "fr",
        language_name: "Français",
        agree: "Accepter",
        disagree: "Refuser",
        print: "Imprimer",
        save: "Enregistrer...",
        message: "Si vous acceptez les termes de la présente licence, cliquez sur \"Accepter\" afin d'installer le logiciel. Sinon, cliquez sur \"Refuser\".",
    },
    BuiltinLabels {
        prefix: "de",
        language_name: "Deutsch",
        agree: "Akzeptieren",
        disagree: "Ablehnen",
        print: "Drucken",
        save: "Sichern...",
        message: "Klicken Sie auf \"Akzeptieren\", wenn Sie mit den Bestimmungen des Lizenzvertrags einverstanden sind. Falls nicht, klicken Sie auf \"Ablehnen\".",
    },
    BuiltinLabels {
        prefix: "es",
        language_name: "Español",
        agree: "Aceptar",
        disagree: "No aceptar",
        print: "Imprimir",
        save: "Guardar...",
        message: "Si está de acuerdo con los términos de esta licencia, pulse \"Aceptar\" para instalar el software. En caso contrario, pulse \"No aceptar\".",
    },
    BuiltinLabels {
        prefix: "it",
        language_name: "Italiano",
        agree: "Accetto",
        disagree: "Rifiuto",
        print: "Stampa",
        save: "Registra...",
        message: "Se accetti le condizioni di questa licenza, fai clic su \"Accetto\" per installare il software. Altrimenti fai clic su \"Rifiuto\".",
    },
    BuiltinLabels {
        prefix: "nl",
        language_name: "Nederlands",
        agree: "Ja",
        disagree: "Nee",
        print: "Print",
        save: "Bewaar...",
        message: "Indien u akkoord gaat met de voorwaarden van deze licentie, klik dan op \"Ja\" om het programma te installeren. Zo niet, klik dan op \"Nee\".",
    },
    BuiltinLabels {
        prefix: "pt",
        language_name: "Português",
        agree: "Concordar",
        disagree: "Discordar",
        print: "Imprimir",
        save: "Salvar...",
        message: "Se está de acordo com os termos desta licença, clique em \"Concordar\" para instalar o software. Se não está de acordo, clique em \"Discordar\".",
    },
];

/// Built-in labels for a language, English when none exist.
pub fn builtin_labels(language: Option<&Language>) -> LabelSet {
    let primary = language
        .map(|lang| lang.display_tag().split('-').next().unwrap_or_default())
        .unwrap_or("en");

    let builtin = match BUILTIN_LABELS.iter().find(|labels| labels.prefix == primary) {
        Some(labels) => labels,
        None => {
            debug!("No built-in labels for {}, using English", primary);
            &BUILTIN_LABELS[0]
        }
    };

    LabelSet {
        language_name: builtin.language_name.to_string(),
        agree: builtin.agree.to_string(),
        disagree: builtin.disagree.to_string(),
        print: builtin.print.to_string(),
        save: builtin.save.to_string(),
        message: builtin.message.to_string(),
    }
}

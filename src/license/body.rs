use tracing::debug;

use crate::i18n::Language;
use crate::license::{
    BodyFormat, CharsetEncoder, Context, LicenseBody, SpecError, TextSource,
};

/// Charset assumed for license files that don't name one.
pub const DEFAULT_FILE_CHARSET: &str = "UTF-8";

/// An encoded license body ready to be stored as a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub data: Vec<u8>,
    pub format: BodyFormat,
}

/// Load and encode the license text for one specification.
///
/// `file` takes precedence over `text`. Inline text must name its charset;
/// files default to UTF-8.
pub async fn load_body<E: CharsetEncoder>(
    body: &LicenseBody,
    languages: &[Language],
    encoder: &E,
    context: &Context,
) -> Result<EncodedBody, SpecError> {
    let path = body.file.as_deref().map(|file| context.resolve_path(file));

    let (charset, source) = match &path {
        Some(path) => {
            let data = tokio::fs::read(path)
                .await
                .map_err(|source| SpecError::UnreadableFile {
                    path: path.clone(),
                    source,
                })?;
            debug!("Read {} bytes of license text from {}", data.len(), path.display());

            let charset = body.charset.as_deref().unwrap_or(DEFAULT_FILE_CHARSET);
            (charset, TextSource::Bytes(data))
        }
        None => {
            let text = body.text.as_ref().ok_or(SpecError::MissingBody)?;
            let charset = body.charset.as_deref().ok_or(SpecError::MissingCharset)?;
            (charset, TextSource::Text(text.clone()))
        }
    };

    let format = body.format.unwrap_or_else(|| match &path {
        Some(path) => BodyFormat::from_path(path),
        None => BodyFormat::PlainText,
    });

    let data = encoder.encode(charset, source, body.encoding.unwrap_or_default(), languages)?;

    Ok(EncodedBody { data, format })
}

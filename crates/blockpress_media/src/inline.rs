//! Inline `data:` reference decoding.

use crate::{ImageBlob, INLINE_DATA_SCHEME};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use blockpress_error::{MediaError, MediaErrorKind};
use percent_encoding::percent_decode_str;

/// Decode a `data:<mime>[;base64],<payload>` reference into a validated blob.
///
/// The payload is percent-decoded first, then base64-decoded when the header
/// carries `;base64`.
///
/// # Errors
///
/// - `Decode` if the value is not a well-formed data reference
/// - `InvalidPayload` if it does not carry a non-empty image
#[tracing::instrument(skip(value), fields(len = value.len()))]
pub fn decode_inline_data(value: &str) -> Result<ImageBlob, MediaError> {
    let rest = value
        .get(..INLINE_DATA_SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(INLINE_DATA_SCHEME))
        .map(|_| &value[INLINE_DATA_SCHEME.len()..])
        .ok_or_else(|| {
            MediaError::new(MediaErrorKind::Decode(
                "missing data: scheme".to_string(),
            ))
        })?;

    let (header, payload) = rest.split_once(',').ok_or_else(|| {
        MediaError::new(MediaErrorKind::Decode(
            "missing ',' separator".to_string(),
        ))
    })?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_string();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let decoded: Vec<u8> = percent_decode_str(payload).collect();
    let data = if is_base64 {
        let compact: Vec<u8> = decoded
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(&compact)
            .map_err(|e| MediaError::new(MediaErrorKind::Decode(format!("base64: {}", e))))?
    } else {
        decoded
    };

    let blob = ImageBlob::new(data, mime_type);
    blob.validate()?;
    tracing::debug!(size = blob.len(), mime_type = %blob.mime_type(), "Decoded inline image");
    Ok(blob)
}

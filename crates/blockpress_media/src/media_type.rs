//! Image media type enumeration.

use blockpress_error::{MediaError, MediaErrorKind};

/// Image formats the editor accepts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ImageMediaType {
    /// Portable Network Graphics
    #[display("image/png")]
    Png,
    /// JPEG
    #[display("image/jpeg")]
    Jpeg,
    /// GIF (including animated)
    #[display("image/gif")]
    Gif,
    /// WebP
    #[display("image/webp")]
    Webp,
    /// AVIF
    #[display("image/avif")]
    Avif,
    /// SVG markup
    #[display("image/svg+xml")]
    Svg,
    /// Windows bitmap
    #[display("image/bmp")]
    Bmp,
    /// Favicon
    #[display("image/x-icon")]
    Icon,
}

impl ImageMediaType {
    /// Canonical MIME type.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageMediaType::Png => "image/png",
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
            ImageMediaType::Avif => "image/avif",
            ImageMediaType::Svg => "image/svg+xml",
            ImageMediaType::Bmp => "image/bmp",
            ImageMediaType::Icon => "image/x-icon",
        }
    }

    /// File extension used when naming uploads.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageMediaType::Png => "png",
            ImageMediaType::Jpeg => "jpg",
            ImageMediaType::Gif => "gif",
            ImageMediaType::Webp => "webp",
            ImageMediaType::Avif => "avif",
            ImageMediaType::Svg => "svg",
            ImageMediaType::Bmp => "bmp",
            ImageMediaType::Icon => "ico",
        }
    }

    /// Guess the media type from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageMediaType::Png),
            "jpg" | "jpeg" => Some(ImageMediaType::Jpeg),
            "gif" => Some(ImageMediaType::Gif),
            "webp" => Some(ImageMediaType::Webp),
            "avif" => Some(ImageMediaType::Avif),
            "svg" => Some(ImageMediaType::Svg),
            "bmp" => Some(ImageMediaType::Bmp),
            "ico" => Some(ImageMediaType::Icon),
            _ => None,
        }
    }
}

impl std::str::FromStr for ImageMediaType {
    type Err = MediaError;

    /// Parse a MIME string, ignoring case and any `;param` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Ok(ImageMediaType::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Ok(ImageMediaType::Jpeg),
            "image/gif" => Ok(ImageMediaType::Gif),
            "image/webp" => Ok(ImageMediaType::Webp),
            "image/avif" => Ok(ImageMediaType::Avif),
            "image/svg+xml" => Ok(ImageMediaType::Svg),
            "image/bmp" | "image/x-ms-bmp" => Ok(ImageMediaType::Bmp),
            "image/x-icon" | "image/vnd.microsoft.icon" => Ok(ImageMediaType::Icon),
            _ => Err(MediaError::new(MediaErrorKind::InvalidPayload(format!(
                "unrecognized image media type '{}'",
                s
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_mime_round_trips_through_from_str() {
        for media_type in ImageMediaType::iter() {
            assert_eq!(media_type.mime().parse::<ImageMediaType>().unwrap(), media_type);
            assert_eq!(media_type.to_string(), media_type.mime());
        }
    }

    #[test]
    fn test_parse_ignores_case_and_parameters() {
        assert_eq!(
            "Image/JPG; charset=binary".parse::<ImageMediaType>().unwrap(),
            ImageMediaType::Jpeg
        );
    }

    #[test]
    fn test_non_image_mime_is_invalid_payload() {
        let err = "application/pdf".parse::<ImageMediaType>().unwrap_err();
        assert!(err.is_invalid_payload());
        assert!("".parse::<ImageMediaType>().is_err());
    }

    #[test]
    fn test_extension_lookup() {
        assert_eq!(ImageMediaType::from_extension("JPEG"), Some(ImageMediaType::Jpeg));
        assert_eq!(ImageMediaType::from_extension("txt"), None);
    }
}

//! Media reference classification.
//!
//! Pure functions only: classification never touches the store or the
//! network, so the rewriter can call it as often as it likes.

use std::collections::BTreeSet;

/// Scheme prefix of process-local references.
pub const LOCAL_REF_SCHEME: &str = "blob:";

/// Scheme prefix of inline data references.
pub const INLINE_DATA_SCHEME: &str = "data:";

/// How a media reference found in a document must be handled.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Already stored by the upload service
    #[display("permanent")]
    Permanent,
    /// Points into an ephemeral image store
    #[display("ephemeral")]
    Ephemeral,
    /// Embeds its own payload
    #[display("inline_data")]
    InlineData,
    /// Empty, or hosted somewhere this system does not own
    #[display("unresolved")]
    Unresolved,
}

impl ReferenceKind {
    /// Whether the rewriter has to upload something for this reference.
    pub fn needs_upload(&self) -> bool {
        matches!(self, ReferenceKind::Ephemeral | ReferenceKind::InlineData)
    }
}

/// The set of URL prefixes that identify durable storage.
///
/// Entries beginning with `/` are path segments of the storage proxy. They
/// match anywhere in an `http(s)://` URL or a root-relative path, never inside a
/// local or inline reference. Every other entry must match at the start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermanentPrefixes(BTreeSet<String>);

impl PermanentPrefixes {
    /// Build a prefix set, dropping blank entries.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p| !p.trim().is_empty())
                .collect(),
        )
    }

    /// Whether `value` points at durable storage.
    pub fn matches(&self, value: &str) -> bool {
        self.0.iter().any(|prefix| {
            if prefix.starts_with('/') {
                is_network_path(value) && value.contains(prefix.as_str())
            } else {
                value.starts_with(prefix.as_str())
            }
        })
    }

    /// Iterate the configured prefixes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of configured prefixes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no prefixes are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermanentPrefixes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Whether `value` is an HTTP(S) URL or a root-relative path.
fn is_network_path(value: &str) -> bool {
    let has_scheme = |scheme: &str| {
        value
            .get(..scheme.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(scheme))
    };
    value.starts_with('/') || has_scheme("http://") || has_scheme("https://")
}

/// Whether `value` uses the local reference scheme.
///
/// Any `blob:` string qualifies, including ones issued by a store from an
/// earlier session.
pub fn is_local_ref(value: &str) -> bool {
    value.starts_with(LOCAL_REF_SCHEME)
}

/// Whether `value` is an inline data reference.
pub fn is_inline_data(value: &str) -> bool {
    value
        .get(..INLINE_DATA_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(INLINE_DATA_SCHEME))
}

/// Classify a media reference.
///
/// Rules are applied in order: empty, permanent prefix, local scheme, inline
/// data, and finally unresolved for anything else.
pub fn classify(value: &str, prefixes: &PermanentPrefixes) -> ReferenceKind {
    let value = value.trim();
    if value.is_empty() {
        ReferenceKind::Unresolved
    } else if prefixes.matches(value) {
        ReferenceKind::Permanent
    } else if is_local_ref(value) {
        ReferenceKind::Ephemeral
    } else if is_inline_data(value) {
        ReferenceKind::InlineData
    } else {
        ReferenceKind::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> PermanentPrefixes {
        PermanentPrefixes::new([
            "https://cdn.example/storage/",
            "/storage/v1/object/public/",
        ])
    }

    #[test]
    fn test_empty_and_whitespace_are_unresolved() {
        assert_eq!(classify("", &prefixes()), ReferenceKind::Unresolved);
        assert_eq!(classify("   ", &prefixes()), ReferenceKind::Unresolved);
    }

    #[test]
    fn test_permanent_prefix_wins() {
        assert_eq!(
            classify("https://cdn.example/storage/abc.png", &prefixes()),
            ReferenceKind::Permanent
        );
        assert_eq!(
            classify(
                "https://proj.supabase.co/storage/v1/object/public/images/a.png",
                &prefixes()
            ),
            ReferenceKind::Permanent
        );
    }

    #[test]
    fn test_local_and_inline_schemes() {
        assert_eq!(
            classify("blob:http://localhost:3000/5f1c", &prefixes()),
            ReferenceKind::Ephemeral
        );
        assert_eq!(
            classify("data:image/png;base64,iVBORw0KGgo=", &prefixes()),
            ReferenceKind::InlineData
        );
        assert_eq!(
            classify("DATA:image/png;base64,iVBORw0KGgo=", &prefixes()),
            ReferenceKind::InlineData
        );
    }

    #[test]
    fn test_foreign_url_is_unresolved() {
        assert_eq!(
            classify("https://imgur.com/x.png", &prefixes()),
            ReferenceKind::Unresolved
        );
        assert_eq!(
            classify("https://imgur.com/x.png", &PermanentPrefixes::default()),
            ReferenceKind::Unresolved
        );
    }

    #[test]
    fn test_classification_is_stable() {
        let value = "blob:blockpress/1-abc";
        let first = classify(value, &prefixes());
        for _ in 0..3 {
            assert_eq!(classify(value, &prefixes()), first);
        }
    }

    #[test]
    fn test_path_segment_only_matches_network_urls() {
        assert_eq!(
            classify("/storage/v1/object/public/images/a.png", &prefixes()),
            ReferenceKind::Permanent
        );
        assert_eq!(
            classify(
                "HTTPS://proj.supabase.co/storage/v1/object/public/a.png",
                &prefixes()
            ),
            ReferenceKind::Permanent
        );
        assert_eq!(
            classify(
                "blob:https://craft.example/storage/v1/object/public/3f2a",
                &prefixes()
            ),
            ReferenceKind::Ephemeral
        );
        assert_eq!(
            classify(
                "data:image/svg+xml,<svg><image href='/storage/v1/object/public/a.png'/></svg>",
                &prefixes()
            ),
            ReferenceKind::InlineData
        );
        assert_eq!(
            classify("ftp://mirror.example/storage/v1/object/public/a.png", &prefixes()),
            ReferenceKind::Unresolved
        );
    }

    #[test]
    fn test_blank_prefixes_are_ignored() {
        let set = PermanentPrefixes::new(["", "  ", "https://cdn.example/"]);
        assert_eq!(set.len(), 1);
        assert!(!set.matches("blob:anything"));
    }
}

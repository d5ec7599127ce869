//! Ephemeral image storage and media reference classification for Blockpress.
//!
//! Images pasted or dropped into the editor live here until the surrounding
//! document is saved. The store hands out revocable `blob:` references that the
//! document embeds in place of a durable URL.
//!
//! # Example
//!
//! ```rust
//! use blockpress_media::{classify, EphemeralImageStore, ImageBlob, PermanentPrefixes, ReferenceKind};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = EphemeralImageStore::new();
//! let local_ref = store.store(ImageBlob::new(vec![0x89, b'P', b'N', b'G'], "image/png"))?;
//!
//! let prefixes = PermanentPrefixes::new(["https://cdn.example/storage/"]);
//! assert_eq!(classify(&local_ref, &prefixes), ReferenceKind::Ephemeral);
//!
//! let blob = store.resolve(&local_ref)?;
//! assert_eq!(blob.len(), 4);
//!
//! store.revoke_all();
//! assert!(store.resolve(&local_ref).is_err());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod classify;
mod inline;
mod media_type;
mod store;

pub use blob::ImageBlob;
pub use blockpress_error::{MediaError, MediaErrorKind};
pub use classify::{
    classify, is_inline_data, is_local_ref, PermanentPrefixes, ReferenceKind, INLINE_DATA_SCHEME,
    LOCAL_REF_SCHEME,
};
pub use inline::decode_inline_data;
pub use media_type::ImageMediaType;
pub use store::{EphemeralImageEntry, EphemeralImageStore};

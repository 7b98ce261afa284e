//! Identity to filename mapping
//!
//! The filename is the padded URL-safe base64 of the identity's UTF-8 bytes
//! (`+` and `/` become `-` and `_`) plus a fixed extension. The mapping is
//! pure and reversible, so distinct identities never share a file.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

pub const BLOB_EXTENSION: &str = "webp";

pub fn filename_for(identity: &str) -> String {
    format!("{}.{}", URL_SAFE.encode(identity.as_bytes()), BLOB_EXTENSION)
}

/// Recover the identity a filename was derived from
pub fn identity_from_filename(filename: &str) -> Option<String> {
    let encoded = filename.strip_suffix(BLOB_EXTENSION)?.strip_suffix('.')?;
    let bytes = URL_SAFE.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

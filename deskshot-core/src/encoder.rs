//! Image encoder lookup.
//!
//! The imaging subsystem exposes its installed codecs as a list of
//! [`EncoderInfo`] entries; [`find_encoder`] picks one by MIME type.

/// MIME type requested for every capture.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Opaque identifier of an installed encoder (a CLSID on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncoderId(pub u128);

/// Owned description of one installed image encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderInfo {
    pub id: EncoderId,
    /// e.g. `image/png`.
    pub mime_type: String,
    /// Short format name, e.g. `PNG`.
    pub format_description: String,
}

/// Format description that also identifies an encoder for `mime_type`.
///
/// Derived from the MIME subtype, so `image/png` accepts `PNG`.  Returns
/// `None` for malformed MIME strings, which then only match exactly.
fn fallback_description(mime_type: &str) -> Option<String> {
    let (_, subtype) = mime_type.split_once('/')?;
    if subtype.is_empty() {
        return None;
    }
    Some(subtype.to_ascii_uppercase())
}

/// Scan `encoders` in enumeration order and return the first whose MIME
/// type equals `mime_type` or whose format description equals the
/// description derived from it.
///
/// Both tests are applied to each entry before moving to the next; entries
/// are not ranked beyond their order.  An empty list yields `None`.
pub fn find_encoder(encoders: &[EncoderInfo], mime_type: &str) -> Option<EncoderId> {
    let description = fallback_description(mime_type);

    encoders
        .iter()
        .position(|info| {
            info.mime_type == mime_type
                || description
                    .as_deref()
                    .is_some_and(|d| info.format_description == d)
        })
        .map(|index| {
            log::debug!(
                "encoder #{index} matches {mime_type}: {} ({})",
                encoders[index].mime_type,
                encoders[index].format_description
            );
            encoders[index].id
        })
}

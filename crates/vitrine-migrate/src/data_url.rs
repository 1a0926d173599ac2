use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// MIME type assumed when the data URL metadata does not name one.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Decode a `data:<mime>;base64,<payload>` URL into its MIME type and raw
/// bytes.
///
/// Returns `None` for anything that does not decode cleanly: wrong scheme,
/// no comma separator, or an invalid base64 payload. A missing or
/// unrecognizable MIME section falls back to `application/octet-stream`
/// while still decoding the payload.
pub fn decode_data_url(input: &str) -> Option<(String, Vec<u8>)> {
    let rest = input.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta
        .strip_suffix(";base64")
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MIME);
    let bytes = BASE64.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use camino::Utf8Path;
use std::fs;

/// Loads a cached cover and encodes it as a data URI string.
/// Cover files carry no extension, so the MIME type comes from the magic
/// bytes. Returns None if the file is missing or not a known image format.
pub fn load_cover_as_data_uri(cover_path: &Utf8Path) -> Option<String> {
    let bytes = fs::read(cover_path).ok()?;
    let mime_type = sniff_mime(&bytes)?;
    Some(format!("data:{};base64,{}", mime_type, BASE64.encode(&bytes)))
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

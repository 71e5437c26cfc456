//! File classification by declared content type and filename extension.
//!
//! Extensions are compared without the leading dot and case-insensitively.
//! Content types are compared without parameters (`text/plain; charset=utf-8`
//! matches `text/plain`).

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "json", "xml"];
pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar"];

pub const IMAGE_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];
pub const TEXT_CONTENT_TYPES: &[&str] = &["text/plain", "application/json", "application/xml"];

pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "application/octet-stream";
pub const DEFAULT_TEXT_CONTENT_TYPE: &str = "text/plain";

/// Category of an archive member, decided by extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Text,
    Other,
}

/// Last path component. Both `/` and `\` separate directories.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Lowercased extension without the dot, or `None` when the base name has none.
pub fn extension(name: &str) -> Option<String> {
    let base = base_name(name);
    let dot = base.rfind('.')?;
    let ext = &base[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Base name with its last extension removed. `.zip` has an empty stem.
pub fn stem(name: &str) -> &str {
    let base = base_name(name);
    match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    }
}

pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

fn has_extension_in(name: &str, allowed: &[&str]) -> bool {
    extension(name)
        .map(|ext| allowed.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_archive_name(name: &str) -> bool {
    has_extension_in(name, ARCHIVE_EXTENSIONS)
}

pub fn is_image_name(name: &str) -> bool {
    has_extension_in(name, IMAGE_EXTENSIONS)
}

pub fn is_text_name(name: &str) -> bool {
    has_extension_in(name, TEXT_EXTENSIONS)
}

pub fn is_image_content_type(content_type: &str) -> bool {
    IMAGE_CONTENT_TYPES.contains(&normalize_content_type(content_type).as_str())
}

pub fn is_text_content_type(content_type: &str) -> bool {
    TEXT_CONTENT_TYPES.contains(&normalize_content_type(content_type).as_str())
}

pub fn classify_by_extension(name: &str) -> ContentKind {
    if is_image_name(name) {
        ContentKind::Image
    } else if is_text_name(name) {
        ContentKind::Text
    } else {
        ContentKind::Other
    }
}

/// Content type stored for an archive member.
pub fn content_type_for(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

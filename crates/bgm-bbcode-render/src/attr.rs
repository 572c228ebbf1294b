//! Render time interpretation of tag attributes and content.
//!
//! The parser keeps attributes as raw strings, invalid values are handled here by clamping or
//! ignoring them.

/// Font size range accepted in `[size]`.
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 50;

/// Image extensions rendered as images, others are rendered as links.
const IMAGE_EXTENSIONS: [&str; 11] = [
    "avif", "avifs", "svg", "gif", "png", "jpg", "jpeg", "webp", "heic", "heif", "jxl",
];

const USER_URL: &str = "https://bgm.tv/user/";
const SUBJECT_URL: &str = "https://bgm.tv/subject/";
const PHOTO_URL: &str = "https://lain.bgm.tv/pic/photo/l/";

/// Horizontal alignment of blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Parse `[size=$SIZE]`.
///
/// Sizes out of range are clamped, `None` if not a number.
pub fn font_size(attr: &str) -> Option<u32> {
    let size = attr.trim().parse::<i64>().ok()?;
    Some(size.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u32)
}

/// Parse `[img=$W,$H]`.
///
/// Both width and height shall be positive, otherwise the size is ignored.
pub fn image_size(attr: &str) -> Option<(u32, u32)> {
    let (width, height) = attr.split_once(',')?;
    let width = width.trim().parse::<u32>().ok()?;
    let height = height.trim().parse::<u32>().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// Parse `[align=$ALIGNMENT]`, case-insensitive.
pub fn alignment(attr: &str) -> Option<Alignment> {
    match attr.trim().to_ascii_lowercase().as_str() {
        "left" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" => Some(Alignment::Right),
        _ => None,
    }
}

/// Non-empty trimmed `[color=$COLOR]`.
///
/// Color names and formats are left to renderers.
pub fn color(attr: &str) -> Option<&str> {
    Some(attr.trim()).filter(|x| !x.is_empty())
}

/// Whether `url` looks like a link, no whitespace inside and not empty.
pub fn is_link(url: &str) -> bool {
    !url.is_empty() && !url.chars().any(char::is_whitespace)
}

/// Whether `url` points to an image judging by extension.
pub fn is_image_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Use https for http links.
pub fn upgrade_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

pub fn user_link(username: &str) -> String {
    format!("{USER_URL}{username}")
}

pub fn subject_link(id: &str) -> String {
    format!("{SUBJECT_URL}{id}")
}

pub fn photo_link(path: &str) -> String {
    format!("{PHOTO_URL}{path}")
}

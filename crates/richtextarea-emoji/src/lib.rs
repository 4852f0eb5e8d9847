#![warn(missing_docs)]
//! Emoji sequence matching and image URL resolution.
//!
//! This crate is the emoji collaborator of `richtextarea-core`: it knows how to
//! find emoji unicode sequences inside plain text and how to turn a matched
//! sequence into the URL of a pre-rendered image. It holds no document state.
//!
//! # Overview
//!
//! - [`EmojiCatalog`] — the main entry point: regex-backed matching plus
//!   code-point based URL building.
//! - [`EmojiConfig`] — image base path, file extension, and rendering mode.
//! - [`EmojiMode`] / [`RenderMode`] — whether emoji should be rendered as
//!   native glyphs or as images, with `Auto` resolved by a capability flag
//!   supplied by the caller.
//!
//! All indices reported by the matching APIs are **character offsets**, in
//! line with the offset arithmetic of `richtextarea-core`.
//!
//! # Example
//!
//! ```rust
//! use richtextarea_emoji::EmojiCatalog;
//!
//! let catalog = EmojiCatalog::default();
//! let m = catalog.match_first("hi 👋 there").expect("match");
//! assert_eq!(m.text, "👋");
//! assert_eq!(m.index, 3);
//! assert_eq!(
//!     catalog.image_url_for("👋"),
//!     "https://cdn.jsdelivr.net/npm/emoji-datasource-apple@14.0.0/img/apple/64/1f44b.png"
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Default CDN path for 64px Apple-style emoji PNGs.
pub const DEFAULT_EMOJI_PATH: &str =
    "https://cdn.jsdelivr.net/npm/emoji-datasource-apple@14.0.0/img/apple/64/";

/// Default image file extension.
pub const DEFAULT_EMOJI_EXT: &str = ".png";

/// Emoji base characters: pictographs, symbols, and legacy symbol ranges that
/// can start an emoji sequence.
const EMOJI_BASE: &str = "[\\u{00A9}\\u{00AE}\\u{203C}\\u{2049}\\u{2122}\\u{2139}\
\\u{2194}-\\u{21AA}\\u{231A}\\u{231B}\\u{2328}\\u{23CF}\\u{23E9}-\\u{23FA}\\u{24C2}\
\\u{25AA}-\\u{25FE}\\u{2600}-\\u{27BF}\\u{2934}\\u{2935}\\u{2B05}-\\u{2B07}\\u{2B1B}\
\\u{2B1C}\\u{2B50}\\u{2B55}\\u{3030}\\u{303D}\\u{3297}\\u{3299}\\u{1F004}\\u{1F0CF}\
\\u{1F170}-\\u{1F251}\\u{1F300}-\\u{1F5FF}\\u{1F600}-\\u{1F64F}\\u{1F680}-\\u{1F6FF}\
\\u{1F700}-\\u{1F77F}\\u{1F780}-\\u{1F7FF}\\u{1F800}-\\u{1F8FF}\\u{1F900}-\\u{1F9FF}\
\\u{1FA00}-\\u{1FA6F}\\u{1FA70}-\\u{1FAFF}]";

/// Modifiers that may follow a base: variation selector 16 and skin tones.
const EMOJI_MODIFIER: &str = "(?:\\u{FE0F}|[\\u{1F3FB}-\\u{1F3FF}])";

static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Flags first (regional indicator pairs), then keycaps, then pictographic
    // sequences with modifiers and ZWJ joins.
    let pattern = format!(
        "(?:[\\u{{1F1E6}}-\\u{{1F1FF}}]{{2}})\
         |(?:[#*0-9]\\u{{FE0F}}?\\u{{20E3}})\
         |(?:{base}{modifier}*(?:\\u{{200D}}{base}{modifier}*)*)",
        base = EMOJI_BASE,
        modifier = EMOJI_MODIFIER,
    );
    Regex::new(&pattern).expect("emoji pattern must compile")
});

/// Requested emoji rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmojiMode {
    /// Pick native glyphs or web images based on platform capability.
    #[default]
    Auto,
    /// Always render native glyphs.
    Native,
    /// Always render web images.
    Web,
}

/// Resolved rendering mode, with `Auto` already decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Render native glyphs.
    Native,
    /// Render web images.
    Web,
}

/// Emoji catalog configuration.
#[derive(Debug, Clone, Default)]
pub struct EmojiConfig {
    /// Base path to the emoji image files. Defaults to [`DEFAULT_EMOJI_PATH`];
    /// a trailing slash is appended when missing.
    pub emoji_path: Option<String>,
    /// Image file extension. Defaults to [`DEFAULT_EMOJI_EXT`]; a leading dot
    /// is prepended when missing.
    pub emoji_ext: Option<String>,
    /// Requested rendering mode.
    pub emoji_mode: EmojiMode,
}

/// One emoji occurrence inside a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiMatch<'a> {
    /// The matched emoji sequence.
    pub text: &'a str,
    /// Character offset of the match inside the source string.
    pub index: usize,
}

/// Regex-backed emoji matcher and image URL resolver.
///
/// # Example
///
/// ```rust
/// use richtextarea_emoji::EmojiCatalog;
///
/// let catalog = EmojiCatalog::default();
/// assert!(catalog.is_emoji("🎉"));
/// assert!(!catalog.is_emoji("party"));
/// ```
#[derive(Debug, Clone)]
pub struct EmojiCatalog {
    file_path: String,
    file_ext: String,
    mode: EmojiMode,
}

impl Default for EmojiCatalog {
    fn default() -> Self {
        Self::new(EmojiConfig::default())
    }
}

impl EmojiCatalog {
    /// Create a catalog from a configuration, normalizing path and extension.
    pub fn new(config: EmojiConfig) -> Self {
        Self {
            file_path: assess_path(config.emoji_path.as_deref().unwrap_or(DEFAULT_EMOJI_PATH)),
            file_ext: assess_ext(config.emoji_ext.as_deref().unwrap_or(DEFAULT_EMOJI_EXT)),
            mode: config.emoji_mode,
        }
    }

    /// The configured rendering mode, unresolved.
    pub fn mode(&self) -> EmojiMode {
        self.mode
    }

    /// Resolve the rendering mode. `native_capable` reports whether the host
    /// platform renders color emoji glyphs natively; it only matters for
    /// [`EmojiMode::Auto`].
    pub fn resolved_mode(&self, native_capable: bool) -> RenderMode {
        match self.mode {
            EmojiMode::Native => RenderMode::Native,
            EmojiMode::Web => RenderMode::Web,
            EmojiMode::Auto if native_capable => RenderMode::Native,
            EmojiMode::Auto => RenderMode::Web,
        }
    }

    /// Returns `true` when `source` contains at least one emoji sequence.
    pub fn is_emoji(&self, source: &str) -> bool {
        EMOJI_REGEX.is_match(source)
    }

    /// Find the first emoji sequence in `source`.
    pub fn match_first<'a>(&self, source: &'a str) -> Option<EmojiMatch<'a>> {
        EMOJI_REGEX.find(source).map(|m| EmojiMatch {
            text: m.as_str(),
            index: source[..m.start()].chars().count(),
        })
    }

    /// Iterate over every emoji sequence in `source`, in order.
    pub fn matches<'a>(&self, source: &'a str) -> impl Iterator<Item = EmojiMatch<'a>> + 'a {
        EMOJI_REGEX.find_iter(source).map(move |m| EmojiMatch {
            text: m.as_str(),
            index: source[..m.start()].chars().count(),
        })
    }

    /// Build the image URL for an emoji sequence: base path, the lowercase hex
    /// code points joined by `-`, and the extension. Empty input yields an
    /// empty URL.
    pub fn image_url_for(&self, emoji: &str) -> String {
        if emoji.is_empty() {
            return String::new();
        }
        let points: Vec<String> = emoji.chars().map(|cp| format!("{:x}", cp as u32)).collect();
        format!("{}{}{}", self.file_path, points.join("-"), self.file_ext)
    }
}

fn assess_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

fn assess_ext(ext: &str) -> String {
    if ext.is_empty() {
        return String::new();
    }
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

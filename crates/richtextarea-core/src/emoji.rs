//! Emoji expansion glue.
//!
//! The engine never matches emoji itself; it asks an [`EmojiResolver`] where
//! the next emoji sequence sits in a piece of sanitized text and what image
//! source stands in for it. [`expand_text`] turns the text into document
//! segments: emoji become [`Segment::Image`] placeholders, newlines become
//! [`Segment::LineBreak`], everything else stays a text run.
//!
//! [`richtextarea_emoji::EmojiCatalog`] implements the trait out of the box;
//! [`NoEmoji`] disables expansion entirely.

use richtextarea_emoji::EmojiCatalog;

use crate::segment::Segment;

/// One emoji occurrence found by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiHit {
    /// Byte offset of the sequence inside the queried text.
    pub start: usize,
    /// Byte offset just past the sequence.
    pub end: usize,
    /// The emoji sequence itself; becomes the placeholder's alt text.
    pub alt: String,
    /// Image source URL for the placeholder.
    pub src: String,
}

/// Finds emoji sequences and resolves them to image sources.
pub trait EmojiResolver {
    /// The first emoji sequence in `source`, or `None` when there is none.
    fn first_hit(&self, source: &str) -> Option<EmojiHit>;
}

/// A resolver that never matches; text passes through unexpanded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmoji;

impl EmojiResolver for NoEmoji {
    fn first_hit(&self, _source: &str) -> Option<EmojiHit> {
        None
    }
}

impl EmojiResolver for EmojiCatalog {
    fn first_hit(&self, source: &str) -> Option<EmojiHit> {
        let hit = self.match_first(source)?;
        let start = source
            .char_indices()
            .nth(hit.index)
            .map(|(byte, _)| byte)?;
        Some(EmojiHit {
            start,
            end: start + hit.text.len(),
            alt: hit.text.to_string(),
            src: self.image_url_for(hit.text),
        })
    }
}

/// Expand sanitized text into segments: emoji to image placeholders,
/// newlines to line breaks, remaining text to runs.
pub fn expand_text(resolver: &dyn EmojiResolver, text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(hit) = resolver.first_hit(rest) {
        push_plain(&rest[..hit.start], &mut segments);
        segments.push(Segment::Image {
            alt: hit.alt,
            src: hit.src,
        });
        rest = &rest[hit.end..];
    }
    push_plain(rest, &mut segments);
    segments
}

fn push_plain(text: &str, out: &mut Vec<Segment>) {
    let mut first = true;
    for piece in text.split('\n') {
        if !first {
            out.push(Segment::LineBreak);
        }
        first = false;
        if !piece.is_empty() {
            out.push(Segment::TextRun(piece.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segments_width;

    /// Matches the literal `:)` and resolves it to a fixed source.
    pub(crate) struct Smiley;

    impl EmojiResolver for Smiley {
        fn first_hit(&self, source: &str) -> Option<EmojiHit> {
            let start = source.find(":)")?;
            Some(EmojiHit {
                start,
                end: start + 2,
                alt: ":)".to_string(),
                src: "https://cdn.example/smile.png".to_string(),
            })
        }
    }

    #[test]
    fn test_expands_emoji_between_text_runs() {
        let segments = expand_text(&Smiley, "hi :) bye");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::TextRun("hi ".to_string()));
        assert!(matches!(&segments[1], Segment::Image { alt, .. } if alt == ":)"));
        assert_eq!(segments[2], Segment::TextRun(" bye".to_string()));

        let image_w = segments[1].width();
        assert_eq!(segments_width(&segments), 3 + image_w + 4);
    }

    #[test]
    fn test_newlines_become_line_breaks() {
        let segments = expand_text(&NoEmoji, "a\n\nb");
        assert_eq!(
            segments,
            vec![
                Segment::TextRun("a".to_string()),
                Segment::LineBreak,
                Segment::LineBreak,
                Segment::TextRun("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_emoji_passes_text_through() {
        let segments = expand_text(&NoEmoji, "hi :) bye");
        assert_eq!(segments, vec![Segment::TextRun("hi :) bye".to_string())]);
    }

    #[test]
    fn test_catalog_resolver_matches_unicode_emoji() {
        let catalog = EmojiCatalog::default();
        let segments = expand_text(&catalog, "go 🎉!");
        assert!(matches!(
            &segments[1],
            Segment::Image { alt, src } if alt == "🎉" && src.ends_with("1f389.png")
        ));
        assert_eq!(segments[2], Segment::TextRun("!".to_string()));
    }

    #[test]
    fn test_emoji_at_start_and_end() {
        let catalog = EmojiCatalog::default();
        let segments = expand_text(&catalog, "🎉mid🎉");
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Image { .. }));
        assert_eq!(segments[1], Segment::TextRun("mid".to_string()));
        assert!(matches!(&segments[2], Segment::Image { .. }));
    }
}

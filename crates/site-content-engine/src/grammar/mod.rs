//! # Directive Grammar
//!
//! The literal text encoding of formatting and embeds. Content is a plain
//! string; directives are tokens embedded in it. This encoding *is* the at-rest
//! format stored in a page's `content` field, so writers must reproduce it
//! byte-for-byte.
//!
//! ## Token encodings
//!
//! | kind | encoding |
//! |---|---|
//! | bold / italic / underline | `**text**` / `*text*` / `__text__` |
//! | alignment | `<!-- FORMAT:CENTER -->\n…\n` (`LEFT`, `CENTER`, `RIGHT`, `JUSTIFY`) |
//! | heading | `<!-- HEADING:1 -->\n…` / `<!-- HEADING:2 -->\n…` |
//! | list | `<!-- LIST:BULLET -->\n- a\n- b\n` / `<!-- LIST:NUMBERED -->\n1. a\n2. b\n` |
//! | quote | `<!-- QUOTE -->\n…\n` |
//! | link | `[label](url)` |
//! | phone | `<!-- PHONE: number -->\n[📞 label]\n` or `[PHONE:number:label]` |
//! | map | `<!-- MAP: url -->\n[📍 label]\n` or `[MAP:url:label]` |
//! | image | `{"type":"image","url":…}` island or `<!-- IMAGE: url -->\n[Immagine: name]\n` |
//! | gallery image | `[IMAGE_n]`, 1-based index into the gallery |
//!
//! Phone, map and image each have a legacy encoding next to the canonical
//! one. Writers always emit the canonical form (comment form for phone/map,
//! JSON island for images); readers accept both. See [`crate::normalize`].
//!
//! ## Modules
//!
//! - **`kinds`**: per-kind delimiter constants and sentinel recognizers
//! - **`directive`**: the [`Directive`] union and its canonical encoder

pub mod directive;
pub mod kinds;

pub use directive::Directive;
pub use kinds::{
    Alignment, Emphasis, HeadingLevel, ImageIsland, ImagePosition, ImageWidth, ListStyle,
    RegionKind,
};

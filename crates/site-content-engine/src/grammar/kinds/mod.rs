//! # Directive Kinds
//!
//! Each kind owns its syntax: delimiter constants and sentinel recognizers
//! live here, never in parser or renderer code.
//!
//! - **`emphasis`**: `**`, `*`, `__`
//! - **`region`**: `<!-- FORMAT:… -->`, `<!-- HEADING:n -->`, `<!-- LIST:… -->`, `<!-- QUOTE -->`
//! - **`link`**: `[label](url)`
//! - **`embed`**: phone, map, image comment pairs, shorthands and gallery placeholders
//! - **`island`**: the JSON image island payload

pub mod embed;
pub mod emphasis;
pub mod island;
pub mod link;
pub mod region;

pub use embed::{CommentEmbed, EmbedKeyword, GalleryPlaceholder, MapEmbed, PhoneEmbed, Shorthand};
pub use emphasis::Emphasis;
pub use island::{ImageIsland, ImagePosition, ImageWidth};
pub use link::Link;
pub use region::{Alignment, HeadingLevel, ListStyle, RegionKind, Sentinel};

use crate::{
    editing::Selection,
    grammar::{Directive, ImageIsland},
};

use super::command::EditorCommand;

/// What a command asks the operator for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataRequest {
    /// `label` is pre-filled from the selected text.
    Link { label: Option<String> },
    Phone,
    Map,
    Image,
}

/// The operator's answer to a [`MetadataRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadata {
    Link { url: String, label: String },
    Phone { number: String, label: String },
    Map { url: String, label: String },
    Image(ImageIsland),
}

impl MetadataRequest {
    pub fn accepts(&self, metadata: &Metadata) -> bool {
        matches!(
            (self, metadata),
            (MetadataRequest::Link { .. }, Metadata::Link { .. })
                | (MetadataRequest::Phone, Metadata::Phone { .. })
                | (MetadataRequest::Map, Metadata::Map { .. })
                | (MetadataRequest::Image, Metadata::Image(_))
        )
    }
}

impl Metadata {
    /// The directive to insert, or `None` when a required field is blank.
    /// Blank labels fall back to the number or URL.
    pub fn into_directive(self) -> Option<Directive> {
        let required = |s: String| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        let label_or = |label: String, fallback: &str| {
            let label = label.trim();
            let chosen = if label.is_empty() { fallback } else { label };
            chosen.to_string()
        };
        Some(match self {
            Metadata::Link { url, label } => Directive::Link {
                url: required(url)?,
                label: label.trim().to_string(),
            },
            Metadata::Phone { number, label } => {
                let number = required(number)?;
                Directive::Phone {
                    label: label_or(label, &number),
                    number,
                }
            }
            Metadata::Map { url, label } => {
                let url = required(url)?;
                Directive::Map {
                    label: label_or(label, &url),
                    url,
                }
            }
            Metadata::Image(mut island) => {
                island.url = required(island.url)?;
                island.caption = island.caption.and_then(required);
                Directive::ImageIsland(island)
            }
        })
    }
}

/// Resolves metadata synchronously. Returning `None` cancels the command.
pub trait MetadataPrompt {
    fn prompt(&mut self, request: &MetadataRequest) -> Option<Metadata>;
}

impl<F> MetadataPrompt for F
where
    F: FnMut(&MetadataRequest) -> Option<Metadata>,
{
    fn prompt(&mut self, request: &MetadataRequest) -> Option<Metadata> {
        self(request)
    }
}

/// Prompt used when a front-end has none: every request is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl MetadataPrompt for NoPrompt {
    fn prompt(&mut self, request: &MetadataRequest) -> Option<Metadata> {
        log::debug!("no prompt available for {request:?}, cancelling");
        None
    }
}

/// An open metadata dialog.
///
/// Captures the selection at open time: the insertion happens there, even if
/// the live selection moves while the dialog is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub command: EditorCommand,
    pub request: MetadataRequest,
    pub anchor: Selection,
}

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::grammar::{Alignment, Directive, HeadingLevel, ListStyle};

use super::prompt::MetadataRequest;

/// The toolbar vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Bold,
    Italic,
    Underline,
    Heading1,
    Heading2,
    BulletList,
    NumberedList,
    AlignLeft,
    AlignCenter,
    AlignRight,
    AlignJustify,
    Link,
    Quote,
    InsertImage,
    InsertPhone,
    InsertMap,
    Undo,
    Redo,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown editor command: {0}")]
    Unknown(String),
}

impl EditorCommand {
    pub const ALL: [EditorCommand; 18] = [
        EditorCommand::Bold,
        EditorCommand::Italic,
        EditorCommand::Underline,
        EditorCommand::Heading1,
        EditorCommand::Heading2,
        EditorCommand::BulletList,
        EditorCommand::NumberedList,
        EditorCommand::AlignLeft,
        EditorCommand::AlignCenter,
        EditorCommand::AlignRight,
        EditorCommand::AlignJustify,
        EditorCommand::Link,
        EditorCommand::Quote,
        EditorCommand::InsertImage,
        EditorCommand::InsertPhone,
        EditorCommand::InsertMap,
        EditorCommand::Undo,
        EditorCommand::Redo,
    ];

    /// Toolbar name, as sent by front-ends.
    pub fn name(self) -> &'static str {
        match self {
            EditorCommand::Bold => "bold",
            EditorCommand::Italic => "italic",
            EditorCommand::Underline => "underline",
            EditorCommand::Heading1 => "heading1",
            EditorCommand::Heading2 => "heading2",
            EditorCommand::BulletList => "bulletList",
            EditorCommand::NumberedList => "numberedList",
            EditorCommand::AlignLeft => "alignLeft",
            EditorCommand::AlignCenter => "alignCenter",
            EditorCommand::AlignRight => "alignRight",
            EditorCommand::AlignJustify => "alignJustify",
            EditorCommand::Link => "link",
            EditorCommand::Quote => "quote",
            EditorCommand::InsertImage => "insertImage",
            EditorCommand::InsertPhone => "insertPhone",
            EditorCommand::InsertMap => "insertMap",
            EditorCommand::Undo => "undo",
            EditorCommand::Redo => "redo",
        }
    }

    /// Directive for commands that apply directly to the selection.
    pub fn directive(self) -> Option<Directive> {
        Some(match self {
            EditorCommand::Bold => Directive::Bold,
            EditorCommand::Italic => Directive::Italic,
            EditorCommand::Underline => Directive::Underline,
            EditorCommand::Heading1 => Directive::Heading(HeadingLevel::One),
            EditorCommand::Heading2 => Directive::Heading(HeadingLevel::Two),
            EditorCommand::BulletList => Directive::List(ListStyle::Bullet),
            EditorCommand::NumberedList => Directive::List(ListStyle::Numbered),
            EditorCommand::AlignLeft => Directive::Alignment(Alignment::Left),
            EditorCommand::AlignCenter => Directive::Alignment(Alignment::Center),
            EditorCommand::AlignRight => Directive::Alignment(Alignment::Right),
            EditorCommand::AlignJustify => Directive::Alignment(Alignment::Justify),
            EditorCommand::Quote => Directive::Quote,
            _ => return None,
        })
    }

    /// Metadata the command needs before it can run. `selected` seeds the link label.
    pub fn metadata_request(self, selected: &str) -> Option<MetadataRequest> {
        match self {
            EditorCommand::Link => Some(MetadataRequest::Link {
                label: Some(selected.to_string()).filter(|s| !s.trim().is_empty()),
            }),
            EditorCommand::InsertPhone => Some(MetadataRequest::Phone),
            EditorCommand::InsertMap => Some(MetadataRequest::Map),
            EditorCommand::InsertImage => Some(MetadataRequest::Image),
            _ => None,
        }
    }
}

impl FromStr for EditorCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| CommandParseError::Unknown(s.to_string()))
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

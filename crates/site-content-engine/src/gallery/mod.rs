//! # Image gallery
//!
//! An ordered list of images kept next to the content string. The gallery
//! and the document are independent: nothing here edits content. Removing
//! an image *and* its inline embed is done by the editor, which pairs
//! [`Gallery::remove`] with a splice at
//! [`nth_image_embed`](crate::parsing::nth_image_embed).

use serde::{Deserialize, Serialize};

use crate::grammar::{ImageIsland, ImagePosition};

/// One gallery image as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub url: String,
    #[serde(default)]
    pub position: ImagePosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Index in the gallery list; renumbered after every reorder.
    #[serde(default)]
    pub order: usize,
    /// Marks the image for the next "insert from gallery".
    #[serde(default)]
    pub insert_in_content: bool,
}

impl ImageDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            position: ImagePosition::default(),
            caption: None,
            order: 0,
            insert_in_content: false,
        }
    }

    /// The inline island for this image.
    pub fn to_island(&self) -> ImageIsland {
        ImageIsland {
            url: self.url.clone(),
            position: self.position,
            caption: self.caption.clone(),
            width: None,
            alt: None,
        }
    }

    pub fn from_island(island: &ImageIsland) -> Self {
        Self {
            url: island.url.clone(),
            position: island.position,
            caption: island.caption.clone(),
            order: 0,
            insert_in_content: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    images: Vec<ImageDescriptor>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a gallery from host data, renumbering `order` to list position.
    pub fn from_images(images: Vec<ImageDescriptor>) -> Self {
        let mut gallery = Self { images };
        gallery.renumber();
        gallery
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&ImageDescriptor> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Appends an image and returns its index.
    pub fn add(&mut self, image: ImageDescriptor) -> usize {
        self.images.push(image);
        self.renumber();
        self.images.len() - 1
    }

    /// Swaps image `index` with its predecessor. No-op at the top or out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.images.len() {
            log::debug!("move_up({index}) ignored");
            return false;
        }
        self.images.swap(index - 1, index);
        self.renumber();
        true
    }

    /// Swaps image `index` with its successor. No-op at the bottom or out of range.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.images.len() {
            log::debug!("move_down({index}) ignored");
            return false;
        }
        self.images.swap(index, index + 1);
        self.renumber();
        true
    }

    /// Flips the insert flag. Content is not touched.
    pub fn toggle_insert_in_content(&mut self, index: usize) -> bool {
        match self.images.get_mut(index) {
            Some(image) => {
                image.insert_in_content = !image.insert_in_content;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<ImageDescriptor> {
        if index >= self.images.len() {
            log::debug!("remove({index}) ignored, gallery has {}", self.images.len());
            return None;
        }
        let removed = self.images.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Islands for every flagged image, in gallery order; clears the flags.
    pub fn take_pending_insertions(&mut self) -> Vec<ImageIsland> {
        self.images
            .iter_mut()
            .filter(|image| image.insert_in_content)
            .map(|image| {
                image.insert_in_content = false;
                image.to_island()
            })
            .collect()
    }

    fn renumber(&mut self) {
        for (i, image) in self.images.iter_mut().enumerate() {
            image.order = i;
        }
    }
}

use crate::gallery::ImageDescriptor;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid gallery file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a content document
pub fn read_content(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write a content document, creating parent directories
pub fn write_content(path: &Path, content: &str) -> Result<(), IoError> {
    create_parent(path)?;
    fs::write(path, content).map_err(IoError::Io)
}

/// Read a gallery stored as a JSON array of image descriptors.
///
/// `order` is taken from array position, whatever the file says.
pub fn read_gallery(path: &Path) -> Result<Vec<ImageDescriptor>, IoError> {
    let raw = read_content(path)?;
    let mut images: Vec<ImageDescriptor> = serde_json::from_str(&raw)?;
    for (i, image) in images.iter_mut().enumerate() {
        image.order = i;
    }
    log::debug!("loaded {} gallery images from {}", images.len(), path.display());
    Ok(images)
}

pub fn write_gallery(path: &Path, images: &[ImageDescriptor]) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(images)?;
    write_content(path, &json)
}

fn create_parent(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

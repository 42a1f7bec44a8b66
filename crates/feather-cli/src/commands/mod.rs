//! CLI command implementations

pub mod blur;

use anyhow::{Context, Result};
use feather_core::PixelBuffer;
use std::path::{Path, PathBuf};

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    feather_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    feather_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Output path used when none is given: `<stem>_out.png`, relative to the
/// current directory.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    PathBuf::from(format!("{}_out.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        assert_eq!(derive_output_path(Path::new("photo.jpg")), PathBuf::from("photo_out.png"));
        assert_eq!(
            derive_output_path(Path::new("/shots/day1/photo.png")),
            PathBuf::from("photo_out.png")
        );
        assert_eq!(derive_output_path(Path::new("archive.tar.png")), PathBuf::from("archive.tar_out.png"));
        assert_eq!(derive_output_path(Path::new("noext")), PathBuf::from("noext_out.png"));
    }

    #[test]
    fn test_load_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let err = load_image(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.png"));
    }
}

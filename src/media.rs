use std::path::PathBuf;

use async_trait::async_trait;

/// Outcome of the media-library permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// A single image chosen from the device library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub path: PathBuf,
}

impl PickedImage {
    /// File name to report to the ingestion endpoint.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string())
    }
}

/// Host-platform media services: a permission gate and a single-image
/// picker.
///
/// A trait so the denied and cancelled paths can be exercised without a
/// desktop session.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn request_access(&self) -> Access;

    /// Prompt the user for exactly one image. `None` means they cancelled.
    async fn pick_image(&self) -> Option<PickedImage>;
}

/// The system media library, backed by the native file dialog.
pub struct SystemLibrary;

#[async_trait]
impl MediaLibrary for SystemLibrary {
    async fn request_access(&self) -> Access {
        // Desktop analogue of the media-library gate: the user's pictures
        // directory must be readable. A sandboxed install without the
        // filesystem grant fails here; the file portal still does its own
        // gating when the dialog opens.
        match dirs::picture_dir().or_else(dirs::home_dir) {
            Some(dir) if std::fs::read_dir(&dir).is_err() => Access::Denied,
            _ => Access::Granted,
        }
    }

    async fn pick_image(&self) -> Option<PickedImage> {
        rfd::AsyncFileDialog::new()
            .set_title("Choose a clothing photo")
            .add_filter("Images", &["jpg", "jpeg", "png"])
            .pick_file()
            .await
            .map(|handle| PickedImage {
                path: handle.path().to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_image_reports_its_file_name() {
        let image = PickedImage {
            path: PathBuf::from("/tmp/shirt.png"),
        };
        assert_eq!(image.file_name(), "shirt.png");
    }

    #[test]
    fn test_picked_image_falls_back_to_a_generic_name() {
        let image = PickedImage {
            path: PathBuf::from("/"),
        };
        assert_eq!(image.file_name(), "photo.jpg");
    }
}

use std::sync::Arc;

use super::data::UploadReceipt;
use crate::api::{ApiError, CatalogGateway};
use crate::media::{Access, PickedImage};

/// Where a pick-and-upload invocation currently stands.
///
/// `Denied`, `Failed`, and `Done` are terminal; a cancelled pick drops the
/// flow straight back to `Idle` with no notice.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadPhase {
    Idle,
    RequestingAccess,
    Picking,
    Uploading,
    /// Media library access was refused
    Denied,
    Failed(ApiError),
    Done(UploadReceipt),
}

/// What the host screen should do after feeding an event into the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Launch the single-image picker
    Pick,
    /// Read and transmit the picked image
    Transmit(PickedImage),
    /// Deliver the stored location to the host, exactly once
    Notify(UploadReceipt),
    /// Tell the user that media access was refused
    NotifyDenied,
    /// Report the upload failure
    NotifyFailed(ApiError),
    /// Nothing further: the flow ended quietly or the event was stale
    Nothing,
}

/// The permission -> pick -> transmit -> notify sequence, one invocation at
/// a time.
///
/// Each invocation gets a token; events carrying an old token are ignored,
/// so a straggling dialog or request from an abandoned invocation cannot
/// disturb the current one.
pub struct UploadFlow {
    phase: UploadPhase,
    invocation: u64,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self {
            phase: UploadPhase::Idle,
            invocation: 0,
        }
    }
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// Whether an invocation is in flight. Hosts keep their add button
    /// inert while this holds.
    pub fn busy(&self) -> bool {
        matches!(
            self.phase,
            UploadPhase::RequestingAccess | UploadPhase::Picking | UploadPhase::Uploading
        )
    }

    /// Start a new invocation and return its token, or `None` while one is
    /// already running.
    pub fn begin(&mut self) -> Option<u64> {
        if self.busy() {
            return None;
        }
        self.invocation += 1;
        self.phase = UploadPhase::RequestingAccess;
        Some(self.invocation)
    }

    fn current(&self, token: u64) -> bool {
        token == self.invocation
    }

    /// The permission gate answered.
    pub fn access_checked(&mut self, token: u64, access: Access) -> Step {
        if !self.current(token) || self.phase != UploadPhase::RequestingAccess {
            return Step::Nothing;
        }
        match access {
            Access::Granted => {
                self.phase = UploadPhase::Picking;
                Step::Pick
            }
            Access::Denied => {
                self.phase = UploadPhase::Denied;
                Step::NotifyDenied
            }
        }
    }

    /// The picker closed. `None` means the user cancelled, which ends the
    /// invocation silently.
    pub fn image_picked(&mut self, token: u64, picked: Option<PickedImage>) -> Step {
        if !self.current(token) || self.phase != UploadPhase::Picking {
            return Step::Nothing;
        }
        match picked {
            Some(image) => {
                self.phase = UploadPhase::Uploading;
                Step::Transmit(image)
            }
            None => {
                self.phase = UploadPhase::Idle;
                Step::Nothing
            }
        }
    }

    /// The upload POST finished.
    pub fn upload_finished(
        &mut self,
        token: u64,
        outcome: Result<UploadReceipt, ApiError>,
    ) -> Step {
        if !self.current(token) || self.phase != UploadPhase::Uploading {
            return Step::Nothing;
        }
        match outcome {
            Ok(receipt) => {
                self.phase = UploadPhase::Done(receipt.clone());
                Step::Notify(receipt)
            }
            Err(error) => {
                self.phase = UploadPhase::Failed(error.clone());
                Step::NotifyFailed(error)
            }
        }
    }
}

/// Read the picked image off the UI thread and hand it to the gateway.
pub async fn transmit(
    gateway: Arc<dyn CatalogGateway>,
    image: PickedImage,
) -> Result<UploadReceipt, ApiError> {
    let bytes = tokio::fs::read(&image.path).await.map_err(|e| {
        ApiError::Network(format!("could not read {}: {e}", image.path.display()))
    })?;
    gateway.upload_image(image.file_name(), bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaLibrary;
    use crate::state::data::{CatalogQuery, ClothingItem};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn picked() -> PickedImage {
        PickedImage {
            path: PathBuf::from("/tmp/shirt.jpg"),
        }
    }

    fn receipt() -> UploadReceipt {
        UploadReceipt {
            url: "https://x/y.jpg".to_string(),
        }
    }

    #[test]
    fn test_denied_access_is_terminal() {
        let mut flow = UploadFlow::new();
        let token = flow.begin().unwrap();

        assert_eq!(flow.access_checked(token, Access::Denied), Step::NotifyDenied);
        assert_eq!(*flow.phase(), UploadPhase::Denied);
        assert!(!flow.busy());

        // Nothing further happens on this invocation.
        assert_eq!(flow.image_picked(token, Some(picked())), Step::Nothing);
    }

    #[test]
    fn test_cancelled_pick_ends_silently() {
        let mut flow = UploadFlow::new();
        let token = flow.begin().unwrap();

        assert_eq!(flow.access_checked(token, Access::Granted), Step::Pick);
        assert_eq!(flow.image_picked(token, None), Step::Nothing);
        assert_eq!(*flow.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_successful_upload_notifies_exactly_once() {
        let mut flow = UploadFlow::new();
        let token = flow.begin().unwrap();

        flow.access_checked(token, Access::Granted);
        assert_eq!(
            flow.image_picked(token, Some(picked())),
            Step::Transmit(picked())
        );
        assert_eq!(
            flow.upload_finished(token, Ok(receipt())),
            Step::Notify(receipt())
        );

        // A duplicate completion event is ignored.
        assert_eq!(flow.upload_finished(token, Ok(receipt())), Step::Nothing);
    }

    #[test]
    fn test_failed_upload_reports_without_notifying() {
        let mut flow = UploadFlow::new();
        let token = flow.begin().unwrap();

        flow.access_checked(token, Access::Granted);
        flow.image_picked(token, Some(picked()));

        let failure = ApiError::Server(500);
        assert_eq!(
            flow.upload_finished(token, Err(failure.clone())),
            Step::NotifyFailed(failure.clone())
        );
        assert_eq!(*flow.phase(), UploadPhase::Failed(failure));
    }

    #[test]
    fn test_begin_is_inert_while_a_flow_is_running() {
        let mut flow = UploadFlow::new();
        assert!(flow.begin().is_some());
        assert!(flow.begin().is_none());
    }

    #[test]
    fn test_events_from_an_abandoned_invocation_are_ignored() {
        let mut flow = UploadFlow::new();
        let stale = flow.begin().unwrap();
        flow.access_checked(stale, Access::Denied);

        let _current = flow.begin().unwrap();
        assert_eq!(flow.access_checked(stale, Access::Granted), Step::Nothing);
        assert_eq!(*flow.phase(), UploadPhase::RequestingAccess);
    }

    struct StubLibrary {
        access: Access,
        picked: Option<PickedImage>,
    }

    #[async_trait]
    impl MediaLibrary for StubLibrary {
        async fn request_access(&self) -> Access {
            self.access
        }

        async fn pick_image(&self) -> Option<PickedImage> {
            self.picked.clone()
        }
    }

    #[tokio::test]
    async fn test_flow_follows_the_library_responses() {
        let library = StubLibrary {
            access: Access::Granted,
            picked: Some(picked()),
        };

        let mut flow = UploadFlow::new();
        let token = flow.begin().unwrap();

        let step = flow.access_checked(token, library.request_access().await);
        assert_eq!(step, Step::Pick);

        let step = flow.image_picked(token, library.pick_image().await);
        assert_eq!(step, Step::Transmit(picked()));
    }

    struct StubGateway {
        uploads: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl CatalogGateway for StubGateway {
        async fn fetch_closet(
            &self,
            _query: &CatalogQuery,
        ) -> Result<Vec<ClothingItem>, ApiError> {
            Ok(Vec::new())
        }

        async fn upload_image(
            &self,
            filename: String,
            bytes: Vec<u8>,
        ) -> Result<UploadReceipt, ApiError> {
            self.uploads.lock().unwrap().push((filename, bytes));
            Ok(receipt())
        }

        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, ApiError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_transmit_reads_the_picked_file() {
        let path = std::env::temp_dir().join("wardrobe-transmit-test.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        let gateway = Arc::new(StubGateway {
            uploads: Mutex::new(Vec::new()),
        });
        let image = PickedImage { path: path.clone() };

        let result = transmit(gateway.clone() as Arc<dyn CatalogGateway>, image)
            .await
            .unwrap();
        assert_eq!(result, receipt());

        let uploads = gateway.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "wardrobe-transmit-test.jpg");
        assert_eq!(uploads[0].1, b"jpeg bytes");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_transmit_reports_an_unreadable_file() {
        let gateway: Arc<dyn CatalogGateway> = Arc::new(StubGateway {
            uploads: Mutex::new(Vec::new()),
        });
        let image = PickedImage {
            path: std::env::temp_dir().join("wardrobe-missing.jpg"),
        };

        let result = transmit(gateway, image).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}

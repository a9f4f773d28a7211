//! The seam between the upload coordinator and the network.

use crate::UploadSource;
use async_trait::async_trait;
use folio_core::{MediaFile, UploadFileInfo};
use folio_error::FolioResult;
use std::sync::Arc;

/// Progress callback receiving a transfer percentage (0-100).
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Sends one file and its metadata to the library.
///
/// Implementations must abort the underlying request when the returned
/// future is dropped; the coordinator cancels a transfer that way.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Upload the source, resolving to the persisted record.
    async fn upload(
        &self,
        source: &UploadSource,
        info: &UploadFileInfo,
        progress: ProgressFn,
    ) -> FolioResult<MediaFile>;
}

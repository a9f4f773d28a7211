//! Local thumbnail previews.
//!
//! Previews are a best-effort side channel: callers log failures and carry
//! on with the upload.

use base64::Engine;
use bytes::Bytes;
use folio_core::AssetKind;
use folio_error::{FolioResult, UploadError, UploadErrorKind};
use std::io::Cursor;

/// Default edge length of the preview square.
pub const DEFAULT_PREVIEW_EDGE: u32 = 256;

/// Build a `data:image/png;base64,...` thumbnail for image content.
///
/// Returns `Ok(None)` for non-image assets. Decoding and encoding run on the
/// blocking pool.
#[tracing::instrument(skip(data), fields(size = data.len()))]
pub async fn generate_preview(data: Bytes, mime: &str, edge: u32) -> FolioResult<Option<String>> {
    if AssetKind::from_mime(mime) != AssetKind::Image {
        return Ok(None);
    }

    let encoded = tokio::task::spawn_blocking(move || render_thumbnail(&data, edge))
        .await
        .map_err(|e| UploadError::new(UploadErrorKind::PreviewFailed(e.to_string())))??;

    Ok(Some(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(encoded)
    )))
}

fn render_thumbnail(data: &[u8], edge: u32) -> FolioResult<Vec<u8>> {
    let preview_error = |e: image::ImageError| UploadError::new(UploadErrorKind::PreviewFailed(e.to_string()));

    let thumbnail = image::load_from_memory(data)
        .map_err(preview_error)?
        .thumbnail(edge, edge);

    let mut encoded = Vec::new();
    thumbnail
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .map_err(preview_error)?;
    Ok(encoded)
}

/// Pixel dimensions of image content, if it decodes.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

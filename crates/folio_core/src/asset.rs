//! Asset kind classification.

use serde::{Deserialize, Serialize};

/// Broad category of a stored asset.
///
/// Images and videos are kept apart from generic files so an image pipeline
/// can be attached to them later.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Raster or vector image
    #[display("image")]
    Image,
    /// Anything that is neither image nor video
    #[display("file")]
    File,
    /// Video content
    #[display("video")]
    Video,
}

impl AssetKind {
    /// Classify a MIME type.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::AssetKind;
    ///
    /// assert_eq!(AssetKind::from_mime("image/png"), AssetKind::Image);
    /// assert_eq!(AssetKind::from_mime("video/mp4"), AssetKind::Video);
    /// assert_eq!(AssetKind::from_mime("application/pdf"), AssetKind::File);
    /// ```
    pub fn from_mime(mime: &str) -> Self {
        if mime.contains("image") {
            AssetKind::Image
        } else if mime.contains("video") {
            AssetKind::Video
        } else {
            AssetKind::File
        }
    }

    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::File => "file",
            AssetKind::Video => "video",
        }
    }
}

impl std::str::FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(AssetKind::Image),
            "file" => Ok(AssetKind::File),
            "video" => Ok(AssetKind::Video),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

// ABOUTME: Release and asset metadata types plus the asset selection rule.
// ABOUTME: An asset matches when its name contains the release tag.

use serde::Deserialize;

use super::error::SourceError;
use crate::types::{AssetId, ReleaseTag};

/// Release metadata as returned by the source-control API.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub assets: Vec<ReleaseAsset>,
}

/// A binary file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub id: AssetId,
    pub name: String,
    /// Declared byte count; the downloaded body must match it exactly.
    pub size: u64,
}

/// Pick the deployable asset for a tag.
///
/// The first asset whose name contains the tag as a substring wins. When
/// several names contain the tag (e.g. `app-1.0.zip` and `app-1.0.1.zip`
/// for tag `1.0`) the listing order decides; the API returns assets in
/// upload order, which is stable but otherwise arbitrary.
pub fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    tag: &ReleaseTag,
) -> Result<&'a ReleaseAsset, SourceError> {
    assets
        .iter()
        .find(|asset| asset.name.contains(tag.as_str()))
        .ok_or_else(|| SourceError::NoMatchingAsset {
            tag: tag.to_string(),
        })
}

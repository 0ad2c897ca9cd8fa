//! Volumes API response types.

use serde::Deserialize;

use crate::http::upgrade_to_https;

/// Raw response, trimmed by `fields=items(volumeInfo(imageLinks))`.
#[derive(Debug, Default, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Volume {
    #[serde(default, rename = "volumeInfo")]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct VolumeInfo {
    #[serde(default, rename = "imageLinks")]
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, rename = "smallThumbnail")]
    pub small_thumbnail: Option<String>,
}

impl VolumesResponse {
    /// First thumbnail across items, upgraded to https.
    pub fn first_thumbnail(&self) -> Option<String> {
        self.items
            .iter()
            .filter_map(|item| item.volume_info.image_links.as_ref())
            .find_map(|links| links.thumbnail.as_deref().or(links.small_thumbnail.as_deref()))
            .filter(|url| !url.is_empty())
            .map(upgrade_to_https)
    }
}

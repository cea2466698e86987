use serde::{Deserialize, Serialize};

/// Unique identifier for a photo in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoId(pub u64);

impl PhotoId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PhotoId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A photo entry of the feed: its id and the thumbnail URL to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoInfo {
    id: PhotoId,
    url: String,
}

impl PhotoInfo {
    #[must_use]
    pub fn new(id: impl Into<PhotoId>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PhotoId {
        self.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A raw feed record as delivered by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoRecord {
    /// Photo id.
    pub id: u64,
    /// Thumbnail URL.
    pub image_url: String,
    /// Flagged as not safe for general audiences. Records without the flag
    /// are rejected rather than assumed safe.
    pub nsfw: bool,
}

impl PhotoRecord {
    #[must_use]
    pub fn new(id: u64, image_url: impl Into<String>, nsfw: bool) -> Self {
        Self {
            id,
            image_url: image_url.into(),
            nsfw,
        }
    }
}

impl From<PhotoRecord> for PhotoInfo {
    fn from(record: PhotoRecord) -> Self {
        Self::new(record.id, record.image_url)
    }
}

/// Drops records flagged `nsfw` and maps the rest to [`PhotoInfo`], keeping order.
#[must_use]
pub fn safe_photos(records: Vec<PhotoRecord>) -> Vec<PhotoInfo> {
    records
        .into_iter()
        .filter(|record| !record.nsfw)
        .map(PhotoInfo::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_info_accessors() {
        let photo = PhotoInfo::new(42u64, "https://example.com/42.jpg");
        assert_eq!(photo.id(), PhotoId(42));
        assert_eq!(photo.url(), "https://example.com/42.jpg");
    }

    #[test]
    fn test_safe_photos_filters_nsfw_in_order() {
        let records = vec![
            PhotoRecord::new(1, "a", false),
            PhotoRecord::new(2, "b", true),
            PhotoRecord::new(3, "c", false),
        ];
        let ids: Vec<u64> = safe_photos(records)
            .iter()
            .map(|p| p.id().as_u64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_record_without_nsfw_flag_is_rejected() {
        let missing = serde_json::from_str::<PhotoRecord>(r#"{"id": 5, "image_url": "u"}"#);
        assert!(missing.is_err());

        let flagged: PhotoRecord =
            serde_json::from_str(r#"{"id": 5, "image_url": "u", "nsfw": false}"#).unwrap();
        assert!(!flagged.nsfw);
    }

    #[test]
    fn test_photo_id_display() {
        assert_eq!(PhotoId(7).to_string(), "7");
    }
}

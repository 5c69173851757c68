//! GBFS wire types.
//!
//! Only the root directory is deserialized into fixed structs. Sub-feed
//! payloads vary between systems and versions, so they stay as
//! `serde_json::Value` until the normalizer reads them field by field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of a language's feed list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedEntry {
    pub name: String,
    pub url: String,
}

/// The feed list published for one language.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LanguageFeeds {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// Root `gbfs.json` document.
///
/// A document without `data` deserializes to an empty directory, which
/// resolves every language as a miss.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedDirectory {
    #[serde(default)]
    pub data: BTreeMap<String, LanguageFeeds>,
}

impl FeedDirectory {
    /// Read a directory from a fetched JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Language keys present in the directory.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

/// The sub-feeds the pipeline knows how to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedName {
    StationInformation,
    StationStatus,
    FreeBikeStatus,
    VehicleTypes,
    SystemPricingPlans,
}

impl FeedName {
    pub const ALL: [FeedName; 5] = [
        FeedName::StationInformation,
        FeedName::StationStatus,
        FeedName::FreeBikeStatus,
        FeedName::VehicleTypes,
        FeedName::SystemPricingPlans,
    ];

    /// Feed name as it appears in the directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedName::StationInformation => "station_information",
            FeedName::StationStatus => "station_status",
            FeedName::FreeBikeStatus => "free_bike_status",
            FeedName::VehicleTypes => "vehicle_types",
            FeedName::SystemPricingPlans => "system_pricing_plans",
        }
    }

    /// Key of the record array inside the feed's `data` envelope.
    pub fn array_key(&self) -> &'static str {
        match self {
            FeedName::StationInformation | FeedName::StationStatus => "stations",
            FeedName::FreeBikeStatus => "bikes",
            FeedName::VehicleTypes => "vehicle_types",
            FeedName::SystemPricingPlans => "plans",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for FeedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn directory_parses_languages() {
        let doc = json!({
            "last_updated": 1700000000,
            "ttl": 60,
            "data": {
                "en": {"feeds": [
                    {"name": "station_information", "url": "https://x/en/si.json"},
                    {"name": "station_status", "url": "https://x/en/ss.json"}
                ]},
                "fr": {"feeds": []}
            }
        });

        let dir = FeedDirectory::from_value(doc).unwrap();
        assert_eq!(dir.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
        assert_eq!(dir.data["en"].feeds.len(), 2);
        assert_eq!(dir.data["en"].feeds[1].name, "station_status");
    }

    #[test]
    fn directory_without_data_is_empty() {
        let dir = FeedDirectory::from_value(json!({"ttl": 0})).unwrap();
        assert_eq!(dir.languages().count(), 0);
    }

    #[test]
    fn directory_with_wrong_shape_is_error() {
        assert!(FeedDirectory::from_value(json!({"data": []})).is_err());
        assert!(FeedDirectory::from_value(json!("gbfs")).is_err());
    }

    #[test]
    fn feed_names_round_trip() {
        for feed in FeedName::ALL {
            assert_eq!(FeedName::from_name(feed.as_str()), Some(feed));
        }
        assert_eq!(FeedName::from_name("gbfs_versions"), None);
    }

    #[test]
    fn array_keys() {
        assert_eq!(FeedName::StationStatus.array_key(), "stations");
        assert_eq!(FeedName::FreeBikeStatus.array_key(), "bikes");
        assert_eq!(FeedName::SystemPricingPlans.array_key(), "plans");
    }
}

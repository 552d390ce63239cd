//! Submission Payload Builder - Canonical Handoff Record
//!
//! A `SubmissionRecord` can only be built from a [`ValidEntry`], so a
//! partially-valid record is unrepresentable.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{BudgetTier, PhotoDescriptor, RoomType};
use crate::validation::ValidEntry;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub room_type: RoomType,
    pub dimensions: Dimensions,
    pub budget_tier: BudgetTier,
    pub style_prefs: Vec<String>,
    pub must_keep: String,
    pub dislike_most: String,
    pub photos: Vec<PhotoDescriptor>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// Build the handoff record. Does not re-validate.
///
/// `created_at` is stamped at millisecond precision.
pub fn build(entry: &ValidEntry<'_>, now: DateTime<Utc>) -> SubmissionRecord {
    let state = entry.state();
    SubmissionRecord {
        room_type: state.room_type,
        dimensions: entry.dimensions(),
        budget_tier: state.budget_tier,
        style_prefs: state.style_prefs.clone(),
        must_keep: state.must_keep.clone(),
        dislike_most: state.dislike_most.clone(),
        photos: state.photos.clone(),
        created_at: now.trunc_subsecs(3),
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Whole milliseconds render as `.000Z`; finer values keep every digit.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if value.timestamp_subsec_nanos() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        serializer.serialize_str(&value.to_rfc3339_opts(format, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

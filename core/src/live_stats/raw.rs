use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Decodes a field into `Some(T)` when it matches the expected shape and
/// yields `None` when it is missing or wrong-typed, so one bad field never
/// rejects the rest of the snapshot.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Top-level body of `GET /api/live_stats/{job_id}`.
///
/// Every field is optional and every field decodes leniently; optionality
/// stops at [`crate::normalize::normalize`], which resolves all of it into
/// a fully populated [`crate::view::ViewModel`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLiveStats {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub stats: Option<RawTelemetry>,
}

/// Per-frame analytics emitted by the processing backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTelemetry {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rally: Option<RawRally>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kitchen: Option<RawKitchen>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub spatial: Option<RawSpatial>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub operational: Option<RawOperational>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRally {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub current_rally_s: Option<f64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub avg_rally_s: Option<f64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub longest_rally_s: Option<f64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub tempo_rallies_per_min: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawKitchen {
    /// Player indices (0 and 1) currently inside the non-volley zone.
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub players_in_kitchen: Option<Vec<u8>>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub zone_counts: Option<RawZoneCounts>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawZoneCounts {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub backcourt_top: Option<u64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kitchen: Option<u64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub backcourt_bottom: Option<u64>,
}

/// Bird's-eye positions from the court homography. Pairs arrive as plain
/// arrays of arbitrary length; arity is validated at mapping time, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSpatial {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ball_birdseye: Option<Vec<f64>>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub player_birdseye: Option<HashMap<String, Vec<f64>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOperational {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub current_frame: Option<u64>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<u64>,
}

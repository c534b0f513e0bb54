//! Strava v3 response and request bodies.
//!
//! Fields that only appear in some representations (meta, summary,
//! detailed) are optional so one type covers all of them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Representation level of a record.
///
/// `Private` is never sent by Strava; it marks placeholders that stand in
/// for records the token is not allowed to see. Values this crate does not
/// know are kept in `Unknown` so they serialise back unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ResourceState {
    Meta,
    Summary,
    Detailed,
    Updating,
    Private,
    Unknown(i64),
}

impl From<i64> for ResourceState {
    fn from(value: i64) -> Self {
        match value {
            1 => ResourceState::Meta,
            2 => ResourceState::Summary,
            3 => ResourceState::Detailed,
            4 => ResourceState::Updating,
            100 => ResourceState::Private,
            other => ResourceState::Unknown(other),
        }
    }
}

impl From<ResourceState> for i64 {
    fn from(state: ResourceState) -> Self {
        match state {
            ResourceState::Meta => 1,
            ResourceState::Summary => 2,
            ResourceState::Detailed => 3,
            ResourceState::Updating => 4,
            ResourceState::Private => 100,
            ResourceState::Unknown(value) => value,
        }
    }
}

/// Nested `{id, resource_state}` reference, e.g. the athlete of an activity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: i64,
    pub resource_state: Option<ResourceState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: Option<String>,
    pub resource_state: Option<ResourceState>,
    pub polyline: Option<String>,
    pub summary_polyline: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub external_id: Option<String>,
    pub upload_id: Option<i64>,
    pub athlete: Option<ResourceRef>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Metres.
    pub distance: Option<f64>,
    /// Seconds.
    pub moving_time: Option<u32>,
    pub elapsed_time: Option<u32>,
    pub total_elevation_gain: Option<f64>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub start_date_local: Option<String>,
    pub timezone: Option<String>,
    pub start_latlng: Option<Vec<f64>>,
    pub end_latlng: Option<Vec<f64>>,
    pub achievement_count: Option<u32>,
    pub kudos_count: Option<u32>,
    pub comment_count: Option<u32>,
    pub athlete_count: Option<u32>,
    pub photo_count: Option<u32>,
    pub map: Option<Map>,
    pub trainer: Option<bool>,
    pub commute: Option<bool>,
    pub manual: Option<bool>,
    #[serde(rename = "private")]
    pub private_activity: Option<bool>,
    pub flagged: Option<bool>,
    pub gear_id: Option<String>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub calories: Option<f64>,
    pub device_name: Option<String>,
    pub segment_efforts: Option<Vec<SegmentEffort>>,
    pub laps: Option<Vec<Lap>>,
}

/// Body of `POST /activities`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ManualActivity {
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    /// ISO 8601, e.g. `2024-05-01T07:30:00Z`.
    pub start_date_local: String,
    pub elapsed_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(rename = "private", skip_serializing_if = "Option::is_none")]
    pub private_activity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<bool>,
}

/// Body of `PUT /activities/{id}`. Unset fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(rename = "private", skip_serializing_if = "Option::is_none")]
    pub private_activity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gear_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ActivityUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub profile_medium: Option<String>,
    pub profile: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub sex: Option<Gender>,
    pub friend: Option<String>,
    pub follower: Option<String>,
    pub premium: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub follower_count: Option<u32>,
    pub friend_count: Option<u32>,
    pub date_preference: Option<String>,
    pub measurement_preference: Option<String>,
    pub email: Option<String>,
    pub ftp: Option<u32>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub clubs: Option<Vec<Club>>,
}

/// Body of `PUT /athlete`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AthleteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub name: Option<String>,
    pub profile_medium: Option<String>,
    pub profile: Option<String>,
    pub description: Option<String>,
    pub club_type: Option<String>,
    pub sport_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "private")]
    pub private_club: Option<bool>,
    pub member_count: Option<u32>,
    pub featured: Option<bool>,
    pub url: Option<String>,
    pub membership: Option<String>,
    pub admin: Option<bool>,
    pub owner: Option<bool>,
}

/// Answer to a join or leave request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub success: Option<bool>,
    pub active: Option<bool>,
    pub membership: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub activity_id: Option<i64>,
    pub text: Option<String>,
    pub athlete: Option<Athlete>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub name: Option<String>,
    pub activity: Option<ResourceRef>,
    pub athlete: Option<ResourceRef>,
    pub elapsed_time: Option<u32>,
    pub moving_time: Option<u32>,
    pub start_date: Option<DateTime<Utc>>,
    pub start_date_local: Option<String>,
    pub distance: Option<f64>,
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
    pub total_elevation_gain: Option<f64>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub average_cadence: Option<f64>,
    pub average_watts: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub lap_index: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Option<i64>,
    pub unique_id: Option<String>,
    pub activity_id: Option<i64>,
    pub resource_state: Option<ResourceState>,
    pub caption: Option<String>,
    /// 1 for Strava uploads, 2 for Instagram.
    pub source: Option<u8>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub urls: Option<HashMap<String, String>>,
    pub location: Option<Vec<f64>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Heartrate,
    Power,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Seconds spent in the bucket.
    pub time: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityZone {
    pub score: Option<u32>,
    #[serde(default)]
    pub distribution_buckets: Vec<DistributionBucket>,
    #[serde(rename = "type")]
    pub zone_type: Option<ZoneType>,
    pub resource_state: Option<ResourceState>,
    pub sensor_based: Option<bool>,
    pub points: Option<u32>,
    pub custom_zones: Option<bool>,
    pub max: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub name: Option<String>,
    pub activity_type: Option<String>,
    pub distance: Option<f64>,
    pub average_grade: Option<f64>,
    pub maximum_grade: Option<f64>,
    pub elevation_high: Option<f64>,
    pub elevation_low: Option<f64>,
    pub start_latlng: Option<Vec<f64>>,
    pub end_latlng: Option<Vec<f64>>,
    pub climb_category: Option<u8>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "private")]
    pub private_segment: Option<bool>,
    pub starred: Option<bool>,
    pub hazardous: Option<bool>,
    pub effort_count: Option<u32>,
    pub athlete_count: Option<u32>,
    pub star_count: Option<u32>,
    pub map: Option<Map>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentEffort {
    #[serde(default)]
    pub id: i64,
    pub resource_state: Option<ResourceState>,
    pub name: Option<String>,
    pub activity: Option<ResourceRef>,
    pub athlete: Option<ResourceRef>,
    pub elapsed_time: Option<u32>,
    pub moving_time: Option<u32>,
    pub start_date: Option<DateTime<Utc>>,
    pub start_date_local: Option<String>,
    pub distance: Option<f64>,
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
    pub average_cadence: Option<f64>,
    pub average_watts: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub segment: Option<Segment>,
    pub kom_rank: Option<u32>,
    pub pr_rank: Option<u32>,
    pub hidden: Option<bool>,
}

/// Narrows `GET /segments/{id}/all_efforts`. Dates are in the athlete's
/// local time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffortFilter {
    pub athlete_id: Option<i64>,
    pub start_date_local: Option<NaiveDateTime>,
    pub end_date_local: Option<NaiveDateTime>,
}

macro_rules! private_placeholder {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Placeholder carrying only the id and [`ResourceState::Private`].
                pub fn private(id: i64) -> Self {
                    Self {
                        id,
                        resource_state: Some(ResourceState::Private),
                        ..Default::default()
                    }
                }

                /// True when this is a redacted placeholder.
                pub fn is_private(&self) -> bool {
                    self.resource_state == Some(ResourceState::Private)
                }
            }
        )+
    };
}

private_placeholder!(Activity, Athlete, Club, Segment, SegmentEffort);

//! Typed client for the Strava v3 REST API.
//!
//! Two layers:
//! - [`StravaApi`] mirrors the remote endpoints one method per route, with
//!   [`http_client::ReqwestStravaApi`] as the reqwest implementation.
//! - The [`services`] wrap it with the access rules of each resource: write
//!   access checks, paging, and redaction of private records.
//!
//! [`registry::ServiceRegistry`] hands out one memoised service instance per
//! access token.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod model;
pub mod paging;
pub mod privacy;
pub mod registry;
pub mod services;
pub mod token;
pub mod utils;

pub use model::*;
pub use paging::Paging;
pub use token::{AuthorisationScope, Token};

/// Access rule that a service operation checks before mutating anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precondition {
    WriteAccess,
    ViewPrivate,
    ResourceExists,
    ResourceAccessible,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Precondition::WriteAccess => "token does not have write access",
            Precondition::ViewPrivate => "token does not have view_private access",
            Precondition::ResourceExists => "resource does not exist",
            Precondition::ResourceAccessible => "resource is private and not accessible",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum StravaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("strava api error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("{operation}: {precondition}")]
    PreconditionFailed {
        operation: &'static str,
        precondition: Precondition,
    },
}

impl StravaError {
    /// Map a non-success HTTP status to the matching error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            404 => StravaError::NotFound(body),
            401 | 403 => StravaError::Unauthorized(body),
            400 | 422 => StravaError::BadRequest(body),
            429 => StravaError::RateLimited(body),
            _ => StravaError::Api { status, body },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StravaError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StravaError::Unauthorized(_))
    }

    pub(crate) fn precondition(operation: &'static str, precondition: Precondition) -> Self {
        tracing::debug!(operation, %precondition, "precondition failed");
        StravaError::PreconditionFailed {
            operation,
            precondition,
        }
    }
}

/// One method per Strava v3 endpoint. Implementations report remote
/// failures through [`StravaError::from_status`]; they apply no access
/// rules of their own.
#[async_trait]
pub trait StravaApi: Send + Sync + 'static {
    // === Activities ===
    async fn get_activity(
        &self,
        activity_id: i64,
        include_all_efforts: bool,
    ) -> Result<Activity, StravaError>;
    async fn create_manual_activity(
        &self,
        activity: &ManualActivity,
    ) -> Result<Activity, StravaError>;
    async fn update_activity(
        &self,
        activity_id: i64,
        update: &ActivityUpdate,
    ) -> Result<Activity, StravaError>;
    async fn delete_activity(&self, activity_id: i64) -> Result<(), StravaError>;
    /// `before` and `after` are seconds since the Unix epoch.
    async fn list_authenticated_athlete_activities(
        &self,
        before: Option<i64>,
        after: Option<i64>,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError>;
    async fn list_friends_activities(&self, paging: Paging)
    -> Result<Vec<Activity>, StravaError>;
    async fn list_related_activities(
        &self,
        activity_id: i64,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError>;

    // === Comments and kudos ===
    async fn list_activity_comments(
        &self,
        activity_id: i64,
        markdown: bool,
        paging: Paging,
    ) -> Result<Vec<Comment>, StravaError>;
    async fn create_comment(&self, activity_id: i64, text: &str)
    -> Result<Comment, StravaError>;
    async fn delete_comment(&self, activity_id: i64, comment_id: i64) -> Result<(), StravaError>;
    async fn list_activity_kudoers(
        &self,
        activity_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError>;
    async fn give_kudos(&self, activity_id: i64) -> Result<(), StravaError>;

    // === Activity detail collections ===
    async fn list_activity_laps(&self, activity_id: i64) -> Result<Vec<Lap>, StravaError>;
    /// Strava answers `null` rather than `[]` for some activities without photos.
    async fn list_activity_photos(
        &self,
        activity_id: i64,
    ) -> Result<Option<Vec<Photo>>, StravaError>;
    async fn list_activity_zones(&self, activity_id: i64)
    -> Result<Vec<ActivityZone>, StravaError>;

    // === Athletes ===
    async fn get_authenticated_athlete(&self) -> Result<Athlete, StravaError>;
    async fn update_authenticated_athlete(
        &self,
        update: &AthleteUpdate,
    ) -> Result<Athlete, StravaError>;
    async fn get_athlete(&self, athlete_id: i64) -> Result<Athlete, StravaError>;
    async fn list_authenticated_athlete_friends(
        &self,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError>;
    async fn list_athlete_friends(
        &self,
        athlete_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError>;
    async fn list_athletes_both_following(
        &self,
        athlete_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError>;
    async fn list_athlete_koms(
        &self,
        athlete_id: i64,
        paging: Paging,
    ) -> Result<Vec<SegmentEffort>, StravaError>;

    // === Clubs ===
    async fn get_club(&self, club_id: i64) -> Result<Club, StravaError>;
    async fn list_authenticated_athlete_clubs(&self) -> Result<Vec<Club>, StravaError>;
    async fn list_club_members(
        &self,
        club_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError>;
    async fn list_recent_club_activities(
        &self,
        club_id: i64,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError>;
    async fn join_club(&self, club_id: i64) -> Result<MembershipResponse, StravaError>;
    async fn leave_club(&self, club_id: i64) -> Result<MembershipResponse, StravaError>;

    // === Segments ===
    async fn get_segment(&self, segment_id: i64) -> Result<Segment, StravaError>;
    async fn list_starred_segments(&self, paging: Paging) -> Result<Vec<Segment>, StravaError>;
    async fn list_segment_efforts(
        &self,
        segment_id: i64,
        filter: &EffortFilter,
        paging: Paging,
    ) -> Result<Vec<SegmentEffort>, StravaError>;
    async fn star_segment(&self, segment_id: i64, starred: bool)
    -> Result<Segment, StravaError>;
    async fn get_segment_effort(&self, effort_id: i64) -> Result<SegmentEffort, StravaError>;
}

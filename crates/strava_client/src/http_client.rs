//! HTTP client implementation for the Strava v3 API.
//!
//! This module provides a reqwest-based implementation of the [`StravaApi`](crate::StravaApi) trait.

use crate::model::{
    Activity, ActivityUpdate, ActivityZone, Athlete, AthleteUpdate, Club, Comment, EffortFilter,
    Lap, ManualActivity, MembershipResponse, Photo, Segment, SegmentEffort,
};
use crate::{Paging, StravaApi, StravaError, utils};
use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};

/// Client for the Strava v3 API bound to a single access token.
#[derive(Clone, Debug)]
pub struct ReqwestStravaApi {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestStravaApi {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://www.strava.com/api/v3")
    /// * `access_token` - OAuth access token sent as a bearer token
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, access_token)
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        access_token: SecretString,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an authenticated request.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!(%method, path, "strava request");
        metrics::counter!("strava_api_requests_total", "method" => method.to_string())
            .increment(1);
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.access_token.expose_secret())
    }

    fn get_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::GET, path)
    }

    fn post_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::POST, path)
    }

    fn put_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::PUT, path)
    }

    fn delete_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StravaError> {
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), StravaError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(())
    }

    /// Handle a response, converting status codes to appropriate errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, StravaError> {
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> StravaError {
        let status = resp.status().as_u16();
        let url = resp.url().path().to_string();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        metrics::counter!("strava_api_errors_total", "status" => status.to_string())
            .increment(1);
        if status == 429 {
            tracing::warn!(path = %url, "strava rate limit hit (429)");
        } else {
            tracing::debug!(status, path = %url, "strava request failed");
        }
        StravaError::from_status(status, body_snippet)
    }
}

fn paging_query(paging: Paging) -> [(&'static str, String); 2] {
    [
        ("page", paging.page().to_string()),
        ("per_page", paging.page_size().to_string()),
    ]
}

#[async_trait]
impl StravaApi for ReqwestStravaApi {
    async fn get_activity(
        &self,
        activity_id: i64,
        include_all_efforts: bool,
    ) -> Result<Activity, StravaError> {
        let path = format!("/activities/{}", activity_id);
        let req = self
            .get_request(&path)
            .query(&[("include_all_efforts", include_all_efforts.to_string())]);
        self.execute_json(req).await
    }

    async fn create_manual_activity(
        &self,
        activity: &ManualActivity,
    ) -> Result<Activity, StravaError> {
        self.execute_json(self.post_request("/activities").json(activity))
            .await
    }

    async fn update_activity(
        &self,
        activity_id: i64,
        update: &ActivityUpdate,
    ) -> Result<Activity, StravaError> {
        let path = format!("/activities/{}", activity_id);
        self.execute_json(self.put_request(&path).json(update)).await
    }

    async fn delete_activity(&self, activity_id: i64) -> Result<(), StravaError> {
        let path = format!("/activities/{}", activity_id);
        self.execute_empty(self.delete_request(&path)).await
    }

    async fn list_authenticated_athlete_activities(
        &self,
        before: Option<i64>,
        after: Option<i64>,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError> {
        let mut pairs: Vec<(&str, String)> = paging_query(paging).to_vec();
        if let Some(b) = before {
            pairs.push(("before", b.to_string()));
        }
        if let Some(a) = after {
            pairs.push(("after", a.to_string()));
        }
        self.execute_json(self.get_request("/athlete/activities").query(&pairs))
            .await
    }

    async fn list_friends_activities(
        &self,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError> {
        let req = self
            .get_request("/activities/following")
            .query(&paging_query(paging));
        self.execute_json(req).await
    }

    async fn list_related_activities(
        &self,
        activity_id: i64,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError> {
        let path = format!("/activities/{}/related", activity_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn list_activity_comments(
        &self,
        activity_id: i64,
        markdown: bool,
        paging: Paging,
    ) -> Result<Vec<Comment>, StravaError> {
        let path = format!("/activities/{}/comments", activity_id);
        let mut pairs: Vec<(&str, String)> = paging_query(paging).to_vec();
        pairs.push(("markdown", markdown.to_string()));
        self.execute_json(self.get_request(&path).query(&pairs)).await
    }

    async fn create_comment(
        &self,
        activity_id: i64,
        text: &str,
    ) -> Result<Comment, StravaError> {
        let path = format!("/activities/{}/comments", activity_id);
        self.execute_json(self.post_request(&path).query(&[("text", text)]))
            .await
    }

    async fn delete_comment(&self, activity_id: i64, comment_id: i64) -> Result<(), StravaError> {
        let path = format!("/activities/{}/comments/{}", activity_id, comment_id);
        self.execute_empty(self.delete_request(&path)).await
    }

    async fn list_activity_kudoers(
        &self,
        activity_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError> {
        let path = format!("/activities/{}/kudos", activity_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn give_kudos(&self, activity_id: i64) -> Result<(), StravaError> {
        let path = format!("/activities/{}/kudos", activity_id);
        self.execute_empty(self.post_request(&path)).await
    }

    async fn list_activity_laps(&self, activity_id: i64) -> Result<Vec<Lap>, StravaError> {
        let path = format!("/activities/{}/laps", activity_id);
        self.execute_json(self.get_request(&path)).await
    }

    async fn list_activity_photos(
        &self,
        activity_id: i64,
    ) -> Result<Option<Vec<Photo>>, StravaError> {
        let path = format!("/activities/{}/photos", activity_id);
        let req = self.get_request(&path).query(&[("photo_sources", "true")]);
        self.execute_json(req).await
    }

    async fn list_activity_zones(
        &self,
        activity_id: i64,
    ) -> Result<Vec<ActivityZone>, StravaError> {
        let path = format!("/activities/{}/zones", activity_id);
        self.execute_json(self.get_request(&path)).await
    }

    async fn get_authenticated_athlete(&self) -> Result<Athlete, StravaError> {
        self.execute_json(self.get_request("/athlete")).await
    }

    async fn update_authenticated_athlete(
        &self,
        update: &AthleteUpdate,
    ) -> Result<Athlete, StravaError> {
        self.execute_json(self.put_request("/athlete").json(update))
            .await
    }

    async fn get_athlete(&self, athlete_id: i64) -> Result<Athlete, StravaError> {
        let path = format!("/athletes/{}", athlete_id);
        self.execute_json(self.get_request(&path)).await
    }

    async fn list_authenticated_athlete_friends(
        &self,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError> {
        let req = self
            .get_request("/athlete/friends")
            .query(&paging_query(paging));
        self.execute_json(req).await
    }

    async fn list_athlete_friends(
        &self,
        athlete_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError> {
        let path = format!("/athletes/{}/friends", athlete_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn list_athletes_both_following(
        &self,
        athlete_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError> {
        let path = format!("/athletes/{}/both-following", athlete_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn list_athlete_koms(
        &self,
        athlete_id: i64,
        paging: Paging,
    ) -> Result<Vec<SegmentEffort>, StravaError> {
        let path = format!("/athletes/{}/koms", athlete_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn get_club(&self, club_id: i64) -> Result<Club, StravaError> {
        let path = format!("/clubs/{}", club_id);
        self.execute_json(self.get_request(&path)).await
    }

    async fn list_authenticated_athlete_clubs(&self) -> Result<Vec<Club>, StravaError> {
        self.execute_json(self.get_request("/athlete/clubs")).await
    }

    async fn list_club_members(
        &self,
        club_id: i64,
        paging: Paging,
    ) -> Result<Vec<Athlete>, StravaError> {
        let path = format!("/clubs/{}/members", club_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn list_recent_club_activities(
        &self,
        club_id: i64,
        paging: Paging,
    ) -> Result<Vec<Activity>, StravaError> {
        let path = format!("/clubs/{}/activities", club_id);
        self.execute_json(self.get_request(&path).query(&paging_query(paging)))
            .await
    }

    async fn join_club(&self, club_id: i64) -> Result<MembershipResponse, StravaError> {
        let path = format!("/clubs/{}/join", club_id);
        self.execute_json(self.post_request(&path)).await
    }

    async fn leave_club(&self, club_id: i64) -> Result<MembershipResponse, StravaError> {
        let path = format!("/clubs/{}/leave", club_id);
        self.execute_json(self.post_request(&path)).await
    }

    async fn get_segment(&self, segment_id: i64) -> Result<Segment, StravaError> {
        let path = format!("/segments/{}", segment_id);
        self.execute_json(self.get_request(&path)).await
    }

    async fn list_starred_segments(&self, paging: Paging) -> Result<Vec<Segment>, StravaError> {
        let req = self
            .get_request("/segments/starred")
            .query(&paging_query(paging));
        self.execute_json(req).await
    }

    async fn list_segment_efforts(
        &self,
        segment_id: i64,
        filter: &EffortFilter,
        paging: Paging,
    ) -> Result<Vec<SegmentEffort>, StravaError> {
        let path = format!("/segments/{}/all_efforts", segment_id);
        let mut pairs: Vec<(&str, String)> = paging_query(paging).to_vec();
        if let Some(id) = filter.athlete_id {
            pairs.push(("athlete_id", id.to_string()));
        }
        if let Some(start) = &filter.start_date_local {
            pairs.push(("start_date_local", utils::format_local(start)));
        }
        if let Some(end) = &filter.end_date_local {
            pairs.push(("end_date_local", utils::format_local(end)));
        }
        self.execute_json(self.get_request(&path).query(&pairs)).await
    }

    async fn star_segment(&self, segment_id: i64, starred: bool) -> Result<Segment, StravaError> {
        let path = format!("/segments/{}/starred", segment_id);
        let req = self
            .put_request(&path)
            .query(&[("starred", starred.to_string())]);
        self.execute_json(req).await
    }

    async fn get_segment_effort(&self, effort_id: i64) -> Result<SegmentEffort, StravaError> {
        let path = format!("/segment_efforts/{}", effort_id);
        self.execute_json(self.get_request(&path)).await
    }
}

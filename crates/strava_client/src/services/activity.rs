use super::{found, found_or_private, require_write};
use crate::model::{
    Activity, ActivityUpdate, ActivityZone, Athlete, Comment, Lap, ManualActivity, Photo,
    ResourceState,
};
use crate::paging::{handle_paging, page_stream};
use crate::privacy::redact_private;
use crate::{Paging, Precondition, StravaApi, StravaError, Token, utils};
use chrono::{DateTime, Utc};
use futures_util::{Stream, TryStreamExt};
use std::sync::Arc;

/// Activities, plus their comments, kudos, laps, photos and zones.
pub struct ActivityService {
    api: Arc<dyn StravaApi>,
    token: Token,
}

impl ActivityService {
    pub fn new(api: Arc<dyn StravaApi>, token: Token) -> Self {
        Self { api, token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub async fn get_activity(&self, activity_id: i64) -> Result<Option<Activity>, StravaError> {
        self.get_activity_with_efforts(activity_id, false).await
    }

    /// `None` if the activity does not exist; a private placeholder if the
    /// token may not see it.
    pub async fn get_activity_with_efforts(
        &self,
        activity_id: i64,
        include_all_efforts: bool,
    ) -> Result<Option<Activity>, StravaError> {
        let result = self.api.get_activity(activity_id, include_all_efforts).await;
        found_or_private(activity_id, result)
    }

    /// Fetch an activity a mutation is about to act on.
    async fn existing_activity(
        &self,
        operation: &'static str,
        activity_id: i64,
    ) -> Result<Activity, StravaError> {
        self.get_activity(activity_id)
            .await?
            .ok_or_else(|| StravaError::precondition(operation, Precondition::ResourceExists))
    }

    async fn accessible_activity(
        &self,
        operation: &'static str,
        activity_id: i64,
    ) -> Result<Activity, StravaError> {
        let activity = self.existing_activity(operation, activity_id).await?;
        if activity.is_private() {
            return Err(StravaError::precondition(
                operation,
                Precondition::ResourceAccessible,
            ));
        }
        Ok(activity)
    }

    pub async fn create_manual_activity(
        &self,
        activity: &ManualActivity,
    ) -> Result<Activity, StravaError> {
        const OP: &str = "create_manual_activity";
        require_write(&self.token, OP)?;
        if activity.private_activity == Some(true) && !self.token.has_view_private() {
            return Err(StravaError::precondition(OP, Precondition::ViewPrivate));
        }
        match self.api.create_manual_activity(activity).await {
            Err(StravaError::BadRequest(body)) => Err(StravaError::InvalidInput(body)),
            other => other,
        }
    }

    /// Apply `update` and return the activity as stored afterwards.
    ///
    /// An empty update just reads the activity. Returns `None` if the
    /// activity disappears during the update.
    pub async fn update_activity(
        &self,
        activity_id: i64,
        update: &ActivityUpdate,
    ) -> Result<Option<Activity>, StravaError> {
        const OP: &str = "update_activity";
        if update.is_empty() {
            return self.get_activity(activity_id).await;
        }
        require_write(&self.token, OP)?;
        self.accessible_activity(OP, activity_id).await?;

        match found(self.api.update_activity(activity_id, update).await)? {
            Some(updated) if updated.resource_state == Some(ResourceState::Updating) => {
                tracing::debug!(activity_id, "activity still updating, re-reading");
                self.get_activity(activity_id).await
            }
            other => Ok(other),
        }
    }

    /// Delete an activity, returning it as it was before deletion.
    pub async fn delete_activity(
        &self,
        activity_id: i64,
    ) -> Result<Option<Activity>, StravaError> {
        const OP: &str = "delete_activity";
        require_write(&self.token, OP)?;
        let activity = self.accessible_activity(OP, activity_id).await?;
        Ok(found(self.api.delete_activity(activity_id).await)?.map(|_| activity))
    }

    pub async fn create_comment(
        &self,
        activity_id: i64,
        text: &str,
    ) -> Result<Comment, StravaError> {
        const OP: &str = "create_comment";
        if text.trim().is_empty() {
            return Err(StravaError::InvalidInput(
                "comment text must not be empty".into(),
            ));
        }
        require_write(&self.token, OP)?;
        self.accessible_activity(OP, activity_id).await?;
        self.api.create_comment(activity_id, text).await
    }

    pub async fn delete_comment(
        &self,
        activity_id: i64,
        comment_id: i64,
    ) -> Result<(), StravaError> {
        const OP: &str = "delete_comment";
        require_write(&self.token, OP)?;
        self.accessible_activity(OP, activity_id).await?;
        self.api.delete_comment(activity_id, comment_id).await
    }

    /// Delete a comment previously read from the API.
    pub async fn delete_comment_record(&self, comment: &Comment) -> Result<(), StravaError> {
        let activity_id = comment.activity_id.ok_or_else(|| {
            StravaError::InvalidInput("comment has no activity id".into())
        })?;
        self.delete_comment(activity_id, comment.id).await
    }

    pub async fn give_kudos(&self, activity_id: i64) -> Result<(), StravaError> {
        const OP: &str = "give_kudos";
        require_write(&self.token, OP)?;
        let activity = self.existing_activity(OP, activity_id).await?;
        if activity.is_private() && !self.token.has_view_private() {
            return Err(StravaError::precondition(OP, Precondition::ViewPrivate));
        }
        self.api.give_kudos(activity_id).await
    }

    /// Comments on an activity. `paging: None` returns all of them.
    pub async fn list_activity_comments(
        &self,
        activity_id: i64,
        markdown: bool,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Comment>>, StravaError> {
        let Some(activity) = self.get_activity(activity_id).await? else {
            return Ok(None);
        };
        if activity.is_private() {
            return Ok(Some(Vec::new()));
        }
        found(
            handle_paging(paging, |p| {
                self.api.list_activity_comments(activity_id, markdown, p)
            })
            .await,
        )
    }

    pub async fn list_activity_kudoers(
        &self,
        activity_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Athlete>>, StravaError> {
        let Some(activity) = self.get_activity(activity_id).await? else {
            return Ok(None);
        };
        if activity.is_private() {
            return Ok(Some(Vec::new()));
        }
        let kudoers = found(
            handle_paging(paging, |p| self.api.list_activity_kudoers(activity_id, p)).await,
        )?;
        Ok(kudoers.map(|k| redact_private(k, &self.token)))
    }

    pub async fn list_activity_laps(
        &self,
        activity_id: i64,
    ) -> Result<Option<Vec<Lap>>, StravaError> {
        let Some(activity) = self.get_activity(activity_id).await? else {
            return Ok(None);
        };
        if activity.is_private() {
            return Ok(Some(Vec::new()));
        }
        found(self.api.list_activity_laps(activity_id).await)
    }

    pub async fn list_activity_photos(
        &self,
        activity_id: i64,
    ) -> Result<Option<Vec<Photo>>, StravaError> {
        let Some(activity) = self.get_activity(activity_id).await? else {
            return Ok(None);
        };
        if activity.is_private() {
            return Ok(Some(Vec::new()));
        }
        let photos = found(self.api.list_activity_photos(activity_id).await)?;
        Ok(photos.map(Option::unwrap_or_default))
    }

    pub async fn list_activity_zones(
        &self,
        activity_id: i64,
    ) -> Result<Option<Vec<ActivityZone>>, StravaError> {
        let Some(activity) = self.get_activity(activity_id).await? else {
            return Ok(None);
        };
        if activity.is_private() {
            return Ok(Some(Vec::new()));
        }
        found(self.api.list_activity_zones(activity_id).await)
    }

    /// The token owner's activities, optionally bounded by start time.
    pub async fn list_authenticated_athlete_activities(
        &self,
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
        paging: Option<Paging>,
    ) -> Result<Vec<Activity>, StravaError> {
        let before = utils::seconds_since_epoch(before);
        let after = utils::seconds_since_epoch(after);
        let activities = handle_paging(paging, |p| {
            self.api
                .list_authenticated_athlete_activities(before, after, p)
        })
        .await?;
        Ok(redact_private(activities, &self.token))
    }

    /// Page-by-page form of
    /// [`list_authenticated_athlete_activities`](Self::list_authenticated_athlete_activities).
    /// Pages are capped at [`MAX_PAGE_SIZE`](crate::paging::MAX_PAGE_SIZE) items.
    pub fn authenticated_athlete_activity_pages(
        &self,
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
        page_size: u32,
    ) -> impl Stream<Item = Result<Vec<Activity>, StravaError>> + '_ {
        let before = utils::seconds_since_epoch(before);
        let after = utils::seconds_since_epoch(after);
        page_stream(page_size, move |p| {
            self.api
                .list_authenticated_athlete_activities(before, after, p)
        })
        .map_ok(move |page| redact_private(page, &self.token))
    }

    pub async fn list_friends_activities(
        &self,
        paging: Option<Paging>,
    ) -> Result<Vec<Activity>, StravaError> {
        let activities =
            handle_paging(paging, |p| self.api.list_friends_activities(p)).await?;
        Ok(redact_private(activities, &self.token))
    }

    /// Activities recorded together with `activity_id`; `None` if it does not exist.
    pub async fn list_related_activities(
        &self,
        activity_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Activity>>, StravaError> {
        let activities = found(
            handle_paging(paging, |p| self.api.list_related_activities(activity_id, p)).await,
        )?;
        Ok(activities.map(|a| redact_private(a, &self.token)))
    }
}

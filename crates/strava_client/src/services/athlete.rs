use super::{found, found_or_private, require_write};
use crate::model::{Athlete, AthleteUpdate, SegmentEffort};
use crate::paging::handle_paging;
use crate::privacy::redact_private;
use crate::{Paging, StravaApi, StravaError, Token};
use std::sync::Arc;

pub struct AthleteService {
    api: Arc<dyn StravaApi>,
    token: Token,
}

impl AthleteService {
    pub fn new(api: Arc<dyn StravaApi>, token: Token) -> Self {
        Self { api, token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The athlete the token belongs to.
    pub async fn get_authenticated_athlete(&self) -> Result<Athlete, StravaError> {
        self.api.get_authenticated_athlete().await
    }

    pub async fn get_athlete(&self, athlete_id: i64) -> Result<Option<Athlete>, StravaError> {
        found_or_private(athlete_id, self.api.get_athlete(athlete_id).await)
    }

    pub async fn update_authenticated_athlete(
        &self,
        update: &AthleteUpdate,
    ) -> Result<Athlete, StravaError> {
        require_write(&self.token, "update_authenticated_athlete")?;
        self.api.update_authenticated_athlete(update).await
    }

    pub async fn list_authenticated_athlete_friends(
        &self,
        paging: Option<Paging>,
    ) -> Result<Vec<Athlete>, StravaError> {
        let friends =
            handle_paging(paging, |p| self.api.list_authenticated_athlete_friends(p)).await?;
        Ok(redact_private(friends, &self.token))
    }

    pub async fn list_athlete_friends(
        &self,
        athlete_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Athlete>>, StravaError> {
        let friends = found(
            handle_paging(paging, |p| self.api.list_athlete_friends(athlete_id, p)).await,
        )?;
        Ok(friends.map(|f| redact_private(f, &self.token)))
    }

    /// Athletes that both the token owner and `athlete_id` follow.
    pub async fn list_athletes_both_following(
        &self,
        athlete_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Athlete>>, StravaError> {
        let athletes = found(
            handle_paging(paging, |p| {
                self.api.list_athletes_both_following(athlete_id, p)
            })
            .await,
        )?;
        Ok(athletes.map(|a| redact_private(a, &self.token)))
    }

    /// Efforts for which `athlete_id` holds the KOM/QOM.
    pub async fn list_athlete_koms(
        &self,
        athlete_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<SegmentEffort>>, StravaError> {
        let efforts = found(
            handle_paging(paging, |p| self.api.list_athlete_koms(athlete_id, p)).await,
        )?;
        Ok(efforts.map(|e| redact_private(e, &self.token)))
    }
}

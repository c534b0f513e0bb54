use super::{found, found_or_private, require_write};
use crate::model::{Activity, Athlete, Club, MembershipResponse};
use crate::paging::handle_paging;
use crate::privacy::redact_private;
use crate::{Paging, Precondition, StravaApi, StravaError, Token};
use std::sync::Arc;

pub struct ClubService {
    api: Arc<dyn StravaApi>,
    token: Token,
}

impl ClubService {
    pub fn new(api: Arc<dyn StravaApi>, token: Token) -> Self {
        Self { api, token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// `None` if the club does not exist; a private placeholder if the token
    /// may not see it.
    pub async fn get_club(&self, club_id: i64) -> Result<Option<Club>, StravaError> {
        found_or_private(club_id, self.api.get_club(club_id).await)
    }

    pub async fn list_authenticated_athlete_clubs(&self) -> Result<Vec<Club>, StravaError> {
        let clubs = self.api.list_authenticated_athlete_clubs().await?;
        Ok(redact_private(clubs, &self.token))
    }

    pub async fn list_club_members(
        &self,
        club_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Athlete>>, StravaError> {
        let Some(club) = self.get_club(club_id).await? else {
            return Ok(None);
        };
        if club.is_private() {
            return Ok(Some(Vec::new()));
        }
        let members =
            found(handle_paging(paging, |p| self.api.list_club_members(club_id, p)).await)?;
        Ok(members.map(|m| redact_private(m, &self.token)))
    }

    pub async fn list_recent_club_activities(
        &self,
        club_id: i64,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<Activity>>, StravaError> {
        let Some(club) = self.get_club(club_id).await? else {
            return Ok(None);
        };
        if club.is_private() {
            return Ok(Some(Vec::new()));
        }
        let activities = found(
            handle_paging(paging, |p| self.api.list_recent_club_activities(club_id, p)).await,
        )?;
        Ok(activities.map(|a| redact_private(a, &self.token)))
    }

    pub async fn join_club(&self, club_id: i64) -> Result<MembershipResponse, StravaError> {
        const OP: &str = "join_club";
        require_write(&self.token, OP)?;
        self.require_club(OP, club_id).await?;
        self.api.join_club(club_id).await
    }

    pub async fn leave_club(&self, club_id: i64) -> Result<MembershipResponse, StravaError> {
        const OP: &str = "leave_club";
        require_write(&self.token, OP)?;
        self.require_club(OP, club_id).await?;
        self.api.leave_club(club_id).await
    }

    async fn require_club(
        &self,
        operation: &'static str,
        club_id: i64,
    ) -> Result<Club, StravaError> {
        self.get_club(club_id)
            .await?
            .ok_or_else(|| StravaError::precondition(operation, Precondition::ResourceExists))
    }
}

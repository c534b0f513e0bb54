use super::{found, found_or_private, require_write};
use crate::model::{EffortFilter, Segment, SegmentEffort};
use crate::paging::handle_paging;
use crate::privacy::redact_private;
use crate::{Paging, Precondition, StravaApi, StravaError, Token};
use std::sync::Arc;

pub struct SegmentService {
    api: Arc<dyn StravaApi>,
    token: Token,
}

impl SegmentService {
    pub fn new(api: Arc<dyn StravaApi>, token: Token) -> Self {
        Self { api, token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub async fn get_segment(&self, segment_id: i64) -> Result<Option<Segment>, StravaError> {
        found_or_private(segment_id, self.api.get_segment(segment_id).await)
    }

    /// Segments starred by the token owner.
    pub async fn list_starred_segments(
        &self,
        paging: Option<Paging>,
    ) -> Result<Vec<Segment>, StravaError> {
        let segments = handle_paging(paging, |p| self.api.list_starred_segments(p)).await?;
        Ok(redact_private(segments, &self.token))
    }

    /// Efforts on a segment, optionally narrowed to one athlete or a date range.
    pub async fn list_segment_efforts(
        &self,
        segment_id: i64,
        filter: &EffortFilter,
        paging: Option<Paging>,
    ) -> Result<Option<Vec<SegmentEffort>>, StravaError> {
        let Some(segment) = self.get_segment(segment_id).await? else {
            return Ok(None);
        };
        if segment.is_private() {
            return Ok(Some(Vec::new()));
        }
        let efforts = found(
            handle_paging(paging, |p| {
                self.api.list_segment_efforts(segment_id, filter, p)
            })
            .await,
        )?;
        Ok(efforts.map(|e| redact_private(e, &self.token)))
    }

    pub async fn star_segment(
        &self,
        segment_id: i64,
        starred: bool,
    ) -> Result<Segment, StravaError> {
        const OP: &str = "star_segment";
        require_write(&self.token, OP)?;
        let segment = self
            .get_segment(segment_id)
            .await?
            .ok_or_else(|| StravaError::precondition(OP, Precondition::ResourceExists))?;
        if segment.is_private() {
            return Err(StravaError::precondition(
                OP,
                Precondition::ResourceAccessible,
            ));
        }
        self.api.star_segment(segment_id, starred).await
    }
}

use super::found_or_private;
use crate::model::SegmentEffort;
use crate::{StravaApi, StravaError, Token};
use std::sync::Arc;

pub struct SegmentEffortService {
    api: Arc<dyn StravaApi>,
    token: Token,
}

impl SegmentEffortService {
    pub fn new(api: Arc<dyn StravaApi>, token: Token) -> Self {
        Self { api, token }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub async fn get_segment_effort(
        &self,
        effort_id: i64,
    ) -> Result<Option<SegmentEffort>, StravaError> {
        found_or_private(effort_id, self.api.get_segment_effort(effort_id).await)
    }
}

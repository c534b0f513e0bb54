//! Access rules layered over [`StravaApi`](crate::StravaApi), one service per
//! resource type.
//!
//! Conventions shared by every service:
//! - a record that does not exist reads as `None`;
//! - a record the token may not see reads as its private placeholder;
//! - lists under a private parent read as empty;
//! - mutations check write access before touching the network.

mod activity;
mod athlete;
mod club;
mod segment;
mod segment_effort;

pub use activity::ActivityService;
pub use athlete::AthleteService;
pub use club::ClubService;
pub use segment::SegmentService;
pub use segment_effort::SegmentEffortService;

use crate::privacy::Redactable;
use crate::{Precondition, StravaError, Token};

/// Turn a remote not-found into `None`.
pub(crate) fn found<T>(result: Result<T, StravaError>) -> Result<Option<T>, StravaError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Single-record read: not-found becomes `None`, unauthorized becomes the
/// private placeholder for `id`.
pub(crate) fn found_or_private<T: Redactable>(
    id: i64,
    result: Result<T, StravaError>,
) -> Result<Option<T>, StravaError> {
    match result {
        Err(e) if e.is_unauthorized() => {
            tracing::debug!(id, "record is private, returning placeholder");
            Ok(Some(T::placeholder(id)))
        }
        other => found(other),
    }
}

pub(crate) fn require_write(token: &Token, operation: &'static str) -> Result<(), StravaError> {
    if token.has_write_access() {
        Ok(())
    } else {
        Err(StravaError::precondition(operation, Precondition::WriteAccess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activity, AuthorisationScope};
    use secrecy::SecretString;

    #[test]
    fn found_maps_not_found_to_none() {
        let r: Result<Option<u8>, _> = found(Err(StravaError::NotFound("x".into())));
        assert_eq!(r.unwrap(), None);
        assert_eq!(found(Ok::<_, StravaError>(5)).unwrap(), Some(5));
        assert!(found::<u8>(Err(StravaError::RateLimited("x".into()))).is_err());
    }

    #[test]
    fn found_or_private_substitutes_placeholder() {
        let r = found_or_private::<Activity>(12, Err(StravaError::Unauthorized("no".into())));
        assert_eq!(r.unwrap(), Some(Activity::private(12)));
    }

    #[test]
    fn require_write_checks_scope() {
        let read_only = Token::new(SecretString::new("t".into()), vec![]);
        let err = require_write(&read_only, "op").unwrap_err();
        assert!(matches!(
            err,
            StravaError::PreconditionFailed {
                operation: "op",
                precondition: Precondition::WriteAccess
            }
        ));
        let writer = Token::new(
            SecretString::new("t".into()),
            vec![AuthorisationScope::Write],
        );
        assert!(require_write(&writer, "op").is_ok());
    }
}

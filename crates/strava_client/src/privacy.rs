//! Redaction of records the token may not see in full.
//!
//! Lists keep their length and order: an inaccessible record is swapped for
//! a placeholder holding only its id and [`ResourceState::Private`].

use crate::{Activity, Athlete, Club, ResourceState, Segment, SegmentEffort, Token};

pub trait Redactable: Sized {
    fn record_id(&self) -> i64;

    /// Whether `token` is barred from this record's content.
    fn is_inaccessible(&self, token: &Token) -> bool;

    fn placeholder(id: i64) -> Self;
}

fn marked_private(state: Option<ResourceState>) -> bool {
    state == Some(ResourceState::Private)
}

impl Redactable for Activity {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn is_inaccessible(&self, token: &Token) -> bool {
        marked_private(self.resource_state)
            || (self.private_activity == Some(true) && !token.has_view_private())
    }

    fn placeholder(id: i64) -> Self {
        Activity::private(id)
    }
}

impl Redactable for Segment {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn is_inaccessible(&self, token: &Token) -> bool {
        marked_private(self.resource_state)
            || (self.private_segment == Some(true) && !token.has_view_private())
    }

    fn placeholder(id: i64) -> Self {
        Segment::private(id)
    }
}

impl Redactable for Athlete {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn is_inaccessible(&self, _token: &Token) -> bool {
        marked_private(self.resource_state)
    }

    fn placeholder(id: i64) -> Self {
        Athlete::private(id)
    }
}

impl Redactable for Club {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn is_inaccessible(&self, _token: &Token) -> bool {
        marked_private(self.resource_state)
    }

    fn placeholder(id: i64) -> Self {
        Club::private(id)
    }
}

impl Redactable for SegmentEffort {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn is_inaccessible(&self, _token: &Token) -> bool {
        marked_private(self.resource_state)
    }

    fn placeholder(id: i64) -> Self {
        SegmentEffort::private(id)
    }
}

/// Replace every inaccessible record with its placeholder.
pub fn redact_private<T: Redactable>(records: Vec<T>, token: &Token) -> Vec<T> {
    records
        .into_iter()
        .map(|record| {
            if record.is_inaccessible(token) {
                T::placeholder(record.record_id())
            } else {
                record
            }
        })
        .collect()
}

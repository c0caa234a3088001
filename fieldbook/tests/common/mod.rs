//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixtures for testing the
//! fieldbook library.

pub mod database;

use chrono::{DateTime, TimeZone, Utc};

use fieldbook::{AdmissionRequest, RequesterId, ResourceId, TimeWindow};

/// Monday 2030-03-04 at `hour:minute` UTC.
#[allow(dead_code)]
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 4, hour, minute, 0).unwrap()
}

/// A window on Monday 2030-03-04 from `start` to `end`, given as (hour, minute).
#[allow(dead_code)]
pub fn monday_window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    TimeWindow::new(monday_at(start.0, start.1), monday_at(end.0, end.1)).unwrap()
}

/// Builder for admission requests with sensible defaults.
///
/// Defaults: field 1, requester 1, Monday 18:00-19:00, not recurring.
#[allow(dead_code)]
pub struct RequestFixture {
    resource_id: ResourceId,
    requester_id: RequesterId,
    window: TimeWindow,
    recurring: bool,
}

#[allow(dead_code)]
impl RequestFixture {
    pub fn new() -> Self {
        Self {
            resource_id: ResourceId(1),
            requester_id: RequesterId(1),
            window: monday_window((18, 0), (19, 0)),
            recurring: false,
        }
    }

    pub fn field(mut self, resource_id: ResourceId) -> Self {
        self.resource_id = resource_id;
        self
    }

    pub fn requester(mut self, requester_id: i64) -> Self {
        self.requester_id = RequesterId(requester_id);
        self
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    pub fn build(self) -> AdmissionRequest {
        AdmissionRequest::new(self.resource_id, self.requester_id, self.window)
            .with_recurring(self.recurring)
    }
}

impl Default for RequestFixture {
    fn default() -> Self {
        Self::new()
    }
}

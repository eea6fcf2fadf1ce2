use serde::Serialize;

use crate::protocols::racp::{RacpRequest, ResponseCode};

/// How a session that was not aborted ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    Success { received: u32 },
    /// Answer to a report-count request.
    StoredRecords { count: u16 },
    /// Any response code other than success.
    Protocol { code: ResponseCode },
    LinkLost { received: u32 },
}

/// Terminal result delivered to every waiter of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RacpOutcome {
    Completed(Completion),
    Aborted { received: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RacpState {
    Idle,
    RequestSent,
    ReceivingRecords,
    Completed(Completion),
    Aborted { received: u32 },
}

impl RacpState {
    pub fn is_active(&self) -> bool {
        matches!(self, RacpState::RequestSent | RacpState::ReceivingRecords)
    }
}

/// One finished session as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub request: RacpRequest,
    pub outcome: RacpOutcome,
    /// Stored-record notifications that failed to decode.
    #[serde(skip_serializing_if = "is_zero")]
    pub dropped_records: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

//! Record Access Control Point sessions.
//!
//! `Idle -> RequestSent -> ReceivingRecords -> Completed | Aborted`. One
//! session per device and service; a second request while one is in flight
//! fails with `SessionBusy`. Disconnect force-completes with `LinkLost`.

mod coordinator;
mod error;
mod outcome;

pub use coordinator::{PendingRequest, RacpCoordinator};
pub use error::RacpError;
pub use outcome::{Completion, RacpOutcome, RacpState, SessionSummary};

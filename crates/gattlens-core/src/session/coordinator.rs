use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::error::RacpError;
use super::outcome::{Completion, RacpOutcome, RacpState, SessionSummary};
use crate::gatt::ServiceKind;
use crate::protocols::racp::{Opcode, RacpRequest, RacpResponse, ResponseCode};

/// A command ready to be written to the control point, plus the receiver
/// that resolves once the session it started (or aborts) is terminal.
#[derive(Debug)]
pub struct PendingRequest {
    pub command: Vec<u8>,
    pub outcome: oneshot::Receiver<RacpOutcome>,
}

#[derive(Debug)]
struct ActiveSession {
    request: RacpRequest,
    received: u32,
    dropped: u32,
    abort_pending: bool,
    waiters: Vec<oneshot::Sender<RacpOutcome>>,
}

/// Stored-record session state machine for one device/service pair.
///
/// The coordinator never touches the link: `request` hands back the bytes
/// to write, and the owner feeds it record arrivals, control-point
/// responses, write failures and disconnects.
#[derive(Debug)]
pub struct RacpCoordinator {
    service: ServiceKind,
    state: RacpState,
    session: Option<ActiveSession>,
    history: Vec<SessionSummary>,
}

impl RacpCoordinator {
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            state: RacpState::Idle,
            session: None,
            history: Vec::new(),
        }
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    pub fn state(&self) -> RacpState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Finished sessions, oldest first.
    pub fn history(&self) -> &[SessionSummary] {
        &self.history
    }

    /// Start a session, or mark the active one for abort.
    ///
    /// Any request other than abort is rejected with `SessionBusy` while a
    /// session is in flight; the in-flight session is left as it was.
    pub fn request(&mut self, request: RacpRequest) -> Result<PendingRequest, RacpError> {
        let (sender, receiver) = oneshot::channel();
        if let Some(session) = self.session.as_mut() {
            if request != RacpRequest::Abort {
                warn!(
                    service = %self.service,
                    active = ?session.request,
                    rejected = ?request,
                    "request rejected, session busy"
                );
                return Err(RacpError::SessionBusy {
                    service: self.service,
                });
            }
            if session.abort_pending || session.request == RacpRequest::Abort {
                warn!(service = %self.service, "abort already pending");
                return Err(RacpError::SessionBusy {
                    service: self.service,
                });
            }
            session.abort_pending = true;
            session.waiters.push(sender);
            debug!(service = %self.service, received = session.received, "abort requested");
        } else {
            self.session = Some(ActiveSession {
                request,
                received: 0,
                dropped: 0,
                abort_pending: false,
                waiters: vec![sender],
            });
            self.state = RacpState::RequestSent;
            debug!(service = %self.service, request = ?request, "request sent");
        }
        Ok(PendingRequest {
            command: request.encode(),
            outcome: receiver,
        })
    }

    /// Count `count` decoded stored records against the active session.
    ///
    /// Returns `false` when no session is collecting records; the records
    /// are then ordinary live notifications.
    pub fn on_records_received(&mut self, count: usize) -> bool {
        let Some(session) = self.collecting_session() else {
            return false;
        };
        session.received = session
            .received
            .saturating_add(u32::try_from(count).unwrap_or(u32::MAX));
        if self.state == RacpState::RequestSent {
            debug!(service = %self.service, "receiving records");
            self.state = RacpState::ReceivingRecords;
        }
        true
    }

    /// Note a stored-record notification that failed to decode. The session
    /// carries on.
    pub fn on_record_dropped(&mut self) {
        if let Some(session) = self.collecting_session() {
            session.dropped = session.dropped.saturating_add(1);
        }
    }

    /// Apply a control-point indication. Returns the outcome when it ends
    /// the session.
    pub fn handle_response(&mut self, response: RacpResponse) -> Option<RacpOutcome> {
        let Some(session) = self.session.as_ref() else {
            warn!(service = %self.service, response = ?response, "response without active session");
            return None;
        };
        let outcome = match response {
            RacpResponse::NumberOfRecords { count } => match session.request {
                RacpRequest::Count(_) => RacpOutcome::Completed(Completion::StoredRecords { count }),
                _ => {
                    warn!(service = %self.service, count, "unexpected number-of-records response");
                    return None;
                }
            },
            RacpResponse::ResponseCode {
                request_opcode: Opcode::AbortOperation,
                code,
            } if session.abort_pending || session.request == RacpRequest::Abort => {
                if code == ResponseCode::Success {
                    RacpOutcome::Aborted {
                        received: session.received,
                    }
                } else {
                    RacpOutcome::Completed(Completion::Protocol { code })
                }
            }
            RacpResponse::ResponseCode {
                request_opcode,
                code,
            } if request_opcode == session.request.opcode() => {
                if code == ResponseCode::Success {
                    RacpOutcome::Completed(Completion::Success {
                        received: session.received,
                    })
                } else {
                    RacpOutcome::Completed(Completion::Protocol { code })
                }
            }
            RacpResponse::ResponseCode { request_opcode, .. } => {
                warn!(
                    service = %self.service,
                    request_opcode = ?request_opcode,
                    active = ?session.request,
                    "ignoring response for another operation"
                );
                return None;
            }
        };
        self.finish(outcome);
        Some(outcome)
    }

    /// The command could not be written; the session cannot progress.
    pub fn on_write_failed(&mut self) -> Option<RacpOutcome> {
        self.force_link_lost("command write failed")
    }

    pub fn on_disconnect(&mut self) -> Option<RacpOutcome> {
        self.force_link_lost("link lost")
    }

    /// Back to `Idle` with an empty history, as after a fresh connection.
    pub fn reset(&mut self) -> Vec<SessionSummary> {
        self.force_link_lost("reset");
        self.state = RacpState::Idle;
        std::mem::take(&mut self.history)
    }

    fn collecting_session(&mut self) -> Option<&mut ActiveSession> {
        if !self.state.is_active() {
            return None;
        }
        self.session
            .as_mut()
            .filter(|session| matches!(session.request, RacpRequest::Report(_)))
    }

    fn force_link_lost(&mut self, reason: &'static str) -> Option<RacpOutcome> {
        let received = self.session.as_ref()?.received;
        let outcome = RacpOutcome::Completed(Completion::LinkLost { received });
        warn!(service = %self.service, received, reason, "session force-completed");
        self.finish(outcome);
        Some(outcome)
    }

    fn finish(&mut self, outcome: RacpOutcome) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.state = match outcome {
            RacpOutcome::Completed(completion) => RacpState::Completed(completion),
            RacpOutcome::Aborted { received } => RacpState::Aborted { received },
        };
        debug!(service = %self.service, outcome = ?outcome, "session finished");
        for waiter in session.waiters {
            // The receiver may have been dropped; the history still records it.
            let _ = waiter.send(outcome);
        }
        self.history.push(SessionSummary {
            request: session.request,
            outcome,
            dropped_records: session.dropped,
        });
    }
}

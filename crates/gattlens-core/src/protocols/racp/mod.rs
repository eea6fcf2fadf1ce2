//! Record Access Control Point codec.
//!
//! Commands are `opcode, operator, [filter type, operand...]`; the peer
//! answers either with a number-of-records response (for report-count) or a
//! response-code indication naming the request it completes. The session
//! state machine that sequences these lives in `session`.

pub mod codes;
pub mod command;
pub mod layout;
pub mod response;

pub use codes::{FilterType, Opcode, Operator, ResponseCode};
pub use command::{Operand, OperandRange, RacpRequest, RecordFilter};
pub use response::{RacpResponse, parse_racp_response};

use serde::Serialize;

use super::codes::{Opcode, Operator, ResponseCode};
use super::layout;
use crate::protocols::common::{ByteCursor, DecodeError};

/// An indication received on the Record Access Control Point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RacpResponse {
    NumberOfRecords { count: u16 },
    ResponseCode { request_opcode: Opcode, code: ResponseCode },
}

pub fn parse_racp_response(payload: &[u8]) -> Result<RacpResponse, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    cursor.require(layout::OPCODE_LEN + layout::OPERATOR_LEN)?;

    let opcode = Opcode::from_code(cursor.peek_flags()?)?;
    match opcode {
        Opcode::NumberOfStoredRecordsResponse => {
            cursor.require(layout::NUMBER_OF_RECORDS_RESPONSE_LEN)?;
            cursor.read_u8()?;
            read_null_operator(&mut cursor)?;
            Ok(RacpResponse::NumberOfRecords {
                count: cursor.read_u16_le()?,
            })
        }
        Opcode::ResponseCode => {
            cursor.require(layout::RESPONSE_CODE_LEN)?;
            cursor.read_u8()?;
            read_null_operator(&mut cursor)?;
            let request_opcode = Opcode::from_code(cursor.read_u8()?)?;
            let code = ResponseCode::from_code(cursor.read_u8()?)?;
            Ok(RacpResponse::ResponseCode {
                request_opcode,
                code,
            })
        }
        other => Err(DecodeError::unrecognized("racp response opcode", other.code())),
    }
}

fn read_null_operator(cursor: &mut ByteCursor<'_>) -> Result<(), DecodeError> {
    let code = cursor.read_u8()?;
    if Operator::from_code(code)? != Operator::Null {
        return Err(DecodeError::unrecognized("racp response operator", code));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RacpResponse, parse_racp_response};
    use crate::protocols::common::DecodeError;
    use crate::protocols::racp::{Opcode, ResponseCode};

    #[test]
    fn parse_number_of_records() {
        let parsed = parse_racp_response(&[0x05, 0x00, 0x2a, 0x01]).unwrap();
        assert_eq!(parsed, RacpResponse::NumberOfRecords { count: 298 });
    }

    #[test]
    fn parse_response_codes() {
        let parsed = parse_racp_response(&[0x06, 0x00, 0x01, 0x01]).unwrap();
        assert_eq!(
            parsed,
            RacpResponse::ResponseCode {
                request_opcode: Opcode::ReportStoredRecords,
                code: ResponseCode::Success
            }
        );
        let parsed = parse_racp_response(&[0x06, 0x00, 0x03, 0x07]).unwrap();
        assert_eq!(
            parsed,
            RacpResponse::ResponseCode {
                request_opcode: Opcode::AbortOperation,
                code: ResponseCode::AbortUnsuccessful
            }
        );
    }

    #[test]
    fn request_opcodes_are_not_responses() {
        let err = parse_racp_response(&[0x01, 0x01]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnrecognizedCode {
                field: "racp response opcode",
                code: 1
            }
        ));
    }

    #[test]
    fn non_null_operator_fails() {
        let err = parse_racp_response(&[0x06, 0x01, 0x01, 0x01]).unwrap_err();
        assert!(err.to_string().contains("racp response operator"));
    }

    #[test]
    fn truncated_response_fails() {
        let err = parse_racp_response(&[0x06, 0x00, 0x01]).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedPayload { needed: 4, actual: 3 });
        assert!(parse_racp_response(&[0x0a, 0x00]).is_err());
    }
}

use serde::Serialize;
use time::PrimitiveDateTime;

use super::codes::{FilterType, Opcode, Operator};
use crate::protocols::common::encode_date_time;

/// Single filter operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Sequence number (Glucose) or time offset in minutes (CGM).
    Sequence(u16),
    UserFacingTime(PrimitiveDateTime),
}

impl Operand {
    fn filter_type(&self) -> FilterType {
        match self {
            Operand::Sequence(_) => FilterType::SequenceNumber,
            Operand::UserFacingTime(_) => FilterType::UserFacingTime,
        }
    }

    fn write_value(&self, out: &mut Vec<u8>) {
        match self {
            Operand::Sequence(value) => out.extend_from_slice(&value.to_le_bytes()),
            Operand::UserFacingTime(value) => out.extend_from_slice(&encode_date_time(*value)),
        }
    }
}

/// Inclusive range; both ends share a filter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandRange {
    Sequence { min: u16, max: u16 },
    UserFacingTime {
        min: PrimitiveDateTime,
        max: PrimitiveDateTime,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "operator", content = "operand", rename_all = "snake_case")]
pub enum RecordFilter {
    All,
    First,
    Last,
    LessOrEqual(Operand),
    GreaterOrEqual(Operand),
    Within(OperandRange),
}

impl RecordFilter {
    pub fn operator(&self) -> Operator {
        match self {
            RecordFilter::All => Operator::AllRecords,
            RecordFilter::First => Operator::FirstRecord,
            RecordFilter::Last => Operator::LastRecord,
            RecordFilter::LessOrEqual(_) => Operator::LessThanOrEqual,
            RecordFilter::GreaterOrEqual(_) => Operator::GreaterThanOrEqual,
            RecordFilter::Within(_) => Operator::WithinRange,
        }
    }

    fn write_operands(&self, out: &mut Vec<u8>) {
        match self {
            RecordFilter::All | RecordFilter::First | RecordFilter::Last => {}
            RecordFilter::LessOrEqual(operand) | RecordFilter::GreaterOrEqual(operand) => {
                out.push(operand.filter_type().code());
                operand.write_value(out);
            }
            RecordFilter::Within(OperandRange::Sequence { min, max }) => {
                out.push(FilterType::SequenceNumber.code());
                out.extend_from_slice(&min.to_le_bytes());
                out.extend_from_slice(&max.to_le_bytes());
            }
            RecordFilter::Within(OperandRange::UserFacingTime { min, max }) => {
                out.push(FilterType::UserFacingTime.code());
                out.extend_from_slice(&encode_date_time(*min));
                out.extend_from_slice(&encode_date_time(*max));
            }
        }
    }
}

/// A command written to the Record Access Control Point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "filter", rename_all = "snake_case")]
pub enum RacpRequest {
    Report(RecordFilter),
    Delete(RecordFilter),
    Count(RecordFilter),
    Abort,
}

impl RacpRequest {
    pub fn opcode(&self) -> Opcode {
        match self {
            RacpRequest::Report(_) => Opcode::ReportStoredRecords,
            RacpRequest::Delete(_) => Opcode::DeleteStoredRecords,
            RacpRequest::Count(_) => Opcode::ReportNumberOfStoredRecords,
            RacpRequest::Abort => Opcode::AbortOperation,
        }
    }

    /// Wire bytes: opcode, operator, then the filter type and operands when
    /// the operator takes any.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.opcode().code()];
        match self {
            RacpRequest::Report(filter) | RacpRequest::Delete(filter) | RacpRequest::Count(filter) => {
                out.push(filter.operator().code());
                filter.write_operands(&mut out);
            }
            RacpRequest::Abort => out.push(Operator::Null.code()),
        }
        out
    }
}

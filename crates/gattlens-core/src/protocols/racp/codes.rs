use crate::protocols::common::wire_codes;

wire_codes! {
    Opcode, "racp opcode" {
        ReportStoredRecords = 1,
        DeleteStoredRecords = 2,
        AbortOperation = 3,
        ReportNumberOfStoredRecords = 4,
        NumberOfStoredRecordsResponse = 5,
        ResponseCode = 6,
    }
}

wire_codes! {
    Operator, "racp operator" {
        Null = 0,
        AllRecords = 1,
        LessThanOrEqual = 2,
        GreaterThanOrEqual = 3,
        WithinRange = 4,
        FirstRecord = 5,
        LastRecord = 6,
    }
}

wire_codes! {
    /// Filter type 1 is the sequence number for Glucose and the time offset
    /// for Continuous Glucose; both are u16 operands.
    FilterType, "racp filter type" {
        SequenceNumber = 1,
        UserFacingTime = 2,
    }
}

wire_codes! {
    ResponseCode, "racp response code" {
        Success = 1,
        OpCodeNotSupported = 2,
        InvalidOperator = 3,
        OperatorNotSupported = 4,
        InvalidOperand = 5,
        NoRecordsFound = 6,
        AbortUnsuccessful = 7,
        ProcedureNotCompleted = 8,
        OperandNotSupported = 9,
    }
}

#[cfg(test)]
mod tests {
    use super::{Opcode, Operator, ResponseCode};

    #[test]
    fn codes_map_both_ways() {
        assert_eq!(Opcode::from_code(3).unwrap(), Opcode::AbortOperation);
        assert_eq!(Operator::WithinRange.code(), 4);
        assert_eq!(ResponseCode::from_code(6).unwrap(), ResponseCode::NoRecordsFound);
    }

    #[test]
    fn unknown_response_code_fails() {
        let err = ResponseCode::from_code(0x0a).unwrap_err();
        assert!(err.to_string().contains("unrecognized racp response code"));
        assert!(Operator::from_code(7).is_err());
    }
}

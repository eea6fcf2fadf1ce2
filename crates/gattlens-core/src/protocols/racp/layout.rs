pub const OPCODE_LEN: usize = 1;
pub const OPERATOR_LEN: usize = 1;
pub const FILTER_TYPE_LEN: usize = 1;
pub const SEQUENCE_OPERAND_LEN: usize = 2;

/// Opcode, operator and a u16 record count.
pub const NUMBER_OF_RECORDS_RESPONSE_LEN: usize = OPCODE_LEN + OPERATOR_LEN + 2;
/// Opcode, operator, request opcode and response code.
pub const RESPONSE_CODE_LEN: usize = OPCODE_LEN + OPERATOR_LEN + 1 + 1;

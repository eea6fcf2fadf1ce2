pub const COMMENT_PREFIX: char = '#';

pub const KEYWORD_CONNECT: &str = "connect";
pub const KEYWORD_NOTIFY: &str = "notify";
pub const KEYWORD_REQUEST: &str = "request";
pub const KEYWORD_ABORT: &str = "abort";
pub const KEYWORD_DISCONNECT: &str = "disconnect";

pub const OP_ALL: &str = "all";
pub const OP_FIRST: &str = "first";
pub const OP_LAST: &str = "last";
pub const OP_COUNT: &str = "count";
pub const OP_DELETE: &str = "delete";
pub const OP_GREATER_OR_EQUAL: &str = "greater-or-equal";
pub const OP_LESS_OR_EQUAL: &str = "less-or-equal";
pub const OP_WITHIN: &str = "within";

/// Separators tolerated inside hex payloads.
pub const HEX_SEPARATORS: [char; 2] = [':', '-'];

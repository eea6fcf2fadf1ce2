use super::layout;

/// Split a transcript line into whitespace-separated fields, dropping any
/// trailing comment. Returns `None` for lines with nothing left.
pub fn split_fields(line: &str) -> Option<Vec<&str>> {
    let content = match line.find(layout::COMMENT_PREFIX) {
        Some(index) => &line[..index],
        None => line,
    };
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.is_empty() { None } else { Some(fields) }
}

/// Decode a hex payload, ignoring `:` and `-` separators.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = text
        .chars()
        .filter(|c| !layout::HEX_SEPARATORS.contains(c))
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| format!("invalid hex digit '{c}' in payload"))
        })
        .collect::<Result<_, _>>()?;
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in payload '{text}'"));
    }
    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Parse a decimal or `0x`-prefixed u16 operand.
pub fn parse_operand(text: &str) -> Result<u16, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse::<u16>(),
    };
    parsed.map_err(|_| format!("invalid operand '{text}' (expected 0..=65535)"))
}

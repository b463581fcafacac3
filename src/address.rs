use alloy::primitives::Address;

use crate::error::{InspectorError, Result};

/// Parses a 20-byte hex address and returns it with its EIP-55 checksummed
/// string form.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase input is
/// accepted as is; mixed-case input must carry a valid checksum.
pub fn normalize_address(input: &str) -> Result<(Address, String)> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let invalid = |reason: &str| InspectorError::InvalidAddress {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if body.len() != 40 {
        return Err(invalid("expected 40 hex characters"));
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("non-hex character"));
    }

    let mut raw = [0u8; 20];
    hex::decode_to_slice(body, &mut raw).map_err(|e| invalid(&e.to_string()))?;
    let address = Address::from(raw);
    let checksummed = address.to_checksum(None);

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && checksummed[2..] != *body {
        return Err(invalid("checksum mismatch"));
    }

    Ok((address, checksummed))
}

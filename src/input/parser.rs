use super::InputError;

/// Convert an operator entry into a non-negative integer.
///
/// Digits accumulate left to right. A single decimal point is accepted and everything after
/// it is dropped, so `"12.7"` reads as 12. Range checks belong to the caller.
pub fn parse_value(input: &str) -> Result<u32, InputError> {
    if input.is_empty() {
        return Err(InputError::NoData);
    }

    if input.bytes().filter(|&b| b == b'.').count() > 1 {
        return Err(InputError::InvalidString);
    }

    let mut value: u32 = 0;
    let mut digits = 0usize;
    let mut fraction = false;

    for byte in input.bytes() {
        match byte {
            b'.' => fraction = true,
            b'0'..=b'9' if fraction => {}
            b'0'..=b'9' => {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u32::from(byte - b'0')))
                    .ok_or(InputError::ValueTooLarge)?;
                digits += 1;
            }
            _ => return Err(InputError::InvalidCharacter),
        }
    }

    if digits == 0 {
        return Err(InputError::NoData);
    }

    Ok(value)
}

/// Check `value` against an inclusive range.
pub fn check_range(value: u32, min: u32, max: u32) -> Result<u32, InputError> {
    if value < min {
        Err(InputError::ValueTooSmall)
    } else if value > max {
        Err(InputError::ValueTooLarge)
    } else {
        Ok(value)
    }
}

//! Amount normalization.
//!
//! Statement exports disagree on sign placement: some mark debits with a
//! trailing `-` ("1234.50-"), some with a leading `-`, some wrap the value
//! in currency symbols and thousands separators. One rule, applied at every
//! boundary that accepts an amount string:
//!
//!   sign = -1 if raw ends with '-', else -1 if raw starts with '-', else +1
//!   then strip everything outside [0-9.] and apply the sign.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Normalize a raw amount string into a signed decimal.
pub fn normalize_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingRequiredField { field: "amount" });
    }

    let negative = if trimmed.ends_with('-') {
        true
    } else {
        trimmed.starts_with('-')
    };

    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return Err(Error::MissingRequiredField { field: "amount" });
    }

    let magnitude = Decimal::from_str(&digits).map_err(|_| Error::MissingRequiredField {
        field: "amount",
    })?;

    Ok(if negative { -magnitude } else { magnitude })
}

//! Field validators for Indian checkout and account forms.
//!
//! Every validator is a pure function over its input: same input, same
//! verdict, no clock, no locale, no I/O. Errors are human-readable and
//! are shown to the shopper as-is.

use crate::types::email::{Email, EmailError};

/// Why a field failed validation.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ValidationError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error("phone number must be exactly 10 digits")]
    PhoneLength,
    #[error("phone number may only contain digits")]
    PhoneCharset,
    #[error("phone number must start with 6, 7, 8 or 9")]
    PhonePrefix,
    #[error("postal code must be exactly 6 digits")]
    PostalCodeFormat,
    #[error("postal code is not valid for {state}")]
    PostalCodeRegion { state: String },
    #[error("address must be between {} and {} characters", ADDRESS_MIN, ADDRESS_MAX)]
    AddressLength,
    #[error("name must be between {} and {} characters", NAME_MIN, NAME_MAX)]
    NameLength,
    #[error("name may only contain letters, spaces and periods")]
    NameCharset,
}

/// Minimum address length, in characters.
pub const ADDRESS_MIN: usize = 10;
/// Maximum address length, in characters.
pub const ADDRESS_MAX: usize = 200;
/// Minimum name length, in characters.
pub const NAME_MIN: usize = 2;
/// Maximum name length, in characters.
pub const NAME_MAX: usize = 50;

/// Indian postal zones: state or union territory to the set of leading
/// digits its PIN codes may start with. Names are lowercase; lookup is
/// case-insensitive. Regions not listed here get a format-only check.
const POSTAL_ZONES: &[(&str, &str)] = &[
    // Zone 1: Northern region
    ("delhi", "1"),
    ("haryana", "1"),
    ("punjab", "1"),
    ("himachal pradesh", "1"),
    ("jammu and kashmir", "1"),
    ("ladakh", "1"),
    ("chandigarh", "1"),
    // Zone 2: Uttar Pradesh and Uttarakhand
    ("uttar pradesh", "2"),
    ("uttarakhand", "2"),
    // Zone 3: Western region
    ("rajasthan", "3"),
    ("gujarat", "3"),
    ("dadra and nagar haveli", "3"),
    ("daman and diu", "3"),
    // Zone 4: Central and west-central region
    ("maharashtra", "4"),
    ("madhya pradesh", "4"),
    ("chhattisgarh", "4"),
    ("goa", "4"),
    // Zone 5: Southern region
    ("andhra pradesh", "5"),
    ("telangana", "5"),
    ("karnataka", "5"),
    // Zone 6: Far southern region
    ("tamil nadu", "6"),
    ("kerala", "6"),
    ("puducherry", "6"),
    ("lakshadweep", "6"),
    // Zone 7: Eastern and north-eastern region
    ("west bengal", "7"),
    ("odisha", "7"),
    ("assam", "7"),
    ("sikkim", "7"),
    ("arunachal pradesh", "7"),
    ("nagaland", "7"),
    ("manipur", "7"),
    ("mizoram", "7"),
    ("tripura", "7"),
    ("meghalaya", "7"),
    ("andaman and nicobar islands", "7"),
    // Zone 8: Bihar and Jharkhand
    ("bihar", "8"),
    ("jharkhand", "8"),
];

fn zone_digits(region: &str) -> Option<&'static str> {
    let key = region.trim().to_ascii_lowercase();
    POSTAL_ZONES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, digits)| *digits)
}

/// Validate an email address.
///
/// # Errors
///
/// Returns the reason the address is malformed.
pub fn email(value: &str) -> Result<(), ValidationError> {
    Email::parse(value.trim())?;
    Ok(())
}

/// Validate an Indian mobile number: exactly 10 digits, starting 6 to 9.
///
/// # Errors
///
/// Returns which rule the number broke.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.len() != 10 {
        return Err(ValidationError::PhoneLength);
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PhoneCharset);
    }
    if !value.starts_with(['6', '7', '8', '9']) {
        return Err(ValidationError::PhonePrefix);
    }
    Ok(())
}

/// Validate an Indian PIN code, optionally against the selected state.
///
/// The code itself must be exactly 6 digits. When a region is supplied
/// and appears in the zone table, the leading digit must belong to that
/// region's zone; a mismatch is a validation error. Unknown regions only
/// get the format check.
///
/// # Errors
///
/// Returns a format error or a region mismatch.
pub fn postal_code(value: &str, region: Option<&str>) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.len() != 6 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PostalCodeFormat);
    }
    if let Some(region) = region
        && let Some(digits) = zone_digits(region)
    {
        let Some(first) = value.chars().next() else {
            return Err(ValidationError::PostalCodeFormat);
        };
        if !digits.contains(first) {
            return Err(ValidationError::PostalCodeRegion {
                state: region.trim().to_owned(),
            });
        }
    }
    Ok(())
}

/// Validate a street address: 10 to 200 characters after trimming.
///
/// # Errors
///
/// Returns a length error.
pub fn address(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if !(ADDRESS_MIN..=ADDRESS_MAX).contains(&len) {
        return Err(ValidationError::AddressLength);
    }
    Ok(())
}

/// Validate a person's name: 2 to 50 characters, letters, spaces and
/// periods only.
///
/// # Errors
///
/// Returns a length or charset error.
pub fn name(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let len = value.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength);
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '.')
    {
        return Err(ValidationError::NameCharset);
    }
    Ok(())
}

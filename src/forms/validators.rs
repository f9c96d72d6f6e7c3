//! Field-level checks shared by every record form.

use chrono::NaiveDate;
use uuid::Uuid;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const FUTURE_DATE: &str = "Date cannot be in the future.";
pub const END_BEFORE_START: &str = "End date cannot be before start date.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Accepts ISO dates (`2024-01-31`)
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| INVALID_DATE.to_string())
}

pub fn validate_date_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if date > today {
        return Err(FUTURE_DATE.to_string());
    }
    Ok(())
}

pub fn validate_end_date_not_before_start_date(end: NaiveDate, start: NaiveDate) -> Result<(), String> {
    if end < start {
        return Err(END_BEFORE_START.to_string());
    }
    Ok(())
}

pub fn validate_max_length(value: &str, max_length: usize) -> Result<(), String> {
    let length = value.chars().count();
    if length > max_length {
        return Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max_length, length
        ));
    }
    Ok(())
}

pub fn parse_uuid(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("“{}” is not a valid UUID.", raw))
}

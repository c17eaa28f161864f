use std::fmt::Display;

use crate::prompt::Validation;

/// Number of rows shown per `--page` when a whole list arrives in one response.
pub const DISPLAY_PAGE_SIZE: usize = 10;

pub fn validate_non_zero(value: u32) -> Validation {
    if value == 0 {
        return Err("Zero is not allowed");
    }
    Ok(())
}

/// Country codes are two letter ISO 3166 codes such as `th` or `tw`.
pub fn validate_country_code(code: &str) -> Validation {
    if code.chars().count() != 2 {
        return Err("Please input ISO 3166-2 (2 characters)");
    }
    Ok(())
}

pub fn validate_required(value: &str) -> Validation {
    if value.trim().is_empty() {
        return Err("This field is required");
    }
    Ok(())
}

/// Selects the `page`-th display slice (1-based) of `items`.
///
/// Without a page the whole list is returned. A page past the end yields
/// `None`.
pub fn page_slice<T>(items: &[T], page: Option<u32>, per_page: usize) -> Option<&[T]> {
    let Some(page) = page else {
        return Some(items);
    };

    let index = page.max(1) as usize - 1;
    let start = index.checked_mul(per_page)?;
    if start >= items.len() {
        return None;
    }
    let end = start.saturating_add(per_page).min(items.len());
    Some(&items[start..end])
}

/// Table cell for an optional value; absent values render blank.
pub fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Human readable form of a number of seconds, e.g. `29d 23h 59m`.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let minutes = seconds % 3_600 / 60;

    match (days, hours, minutes) {
        (0, 0, 0) => format!("{}s", seconds),
        (0, 0, m) => format!("{}m", m),
        (0, h, m) => format!("{}h {}m", h, m),
        (d, h, m) => format!("{}d {}h {}m", d, h, m),
    }
}

//! Due date formatting in the fixed `MM/dd/yyyy` layout.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Display string stored for tasks without a due date.
pub const NO_DUE_DATE: &str = "No due date";

const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month]/[day]/[year]");

/// Render a calendar date as `MM/dd/yyyy`.
#[must_use]
pub fn format(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        u8::from(date.month()),
        date.day(),
        date.year()
    )
}

/// Parse a `MM/dd/yyyy` display string back into a date.
///
/// Returns `None` for the [`NO_DUE_DATE`] sentinel and for anything that is not a
/// valid calendar date in that layout.
#[must_use]
pub fn parse(display: &str) -> Option<Date> {
    let trimmed = display.trim();
    if trimmed == NO_DUE_DATE {
        return None;
    }
    Date::parse(trimmed, DISPLAY_FORMAT).ok()
}

/// Due date attached to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DueDate {
    /// No due date was chosen.
    #[default]
    Unset,
    /// Due on the given calendar day.
    On(Date),
}

impl DueDate {
    /// Build from an optional date as handed over by the caller.
    #[must_use]
    pub const fn from_date(date: Option<Date>) -> Self {
        match date {
            Some(date) => Self::On(date),
            None => Self::Unset,
        }
    }

    /// Interpret a stored display string.
    ///
    /// The sentinel maps to [`DueDate::Unset`]; malformed strings yield `None`.
    #[must_use]
    pub fn from_display(display: &str) -> Option<Self> {
        if display.trim() == NO_DUE_DATE {
            return Some(Self::Unset);
        }
        parse(display).map(Self::On)
    }

    /// Calendar date, if one is set.
    #[must_use]
    pub const fn as_date(self) -> Option<Date> {
        match self {
            Self::On(date) => Some(date),
            Self::Unset => None,
        }
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str(NO_DUE_DATE),
            Self::On(date) => f.write_str(&format(*date)),
        }
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        Self::from_display(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {s:?}")))
    }
}

/// Identifier types and calendar-date helpers shared by the domain entities
///
/// Every habit-side entity is keyed by a UUID. The wrappers keep a habit ID
/// from being passed where a detail ID is expected.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Format used for calendar dates, both on the wire and in the database
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique identifier for a habit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its string form
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a daily achievement record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AchievementId(pub Uuid);

impl AchievementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AchievementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a daily detail record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailId(pub Uuid);

impl DetailId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DetailId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DetailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parse a habit ID supplied by a caller, rejecting anything that is not a UUID
pub fn parse_habit_id(s: &str) -> Result<HabitId, DomainError> {
    HabitId::from_string(s.trim())
        .map_err(|_| DomainError::InvalidId(format!("'{}' is not a valid habit id", s)))
}

/// Parse an ISO calendar date (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_id_round_trips_through_display() {
        let id = HabitId::new();
        let parsed = HabitId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_habit_id_rejects_garbage() {
        let result = parse_habit_id("not-a-uuid");
        assert!(matches!(result, Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-18").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());

        assert!(matches!(parse_date("2024-02-30"), Err(DomainError::InvalidDate(_))));
        assert!(matches!(parse_date("18/03/2024"), Err(DomainError::InvalidDate(_))));
    }
}

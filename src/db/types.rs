//! Shared type definitions for the storage layer.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// The pipeline phase of a deal.
///
/// Stored as text; the `deals.stage` CHECK constraint enforces the same
/// closed set at the storage edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    New,
    Qualified,
    Proposal,
    Won,
    Lost,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Qualified,
        Self::Proposal,
        Self::Won,
        Self::Lost,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }

    /// Terminal stages drop out of the open pipeline.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Self::New),
            "Qualified" => Ok(Self::Qualified),
            "Proposal" => Ok(Self::Proposal),
            "Won" => Ok(Self::Won),
            "Lost" => Ok(Self::Lost),
            _ => Err(ParseEnumError {
                expected: "deal stage",
                got: s.to_string(),
            }),
        }
    }
}

/// The kind of a logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Note,
    Call,
    Meeting,
    Task,
}

impl ActivityKind {
    pub const ALL: [Self; 4] = [Self::Note, Self::Call, Self::Meeting, Self::Task];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Call => "Call",
            Self::Meeting => "Meeting",
            Self::Task => "Task",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Note" => Ok(Self::Note),
            "Call" => Ok(Self::Call),
            "Meeting" => Ok(Self::Meeting),
            "Task" => Ok(Self::Task),
            _ => Err(ParseEnumError {
                expected: "activity type",
                got: s.to_string(),
            }),
        }
    }
}

/// A row from the `companies` table.
#[derive(Debug, Clone)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub created_at: String,
}

/// Field values for a company insert.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
}

/// A contact as shown in the list view: joined with its company name.
#[derive(Debug, Clone)]
pub struct ContactRow {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub created_at: String,
}

/// Field values for a contact insert.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub company_id: Option<i64>,
}

/// A deal as shown in the list view: joined with company and contact names.
#[derive(Debug, Clone)]
pub struct DealRow {
    pub id: i64,
    pub name: String,
    pub company: Option<String>,
    pub contact: Option<String>,
    pub amount: f64,
    pub stage: Stage,
    pub probability: i64,
    pub expected_close: Option<String>,
    pub created_at: String,
}

/// Field values for a deal insert.
#[derive(Debug, Clone)]
pub struct NewDeal {
    pub name: String,
    pub company_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub amount: f64,
    pub stage: Stage,
    pub probability: i64,
    pub expected_close: Option<String>,
}

/// An activity as shown in the list view: joined with association names.
#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub id: i64,
    pub kind: ActivityKind,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub done: bool,
    pub company: Option<String>,
    pub deal: Option<String>,
    pub contact: Option<String>,
    pub created_at: String,
}

/// Field values for an activity insert.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub deal_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub company_id: Option<i64>,
    pub kind: ActivityKind,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub done: bool,
}

/// An id + display label pair for association pickers.
#[derive(Debug, Clone)]
pub struct EntityOption {
    pub id: i64,
    pub label: String,
}

/// Summed deal value for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageTotal {
    pub stage: Stage,
    pub total: f64,
}

/// Headline dashboard numbers over all deals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealTotals {
    pub deal_count: i64,
    pub open_total: f64,
    pub won_total: f64,
}

/// An open activity with a due date, for the dashboard.
#[derive(Debug, Clone)]
pub struct UpcomingActivity {
    pub id: i64,
    pub kind: ActivityKind,
    pub title: String,
    pub due_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_round_trips_through_text() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
        }
    }

    #[test]
    fn test_stage_rejects_unknown_value() {
        let err = "Negotiation".parse::<Stage>().unwrap_err();
        assert_eq!(err.got, "Negotiation");
        assert!(err.to_string().contains("deal stage"));
    }

    #[test]
    fn test_activity_kind_rejects_unknown_value() {
        assert!("Email".parse::<ActivityKind>().is_err());
        assert_eq!("Call".parse::<ActivityKind>(), Ok(ActivityKind::Call));
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Won.is_terminal());
        assert!(Stage::Lost.is_terminal());
        assert!(!Stage::Qualified.is_terminal());
    }
}

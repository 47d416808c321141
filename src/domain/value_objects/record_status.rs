use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status shared by stored records
///
/// Records are soft-deleted by moving them to `Archive`; queries for live
/// data always filter archived records out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Archive,
}

impl RecordStatus {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archive" => Ok(Self::Archive),
            _ => Err(format!("Unknown record status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RecordStatus::Active, "active")]
    #[case(RecordStatus::Archive, "archive")]
    fn test_round_trip_through_str(#[case] status: RecordStatus, #[case] text: &str) {
        assert_eq!(status.as_str(), text);
        assert_eq!(text.parse::<RecordStatus>().unwrap(), status);
        assert_eq!(serde_json::to_value(status).unwrap(), text);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("deleted".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn test_is_active() {
        assert!(RecordStatus::Active.is_active());
        assert!(!RecordStatus::Archive.is_active());
    }
}

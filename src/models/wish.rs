use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WishError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishStatus {
    Pending,
    Approved,
    Rejected,
}

impl WishStatus {
    pub fn key(&self) -> &'static str {
        match self {
            WishStatus::Pending => "pending",
            WishStatus::Approved => "approved",
            WishStatus::Rejected => "rejected",
        }
    }

    /// pending -> approved -> rejected -> pending
    pub fn next(self) -> Self {
        match self {
            WishStatus::Pending => WishStatus::Approved,
            WishStatus::Approved => WishStatus::Rejected,
            WishStatus::Rejected => WishStatus::Pending,
        }
    }
}

impl fmt::Display for WishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for WishStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(WishStatus::Pending),
            "approved" => Ok(WishStatus::Approved),
            "rejected" => Ok(WishStatus::Rejected),
            other => Err(format!("unknown wish status `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishItem {
    pub id: String,
    pub sn: String,
    pub requester: String,
    pub wish: String,
    pub status: WishStatus,
    /// `YYYY-MM-DD`
    pub created_at: String,
}

/// A submission as typed into the form.
#[derive(Debug, Clone, Default)]
pub struct WishForm {
    pub requester: String,
    pub wish: String,
}

impl WishForm {
    pub fn new(requester: impl Into<String>, wish: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            wish: wish.into(),
        }
    }

    pub fn validate(&self) -> Result<(), WishError> {
        if self.requester.trim().is_empty() {
            return Err(WishError::BlankField("requester"));
        }
        if self.wish.trim().is_empty() {
            return Err(WishError::BlankField("wish"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cycle_wraps() {
        let mut status = WishStatus::Pending;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(status);
            status = status.next();
        }
        assert_eq!(
            seen,
            vec![WishStatus::Pending, WishStatus::Approved, WishStatus::Rejected, WishStatus::Pending]
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(matches!(
            WishForm::new("  ", "more courses").validate(),
            Err(WishError::BlankField("requester"))
        ));
        assert!(matches!(
            WishForm::new("Ann", "\n").validate(),
            Err(WishError::BlankField("wish"))
        ));
        assert!(WishForm::new("Ann", "more courses").validate().is_ok());
    }

    #[test]
    fn serializes_with_camel_case_date() {
        let item = WishItem {
            id: "1".into(),
            sn: "001".into(),
            requester: "John Doe".into(),
            wish: "More AI resources".into(),
            status: WishStatus::Approved,
            created_at: "2024-01-15".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["createdAt"], "2024-01-15");
        assert_eq!(json["status"], "approved");
    }
}

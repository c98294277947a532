//! Change request entity - A tracked proposal to modify infrastructure.
//!
//! Each change request has a ticket identifier, requester details, a risk score,
//! and a lifecycle status. Approval metadata (`impact`, `implementation`,
//! `implementation_schedule`, `technician`) and the `denial_reason` are filled in
//! by the approval workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a change request, stored as its display label.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ChangeStatus {
    /// Newly raised, not yet picked up
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    /// Under review by the change board
    #[sea_orm(string_value = "In Review")]
    #[serde(rename = "In Review")]
    InReview,
    /// Approved, no implementation window yet
    #[sea_orm(string_value = "Approved")]
    Approved,
    /// Approved with an implementation window
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
    /// Work in progress
    #[sea_orm(string_value = "Implementing")]
    Implementing,
    /// Finished; terminal
    #[sea_orm(string_value = "Completed")]
    Completed,
    /// Rejected; terminal
    #[sea_orm(string_value = "Denied")]
    Denied,
}

impl ChangeStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Submitted,
        Self::InReview,
        Self::Approved,
        Self::Scheduled,
        Self::Implementing,
        Self::Completed,
        Self::Denied,
    ];

    /// Human-readable label, identical to the stored value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::InReview => "In Review",
            Self::Approved => "Approved",
            Self::Scheduled => "Scheduled",
            Self::Implementing => "Implementing",
            Self::Completed => "Completed",
            Self::Denied => "Denied",
        }
    }

    /// Statuses reachable from `self` in a single step.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Submitted => &[Self::InReview],
            Self::InReview => &[Self::Approved, Self::Denied],
            Self::Approved => &[Self::Scheduled],
            Self::Scheduled => &[Self::Implementing],
            Self::Implementing => &[Self::Completed],
            Self::Completed | Self::Denied => &[],
        }
    }

    /// Whether `next` is one step away from `self`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Denied and Completed records are final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Denied)
    }

    /// Parses a display label, e.g. `"In Review"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Change request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "change_requests")]
pub struct Model {
    /// Ticket identifier (e.g. `"CHG-001"`), never changes after creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Kind of change (e.g. "Security Patch")
    pub change_type: String,
    /// Requesting department
    pub department: String,
    /// Affected assets as a comma-separated list
    pub affected_assets: String,
    /// Person in charge on the requesting side
    pub pic: String,
    /// Requested execution date
    pub schedule_date: Date,
    /// Current lifecycle status
    pub status: ChangeStatus,
    /// Risk score on a 0-10 scale
    pub risk_score: f64,
    /// Why the change is needed
    pub reason: String,
    /// What the change should achieve
    pub purpose: String,
    /// Impact and risk assessment, set on approval
    pub impact: Option<String>,
    /// Implementation plan, set on approval
    pub implementation: Option<String>,
    /// Agreed implementation window start, set on approval
    pub implementation_schedule: Option<DateTime>,
    /// Assigned technician, unset until approval
    pub technician: Option<String>,
    /// Reason given when the request was denied
    pub denial_reason: Option<String>,
    /// Last modification time
    pub updated_at: DateTime,
}

impl Model {
    /// The affected assets as individual names.
    #[must_use]
    pub fn affected_asset_list(&self) -> Vec<&str> {
        self.affected_assets
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Change requests have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

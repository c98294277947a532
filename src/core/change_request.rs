//! Change request business logic - creation, lookups and the approval lifecycle.
//!
//! Every mutation reads the current record, validates the requested transition
//! against [`ChangeStatus::allowed_transitions`], applies all changes to a copy and
//! writes it back with a single store update. A rejected request never leaves a
//! partially modified record behind.

use crate::{
    core::store::RecordStore,
    entities::{ChangeStatus, change_request},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

/// Accepted layouts for the approval schedule (`datetime-local` input values).
const SCHEDULE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Risk band derived from a change request's 0-10 risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score below 5
    Low,
    /// Score from 5 up to 7
    Medium,
    /// Score of 7 or more
    High,
}

impl RiskLevel {
    /// Classifies a risk score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            Self::High
        } else if score >= 5.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Input for registering a change request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewChangeRequest {
    /// Ticket identifier
    pub id: String,
    /// Kind of change
    pub change_type: String,
    /// Requesting department
    pub department: String,
    /// Names of the affected assets
    #[serde(default)]
    pub affected_assets: Vec<String>,
    /// Person in charge
    pub pic: String,
    /// Requested execution date
    pub schedule_date: NaiveDate,
    /// Initial status; new tickets start as Submitted
    #[serde(default = "default_status")]
    pub status: ChangeStatus,
    /// Risk score on a 0-10 scale
    pub risk_score: f64,
    /// Why the change is needed
    pub reason: String,
    /// What the change should achieve
    pub purpose: String,
    /// Impact assessment, when already known
    #[serde(default)]
    pub impact: Option<String>,
    /// Implementation plan, when already known
    #[serde(default)]
    pub implementation: Option<String>,
    /// Assigned technician, when already known
    #[serde(default)]
    pub technician: Option<String>,
}

const fn default_status() -> ChangeStatus {
    ChangeStatus::Submitted
}

/// The four fields an approver must fill in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDetails {
    /// Impact and risk assessment
    pub impact: String,
    /// Implementation plan
    pub implementation: String,
    /// Implementation window start, `YYYY-MM-DDTHH:MM`
    pub schedule: String,
    /// Technician who will carry out the change
    pub technician: String,
}

impl ApprovalDetails {
    /// Checks that every field is filled in and the schedule parses.
    ///
    /// Fields are checked in form order so the first empty one is reported.
    pub fn validate(&self) -> Result<NaiveDateTime> {
        require_text("impact", &self.impact)?;
        require_text("implementation", &self.implementation)?;
        require_text("schedule", &self.schedule)?;
        require_text("technician", &self.technician)?;
        parse_schedule(&self.schedule)
    }
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, format!("{field} is required")));
    }
    Ok(())
}

/// Parses a `datetime-local` style value such as `2025-01-01T10:00`.
pub fn parse_schedule(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    SCHEDULE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            Error::validation(
                "schedule",
                format!("'{value}' is not a date and time like 2025-01-01T10:00"),
            )
        })
}

/// Rejects any step that is not an edge of the change request lifecycle.
pub fn validate_transition(from: ChangeStatus, to: ChangeStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(Error::InvalidTransition { from, to })
    }
}

/// Steps from the record's status through `path`, validating each edge.
fn walk(record: &mut change_request::Model, path: &[ChangeStatus]) -> Result<()> {
    let mut current = record.status;
    for &next in path {
        validate_transition(current, next)?;
        debug!(id = %record.id, from = %current, to = %next, "Transition step");
        current = next;
    }
    record.status = current;
    Ok(())
}

/// The path from an undecided status to `decision`, passing through review.
fn decision_path(from: ChangeStatus, decision: ChangeStatus) -> Result<&'static [ChangeStatus]> {
    match (from, decision) {
        (ChangeStatus::Submitted, ChangeStatus::Approved) => Ok(&[
            ChangeStatus::InReview,
            ChangeStatus::Approved,
            ChangeStatus::Scheduled,
        ]),
        (ChangeStatus::InReview, ChangeStatus::Approved) => {
            Ok(&[ChangeStatus::Approved, ChangeStatus::Scheduled])
        }
        (ChangeStatus::Submitted, ChangeStatus::Denied) => {
            Ok(&[ChangeStatus::InReview, ChangeStatus::Denied])
        }
        (ChangeStatus::InReview, ChangeStatus::Denied) => Ok(&[ChangeStatus::Denied]),
        _ => Err(Error::InvalidTransition { from, to: decision }),
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Registers a new change request after validating its identity and risk score.
///
/// # Errors
/// Returns an error if:
/// - The id, type or department is empty or whitespace-only
/// - The risk score is outside 0-10 or not finite
/// - A change request with the same id already exists
pub async fn create_change_request<S>(
    store: &S,
    request: NewChangeRequest,
) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    require_text("id", &request.id)?;
    require_text("change_type", &request.change_type)?;
    require_text("department", &request.department)?;

    if !request.risk_score.is_finite() || !(0.0..=10.0).contains(&request.risk_score) {
        return Err(Error::validation(
            "risk_score",
            format!("risk score {} is outside 0-10", request.risk_score),
        ));
    }

    let affected_assets = request
        .affected_assets
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let record = change_request::Model {
        id: request.id.trim().to_string(),
        change_type: request.change_type.trim().to_string(),
        department: request.department.trim().to_string(),
        affected_assets,
        pic: request.pic,
        schedule_date: request.schedule_date,
        status: request.status,
        risk_score: request.risk_score,
        reason: request.reason,
        purpose: request.purpose,
        impact: request.impact,
        implementation: request.implementation,
        implementation_schedule: None,
        technician: request.technician.filter(|t| !t.trim().is_empty()),
        denial_reason: None,
        updated_at: now(),
    };

    let created = store.create(record).await?;
    info!(id = %created.id, status = %created.status, "Registered change request");
    Ok(created)
}

/// All change requests in store order.
pub async fn list_change_requests<S>(store: &S) -> Result<Vec<change_request::Model>>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    store.list().await
}

/// Looks up a change request for a detail view, `NotFound` if absent.
pub async fn get_change_request<S>(store: &S, id: &str) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    store.require(id).await
}

/// Opens the read-only request summary shown before a decision. Never mutates.
pub async fn request_form<S>(store: &S, id: &str) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    store.require(id).await
}

/// Moves a Submitted request into review.
#[instrument(skip(store))]
pub async fn begin_review<S>(store: &S, id: &str) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    advance(store, id, ChangeStatus::InReview).await
}

/// Gives an Approved request its implementation window and technician.
///
/// # Errors
/// - [`Error::NotFound`] if no such request exists
/// - [`Error::InvalidTransition`] unless the request is Approved
/// - [`Error::Validation`] if the technician is blank or the window does not parse
#[instrument(skip(store))]
pub async fn schedule<S>(
    store: &S,
    id: &str,
    window: &str,
    technician: &str,
) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    let mut record = store.require(id).await?;
    validate_transition(record.status, ChangeStatus::Scheduled)?;
    require_text("schedule", window)?;
    require_text("technician", technician)?;
    let window = parse_schedule(window)?;

    walk(&mut record, &[ChangeStatus::Scheduled])?;
    record.implementation_schedule = Some(window);
    record.technician = Some(technician.trim().to_string());
    record.updated_at = now();

    let updated = store.update(record).await?;
    info!(id, %window, "Change request scheduled");
    Ok(updated)
}

/// Marks a Scheduled request as being implemented.
#[instrument(skip(store))]
pub async fn start_implementation<S>(store: &S, id: &str) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    advance(store, id, ChangeStatus::Implementing).await
}

/// Marks an Implementing request as completed.
#[instrument(skip(store))]
pub async fn complete<S>(store: &S, id: &str) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    advance(store, id, ChangeStatus::Completed).await
}

async fn advance<S>(store: &S, id: &str, to: ChangeStatus) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    let mut record = store.require(id).await?;
    let from = record.status;
    walk(&mut record, &[to])?;
    record.updated_at = now();

    let updated = store.update(record).await?;
    info!(id, %from, %to, "Change request advanced");
    Ok(updated)
}

/// Denies a Submitted or In Review change request, recording the reason.
///
/// # Errors
/// - [`Error::NotFound`] if no such request exists
/// - [`Error::InvalidTransition`] if the request is already decided
/// - [`Error::Validation`] if `reason` is blank
#[instrument(skip(store, reason))]
pub async fn deny<S>(store: &S, id: &str, reason: &str) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    let mut record = store.require(id).await?;
    let from = record.status;
    let path = decision_path(from, ChangeStatus::Denied)?;
    require_text("reason", reason)?;

    walk(&mut record, path)?;
    record.denial_reason = Some(reason.trim().to_string());
    record.updated_at = now();

    let updated = store.update(record).await?;
    info!(id, %from, "Change request denied");
    Ok(updated)
}

/// Approves a Submitted or In Review change request and schedules it.
///
/// The record ends up Scheduled with the approval details attached and the
/// technician assigned.
///
/// # Errors
/// - [`Error::NotFound`] if no such request exists
/// - [`Error::InvalidTransition`] if the request is already decided
/// - [`Error::Validation`] if a field is blank or the schedule does not parse
#[instrument(skip(store, details))]
pub async fn approve<S>(
    store: &S,
    id: &str,
    details: &ApprovalDetails,
) -> Result<change_request::Model>
where
    S: RecordStore<change_request::Model> + ?Sized,
{
    let mut record = store.require(id).await?;
    let from = record.status;
    let path = decision_path(from, ChangeStatus::Approved)?;
    let schedule = details.validate()?;

    walk(&mut record, path)?;
    record.impact = Some(details.impact.trim().to_string());
    record.implementation = Some(details.implementation.trim().to_string());
    record.implementation_schedule = Some(schedule);
    record.technician = Some(details.technician.trim().to_string());
    record.updated_at = now();

    let updated = store.update(record).await?;
    info!(id, %from, to = %updated.status, "Change request approved");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::test_utils::{approval_details, sample_change, sample_new_change, setup_test_store};

    fn store_with(status: ChangeStatus) -> MemoryStore<change_request::Model> {
        let mut record = sample_change("CHG-001");
        record.status = status;
        MemoryStore::with_records(vec![record])
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(7.5), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(7.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(6.5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(5.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(4.2), RiskLevel::Low);
    }

    #[test]
    fn test_validate_transition_follows_lifecycle() {
        assert!(validate_transition(ChangeStatus::Submitted, ChangeStatus::InReview).is_ok());
        assert!(validate_transition(ChangeStatus::InReview, ChangeStatus::Denied).is_ok());
        assert!(validate_transition(ChangeStatus::Approved, ChangeStatus::Scheduled).is_ok());
        assert!(validate_transition(ChangeStatus::Implementing, ChangeStatus::Completed).is_ok());

        assert!(matches!(
            validate_transition(ChangeStatus::Submitted, ChangeStatus::Completed),
            Err(Error::InvalidTransition { .. })
        ));
        for status in ChangeStatus::ALL {
            assert!(validate_transition(ChangeStatus::Denied, status).is_err());
            assert!(validate_transition(ChangeStatus::Completed, status).is_err());
        }
    }

    #[test]
    fn test_parse_schedule_accepts_datetime_local() {
        let parsed = parse_schedule("2025-01-01T10:00").unwrap();
        assert_eq!(parsed.to_string(), "2025-01-01 10:00:00");
        assert!(parse_schedule("2025-01-01T10:00:30").is_ok());
        assert!(matches!(
            parse_schedule("next tuesday"),
            Err(Error::Validation { field: "schedule", .. })
        ));
    }

    #[test]
    fn test_approval_details_reports_first_missing_field() {
        let mut details = approval_details();
        details.implementation = "   ".to_string();
        details.technician = String::new();
        assert!(matches!(
            details.validate(),
            Err(Error::Validation { field: "implementation", .. })
        ));
    }

    #[tokio::test]
    async fn test_deny_requires_reason() -> Result<()> {
        let store = store_with(ChangeStatus::InReview);

        let result = deny(&store, "CHG-001", "").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "reason", .. }
        ));

        let result = deny(&store, "CHG-001", "  \n ").await;
        assert!(result.is_err());

        // Rejected attempts leave the record untouched
        let record = store.require("CHG-001").await?;
        assert_eq!(record.status, ChangeStatus::InReview);
        assert!(record.denial_reason.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_deny_records_reason() -> Result<()> {
        let store = store_with(ChangeStatus::InReview);

        let denied = deny(&store, "CHG-001", "reason text").await?;
        assert_eq!(denied.status, ChangeStatus::Denied);
        assert_eq!(denied.denial_reason.as_deref(), Some("reason text"));

        let stored = store.require("CHG-001").await?;
        assert_eq!(stored, denied);
        Ok(())
    }

    #[tokio::test]
    async fn test_deny_from_submitted_passes_through_review() -> Result<()> {
        let store = store_with(ChangeStatus::Submitted);
        let denied = deny(&store, "CHG-001", "Duplicate of CHG-002").await?;
        assert_eq!(denied.status, ChangeStatus::Denied);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_schedules_and_persists_details() -> Result<()> {
        let store = store_with(ChangeStatus::InReview);
        let details = ApprovalDetails {
            impact: "x".to_string(),
            implementation: "y".to_string(),
            schedule: "2025-01-01T10:00".to_string(),
            technician: "A".to_string(),
        };

        let approved = approve(&store, "CHG-001", &details).await?;
        assert_eq!(approved.status, ChangeStatus::Scheduled);

        let stored = store.require("CHG-001").await?;
        assert_eq!(stored.impact.as_deref(), Some("x"));
        assert_eq!(stored.implementation.as_deref(), Some("y"));
        assert_eq!(
            stored.implementation_schedule,
            Some(parse_schedule("2025-01-01T10:00").unwrap())
        );
        assert_eq!(stored.technician.as_deref(), Some("A"));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_rejects_incomplete_form() -> Result<()> {
        let store = store_with(ChangeStatus::Submitted);
        let mut details = approval_details();
        details.technician = String::new();

        let result = approve(&store, "CHG-001", &details).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "technician", .. }
        ));
        assert_eq!(
            store.require("CHG-001").await?.status,
            ChangeStatus::Submitted
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_records_reject_decisions() -> Result<()> {
        for status in [ChangeStatus::Denied, ChangeStatus::Completed] {
            let store = store_with(status);

            let denied = deny(&store, "CHG-001", "again").await;
            assert!(matches!(
                denied.unwrap_err(),
                Error::InvalidTransition { from, to: ChangeStatus::Denied } if from == status
            ));

            let approved = approve(&store, "CHG-001", &approval_details()).await;
            assert!(matches!(
                approved.unwrap_err(),
                Error::InvalidTransition { .. }
            ));

            assert_eq!(store.require("CHG-001").await?.status, status);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_decided_records_cannot_be_decided_again() -> Result<()> {
        let store = store_with(ChangeStatus::InReview);
        approve(&store, "CHG-001", &approval_details()).await?;

        let result = deny(&store, "CHG-001", "Changed my mind").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition {
                from: ChangeStatus::Scheduled,
                to: ChangeStatus::Denied
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_full_lifecycle() -> Result<()> {
        let store = store_with(ChangeStatus::Submitted);

        assert_eq!(
            begin_review(&store, "CHG-001").await?.status,
            ChangeStatus::InReview
        );
        assert_eq!(
            approve(&store, "CHG-001", &approval_details()).await?.status,
            ChangeStatus::Scheduled
        );
        assert_eq!(
            start_implementation(&store, "CHG-001").await?.status,
            ChangeStatus::Implementing
        );
        assert_eq!(
            complete(&store, "CHG-001").await?.status,
            ChangeStatus::Completed
        );

        let result = begin_review(&store, "CHG-001").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidTransition { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_approved_record_is_scheduled_then_completed() -> Result<()> {
        let store = store_with(ChangeStatus::Approved);

        let scheduled = schedule(&store, "CHG-001", "2025-01-22T09:00", " Bob Wilson ").await?;
        assert_eq!(scheduled.status, ChangeStatus::Scheduled);
        assert_eq!(scheduled.technician.as_deref(), Some("Bob Wilson"));
        assert_eq!(
            scheduled.implementation_schedule,
            Some(parse_schedule("2025-01-22T09:00").unwrap())
        );

        assert_eq!(
            start_implementation(&store, "CHG-001").await?.status,
            ChangeStatus::Implementing
        );
        assert_eq!(
            complete(&store, "CHG-001").await?.status,
            ChangeStatus::Completed
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_rejects_bad_input_and_wrong_status() -> Result<()> {
        let store = store_with(ChangeStatus::Approved);

        assert!(matches!(
            schedule(&store, "CHG-001", "2025-01-22T09:00", "  ").await.unwrap_err(),
            Error::Validation { field: "technician", .. }
        ));
        assert!(matches!(
            schedule(&store, "CHG-001", "soon", "Bob").await.unwrap_err(),
            Error::Validation { field: "schedule", .. }
        ));
        assert_eq!(
            store.require("CHG-001").await?.status,
            ChangeStatus::Approved
        );

        let in_review = store_with(ChangeStatus::InReview);
        assert!(matches!(
            schedule(&in_review, "CHG-001", "2025-01-22T09:00", "Bob").await.unwrap_err(),
            Error::InvalidTransition {
                from: ChangeStatus::InReview,
                to: ChangeStatus::Scheduled
            }
        ));
        assert!(matches!(
            schedule(&in_review, "CHG-404", "2025-01-22T09:00", "Bob").await.unwrap_err(),
            Error::NotFound { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = store_with(ChangeStatus::InReview);

        assert!(matches!(
            request_form(&store, "CHG-404").await.unwrap_err(),
            Error::NotFound { kind: "change request", .. }
        ));
        assert!(matches!(
            deny(&store, "CHG-404", "reason").await.unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_change_request_validation() -> Result<()> {
        let store: MemoryStore<change_request::Model> = MemoryStore::new();

        let mut blank_id = sample_new_change("CHG-001");
        blank_id.id = "  ".to_string();
        assert!(matches!(
            create_change_request(&store, blank_id).await.unwrap_err(),
            Error::Validation { field: "id", .. }
        ));

        for score in [-0.1, 10.5, f64::NAN] {
            let mut risky = sample_new_change("CHG-001");
            risky.risk_score = score;
            assert!(matches!(
                create_change_request(&store, risky).await.unwrap_err(),
                Error::Validation { field: "risk_score", .. }
            ));
        }

        assert!(list_change_requests(&store).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_change_request_integration() -> Result<()> {
        let store = setup_test_store().await?;

        let mut request = sample_new_change("CHG-010");
        request.affected_assets = vec![
            " Server-DB-01".to_string(),
            String::new(),
            "Server-DB-02 ".to_string(),
        ];
        request.technician = Some(String::new());
        let created = create_change_request(&store, request).await?;

        assert_eq!(created.status, ChangeStatus::Submitted);
        assert_eq!(created.affected_assets, "Server-DB-01, Server-DB-02");
        assert_eq!(
            created.affected_asset_list(),
            ["Server-DB-01", "Server-DB-02"]
        );
        assert!(created.technician.is_none());

        let fetched = get_change_request(&store, "CHG-010").await?;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.affected_assets, created.affected_assets);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_persists_through_database() -> Result<()> {
        let store = setup_test_store().await?;
        create_change_request(&store, sample_new_change("CHG-001")).await?;

        approve(&store, "CHG-001", &approval_details()).await?;

        let stored = get_change_request(&store, "CHG-001").await?;
        assert_eq!(stored.status, ChangeStatus::Scheduled);
        assert_eq!(stored.technician.as_deref(), Some("Jane Smith"));
        assert!(stored.implementation_schedule.is_some());
        Ok(())
    }
}

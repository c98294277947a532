//! State of the Change Management screen.
//!
//! The screen owns its filter, search text, current page, the request form and
//! the deny/approve modals with their drafts. Records are never cached here:
//! the open form keeps only the ticket id, every read takes the current list or
//! record from the store and every decision goes through the store.

use crate::{
    config::settings::ViewSettings,
    core::{
        change_request::{self, ApprovalDetails},
        store::RecordStore,
    },
    entities::{ChangeRequestModel, ChangeStatus},
    errors::{Error, Result},
    view::{
        filter::{SearchMode, SearchQuery, StatusFilter, filter_records},
        paginator::{Page, Paginator},
    },
};
use tracing::debug;

/// Message shown next to a form field after a rejected submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field, `None` when the error is not tied to one
    pub field: Option<&'static str>,
    /// Display message
    pub message: String,
}

impl From<&Error> for FieldError {
    fn from(error: &Error) -> Self {
        match error {
            Error::Validation { field, message } => Self {
                field: Some(*field),
                message: message.clone(),
            },
            other => Self {
                field: None,
                message: other.to_string(),
            },
        }
    }
}

/// Counts shown on the summary cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Every change request
    pub incoming: usize,
    /// Requests waiting for a decision
    pub in_review: usize,
    /// Approved, with or without an implementation window
    pub approved: usize,
    /// Finished changes
    pub completed: usize,
}

/// Approved requests that have not started implementation.
const fn is_approved(status: ChangeStatus) -> bool {
    matches!(status, ChangeStatus::Approved | ChangeStatus::Scheduled)
}

/// Computes the summary cards from the current list.
#[must_use]
pub fn summarize(records: &[ChangeRequestModel]) -> ChangeSummary {
    records
        .iter()
        .fold(ChangeSummary::default(), |mut summary, record| {
            summary.incoming += 1;
            match record.status {
                ChangeStatus::InReview => summary.in_review += 1,
                ChangeStatus::Completed => summary.completed += 1,
                status if is_approved(status) => summary.approved += 1,
                _ => {}
            }
            summary
        })
}

/// The first `limit` approved or scheduled requests, listed under recent activity.
#[must_use]
pub fn recent_activities(records: &[ChangeRequestModel], limit: usize) -> Vec<&ChangeRequestModel> {
    records
        .iter()
        .filter(|record| is_approved(record.status))
        .take(limit)
        .collect()
}

/// Screen state for the change request table and its decision modals.
#[derive(Clone, Debug)]
pub struct ChangeManagementView {
    filter: StatusFilter<ChangeStatus>,
    search_text: String,
    search_mode: SearchMode,
    paginator: Paginator,
    selected_id: Option<String>,
    show_form: bool,
    show_deny: bool,
    show_approve: bool,
    denial_reason: String,
    approval_form: ApprovalDetails,
    field_error: Option<FieldError>,
}

impl ChangeManagementView {
    /// Fresh screen: no filter, empty search, page 1, nothing open.
    #[must_use]
    pub fn new(settings: &ViewSettings) -> Self {
        Self {
            filter: StatusFilter::All,
            search_text: String::new(),
            search_mode: settings.search_mode,
            paginator: Paginator::new(settings.change_page_size),
            selected_id: None,
            show_form: false,
            show_deny: false,
            show_approve: false,
            denial_reason: String::new(),
            approval_form: ApprovalDetails::default(),
            field_error: None,
        }
    }

    /// Current status filter.
    #[must_use]
    pub const fn filter(&self) -> &StatusFilter<ChangeStatus> {
        &self.filter
    }

    /// Changes the status filter and goes back to page 1.
    pub fn set_filter(&mut self, filter: StatusFilter<ChangeStatus>) {
        self.filter = filter;
        self.paginator.reset();
    }

    /// Current search box text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Changes the search text and goes back to page 1.
    pub fn set_search(&mut self, text: &str) {
        text.clone_into(&mut self.search_text);
        self.paginator.reset();
    }

    fn matching<'a>(&self, records: &'a [ChangeRequestModel]) -> Vec<&'a ChangeRequestModel> {
        let query = SearchQuery::new(&self.search_text, self.search_mode);
        filter_records(records, &self.filter, |record| record.status, &query)
    }

    /// The page of filtered records currently on screen.
    #[must_use]
    pub fn visible<'a>(&self, records: &'a [ChangeRequestModel]) -> Page<&'a ChangeRequestModel> {
        self.paginator.paginate(self.matching(records))
    }

    /// Next page; no-op on the last one.
    pub fn next_page(&mut self, records: &[ChangeRequestModel]) -> bool {
        let total = self.matching(records).len();
        self.paginator.next(total)
    }

    /// Previous page; no-op on the first one.
    pub fn previous_page(&mut self, records: &[ChangeRequestModel]) -> bool {
        let total = self.matching(records).len();
        self.paginator.previous(total)
    }

    /// Id of the request shown in the request form.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Re-reads the request shown in the form, `None` when no form is open.
    pub async fn selected<S>(&self, store: &S) -> Result<Option<ChangeRequestModel>>
    where
        S: RecordStore<ChangeRequestModel> + ?Sized,
    {
        match &self.selected_id {
            Some(id) => change_request::request_form(store, id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Whether the request form is open.
    #[must_use]
    pub const fn is_form_open(&self) -> bool {
        self.show_form
    }

    /// Whether the deny modal is open.
    #[must_use]
    pub const fn is_deny_open(&self) -> bool {
        self.show_deny
    }

    /// Whether the approve modal is open.
    #[must_use]
    pub const fn is_approve_open(&self) -> bool {
        self.show_approve
    }

    /// Error from the last rejected submit.
    #[must_use]
    pub const fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    /// Draft reason in the deny modal.
    #[must_use]
    pub fn denial_reason(&self) -> &str {
        &self.denial_reason
    }

    /// Replaces the deny draft.
    pub fn set_denial_reason(&mut self, reason: &str) {
        reason.clone_into(&mut self.denial_reason);
    }

    /// Draft in the approve modal.
    #[must_use]
    pub const fn approval_form(&self) -> &ApprovalDetails {
        &self.approval_form
    }

    /// Mutable access to the approve draft for field edits.
    pub const fn approval_form_mut(&mut self) -> &mut ApprovalDetails {
        &mut self.approval_form
    }

    /// Opens the request form for `id`.
    ///
    /// An unknown id returns `NotFound` and leaves the screen unchanged.
    pub async fn open_form<S>(&mut self, store: &S, id: &str) -> Result<()>
    where
        S: RecordStore<ChangeRequestModel> + ?Sized,
    {
        let record = change_request::request_form(store, id).await?;
        debug!(id, status = %record.status, "Opened request form");
        self.selected_id = Some(record.id);
        self.show_form = true;
        self.field_error = None;
        Ok(())
    }

    /// Closes the request form and any modal on top of it, discarding drafts.
    pub fn close_form(&mut self) {
        self.close_all();
    }

    /// Opens the deny modal over the request form. Returns whether it opened.
    pub fn open_deny(&mut self) -> bool {
        if !self.show_form {
            return false;
        }
        self.show_deny = true;
        self.show_approve = false;
        self.field_error = None;
        true
    }

    /// Opens the approve modal over the request form. Returns whether it opened.
    pub fn open_approve(&mut self) -> bool {
        if !self.show_form {
            return false;
        }
        self.show_approve = true;
        self.show_deny = false;
        self.field_error = None;
        true
    }

    /// Closes the deny modal and discards its draft. The form stays open.
    pub fn cancel_deny(&mut self) {
        self.show_deny = false;
        self.denial_reason.clear();
        self.field_error = None;
    }

    /// Closes the approve modal and discards its draft. The form stays open.
    pub fn cancel_approve(&mut self) {
        self.show_approve = false;
        self.approval_form = ApprovalDetails::default();
        self.field_error = None;
    }

    /// The id to submit a decision for; the matching modal must be open.
    fn decision_target(&self, modal_open: bool, modal: &str) -> Result<String> {
        if !modal_open {
            return Err(Error::validation(
                "modal",
                format!("the {modal} form is not open"),
            ));
        }
        self.selected_id
            .clone()
            .ok_or_else(|| Error::validation("id", "no change request is selected"))
    }

    fn close_all(&mut self) {
        self.selected_id = None;
        self.show_form = false;
        self.show_deny = false;
        self.show_approve = false;
        self.denial_reason.clear();
        self.approval_form = ApprovalDetails::default();
        self.field_error = None;
    }

    fn reject(&mut self, error: Error) -> Error {
        self.field_error = Some(FieldError::from(&error));
        error
    }

    /// Denies the selected request with the drafted reason.
    ///
    /// Only accepted while the deny modal is open. On success every modal
    /// closes and drafts are cleared. On failure the modal stays open, the
    /// draft is kept and the error is recorded.
    pub async fn submit_deny<S>(&mut self, store: &S) -> Result<ChangeRequestModel>
    where
        S: RecordStore<ChangeRequestModel> + ?Sized,
    {
        let id = self
            .decision_target(self.show_deny, "deny")
            .map_err(|e| self.reject(e))?;
        let result = change_request::deny(store, &id, &self.denial_reason).await;
        match result {
            Ok(updated) => {
                self.close_all();
                Ok(updated)
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Approves the selected request with the drafted details.
    ///
    /// Same modal semantics as [`Self::submit_deny`].
    pub async fn submit_approve<S>(&mut self, store: &S) -> Result<ChangeRequestModel>
    where
        S: RecordStore<ChangeRequestModel> + ?Sized,
    {
        let id = self
            .decision_target(self.show_approve, "approve")
            .map_err(|e| self.reject(e))?;
        let result = change_request::approve(store, &id, &self.approval_form).await;
        match result {
            Ok(updated) => {
                self.close_all();
                Ok(updated)
            }
            Err(e) => Err(self.reject(e)),
        }
    }
}

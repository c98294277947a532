//! Change calendar: change requests grouped by the day they take place.

use crate::entities::{ChangeRequestModel, ChangeStatus};
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

/// One change request on the calendar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEntry {
    /// Ticket identifier, used to navigate to the detail view
    pub id: String,
    /// Kind of change
    pub change_type: String,
    /// Current status
    pub status: ChangeStatus,
    /// Start time when an implementation window has been agreed
    pub time: Option<NaiveTime>,
}

impl CalendarEntry {
    /// Time shown on the calendar card: the window's start, or "All day".
    ///
    /// Only a start is stored, so there is no end time to show.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.time.map_or_else(
            || "All day".to_string(),
            |time| time.format("%H:%M").to_string(),
        )
    }
}

/// All entries falling on one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    /// The day
    pub date: NaiveDate,
    /// Entries in list order
    pub entries: Vec<CalendarEntry>,
}

/// Groups change requests by day, earliest first. Denied requests are left out.
///
/// A request sits on its implementation window once approved, otherwise on its
/// requested schedule date.
#[must_use]
pub fn build_calendar(records: &[ChangeRequestModel]) -> Vec<CalendarDay> {
    let mut days: BTreeMap<NaiveDate, Vec<CalendarEntry>> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|record| record.status != ChangeStatus::Denied)
    {
        let (date, time) = match record.implementation_schedule {
            Some(window) => (window.date(), Some(window.time())),
            None => (record.schedule_date, None),
        };
        days.entry(date).or_default().push(CalendarEntry {
            id: record.id.clone(),
            change_type: record.change_type.clone(),
            status: record.status,
            time,
        });
    }

    days.into_iter()
        .map(|(date, entries)| CalendarDay { date, entries })
        .collect()
}

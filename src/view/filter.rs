//! Filter stage shared by the list screens.
//!
//! A list is narrowed by a [`StatusFilter`] predicate and a [`SearchQuery`]. The
//! result borrows from the input and keeps its relative order. An empty result is
//! a normal outcome and renders as an empty page.

use crate::entities::{AssetModel, ChangeRequestModel};
use crate::errors::{Error, Result};
use std::str::FromStr;

/// Status or category predicate: everything, or one exact value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter<S> {
    /// Matches every record
    #[default]
    All,
    /// Matches records whose field equals the value
    Only(S),
}

impl<S: PartialEq> StatusFilter<S> {
    /// Whether a record with field value `value` passes.
    pub fn matches(&self, value: &S) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

/// Which record fields the search box looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Identifier, title-like fields and descriptions
    #[default]
    IdentifierAndDescription,
    /// Every human-readable field
    AllFields,
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "id_description" => Ok(Self::IdentifierAndDescription),
            "all_fields" => Ok(Self::AllFields),
            other => Err(Error::Config {
                message: format!(
                    "unknown search mode '{other}', expected 'id_description' or 'all_fields'"
                ),
            }),
        }
    }
}

/// A record the search box can match against.
pub trait Searchable {
    /// Identifier and description fields.
    fn identifier_fields(&self) -> Vec<&str>;

    /// Every other human-readable field.
    fn other_fields(&self) -> Vec<&str>;
}

impl Searchable for ChangeRequestModel {
    fn identifier_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.change_type.as_str(),
            self.reason.as_str(),
            self.purpose.as_str(),
        ]
    }

    fn other_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.department.as_str(),
            self.affected_assets.as_str(),
            self.pic.as_str(),
            self.status.label(),
        ];
        fields.extend(
            [
                &self.impact,
                &self.implementation,
                &self.technician,
                &self.denial_reason,
            ]
            .into_iter()
            .filter_map(|field| field.as_deref()),
        );
        fields
    }
}

impl Searchable for AssetModel {
    fn identifier_fields(&self) -> Vec<&str> {
        vec![
            self.asset_id.as_str(),
            self.hostname.as_str(),
            self.description.as_str(),
        ]
    }

    fn other_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.asset_type.as_str(),
            self.ip_address.as_str(),
            self.os_name.as_str(),
            self.os_version.as_str(),
            self.vendor.as_str(),
            self.location.as_str(),
            self.owner_department.as_str(),
            self.responsible_person.as_str(),
            self.status.as_str(),
            self.category.label(),
        ];
        if let Some(parent) = &self.parent_id {
            fields.push(parent);
        }
        fields
    }
}

/// Case-insensitive substring search over a record's fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
    mode: SearchMode,
}

impl SearchQuery {
    /// Builds a query from raw search box text; surrounding whitespace is ignored.
    #[must_use]
    pub fn new(text: &str, mode: SearchMode) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
            mode,
        }
    }

    /// A blank query matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether `record` contains the query text in one of the searched fields.
    pub fn matches<R: Searchable>(&self, record: &R) -> bool {
        if self.is_empty() {
            return true;
        }
        let contains = |field: &str| field.to_lowercase().contains(&self.needle);

        record.identifier_fields().into_iter().any(contains)
            || (self.mode == SearchMode::AllFields
                && record.other_fields().into_iter().any(contains))
    }
}

/// Narrows `records` by predicate and search, keeping their original order.
///
/// `field` extracts the value the predicate is compared against.
pub fn filter_records<'a, R, S, F>(
    records: &'a [R],
    predicate: &StatusFilter<S>,
    field: F,
    search: &SearchQuery,
) -> Vec<&'a R>
where
    R: Searchable,
    S: PartialEq,
    F: Fn(&R) -> S,
{
    records
        .iter()
        .filter(|record| predicate.matches(&field(record)) && search.matches(*record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AssetCategory, ChangeStatus};
    use crate::test_utils::{sample_asset, sample_change};

    fn changes() -> Vec<ChangeRequestModel> {
        let statuses = [
            ("CHG-001", ChangeStatus::InReview),
            ("CHG-002", ChangeStatus::Approved),
            ("CHG-003", ChangeStatus::Completed),
            ("CHG-004", ChangeStatus::Submitted),
            ("CHG-005", ChangeStatus::Approved),
        ];
        statuses
            .into_iter()
            .map(|(id, status)| {
                let mut change = sample_change(id);
                change.status = status;
                change
            })
            .collect()
    }

    fn ids<'a>(records: &[&'a ChangeRequestModel]) -> Vec<&'a str> {
        records.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_all_returns_every_record_in_order() {
        let records = changes();
        let filtered = filter_records(
            &records,
            &StatusFilter::All,
            |c| c.status,
            &SearchQuery::default(),
        );
        assert_eq!(
            ids(&filtered),
            ["CHG-001", "CHG-002", "CHG-003", "CHG-004", "CHG-005"]
        );
    }

    #[test]
    fn test_only_matches_exact_status() {
        let records = changes();
        for status in ChangeStatus::ALL {
            let filtered = filter_records(
                &records,
                &StatusFilter::Only(status),
                |c| c.status,
                &SearchQuery::default(),
            );
            assert!(filtered.iter().all(|c| c.status == status));
            let expected = records.iter().filter(|c| c.status == status).count();
            assert_eq!(filtered.len(), expected);
        }

        let approved = filter_records(
            &records,
            &StatusFilter::Only(ChangeStatus::Approved),
            |c| c.status,
            &SearchQuery::default(),
        );
        assert_eq!(ids(&approved), ["CHG-002", "CHG-005"]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let records = changes();
        let filtered = filter_records(
            &records,
            &StatusFilter::Only(ChangeStatus::Denied),
            |c| c.status,
            &SearchQuery::default(),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_on_identifier() {
        let records = changes();
        let query = SearchQuery::new("  chg-003 ", SearchMode::IdentifierAndDescription);
        let filtered = filter_records(&records, &StatusFilter::All, |c| c.status, &query);
        assert_eq!(ids(&filtered), ["CHG-003"]);
    }

    #[test]
    fn test_search_mode_controls_searched_fields() {
        let mut records = changes();
        records[1].department = "Network Team".to_string();

        let narrow = SearchQuery::new("network team", SearchMode::IdentifierAndDescription);
        assert!(filter_records(&records, &StatusFilter::All, |c| c.status, &narrow).is_empty());

        let wide = SearchQuery::new("network team", SearchMode::AllFields);
        let filtered = filter_records(&records, &StatusFilter::All, |c| c.status, &wide);
        assert_eq!(ids(&filtered), ["CHG-002"]);
    }

    #[test]
    fn test_search_and_predicate_combine() {
        let mut records = changes();
        records[0].reason = "Patch the database cluster".to_string();
        records[1].reason = "Patch the core switch".to_string();

        let query = SearchQuery::new("PATCH", SearchMode::IdentifierAndDescription);
        let filtered = filter_records(
            &records,
            &StatusFilter::Only(ChangeStatus::Approved),
            |c| c.status,
            &query,
        );
        assert_eq!(ids(&filtered), ["CHG-002"]);
    }

    #[test]
    fn test_asset_search_covers_hostname_and_description() {
        let mut assets = vec![
            sample_asset("AST001", AssetCategory::Infrastructure),
            sample_asset("AST002", AssetCategory::Infrastructure),
        ];
        assets[1].hostname = "sw-core-01".to_string();
        assets[1].vendor = "Cisco".to_string();

        let by_host = SearchQuery::new("SW-CORE", SearchMode::IdentifierAndDescription);
        let filtered = filter_records(&assets, &StatusFilter::All, |a| a.category, &by_host);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].asset_id, "AST002");

        let by_vendor = SearchQuery::new("cisco", SearchMode::IdentifierAndDescription);
        assert!(filter_records(&assets, &StatusFilter::All, |a| a.category, &by_vendor).is_empty());
        let by_vendor = SearchQuery::new("cisco", SearchMode::AllFields);
        assert_eq!(
            filter_records(&assets, &StatusFilter::All, |a| a.category, &by_vendor).len(),
            1
        );
    }

    #[test]
    fn test_search_mode_from_str() {
        assert_eq!(
            "id_description".parse::<SearchMode>().ok(),
            Some(SearchMode::IdentifierAndDescription)
        );
        assert_eq!(
            " ALL_FIELDS ".parse::<SearchMode>().ok(),
            Some(SearchMode::AllFields)
        );
        assert!("everything".parse::<SearchMode>().is_err());
    }
}

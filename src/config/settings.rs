//! View settings loaded from environment variables.
//!
//! Every setting is optional. Unset variables fall back to the defaults the
//! dashboard ships with; set but malformed values are configuration errors.

use crate::errors::{Error, Result};
use crate::view::{filter::SearchMode, paginator::PageSize};
use std::num::NonZeroUsize;

/// Change requests shown per page unless `CHANGE_PAGE_SIZE` says otherwise.
pub const DEFAULT_CHANGE_PAGE_SIZE: usize = 5;
/// Approved requests listed under recent activity by default.
pub const DEFAULT_RECENT_ACTIVITY_LIMIT: usize = 5;

/// Settings shared by the list screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewSettings {
    /// Page size of the change request table (`CHANGE_PAGE_SIZE`)
    pub change_page_size: PageSize,
    /// Page size of the CMDB asset table (`ASSET_PAGE_SIZE`, unbounded if unset)
    pub asset_page_size: PageSize,
    /// Fields the search box matches against (`SEARCH_MODE`)
    pub search_mode: SearchMode,
    /// Number of approved requests shown as recent activity (`RECENT_ACTIVITY_LIMIT`)
    pub recent_activity_limit: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            change_page_size: PageSize::Fixed(
                NonZeroUsize::new(DEFAULT_CHANGE_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
            asset_page_size: PageSize::Unbounded,
            search_mode: SearchMode::default(),
            recent_activity_limit: DEFAULT_RECENT_ACTIVITY_LIMIT,
        }
    }
}

impl ViewSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup("CHANGE_PAGE_SIZE") {
            settings.change_page_size = PageSize::Fixed(parse_page_size("CHANGE_PAGE_SIZE", &raw)?);
        }
        if let Some(raw) = lookup("ASSET_PAGE_SIZE") {
            settings.asset_page_size = PageSize::Fixed(parse_page_size("ASSET_PAGE_SIZE", &raw)?);
        }
        if let Some(raw) = lookup("SEARCH_MODE") {
            settings.search_mode = raw.parse()?;
        }
        if let Some(raw) = lookup("RECENT_ACTIVITY_LIMIT") {
            settings.recent_activity_limit =
                raw.trim().parse().map_err(|e| Error::Config {
                    message: format!("RECENT_ACTIVITY_LIMIT must be a number: {e}"),
                })?;
        }

        Ok(settings)
    }
}

fn parse_page_size(key: &str, raw: &str) -> Result<NonZeroUsize> {
    raw.trim().parse::<NonZeroUsize>().map_err(|e| Error::Config {
        message: format!("{key} must be a positive number: {e}"),
    })
}

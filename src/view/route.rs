//! Navigation routes. A route carries an identifier only; the destination screen
//! re-reads the record from the store.

use crate::{
    entities::AssetCategory,
    errors::{Error, Result},
};
use std::{fmt, str::FromStr};

/// Every screen the dashboard can navigate to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Dashboard,
    /// `/change-management`
    ChangeManagement,
    /// `/change-management/calendar`
    ChangeCalendar,
    /// `/change-management/detail/:id`
    ChangeDetail {
        /// Change request id
        id: String,
    },
    /// `/cmdb`
    Cmdb,
    /// `/cmdb/:category`
    CmdbCategory {
        /// Category whose asset table is shown
        category: AssetCategory,
    },
    /// `/cmdb/detail/:id`
    AssetDetail {
        /// Asset id
        id: String,
    },
    /// `/cmdb/history/:id`
    AssetHistory {
        /// Asset id
        id: String,
    },
}

fn not_found(path: &str) -> Error {
    Error::NotFound {
        kind: "route",
        id: path.to_string(),
    }
}

fn decode_segment(path: &str, segment: &str) -> Result<String> {
    let decoded = urlencoding::decode(segment).map_err(|_| not_found(path))?;
    if decoded.trim().is_empty() {
        return Err(not_found(path));
    }
    Ok(decoded.into_owned())
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        if !trimmed.is_empty() && !trimmed.starts_with('/') {
            return Err(not_found(path));
        }
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] => Ok(Self::Dashboard),
            ["change-management"] => Ok(Self::ChangeManagement),
            ["change-management", "calendar"] => Ok(Self::ChangeCalendar),
            ["change-management", "detail", id] => Ok(Self::ChangeDetail {
                id: decode_segment(path, id)?,
            }),
            ["cmdb"] => Ok(Self::Cmdb),
            ["cmdb", "detail", id] => Ok(Self::AssetDetail {
                id: decode_segment(path, id)?,
            }),
            ["cmdb", "history", id] => Ok(Self::AssetHistory {
                id: decode_segment(path, id)?,
            }),
            ["cmdb", category] => {
                let label = decode_segment(path, category)?;
                AssetCategory::from_label(&label)
                    .map(|category| Self::CmdbCategory { category })
                    .ok_or_else(|| Error::NotFound {
                        kind: "asset category",
                        id: label,
                    })
            }
            _ => Err(not_found(path)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => f.write_str("/"),
            Self::ChangeManagement => f.write_str("/change-management"),
            Self::ChangeCalendar => f.write_str("/change-management/calendar"),
            Self::ChangeDetail { id } => {
                write!(f, "/change-management/detail/{}", urlencoding::encode(id))
            }
            Self::Cmdb => f.write_str("/cmdb"),
            Self::CmdbCategory { category } => {
                write!(f, "/cmdb/{}", urlencoding::encode(category.label()))
            }
            Self::AssetDetail { id } => write!(f, "/cmdb/detail/{}", urlencoding::encode(id)),
            Self::AssetHistory { id } => write!(f, "/cmdb/history/{}", urlencoding::encode(id)),
        }
    }
}

//! CMDB asset business logic - registration, lookups and category aggregation.
//!
//! Category counts are always computed from the asset list that is passed in,
//! never cached alongside it, so a tile can not drift from the records it summarizes.

use crate::{
    core::store::RecordStore,
    entities::{AssetCategory, asset},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, net::IpAddr};
use tracing::info;

/// Input for registering an asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAsset {
    /// Asset identifier (e.g. `"AST001"`)
    pub asset_id: String,
    /// CMDB category
    pub category: AssetCategory,
    /// Parent configuration item
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Kind of asset
    pub asset_type: String,
    /// Network hostname
    #[serde(default)]
    pub hostname: String,
    /// IP address, empty when not applicable
    #[serde(default)]
    pub ip_address: String,
    /// Operating system name
    #[serde(default)]
    pub os_name: String,
    /// Operating system version
    #[serde(default)]
    pub os_version: String,
    /// Vendor
    #[serde(default)]
    pub vendor: String,
    /// Physical location
    #[serde(default)]
    pub location: String,
    /// Owning department
    #[serde(default)]
    pub owner_department: String,
    /// Responsible person
    #[serde(default)]
    pub responsible_person: String,
    /// Free-text status
    #[serde(default = "default_status")]
    pub status: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Registration date, defaults to today
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    /// Last update date, defaults to the registration date
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

fn default_status() -> String {
    "Active".to_string()
}

/// Number of assets in one category, as shown on a CMDB tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryCount {
    /// The category
    pub category: AssetCategory,
    /// How many assets currently belong to it
    pub count: usize,
}

/// Counts assets per category in one pass, returning every category in tile order.
#[must_use]
pub fn count_by_category(assets: &[asset::Model]) -> Vec<CategoryCount> {
    let mut counts: HashMap<AssetCategory, usize> = HashMap::new();
    for asset in assets {
        *counts.entry(asset.category).or_insert(0) += 1;
    }

    AssetCategory::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: counts.get(&category).copied().unwrap_or(0),
        })
        .collect()
}

/// Assets belonging to `category`, in their original order.
#[must_use]
pub fn assets_in_category(assets: &[asset::Model], category: AssetCategory) -> Vec<&asset::Model> {
    assets
        .iter()
        .filter(|asset| asset.category == category)
        .collect()
}

/// Registers a new asset after validating its identifier and address.
///
/// # Errors
/// Returns an error if:
/// - The asset id or type is empty or whitespace-only
/// - The IP address is non-empty and not a valid IPv4/IPv6 address
/// - An asset with the same id already exists
pub async fn create_asset<S>(store: &S, new_asset: NewAsset) -> Result<asset::Model>
where
    S: RecordStore<asset::Model> + ?Sized,
{
    if new_asset.asset_id.trim().is_empty() {
        return Err(Error::validation("asset_id", "asset id is required"));
    }
    if new_asset.asset_type.trim().is_empty() {
        return Err(Error::validation("asset_type", "asset type is required"));
    }

    let ip_address = new_asset.ip_address.trim().to_string();
    if !ip_address.is_empty() && ip_address.parse::<IpAddr>().is_err() {
        return Err(Error::validation(
            "ip_address",
            format!("'{ip_address}' is not a valid IP address"),
        ));
    }

    let created_at = new_asset
        .created_at
        .unwrap_or_else(|| Utc::now().date_naive());

    let record = asset::Model {
        id: 0,
        asset_id: new_asset.asset_id.trim().to_string(),
        category: new_asset.category,
        parent_id: new_asset.parent_id.filter(|p| !p.trim().is_empty()),
        asset_type: new_asset.asset_type.trim().to_string(),
        hostname: new_asset.hostname,
        ip_address,
        os_name: new_asset.os_name,
        os_version: new_asset.os_version,
        vendor: new_asset.vendor,
        location: new_asset.location,
        owner_department: new_asset.owner_department,
        responsible_person: new_asset.responsible_person,
        status: new_asset.status,
        description: new_asset.description,
        created_at,
        updated_at: new_asset.updated_at.unwrap_or(created_at),
    };

    let created = store.create(record).await?;
    info!(asset_id = %created.asset_id, category = %created.category, "Registered asset");
    Ok(created)
}

/// All assets in store order.
pub async fn list_assets<S>(store: &S) -> Result<Vec<asset::Model>>
where
    S: RecordStore<asset::Model> + ?Sized,
{
    store.list().await
}

/// Looks up an asset for the detail or history view, `NotFound` if absent.
pub async fn get_asset<S>(store: &S, asset_id: &str) -> Result<asset::Model>
where
    S: RecordStore<asset::Model> + ?Sized,
{
    store.require(asset_id).await
}

/// Changes an asset's free-text status and refreshes its `updated_at` date.
///
/// # Errors
/// Returns an error if:
/// - The status is empty or whitespace-only
/// - No asset with `asset_id` exists
pub async fn change_asset_status<S>(store: &S, asset_id: &str, status: &str) -> Result<asset::Model>
where
    S: RecordStore<asset::Model> + ?Sized,
{
    let mut record = store.require(asset_id).await?;
    let status = status.trim();
    if status.is_empty() {
        return Err(Error::validation("status", "status is required"));
    }

    let previous = std::mem::replace(&mut record.status, status.to_string());
    record.updated_at = Utc::now().date_naive();
    let updated = store.update(record).await?;
    info!(asset_id, %previous, status, "Asset status changed");
    Ok(updated)
}

/// Category tiles computed from the store's current contents.
pub async fn category_tiles<S>(store: &S) -> Result<Vec<CategoryCount>>
where
    S: RecordStore<asset::Model> + ?Sized,
{
    let assets = store.list().await?;
    Ok(count_by_category(&assets))
}

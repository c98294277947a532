//! Startup seeding from the seed file.
//!
//! Records listed in the seed file are inserted when their identifier is not yet
//! present in the store. Existing records are left untouched, so seeding is safe
//! to run on every start.

use crate::{
    config::seed::SeedConfig,
    core::{asset, change_request, store::RecordStore},
    entities::{AssetModel, ChangeRequestModel},
    errors::Result,
};
use tracing::{debug, info, warn};

/// Outcome of a seeding run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Change requests inserted
    pub changes_inserted: usize,
    /// Change requests already present
    pub changes_skipped: usize,
    /// Assets inserted
    pub assets_inserted: usize,
    /// Assets already present
    pub assets_skipped: usize,
}

/// Inserts every seed record whose identifier is missing from its store.
pub async fn seed_records<C, A>(changes: &C, assets: &A, config: &SeedConfig) -> Result<SeedReport>
where
    C: RecordStore<ChangeRequestModel> + ?Sized,
    A: RecordStore<AssetModel> + ?Sized,
{
    info!(
        "Starting to seed records. Found {} change requests and {} assets in the seed file.",
        config.change_requests.len(),
        config.assets.len()
    );
    let mut report = SeedReport::default();

    for seed in &config.change_requests {
        if changes.get(seed.id.trim()).await?.is_some() {
            warn!("Change request '{}' already exists. Skipping.", seed.id);
            report.changes_skipped += 1;
            continue;
        }
        debug!("Seeding change request '{}'", seed.id);
        change_request::create_change_request(changes, seed.clone()).await?;
        report.changes_inserted += 1;
    }

    for seed in &config.assets {
        if assets.get(seed.asset_id.trim()).await?.is_some() {
            warn!("Asset '{}' already exists. Skipping.", seed.asset_id);
            report.assets_skipped += 1;
            continue;
        }
        debug!("Seeding asset '{}'", seed.asset_id);
        asset::create_asset(assets, seed.clone()).await?;
        report.assets_inserted += 1;
    }

    info!(
        changes = report.changes_inserted,
        assets = report.assets_inserted,
        "Seeding finished"
    );
    Ok(report)
}

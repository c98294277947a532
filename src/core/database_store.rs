//! `SeaORM`-backed record store.
//!
//! Change requests are listed in ticket-id order and assets in row order, which
//! matches the order they were registered in.

use crate::{
    core::store::RecordStore,
    entities::{Asset, ChangeRequest, asset, change_request},
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Record store persisting to a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    /// Wraps an open connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Copies every non-key column of `record` into `active`.
fn apply_change_request(active: &mut change_request::ActiveModel, record: change_request::Model) {
    active.change_type = Set(record.change_type);
    active.department = Set(record.department);
    active.affected_assets = Set(record.affected_assets);
    active.pic = Set(record.pic);
    active.schedule_date = Set(record.schedule_date);
    active.status = Set(record.status);
    active.risk_score = Set(record.risk_score);
    active.reason = Set(record.reason);
    active.purpose = Set(record.purpose);
    active.impact = Set(record.impact);
    active.implementation = Set(record.implementation);
    active.implementation_schedule = Set(record.implementation_schedule);
    active.technician = Set(record.technician);
    active.denial_reason = Set(record.denial_reason);
    active.updated_at = Set(record.updated_at);
}

/// Copies every column except the row id of `record` into `active`.
fn apply_asset(active: &mut asset::ActiveModel, record: asset::Model) {
    active.asset_id = Set(record.asset_id);
    active.category = Set(record.category);
    active.parent_id = Set(record.parent_id);
    active.asset_type = Set(record.asset_type);
    active.hostname = Set(record.hostname);
    active.ip_address = Set(record.ip_address);
    active.os_name = Set(record.os_name);
    active.os_version = Set(record.os_version);
    active.vendor = Set(record.vendor);
    active.location = Set(record.location);
    active.owner_department = Set(record.owner_department);
    active.responsible_person = Set(record.responsible_person);
    active.status = Set(record.status);
    active.description = Set(record.description);
    active.created_at = Set(record.created_at);
    active.updated_at = Set(record.updated_at);
}

#[async_trait]
impl RecordStore<change_request::Model> for DatabaseStore {
    async fn list(&self) -> Result<Vec<change_request::Model>> {
        ChangeRequest::find()
            .order_by_asc(change_request::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn get(&self, id: &str) -> Result<Option<change_request::Model>> {
        ChangeRequest::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn create(&self, record: change_request::Model) -> Result<change_request::Model> {
        if RecordStore::<change_request::Model>::get(self, &record.id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyExists {
                kind: "change request",
                id: record.id,
            });
        }

        let mut active = change_request::ActiveModel {
            id: Set(record.id.clone()),
            ..Default::default()
        };
        apply_change_request(&mut active, record);
        debug!("Inserting change request");
        active.insert(&self.db).await.map_err(Into::into)
    }

    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn update(&self, record: change_request::Model) -> Result<change_request::Model> {
        let mut active: change_request::ActiveModel = ChangeRequest::find_by_id(record.id.clone())
            .one(&self.db)
            .await?
            .ok_or_else(|| Error::NotFound {
                kind: "change request",
                id: record.id.clone(),
            })?
            .into();

        apply_change_request(&mut active, record);
        debug!("Updating change request");
        active.update(&self.db).await.map_err(Into::into)
    }
}

#[async_trait]
impl RecordStore<asset::Model> for DatabaseStore {
    async fn list(&self) -> Result<Vec<asset::Model>> {
        Asset::find()
            .order_by_asc(asset::Column::Id)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn get(&self, id: &str) -> Result<Option<asset::Model>> {
        Asset::find()
            .filter(asset::Column::AssetId.eq(id))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    /// Inserts the asset; the numeric row id is assigned by the database.
    #[instrument(skip(self, record), fields(asset_id = %record.asset_id))]
    async fn create(&self, record: asset::Model) -> Result<asset::Model> {
        if RecordStore::<asset::Model>::get(self, &record.asset_id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyExists {
                kind: "asset",
                id: record.asset_id,
            });
        }

        let mut active = <asset::ActiveModel as Default>::default();
        apply_asset(&mut active, record);
        debug!("Inserting asset");
        active.insert(&self.db).await.map_err(Into::into)
    }

    #[instrument(skip(self, record), fields(asset_id = %record.asset_id))]
    async fn update(&self, record: asset::Model) -> Result<asset::Model> {
        let mut active: asset::ActiveModel =
            RecordStore::<asset::Model>::get(self, &record.asset_id)
                .await?
                .ok_or_else(|| Error::NotFound {
                    kind: "asset",
                    id: record.asset_id.clone(),
                })?
                .into();

        apply_asset(&mut active, record);
        debug!("Updating asset");
        active.update(&self.db).await.map_err(Into::into)
    }
}

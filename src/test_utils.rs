//! Shared test utilities for `change-desk`.
//!
//! This module provides common helper functions for setting up test databases
//! and building change requests and assets with sensible, deterministic defaults.

use crate::{
    core::{
        asset::NewAsset,
        change_request::{ApprovalDetails, NewChangeRequest},
        database_store::DatabaseStore,
    },
    entities::{AssetCategory, ChangeStatus, asset, change_request},
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a [`DatabaseStore`] over a fresh in-memory database.
pub async fn setup_test_store() -> Result<DatabaseStore> {
    Ok(DatabaseStore::new(setup_test_db().await?))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn timestamp() -> NaiveDateTime {
    date(2025, 1, 10).and_hms_opt(9, 0, 0).unwrap_or_default()
}

/// Builds a change request record without touching any store.
///
/// # Defaults
/// * `status`: Submitted
/// * `schedule_date`: 2025-01-20
/// * `risk_score`: 7.5
/// * approval and denial fields: None
pub fn sample_change(id: &str) -> change_request::Model {
    change_request::Model {
        id: id.to_string(),
        change_type: "Infrastructure Update".to_string(),
        department: "IT Operations".to_string(),
        affected_assets: "Server-DB-01".to_string(),
        pic: "John Doe".to_string(),
        schedule_date: date(2025, 1, 20),
        status: ChangeStatus::Submitted,
        risk_score: 7.5,
        reason: "Upgrade database version".to_string(),
        purpose: "Improve performance".to_string(),
        impact: None,
        implementation: None,
        implementation_schedule: None,
        technician: None,
        denial_reason: None,
        updated_at: timestamp(),
    }
}

/// Registration input matching [`sample_change`].
pub fn sample_new_change(id: &str) -> NewChangeRequest {
    NewChangeRequest {
        id: id.to_string(),
        change_type: "Infrastructure Update".to_string(),
        department: "IT Operations".to_string(),
        affected_assets: vec!["Server-DB-01".to_string()],
        pic: "John Doe".to_string(),
        schedule_date: date(2025, 1, 20),
        status: ChangeStatus::Submitted,
        risk_score: 7.5,
        reason: "Upgrade database version".to_string(),
        purpose: "Improve performance".to_string(),
        impact: None,
        implementation: None,
        technician: None,
    }
}

/// A complete, valid approval form.
pub fn approval_details() -> ApprovalDetails {
    ApprovalDetails {
        impact: "Database unavailable for 30 minutes".to_string(),
        implementation: "Rolling upgrade of replicas, then primary".to_string(),
        schedule: "2025-01-20T10:00".to_string(),
        technician: "Jane Smith".to_string(),
    }
}

/// Builds an asset record without touching any store.
///
/// # Defaults
/// * `id`: 0 (assigned by the database on insert)
/// * `status`: "Active"
/// * `ip_address`: "192.168.1.10"
pub fn sample_asset(asset_id: &str, category: AssetCategory) -> asset::Model {
    asset::Model {
        id: 0,
        asset_id: asset_id.to_string(),
        category,
        parent_id: None,
        asset_type: "Server".to_string(),
        hostname: "srv-prod-01".to_string(),
        ip_address: "192.168.1.10".to_string(),
        os_name: "Ubuntu".to_string(),
        os_version: "22.04".to_string(),
        vendor: "Dell".to_string(),
        location: "Data Center 1".to_string(),
        owner_department: "IT Operations".to_string(),
        responsible_person: "John Doe".to_string(),
        status: "Active".to_string(),
        description: "Production server".to_string(),
        created_at: date(2024, 1, 1),
        updated_at: date(2025, 1, 10),
    }
}

/// Registration input matching [`sample_asset`].
pub fn sample_new_asset(asset_id: &str, category: AssetCategory) -> NewAsset {
    NewAsset {
        asset_id: asset_id.to_string(),
        category,
        parent_id: None,
        asset_type: "Server".to_string(),
        hostname: "srv-prod-01".to_string(),
        ip_address: "192.168.1.10".to_string(),
        os_name: "Ubuntu".to_string(),
        os_version: "22.04".to_string(),
        vendor: "Dell".to_string(),
        location: "Data Center 1".to_string(),
        owner_department: "IT Operations".to_string(),
        responsible_person: "John Doe".to_string(),
        status: "Active".to_string(),
        description: "Production server".to_string(),
        created_at: Some(date(2024, 1, 1)),
        updated_at: None,
    }
}

//! Asset entity - A configuration item in the CMDB.
//!
//! Each asset belongs to exactly one of the fixed CMDB categories. The `status`
//! column is free text; [`AssetStatus`] interprets it without rejecting unknown values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CMDB category an asset is grouped under, stored as its display label.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AssetCategory {
    /// Physical servers, storage and racks
    #[sea_orm(string_value = "Infrastructure")]
    Infrastructure,
    /// Hypervisors and virtual machines
    #[sea_orm(string_value = "Virtualization")]
    Virtualization,
    /// Laptops, desktops and mobile devices
    #[sea_orm(string_value = "End User Devices")]
    #[serde(rename = "End User Devices")]
    EndUserDevices,
    /// Supporting assets outside IT (vehicles, furniture)
    #[sea_orm(string_value = "Non-TI Supporting Assets")]
    #[serde(rename = "Non-TI Supporting Assets")]
    NonItSupportingAssets,
    /// Applications, licenses and logical CIs
    #[sea_orm(string_value = "Software & Logical CI")]
    #[serde(rename = "Software & Logical CI")]
    SoftwareAndLogicalCi,
    /// Links, circuits and network services
    #[sea_orm(string_value = "Network & Connectivity")]
    #[serde(rename = "Network & Connectivity")]
    NetworkAndConnectivity,
    /// Firewalls, IDS and security appliances
    #[sea_orm(string_value = "Security")]
    Security,
    /// Business and technical services
    #[sea_orm(string_value = "Services")]
    Services,
    /// Runbooks, manuals and knowledge articles
    #[sea_orm(string_value = "Documentation & Knowledge")]
    #[serde(rename = "Documentation & Knowledge")]
    DocumentationAndKnowledge,
    /// Teams, roles and contacts
    #[sea_orm(string_value = "People & Organization")]
    #[serde(rename = "People & Organization")]
    PeopleAndOrganization,
    /// SaaS and third-party services
    #[sea_orm(string_value = "Cloud & External Service")]
    #[serde(rename = "Cloud & External Service")]
    CloudAndExternalService,
    /// Buildings, rooms and power
    #[sea_orm(string_value = "Environment & Facility")]
    #[serde(rename = "Environment & Facility")]
    EnvironmentAndFacility,
}

impl AssetCategory {
    /// Every category in tile order.
    pub const ALL: [Self; 12] = [
        Self::Infrastructure,
        Self::Virtualization,
        Self::EndUserDevices,
        Self::NonItSupportingAssets,
        Self::SoftwareAndLogicalCi,
        Self::NetworkAndConnectivity,
        Self::Security,
        Self::Services,
        Self::DocumentationAndKnowledge,
        Self::PeopleAndOrganization,
        Self::CloudAndExternalService,
        Self::EnvironmentAndFacility,
    ];

    /// Human-readable label, identical to the stored value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Infrastructure => "Infrastructure",
            Self::Virtualization => "Virtualization",
            Self::EndUserDevices => "End User Devices",
            Self::NonItSupportingAssets => "Non-TI Supporting Assets",
            Self::SoftwareAndLogicalCi => "Software & Logical CI",
            Self::NetworkAndConnectivity => "Network & Connectivity",
            Self::Security => "Security",
            Self::Services => "Services",
            Self::DocumentationAndKnowledge => "Documentation & Knowledge",
            Self::PeopleAndOrganization => "People & Organization",
            Self::CloudAndExternalService => "Cloud & External Service",
            Self::EnvironmentAndFacility => "Environment & Facility",
        }
    }

    /// Parses a display label, e.g. `"End User Devices"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operational status of an asset, parsed from the free-text column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetStatus {
    /// In service
    Active,
    /// Out of service
    Inactive,
    /// Temporarily down for maintenance
    Maintenance,
    /// Any other value, kept verbatim
    Other(String),
}

impl AssetStatus {
    /// Interprets a stored status; known values match case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "maintenance" => Self::Maintenance,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Inactive => f.write_str("Inactive"),
            Self::Maintenance => f.write_str("Maintenance"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Asset database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    /// Numeric row identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Asset identifier shown to users (e.g. `"AST001"`)
    #[sea_orm(unique)]
    pub asset_id: String,
    /// CMDB category this asset is counted under
    pub category: AssetCategory,
    /// Identifier of the parent configuration item, if any
    pub parent_id: Option<String>,
    /// Kind of asset (e.g. "Server", "Network Device")
    pub asset_type: String,
    /// Network hostname
    pub hostname: String,
    /// IPv4 or IPv6 address, empty when not applicable
    pub ip_address: String,
    /// Operating system name
    pub os_name: String,
    /// Operating system version
    pub os_version: String,
    /// Hardware or software vendor
    pub vendor: String,
    /// Physical location
    pub location: String,
    /// Owning department
    pub owner_department: String,
    /// Person responsible for the asset
    pub responsible_person: String,
    /// Free-text status, see [`AssetStatus`]
    pub status: String,
    /// Free-text description
    pub description: String,
    /// When the asset was registered
    pub created_at: Date,
    /// When the asset record was last updated
    pub updated_at: Date,
}

impl Model {
    /// The interpreted status of this asset.
    #[must_use]
    pub fn status(&self) -> AssetStatus {
        AssetStatus::parse(&self.status)
    }
}

/// Assets have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

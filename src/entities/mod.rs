//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and double as the domain records
//! handed to the filter, pagination and workflow layers.

pub mod asset;
pub mod change_request;

// Re-export specific types to avoid conflicts
pub use asset::{
    AssetCategory, AssetStatus, Column as AssetColumn, Entity as Asset, Model as AssetModel,
};
pub use change_request::{
    ChangeStatus, Column as ChangeRequestColumn, Entity as ChangeRequest,
    Model as ChangeRequestModel,
};

//! Screen state for the dashboard: filtering, paging, modals and navigation.
//!
//! Nothing in here renders. Each view keeps the state a screen needs between
//! events and derives what is on screen from the records it is handed.

/// Change calendar grouped by day
pub mod calendar;
/// Change Management screen: table, request form, deny and approve modals
pub mod change_management;
/// CMDB category tiles and per-category asset table
pub mod cmdb;
/// Status predicate and search shared by every list
pub mod filter;
/// Fixed-size pagination
pub mod paginator;
/// Navigation routes
pub mod route;

//! Data models for bills, inventory, and configuration.

pub mod bill;
pub mod config;
pub mod inventory;

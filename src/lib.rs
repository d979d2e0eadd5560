//! RoleSale Backend Library
//!
//! Role-based sales/commission demo: accounts sign up with a role from a
//! fixed ten-tier hierarchy, and each sale splits a fixed profit share
//! across all roles superior to the seller.

pub mod api;
pub mod auth;
pub mod config;
pub mod distribution;
pub mod hierarchy;
pub mod ledger;
pub mod sale;

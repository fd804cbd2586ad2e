//! Email Harvest — e-mail address discovery module for recon scans.

pub mod config;
pub mod email;
pub mod error;
pub mod event;
pub mod module;

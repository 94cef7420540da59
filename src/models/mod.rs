//! Core data models for the object gateway.
//!
//! Commands describe what to ask of the object store, object types describe
//! what comes back, and `auth` resolves the service's authentication mode.

pub mod auth;
pub mod command;
pub mod object;

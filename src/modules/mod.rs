//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the HTTP transport used to talk to the Apillon API.

pub mod api;

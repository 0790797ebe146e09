//! Dazzign HTTP server library
//!
//! This crate provides the REST API for the Dazzign service: root-node
//! listing, single-node and lineage-tree reads, spec extraction from free
//! text, and image generation.

pub mod config;
pub mod handler;
pub mod metrics;
pub mod providers;
pub mod samples;
pub mod types;

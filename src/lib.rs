//! # Haloradio Rust Backend
//!
//! Admin backend for a small community radio station.
//!
//! This crate manages the station's recurring weekly playlist grid, listener
//! song requests, dated broadcast schedule entries and a moderated listener
//! chat. The backend exposes a REST API via Axum for the admin frontend.
//!
//! ## Features
//!
//! - **Weekly grid**: slots keyed by day and an explicit within-day order,
//!   with drag-and-drop reordering
//! - **Day canonicalization**: 1-based and 0-based numeric day tokens plus
//!   Indonesian and English weekday names all resolve to one index
//! - **CSV codec**: export in two styles and append/replace import with
//!   row-accurate error reporting
//! - **Listener surfaces**: song requests, broadcast announcements and a
//!   rate-limited chat with bad-word flagging
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! - [`models`]: Domain types and pure field validation
//! - [`db`]: Repository pattern and persistence layer
//! - [`services`]: Business logic over the repository traits
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

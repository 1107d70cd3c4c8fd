// SPDX-License-Identifier: AGPL-3.0-or-later

//! NFT Market Server - Marketplace Backend API
//!
//! Wallet-signature authenticated marketplace backend over PostgreSQL.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Nonce/signature authentication and bearer sessions
//! - `db` - Connection pool, schema bootstrap, repositories
//! - `importer` - Reservoir collection/token import job

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod importer;
pub mod logging;
pub mod models;
pub mod state;

// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing subscriber setup.
//!
//! `LOG_FORMAT=json` selects machine-readable output; anything else gets the
//! human-readable formatter. The filter comes from `RUST_LOG`, defaulting to
//! `info`.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

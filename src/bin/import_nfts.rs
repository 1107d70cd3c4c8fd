// SPDX-License-Identifier: AGPL-3.0-or-later

//! Standalone Reservoir import job.
//!
//! Fetches live collections and tokens from the Reservoir API and upserts
//! them into the marketplace database. Run out-of-band, e.g. from cron:
//!
//! ```sh
//! DATABASE_URL=postgres://... import-nfts
//! ```

use std::process::ExitCode;

use tracing::{error, info};

use nft_market_server::{db, importer, logging};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("DATABASE_URL is required");
            return ExitCode::FAILURE;
        }
    };

    let pool = match sqlx::PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!(error = %err, "failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = db::ensure_schema(&pool).await {
        error!(error = %err, "failed to bootstrap schema");
        return ExitCode::FAILURE;
    }

    let client = importer::ReservoirClient::from_env();
    match importer::run(&pool, &client).await {
        Ok(summary) => {
            info!(
                collections = summary.collections,
                assets = summary.assets,
                "import finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "import failed");
            ExitCode::FAILURE
        }
    }
}

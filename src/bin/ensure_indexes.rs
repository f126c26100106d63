//! One-shot administrative script that applies the index declarations
//! against the data directory, then exits. Safe to re-run: declarations
//! already applied under the same name and key spec are skipped.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_manager::storage::Database;

fn main() -> anyhow::Result<()> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

    let db = Database::open(&data_dir)?;
    let report = db.ensure_indexes()?;

    for name in &report.created {
        info!(index = name, "Created index");
    }
    for name in &report.skipped {
        info!(index = name, "Index already exists, skipped");
    }

    info!(
        created = report.created.len(),
        skipped = report.skipped.len(),
        "Index declarations applied"
    );
    Ok(())
}

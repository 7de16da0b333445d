//! CLI smoke entry point.
//!
//! # Responsibility
//! - Bootstrap one CRM session against the configured slot database.
//! - Print a deterministic dashboard summary for quick local checks.

use nexus_core::model::deal::format_amount;
use nexus_core::{
    init_logging, open_db, CoreConfig, CrmController, SqliteSlotStorage, Store, ThreadDelay,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("nexus_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    println!("nexus_core ping={}", nexus_core::ping());
    println!("nexus_core version={}", nexus_core::core_version());

    let conn = open_db(&config.db_path)?;
    let store =
        Store::new(SqliteSlotStorage::new(&conn)).with_latency(config.latency, ThreadDelay);
    let session = CrmController::bootstrap(store)?;

    let metrics = session.dashboard();
    println!("db_path={}", config.db_path.display());
    println!("total_pipeline={}", format_amount(metrics.total_pipeline));
    println!("won_revenue={}", format_amount(metrics.won_revenue));
    println!("open_deals={}", metrics.open_deals);
    println!("pending_tasks={}", metrics.pending_tasks);
    println!("unread_notifications={}", session.unread_notification_count());
    for metric in metrics.value_by_stage() {
        println!(
            "stage=\"{}\" deals={} amount={}",
            metric.stage,
            metric.count,
            format_amount(metric.amount)
        );
    }
    Ok(())
}

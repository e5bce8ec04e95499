use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use subscriptions_review::config::Config;
use subscriptions_review::diagnostic::classify;
use subscriptions_review::error::AuditError;
use subscriptions_review::semp::SempClient;
use subscriptions_review::{AuditEngine, AuditTarget};

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AuditError::Usage(usage)) => {
            println!("\n{}", usage);
            ExitCode::FAILURE
        }
        Err(AuditError::Transport(e)) => {
            tracing::error!("{}", e);
            println!("{}", classify(&e));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), AuditError> {
    let target = AuditTarget::from_args(args)?;
    let config = Config::load()?;
    init_tracing(&config.review.log_level);

    let api = SempClient::new(&target.root_url, &target.username, &target.password, &config.semp)?;
    tracing::info!("SEMP monitor endpoint: {}", api.base_url());

    let engine = AuditEngine::new(api, config);
    let summary = engine.run(&target.vpn).await?;
    tracing::info!(
        "Review complete: {} client rows, {} queue rows",
        summary.client_rows,
        summary.queue_rows
    );
    Ok(())
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

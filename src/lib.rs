pub mod config;
pub mod diagnostic;
pub mod error;
pub mod review;
pub mod semp;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::{AuditError, TransportError};
use crate::review::{collectors, Report, CLIENTS_HEADER, QUEUES_HEADER};
use crate::semp::MonitorApi;

/// Tuning (page size, timeouts, output directory, log level) comes from optional
/// `SEMP_*` / `REVIEW_*` environment overrides; see [`config::Config::load`].
pub const USAGE: &str =
    "Usage: subscriptions-review <broker_mgmt_root_URL> <management_user> <management_password> <vpnname>";

// ========================================
// TARGET
// ========================================

/// Broker coordinates and the Message-VPN to review.
#[derive(Clone, PartialEq, Eq)]
pub struct AuditTarget {
    pub root_url: String,
    pub username: String,
    pub password: String,
    pub vpn: String,
}

impl AuditTarget {
    /// Positional arguments, program name excluded. Extra arguments are ignored.
    pub fn from_args(args: &[String]) -> Result<Self, AuditError> {
        match args {
            [root_url, username, password, vpn, ..] => Ok(Self {
                root_url: root_url.clone(),
                username: username.clone(),
                password: password.clone(),
                vpn: vpn.clone(),
            }),
            _ => Err(AuditError::Usage(USAGE.to_string())),
        }
    }
}

impl fmt::Debug for AuditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditTarget")
            .field("root_url", &self.root_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("vpn", &self.vpn)
            .finish()
    }
}

// ========================================
// ENGINE
// ========================================

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub started_at: DateTime<Utc>,
    pub clients_file: PathBuf,
    pub client_rows: usize,
    pub queues_file: PathBuf,
    pub queue_rows: usize,
}

/// Walks one Message-VPN and produces the client and queue subscription reports.
pub struct AuditEngine<A: MonitorApi> {
    api: A,
    config: Config,
}

impl<A: MonitorApi> AuditEngine<A> {
    pub fn new(api: A, config: Config) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn clients_report(&self, vpn: &str) -> Result<Report, TransportError> {
        let api = &self.api;
        let limit = self.config.semp.page_limit;

        println!("=== Display Topic Subscriptions for Message-VPN {} ===", vpn);
        let clients = collectors::clients(api, vpn, limit).await?;
        println!("Retrieved {} Clients", clients.len());

        let rows = review::build(clients.as_slice(), self.config.semp.fetch_concurrency, move |client| {
            collectors::client_subscriptions(api, vpn, &client.client_name, limit)
        })
        .await?;

        Ok(Report::new(CLIENTS_HEADER, rows))
    }

    pub async fn queues_report(&self, vpn: &str) -> Result<Report, TransportError> {
        let api = &self.api;
        let limit = self.config.semp.page_limit;

        println!("=== Display Topic Subscriptions for Message-VPN {} queues ===", vpn);
        let queues = collectors::queues(api, vpn, limit).await?;
        println!("Retrieved {} Queues", queues.len());

        let rows = review::build(queues.as_slice(), self.config.semp.fetch_concurrency, move |queue| {
            collectors::queue_subscriptions(api, vpn, &queue.queue_name, limit)
        })
        .await?;

        Ok(Report::new(QUEUES_HEADER, rows))
    }

    /// Clients report first, then queues. The first failure stops the run;
    /// a file is only written once its report is complete.
    pub async fn run(&self, vpn: &str) -> Result<ReviewSummary, AuditError> {
        let started_at = Utc::now();
        info!("Reviewing Message-VPN '{}' at {}", vpn, started_at.to_rfc3339());

        let clients = self.clients_report(vpn).await?;
        let clients_file = self.write_report(&clients_file_name(vpn), &clients).await?;

        println!();
        let queues = self.queues_report(vpn).await?;
        let queues_file = self.write_report(&queues_file_name(vpn), &queues).await?;

        Ok(ReviewSummary {
            started_at,
            clients_file,
            client_rows: clients.rows.len(),
            queues_file,
            queue_rows: queues.rows.len(),
        })
    }

    /// Overwrites `file_name` under the configured output directory.
    pub async fn write_report(&self, file_name: &str, report: &Report) -> Result<PathBuf, AuditError> {
        let path = self.config.review.output_dir.join(file_name);
        write_file(&path, &report.render()).await?;
        println!("\n=> Output written to {}", path.display());
        Ok(path)
    }
}

pub fn clients_file_name(vpn: &str) -> String {
    format!("{}-clients-subscriptions.csv", vpn)
}

pub fn queues_file_name(vpn: &str) -> String {
    format!("{}-queues-subscriptions.csv", vpn)
}

async fn write_file(path: &Path, content: &str) -> Result<(), AuditError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| AuditError::Output { path: path.to_path_buf(), source })
}

//! SEMP Client: reqwest-backed implementation of the monitor API
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SempConfig;
use crate::error::TransportError;
use crate::semp::models::{
    MsgVpnClient, MsgVpnClientSubscription, MsgVpnQueue, MsgVpnQueueSubscription, SempResponse,
};
use crate::semp::paging::Page;
use crate::semp::MonitorApi;

/// Appended to the broker management root URL.
pub const SEMP_MONITOR_PATH: &str = "/SEMP/v2/monitor";

// ========================================
// CLIENT
// ========================================

pub struct SempClient {
    http: reqwest::Client,
    base: Url,
    username: String,
    password: String,
}

impl SempClient {
    /// `root_url` is the broker management root, e.g. `https://broker:943`.
    pub fn new(root_url: &str, username: &str, password: &str, config: &SempConfig) -> Result<Self, TransportError> {
        let joined = format!("{}{}", root_url.trim_end_matches('/'), SEMP_MONITOR_PATH);
        let base = Url::parse(&joined).map_err(|e| TransportError::Url(format!("{}: {}", joined, e)))?;
        if base.cannot_be_a_base() {
            return Err(TransportError::Url(format!("{}: not a hierarchical url", joined)));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| TransportError::Request { url: joined.clone(), source })?;

        Ok(Self {
            http,
            base,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds `{base}/{segments...}?count=N[&cursor=...]`, percent-encoding each segment.
    fn resource_url(&self, segments: &[&str], count: u32, cursor: Option<&str>) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("count", &count.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }
        Ok(url)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<T>, TransportError> {
        let url = self.resource_url(segments, count, cursor.as_deref())?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|source| TransportError::Request { url: url.to_string(), source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request { url: url.to_string(), source })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let parsed: SempResponse<T> = serde_json::from_str(&body)
            .map_err(|source| TransportError::Decode { url: url.to_string(), source })?;
        Ok(parsed.into_page())
    }
}

// ========================================
// MONITOR API
// ========================================

impl MonitorApi for SempClient {
    async fn list_clients(
        &self,
        vpn: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnClient>, TransportError> {
        self.fetch_page(&["msgVpns", vpn, "clients"], count, cursor).await
    }

    async fn list_client_subscriptions(
        &self,
        vpn: &str,
        client_name: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnClientSubscription>, TransportError> {
        self.fetch_page(&["msgVpns", vpn, "clients", client_name, "subscriptions"], count, cursor)
            .await
    }

    async fn list_queues(
        &self,
        vpn: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnQueue>, TransportError> {
        self.fetch_page(&["msgVpns", vpn, "queues"], count, cursor).await
    }

    async fn list_queue_subscriptions(
        &self,
        vpn: &str,
        queue_name: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnQueueSubscription>, TransportError> {
        self.fetch_page(&["msgVpns", vpn, "queues", queue_name, "subscriptions"], count, cursor)
            .await
    }
}

// ==========================================
// TESTS
// ==========================================

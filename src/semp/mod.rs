//! SEMP v2 monitor API: wire models, cursor paging and the HTTP client.

pub mod client;
pub mod models;
pub mod paging;

pub use client::{SempClient, SEMP_MONITOR_PATH};
pub use models::{MsgVpnClient, MsgVpnClientSubscription, MsgVpnQueue, MsgVpnQueueSubscription};
pub use paging::{collect_all, pages, Page, DEFAULT_PAGE_LIMIT};

use crate::error::TransportError;

/// Paged list operations over one Message-VPN.
///
/// `count` bounds the page size; `cursor` is the opaque token returned by the
/// previous page, `None` for the first request.
#[allow(async_fn_in_trait)]
pub trait MonitorApi {
    async fn list_clients(
        &self,
        vpn: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnClient>, TransportError>;

    async fn list_client_subscriptions(
        &self,
        vpn: &str,
        client_name: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnClientSubscription>, TransportError>;

    async fn list_queues(
        &self,
        vpn: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnQueue>, TransportError>;

    async fn list_queue_subscriptions(
        &self,
        vpn: &str,
        queue_name: &str,
        count: u32,
        cursor: Option<String>,
    ) -> Result<Page<MsgVpnQueueSubscription>, TransportError>;
}

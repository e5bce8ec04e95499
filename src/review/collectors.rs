//! Entity collectors: one full cursor walk per resource kind.
//!
//! Nothing is cached; every call queries the broker again.

use crate::error::TransportError;
use crate::semp::{
    collect_all, MonitorApi, MsgVpnClient, MsgVpnClientSubscription, MsgVpnQueue, MsgVpnQueueSubscription,
};

pub async fn clients<A: MonitorApi>(api: &A, vpn: &str, limit: u32) -> Result<Vec<MsgVpnClient>, TransportError> {
    collect_all(move |cursor| api.list_clients(vpn, limit, cursor)).await
}

pub async fn client_subscriptions<A: MonitorApi>(
    api: &A,
    vpn: &str,
    client_name: &str,
    limit: u32,
) -> Result<Vec<MsgVpnClientSubscription>, TransportError> {
    collect_all(move |cursor| api.list_client_subscriptions(vpn, client_name, limit, cursor)).await
}

pub async fn queues<A: MonitorApi>(api: &A, vpn: &str, limit: u32) -> Result<Vec<MsgVpnQueue>, TransportError> {
    collect_all(move |cursor| api.list_queues(vpn, limit, cursor)).await
}

pub async fn queue_subscriptions<A: MonitorApi>(
    api: &A,
    vpn: &str,
    queue_name: &str,
    limit: u32,
) -> Result<Vec<MsgVpnQueueSubscription>, TransportError> {
    collect_all(move |cursor| api.list_queue_subscriptions(vpn, queue_name, limit, cursor)).await
}

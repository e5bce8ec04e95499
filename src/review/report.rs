//! Report Builder: joins parents (clients, queues) with their topic subscriptions.

use std::future::Future;

use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::error::TransportError;
use crate::semp::{MsgVpnClient, MsgVpnClientSubscription, MsgVpnQueue, MsgVpnQueueSubscription};

// ========================================
// TYPES
// ========================================

/// An entity that owns topic subscriptions.
pub trait ReportParent {
    fn name(&self) -> &str;
    /// Identifying columns, in header order.
    fn identity(&self) -> Vec<String>;
}

pub trait ReportSubscription {
    fn topic(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// `None` on continuation rows of the same parent.
    pub identity: Option<Vec<String>>,
    /// Empty for a parent without subscriptions.
    pub topic: String,
}

impl ReportRow {
    pub fn first(identity: Vec<String>, topic: impl Into<String>) -> Self {
        Self { identity: Some(identity), topic: topic.into() }
    }

    pub fn continuation(topic: impl Into<String>) -> Self {
        Self { identity: None, topic: topic.into() }
    }
}

// ========================================
// BUILDER
// ========================================

/// Fetches each parent's subscriptions and joins them into rows.
///
/// At most `concurrency` fetches are in flight; rows always follow parent order.
/// Each parent and its topics are listed on stdout as soon as they are fetched.
pub async fn build<'a, P, S, F, Fut>(
    parents: &'a [P],
    concurrency: usize,
    mut subscriptions_of: F,
) -> Result<Vec<ReportRow>, TransportError>
where
    P: ReportParent,
    S: ReportSubscription,
    F: FnMut(&'a P) -> Fut,
    Fut: Future<Output = Result<Vec<S>, TransportError>>,
{
    let fetched: Vec<(&'a P, Vec<S>)> = stream::iter(parents)
        .map(|parent| {
            let request = subscriptions_of(parent);
            async move { request.await.map(|subscriptions| (parent, subscriptions)) }
        })
        .buffered(concurrency.max(1))
        .inspect_ok(|(parent, subscriptions)| print!("{}", progress(*parent, subscriptions)))
        .try_collect()
        .await?;

    Ok(join(fetched))
}

/// One row per subscription, or a single empty-topic row for a parent with none.
/// Duplicate topics are kept.
pub fn join<'a, P, S, I>(fetched: I) -> Vec<ReportRow>
where
    P: ReportParent + 'a,
    S: ReportSubscription,
    I: IntoIterator<Item = (&'a P, Vec<S>)>,
{
    let mut rows = Vec::new();
    for (parent, subscriptions) in fetched {
        if subscriptions.is_empty() {
            rows.push(ReportRow::first(parent.identity(), ""));
            continue;
        }

        for (i, subscription) in subscriptions.iter().enumerate() {
            if i == 0 {
                rows.push(ReportRow::first(parent.identity(), subscription.topic()));
            } else {
                rows.push(ReportRow::continuation(subscription.topic()));
            }
        }
    }
    rows
}

/// Parent name, then each topic indented by four spaces.
pub fn progress<P: ReportParent, S: ReportSubscription>(parent: &P, subscriptions: &[S]) -> String {
    let mut out = format!("{}\n", parent.name());
    for subscription in subscriptions {
        out.push_str("    ");
        out.push_str(subscription.topic());
        out.push('\n');
    }
    out
}

// ========================================
// RESOURCE BINDINGS
// ========================================

impl ReportParent for MsgVpnClient {
    fn name(&self) -> &str {
        &self.client_name
    }

    fn identity(&self) -> Vec<String> {
        vec![self.client_name.clone(), self.client_username.clone()]
    }
}

impl ReportParent for MsgVpnQueue {
    fn name(&self) -> &str {
        &self.queue_name
    }

    fn identity(&self) -> Vec<String> {
        vec![
            self.queue_name.clone(),
            self.owner.clone().unwrap_or_default(),
            self.permission.clone().unwrap_or_default(),
        ]
    }
}

impl ReportSubscription for MsgVpnClientSubscription {
    fn topic(&self) -> &str {
        &self.subscription_topic
    }
}

impl ReportSubscription for MsgVpnQueueSubscription {
    fn topic(&self) -> &str {
        &self.subscription_topic
    }
}

// ==========================================
// TESTS
// ==========================================

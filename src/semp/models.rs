use serde::{Deserialize, Serialize};

use crate::semp::paging::Page;

// ========================================
// ENVELOPE
// ========================================

/// Every SEMP v2 collection response: `{ data: [...], meta: {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct SempResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<SempMeta>,
}

impl<T> SempResponse<T> {
    pub fn into_page(self) -> Page<T> {
        let next_cursor = self
            .meta
            .and_then(|meta| meta.paging)
            .map(|paging| paging.cursor_query)
            .filter(|cursor| !cursor.is_empty());
        Page::new(self.data, next_cursor)
    }
}

/// Error responses carry only the `meta` block.
#[derive(Debug, Clone, Deserialize)]
pub struct SempMetaOnlyResponse {
    pub meta: SempMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SempMeta {
    #[serde(default)]
    pub paging: Option<SempPaging>,
    #[serde(default)]
    pub error: Option<SempError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SempPaging {
    #[serde(default)]
    pub cursor_query: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SempError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ========================================
// RESOURCES
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgVpnClient {
    pub client_name: String,
    #[serde(default)]
    pub client_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgVpnClientSubscription {
    pub subscription_topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgVpnQueue {
    pub queue_name: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Access level granted to non-owners ("no-access", "read-only", "consume", ...).
    #[serde(default)]
    pub permission: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgVpnQueueSubscription {
    pub subscription_topic: String,
}

// ==========================================
// TESTS
// ==========================================

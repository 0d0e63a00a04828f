//! Wire types for the bookmark directory API.
//!
//! Field names follow the service's camelCase JSON. Every response is
//! wrapped in an [`ApiEnvelope`] whose `code` is the application-level
//! status: `0` means success, anything else is a service-side failure even
//! when the HTTP layer reported 200.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A tag attached to a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// One entry inside a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBookmark {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub namespace_id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Visit counter; the ranked "most visited" list orders by this.
    #[serde(default)]
    pub num: u64,
    #[serde(default)]
    pub star: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A recursive namespace node of the remote tree.
///
/// `children` is absent for leaf namespaces; deserialization defaults it
/// to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTreeNode {
    #[serde(default)]
    pub space_id: String,
    pub space_name: String,
    #[serde(default)]
    pub space_description: String,
    #[serde(default)]
    pub bookmarks: Vec<RemoteBookmark>,
    #[serde(default)]
    pub children: Vec<RemoteTreeNode>,
}

/// Request body for uploading a single bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_ids: Option<Vec<String>>,
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, mapping a non-zero `code` to
    /// [`SyncError::Application`].
    pub fn into_result(self) -> Result<T, SyncError> {
        if self.code != 0 {
            return Err(SyncError::Application {
                code: self.code,
                message: self.message,
            });
        }
        self.data.ok_or(SyncError::Application {
            code: 0,
            message: "response missing data".into(),
        })
    }
}

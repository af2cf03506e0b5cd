//! Remote data gateway.
//!
//! This module provides the typed boundary between the client and the school
//! backend's REST API: resources, page requests, records, and the `Gateway`
//! trait whose operations each issue exactly one HTTP request.

pub mod envelope;
pub mod error;
pub mod http;
pub mod record;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DeskError;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;
pub use record::Record;

/// Backend collections exposed by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Students,
    Teachers,
    Classrooms,
    Attendance,
    FeePosts,
    FeeReceipts,
    Notifications,
    Gallery,
    Events,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Students,
        Resource::Teachers,
        Resource::Classrooms,
        Resource::Attendance,
        Resource::FeePosts,
        Resource::FeeReceipts,
        Resource::Notifications,
        Resource::Gallery,
        Resource::Events,
    ];

    /// Path segment of this resource under the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Teachers => "teachers",
            Resource::Classrooms => "classrooms",
            Resource::Attendance => "attendance",
            Resource::FeePosts => "fee-posts",
            Resource::FeeReceipts => "fee-receipts",
            Resource::Notifications => "notifications",
            Resource::Gallery => "gallery",
            Resource::Events => "events",
        }
    }

    /// Columns shown first in tables, when the record has them
    pub fn preferred_columns(&self) -> &'static [&'static str] {
        match self {
            Resource::Students => &["id", "name", "class", "roll_no", "guardian"],
            Resource::Teachers => &["id", "name", "subject", "email"],
            Resource::Classrooms => &["id", "name", "teacher", "capacity"],
            Resource::Attendance => &["id", "class", "date", "present", "absent"],
            Resource::FeePosts => &["id", "title", "amount", "due_date"],
            Resource::FeeReceipts => &["id", "student", "amount", "paid_on"],
            Resource::Notifications => &["id", "title", "message", "created_at"],
            Resource::Gallery => &["id", "title", "url"],
            Resource::Events => &["id", "title", "start", "end"],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for Resource {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let resource = match normalized.as_str() {
            "students" | "student" => Resource::Students,
            "teachers" | "teacher" => Resource::Teachers,
            "classrooms" | "classroom" | "classes" => Resource::Classrooms,
            "attendance" => Resource::Attendance,
            "fee-posts" | "fee-post" | "fees" => Resource::FeePosts,
            "fee-receipts" | "fee-receipt" | "receipts" => Resource::FeeReceipts,
            "notifications" | "notification" => Resource::Notifications,
            "gallery" => Resource::Gallery,
            "events" | "event" | "calendar" => Resource::Events,
            _ => return Err(DeskError::UnknownResource(s.to_string())),
        };
        Ok(resource)
    }
}

/// Parameters of one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u32,
    /// Free-text filters passed through as query parameters
    pub filters: Vec<(String, String)>,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u32) -> Self {
        Self {
            offset,
            limit,
            filters: Vec::new(),
        }
    }
}

/// One page of records as returned by a list endpoint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub items: Vec<Record>,
    /// Total number of records, for endpoints that report it
    pub total: Option<u64>,
}

/// Target of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    One(String),
    All,
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::One(id) => write!(f, "{id}"),
            Recipient::All => write!(f, "everyone"),
        }
    }
}

/// Title and message of a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Client-side validation run before anything is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("notification title is required".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("notification message is required".to_string());
        }
        Ok(())
    }
}

/// Common interface for the school backend.
///
/// Each operation issues one request and resolves to exactly one result.
/// There are no retries; callers own retry policy.
pub trait Gateway: Send + Sync {
    /// Fetch one page of a resource
    fn list(
        &self,
        resource: Resource,
        request: &PageRequest,
    ) -> impl Future<Output = GatewayResult<Page>> + Send;

    /// Fetch a single record
    fn get(&self, resource: Resource, id: &str)
    -> impl Future<Output = GatewayResult<Record>> + Send;

    /// Create a record; resolves to the record as stored by the server
    fn create(
        &self,
        resource: Resource,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = GatewayResult<Record>> + Send;

    /// Replace a record's fields
    fn update(
        &self,
        resource: Resource,
        id: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = GatewayResult<Record>> + Send;

    /// Partially update a record
    fn patch(
        &self,
        resource: Resource,
        id: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = GatewayResult<Record>> + Send;

    /// Delete a record
    fn delete(&self, resource: Resource, id: &str)
    -> impl Future<Output = GatewayResult<()>> + Send;

    /// Free-text search within a resource
    fn search(
        &self,
        resource: Resource,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = GatewayResult<Vec<Record>>> + Send;

    /// Send a notification to one recipient or to everyone
    fn notify(
        &self,
        recipient: &Recipient,
        notification: &Notification,
    ) -> impl Future<Output = GatewayResult<()>> + Send;
}

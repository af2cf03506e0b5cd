//! HTTP implementation of the gateway over `reqwest`.
//!
//! The bearer token is attached with `RequestBuilder::bearer_auth`, which
//! marks the header as sensitive so it is redacted if reqwest logging is
//! turned on. Each request is bounded by the configured timeout; an expired
//! timeout surfaces as a transport error.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::session::Session;

use super::envelope::{parse_page, parse_record, parse_records};
use super::{
    Gateway, GatewayError, GatewayResult, Notification, Page, PageRequest, Recipient, Record,
    Resource,
};

/// Gateway talking to the school backend over HTTP
#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    session: Session,
}

impl HttpGateway {
    /// Create a gateway for `base_url` with the given session and timeout
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(DeskError::Config(format!(
                "base URL '{base_url}' cannot have path segments"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Create a gateway from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.base_url(),
            Session::from_config(config),
            config.request_timeout(),
        )
    }

    /// Build the URL for `segments` below the base URL.
    ///
    /// Segments are percent-encoded, so record ids can never escape their
    /// path position.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    /// Attach auth, send, and return the body of a successful response
    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> GatewayResult<String> {
        let token = self.session.bearer()?;

        let mut request: RequestBuilder = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "gateway request");

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "gateway transport failure");
            GatewayError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = GatewayError::from_response(status, &text);
            debug!(%method, %url, status = status.as_u16(), "gateway error response");
            return Err(err);
        }

        Ok(text)
    }
}

impl Gateway for HttpGateway {
    async fn list(&self, resource: Resource, request: &PageRequest) -> GatewayResult<Page> {
        let mut url = self.endpoint(&[resource.path(), "showall"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("offset", &request.offset.to_string());
            query.append_pair("limit", &request.limit.to_string());
            for (key, value) in &request.filters {
                query.append_pair(key, value);
            }
        }

        let body = self.send(Method::GET, url, None).await?;
        parse_page(&body)
    }

    async fn get(&self, resource: Resource, id: &str) -> GatewayResult<Record> {
        let url = self.endpoint(&[resource.path(), id]);
        let body = self.send(Method::GET, url, None).await?;
        parse_record(&body)
    }

    async fn create(
        &self,
        resource: Resource,
        fields: &Map<String, Value>,
    ) -> GatewayResult<Record> {
        let url = self.endpoint(&[resource.path(), "create"]);
        let payload = Value::Object(fields.clone());
        let body = self.send(Method::POST, url, Some(&payload)).await?;
        parse_record(&body)
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        fields: &Map<String, Value>,
    ) -> GatewayResult<Record> {
        let url = self.endpoint(&[resource.path(), id]);
        let payload = Value::Object(fields.clone());
        let body = self.send(Method::PUT, url, Some(&payload)).await?;
        parse_record(&body)
    }

    async fn patch(
        &self,
        resource: Resource,
        id: &str,
        fields: &Map<String, Value>,
    ) -> GatewayResult<Record> {
        let url = self.endpoint(&[resource.path(), id]);
        let payload = Value::Object(fields.clone());
        let body = self.send(Method::PATCH, url, Some(&payload)).await?;
        parse_record(&body)
    }

    async fn delete(&self, resource: Resource, id: &str) -> GatewayResult<()> {
        let url = self.endpoint(&[resource.path(), id]);
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn search(
        &self,
        resource: Resource,
        query: &str,
        limit: u32,
    ) -> GatewayResult<Vec<Record>> {
        let mut url = self.endpoint(&[resource.path(), "search"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());

        let body = self.send(Method::GET, url, None).await?;
        parse_records(&body)
    }

    async fn notify(
        &self,
        recipient: &Recipient,
        notification: &Notification,
    ) -> GatewayResult<()> {
        let url = self.endpoint(&[Resource::Notifications.path(), "send"]);
        let payload = notification_payload(recipient, notification);
        self.send(Method::POST, url, Some(&payload)).await?;
        Ok(())
    }
}

/// Request body for the notification-send endpoint
fn notification_payload(recipient: &Recipient, notification: &Notification) -> Value {
    match recipient {
        Recipient::One(id) => json!({
            "title": notification.title,
            "message": notification.message,
            "recipient_id": id,
            "broadcast": false,
        }),
        Recipient::All => json!({
            "title": notification.title,
            "message": notification.message,
            "broadcast": true,
        }),
    }
}

//! In-memory gateway used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Map, Value, json};

use crate::gateway::{
    Gateway, GatewayError, GatewayResult, Notification, Page, PageRequest, Recipient, Record,
    Resource,
};

/// `count` records with ids `{prefix}001`, `{prefix}002`, ...
pub fn records(prefix: &str, count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| {
            serde_json::from_value(json!({
                "id": format!("{prefix}{i:03}"),
                "name": format!("Name {i}"),
            }))
            .unwrap()
        })
        .collect()
}

pub fn record(value: Value) -> Record {
    serde_json::from_value(value).unwrap()
}

#[derive(Default)]
pub struct FakeGateway {
    records: Mutex<Vec<Record>>,
    report_total: bool,
    latency: Duration,
    write_latency: Option<Duration>,
    search_latency: Mutex<HashMap<String, Duration>>,

    list_requests: Mutex<Vec<PageRequest>>,
    fail_next_list: Mutex<Option<GatewayError>>,
    fail_writes: Mutex<Option<GatewayError>>,

    delete_calls: AtomicUsize,
    update_calls: AtomicUsize,
    create_calls: AtomicUsize,
    searches: Mutex<Vec<String>>,
    notifications: Mutex<Vec<(Recipient, Notification)>>,
}

impl FakeGateway {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn reporting_total(mut self) -> Self {
        self.report_total = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay for create/update/delete/notify, overriding the common latency
    pub fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    /// Store `record` as the backend's current version, as if edited elsewhere
    pub fn put(&self, record: Record) {
        let mut records = self.records.lock();
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub fn set_search_latency(&self, query: &str, latency: Duration) {
        self.search_latency
            .lock()
            .insert(query.to_string(), latency);
    }

    pub fn fail_next_list(&self, err: GatewayError) {
        *self.fail_next_list.lock() = Some(err);
    }

    /// Make every create/update/delete/notify fail until cleared
    pub fn fail_writes(&self, err: Option<GatewayError>) {
        *self.fail_writes.lock() = err;
    }

    pub fn list_calls(&self) -> usize {
        self.list_requests.lock().len()
    }

    pub fn list_requests(&self) -> Vec<PageRequest> {
        self.list_requests.lock().clone()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().clone()
    }

    pub fn notifications(&self) -> Vec<(Recipient, Notification)> {
        self.notifications.lock().clone()
    }

    async fn wait(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    async fn wait_write(&self) {
        self.wait(self.write_latency.unwrap_or(self.latency)).await;
    }

    fn write_failure(&self) -> GatewayResult<()> {
        match self.fail_writes.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Gateway for FakeGateway {
    async fn list(&self, _resource: Resource, request: &PageRequest) -> GatewayResult<Page> {
        self.list_requests.lock().push(request.clone());
        self.wait(self.latency).await;

        if let Some(err) = self.fail_next_list.lock().take() {
            return Err(err);
        }

        let records = self.records.lock();
        let start = (request.offset as usize).min(records.len());
        let end = (start + request.limit as usize).min(records.len());
        Ok(Page {
            items: records[start..end].to_vec(),
            total: self.report_total.then_some(records.len() as u64),
        })
    }

    async fn get(&self, _resource: Resource, id: &str) -> GatewayResult<Record> {
        self.wait(self.latency).await;
        self.records
            .lock()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| GatewayError::Api {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "Not found".to_string(),
            })
    }

    async fn create(
        &self,
        _resource: Resource,
        fields: &Map<String, Value>,
    ) -> GatewayResult<Record> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_write().await;
        self.write_failure()?;

        let mut fields = fields.clone();
        let id = format!("NEW{:03}", self.create_calls());
        fields.insert("id".to_string(), Value::String(id));
        let created = Record::from_fields(fields).map_err(GatewayError::transport)?;
        self.records.lock().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        _resource: Resource,
        id: &str,
        fields: &Map<String, Value>,
    ) -> GatewayResult<Record> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_write().await;
        self.write_failure()?;

        let mut records = self.records.lock();
        let existing = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| GatewayError::Api {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "Not found".to_string(),
            })?;
        let mut updated = existing.merged(fields).fields().clone();
        updated.insert("updated".to_string(), Value::Bool(true));
        *existing = Record::from_fields(updated).map_err(GatewayError::transport)?;
        Ok(existing.clone())
    }

    async fn patch(
        &self,
        resource: Resource,
        id: &str,
        fields: &Map<String, Value>,
    ) -> GatewayResult<Record> {
        self.update(resource, id, fields).await
    }

    async fn delete(&self, _resource: Resource, id: &str) -> GatewayResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_write().await;
        self.write_failure()?;
        self.records.lock().retain(|r| r.id() != id);
        Ok(())
    }

    async fn search(
        &self,
        _resource: Resource,
        query: &str,
        limit: u32,
    ) -> GatewayResult<Vec<Record>> {
        self.searches.lock().push(query.to_string());
        let latency = self
            .search_latency
            .lock()
            .get(query)
            .copied()
            .unwrap_or(self.latency);
        self.wait(latency).await;

        let needle = query.to_lowercase();
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|r| {
                r.fields()
                    .values()
                    .any(|v| v.as_str().is_some_and(|s| s.to_lowercase().contains(&needle)))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn notify(
        &self,
        recipient: &Recipient,
        notification: &Notification,
    ) -> GatewayResult<()> {
        self.wait_write().await;
        self.write_failure()?;
        self.notifications
            .lock()
            .push((recipient.clone(), notification.clone()));
        Ok(())
    }
}

//! Blocking HTTP implementation of [`ScheduleStore`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use shiftgrid_engine::ids::{PositionId, RowId, ScheduleId};
use shiftgrid_engine::schedule::{Cell, Row, Schedule};

use crate::store::ScheduleStore;
use crate::types::{CellWrite, RowPatch, SchedulePatch, ScheduleRecord};
use crate::StoreError;

/// Schedule store API client (blocking).
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: Option<String>,
}

impl StoreClient {
    /// Create a client against an API base like `https://host/api`.
    /// Fails only if the TLS backend cannot initialize.
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Result<Self, StoreError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("sgrid/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(StoreClient {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn send(&self, req: reqwest::blocking::RequestBuilder) -> Result<reqwest::blocking::Response, StoreError> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let response = req.send().map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            if (400..500).contains(&status) {
                return Err(StoreError::Validation(api_message(status, &body)));
            }
            return Err(StoreError::Http(status, body));
        }

        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        self.send(self.http.get(self.url(path)))?
            .json::<T>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, StoreError> {
        self.send(self.http.post(self.url(path)).json(body))?
            .json::<T>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, StoreError> {
        self.send(self.http.patch(self.url(path)).json(body))?
            .json::<T>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// Pull the server's `message` field out of an error body, falling back
/// to the whole body.
fn api_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

impl ScheduleStore for StoreClient {
    fn batch_update_cells(
        &self,
        schedule_id: ScheduleId,
        items: &[CellWrite],
    ) -> Result<Vec<Cell>, StoreError> {
        log::debug!(
            "batch_update_cells: schedule {} ({} items)",
            schedule_id,
            items.len()
        );
        self.post_json(
            &format!("/schedules/{}/cells/batch", schedule_id),
            &serde_json::json!({ "items": items }),
        )
    }

    fn create_row(
        &self,
        schedule_id: ScheduleId,
        position_id: PositionId,
    ) -> Result<Row, StoreError> {
        self.post_json(
            &format!("/schedules/{}/rows", schedule_id),
            &serde_json::json!({ "positionId": position_id }),
        )
    }

    fn update_row(
        &self,
        schedule_id: ScheduleId,
        row_id: RowId,
        patch: &RowPatch,
    ) -> Result<Row, StoreError> {
        self.patch_json(&format!("/schedules/{}/rows/{}", schedule_id, row_id), patch)
    }

    fn delete_row(&self, schedule_id: ScheduleId, row_id: RowId) -> Result<(), StoreError> {
        self.send(
            self.http
                .delete(self.url(&format!("/schedules/{}/rows/{}", schedule_id, row_id))),
        )?;
        Ok(())
    }

    fn get_schedule(&self, schedule_id: ScheduleId) -> Result<Schedule, StoreError> {
        let record: ScheduleRecord = self.get_json(&format!("/schedules/{}", schedule_id))?;
        Ok(record.into_schedule())
    }

    fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        patch: &SchedulePatch,
    ) -> Result<Schedule, StoreError> {
        let record: ScheduleRecord =
            self.patch_json(&format!("/schedules/{}", schedule_id), patch)?;
        Ok(record.into_schedule())
    }
}

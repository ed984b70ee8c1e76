use crate::types::OperatingMode;
use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client, Url,
    multipart::{Form, Part},
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct NetworkChange {
    pub new_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BrokerChange {
    pub mode: OperatingMode,
    pub mqtt_address: String,
    pub mqtt_username: String,
    pub mqtt_password: String,
}

#[derive(Debug, Serialize)]
pub struct BackendChange {
    pub mode: OperatingMode,
    pub backend_url: String,
    pub backend_port: String,
}

#[derive(Debug, Serialize)]
pub struct IntervalChange {
    pub mode: OperatingMode,
    pub interval: u32,
}

/// HTTP client for the device-resident configuration endpoints.
///
/// Every submission is fire-and-forget: the response is never inspected and
/// delivery failures are dropped. There is no retry, no timeout and no
/// cancellation.
#[derive(Clone, Debug)]
pub struct DeviceClient {
    http: Client,
    base_url: Url,
}

impl DeviceClient {
    pub fn new(device_url: &str) -> Result<Self> {
        let base_url = Url::parse(device_url)
            .with_context(|| format!("failed to parse device url {device_url:?}"))?;

        let http = Client::builder()
            .build()
            .context("failed to create http client")?;

        Ok(Self { http, base_url })
    }

    pub async fn change_ip(&self, change: &NetworkChange) {
        debug!("change_ip() called");
        self.fire_and_forget(self.http.post(self.endpoint("/change-ip")).form(change))
            .await;
    }

    pub async fn change_mqtt(&self, change: &BrokerChange) {
        debug!("change_mqtt() called");
        self.fire_and_forget(self.http.post(self.endpoint("/change-mqtt")).form(change))
            .await;
    }

    pub async fn change_backend(&self, change: &BackendChange) {
        debug!("change_backend() called");
        self.fire_and_forget(self.http.post(self.endpoint("/change-backend")).form(change))
            .await;
    }

    pub async fn change_interval(&self, change: &IntervalChange) {
        debug!("change_interval() called");
        self.fire_and_forget(self.http.post(self.endpoint("/change-interval")).form(change))
            .await;
    }

    pub async fn upload_model(&self, file: &Path) {
        debug!("upload_model() called with {}", file.display());

        let part = match file_part(file).await {
            Ok(part) => part,
            Err(e) => {
                debug!("model upload skipped: {e:#}");
                return;
            }
        };

        let form = Form::new().part("file", part);
        self.fire_and_forget(
            self.http
                .post(self.endpoint("/api/upload-model"))
                .multipart(form),
        )
        .await;
    }

    /// Generic file drop onto the device: the file lands at `target_path`.
    pub async fn upload_file(&self, file: &Path, target_path: &str) {
        debug!(
            "upload_file() called with {} -> {target_path}",
            file.display()
        );

        let part = match file_part(file).await {
            Ok(part) => part,
            Err(e) => {
                debug!("file upload skipped: {e:#}");
                return;
            }
        };

        let form = Form::new()
            .part("file", part)
            .text("target_path", target_path.to_string());
        self.fire_and_forget(self.http.post(self.endpoint("/upload-file")).multipart(form))
            .await;
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    // Responses are never inspected; delivery failures are dropped.
    async fn fire_and_forget(&self, request: reqwest::RequestBuilder) {
        if let Err(e) = request.send().await {
            debug!("request not delivered: {e:#}");
        }
    }
}

async fn file_part(file: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    Ok(Part::bytes(bytes).file_name(name))
}

use crate::device_client::{
    BackendChange, BrokerChange, DeviceClient, IntervalChange, NetworkChange,
};
use crate::types::{BackendSettings, BrokerSettings, FormProfile, NetworkSettings, OperatingMode};
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

/// Precondition failures surfaced to the operator before any request is
/// issued. Everything past validation is fire-and-forget.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("IP address and subnet mask must be set together or left empty together")]
    PairedFieldMismatch,
    #[error("upload interval must be at least {min} seconds, got {got}")]
    IntervalTooLow { min: u32, got: u32 },
    #[error("no model file selected")]
    MissingFile,
}

/// Holds the operator's draft values and turns them into one-shot device
/// submissions, one per setting group.
///
/// Drafts are plain fields behind explicit setters. They are never cleared
/// or reset after a submission, and nothing stops overlapping submissions of
/// the same group.
pub struct FormController {
    client: DeviceClient,
    profile: FormProfile,
    mode: OperatingMode,
    network: NetworkSettings,
    broker: BrokerSettings,
    backend: BackendSettings,
    interval_secs: u32,
    model_file: Option<PathBuf>,
}

impl FormController {
    pub fn new(client: DeviceClient, profile: FormProfile) -> Self {
        Self {
            client,
            profile,
            mode: profile.default_mode,
            network: NetworkSettings::default(),
            broker: BrokerSettings::default(),
            backend: BackendSettings::default(),
            interval_secs: profile.min_interval_secs,
            model_file: None,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.mode = mode;
    }

    pub fn set_ip(&mut self, ip: String) {
        self.network.ip = ip;
    }

    pub fn set_subnet_mask(&mut self, subnet_mask: String) {
        self.network.subnet_mask = subnet_mask;
    }

    pub fn set_gateway(&mut self, gateway: String) {
        self.network.gateway = gateway;
    }

    pub fn set_dns1(&mut self, dns1: String) {
        self.network.dns1 = dns1;
    }

    pub fn set_dns2(&mut self, dns2: String) {
        self.network.dns2 = dns2;
    }

    pub fn set_broker_address(&mut self, address: String) {
        self.broker.address = address;
    }

    pub fn set_broker_username(&mut self, username: String) {
        self.broker.username = username;
    }

    pub fn set_broker_password(&mut self, password: String) {
        self.broker.password = password;
    }

    pub fn set_backend_url(&mut self, url: String) {
        self.backend.url = url;
    }

    pub fn set_backend_port(&mut self, port: String) {
        self.backend.port = port;
    }

    pub fn set_interval_secs(&mut self, seconds: u32) {
        self.interval_secs = seconds;
    }

    pub fn select_model_file(&mut self, file: PathBuf) {
        self.model_file = Some(file);
    }

    /// Submit the network addressing group to `/change-ip`.
    ///
    /// With extended network fields, IP and subnet mask must be jointly empty
    /// or jointly set; every field is then sent, empty ones as empty strings.
    /// The minimal variant has no precondition and sends only `new_ip`.
    pub async fn submit_network(&self) -> Result<(), ValidationError> {
        debug!("submit_network() called");
        let change = self.network_change()?;
        self.client.change_ip(&change).await;
        Ok(())
    }

    /// Submit the broker credentials group to `/change-mqtt`.
    pub async fn submit_broker(&self) -> Result<(), ValidationError> {
        debug!("submit_broker() called");
        let change = self.broker_change();
        self.client.change_mqtt(&change).await;
        Ok(())
    }

    /// Submit the backend endpoint group to `/change-backend`.
    pub async fn submit_backend(&self) -> Result<(), ValidationError> {
        debug!("submit_backend() called");
        let change = self.backend_change();
        self.client.change_backend(&change).await;
        Ok(())
    }

    /// Submit the telemetry upload interval to `/change-interval`.
    pub async fn submit_interval(&self) -> Result<(), ValidationError> {
        debug!("submit_interval() called");
        let change = self.interval_change()?;
        self.client.change_interval(&change).await;
        Ok(())
    }

    /// Upload the selected model file to `/api/upload-model`.
    pub async fn submit_model(&self) -> Result<(), ValidationError> {
        debug!("submit_model() called");
        let file = self.model_file.as_ref().ok_or(ValidationError::MissingFile)?;
        self.client.upload_model(file).await;
        Ok(())
    }

    fn network_change(&self) -> Result<NetworkChange, ValidationError> {
        let network = &self.network;

        if !self.profile.extended_network {
            return Ok(NetworkChange {
                new_ip: network.ip.clone(),
                subnet_mask: None,
                gateway: None,
                dns1: None,
                dns2: None,
            });
        }

        if network.ip.is_empty() != network.subnet_mask.is_empty() {
            return Err(ValidationError::PairedFieldMismatch);
        }

        Ok(NetworkChange {
            new_ip: network.ip.clone(),
            subnet_mask: Some(network.subnet_mask.clone()),
            gateway: Some(network.gateway.clone()),
            dns1: Some(network.dns1.clone()),
            dns2: Some(network.dns2.clone()),
        })
    }

    fn broker_change(&self) -> BrokerChange {
        BrokerChange {
            mode: self.mode,
            mqtt_address: self.broker.address.clone(),
            mqtt_username: self.broker.username.clone(),
            mqtt_password: self.broker.password.clone(),
        }
    }

    fn backend_change(&self) -> BackendChange {
        BackendChange {
            mode: self.mode,
            backend_url: self.backend.url.clone(),
            backend_port: self.backend.port.clone(),
        }
    }

    fn interval_change(&self) -> Result<IntervalChange, ValidationError> {
        if self.interval_secs < self.profile.min_interval_secs {
            return Err(ValidationError::IntervalTooLow {
                min: self.profile.min_interval_secs,
                got: self.interval_secs,
            });
        }

        Ok(IntervalChange {
            mode: self.mode,
            interval: self.interval_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(profile: FormProfile) -> FormController {
        let client = DeviceClient::new("http://127.0.0.1:9").expect("client");
        FormController::new(client, profile)
    }

    mod network {
        use super::*;

        #[test]
        fn rejects_ip_without_subnet_mask() {
            let mut controller = controller(FormProfile::full());
            controller.set_ip("192.168.1.50".to_string());
            controller.set_subnet_mask(String::new());

            assert_eq!(
                controller.network_change().unwrap_err(),
                ValidationError::PairedFieldMismatch
            );
        }

        #[test]
        fn rejects_subnet_mask_without_ip() {
            // The draft default subnet mask alone already trips the pairing
            // rule, same as on the original page.
            let controller = controller(FormProfile::full());

            assert_eq!(
                controller.network_change().unwrap_err(),
                ValidationError::PairedFieldMismatch
            );
        }

        #[test]
        fn accepts_both_fields_empty_and_keeps_empty_strings() {
            let mut controller = controller(FormProfile::full());
            controller.set_subnet_mask(String::new());

            let change = controller.network_change().expect("change");
            assert_eq!(change.new_ip, "");
            assert_eq!(change.subnet_mask.as_deref(), Some(""));
            assert_eq!(change.gateway.as_deref(), Some(""));
            assert_eq!(change.dns1.as_deref(), Some(""));
            assert_eq!(change.dns2.as_deref(), Some(""));
        }

        #[test]
        fn accepts_both_fields_set() {
            let mut controller = controller(FormProfile::full());
            controller.set_ip("192.168.1.50".to_string());
            controller.set_gateway("192.168.1.1".to_string());

            let change = controller.network_change().expect("change");
            assert_eq!(change.new_ip, "192.168.1.50");
            assert_eq!(change.subnet_mask.as_deref(), Some("255.255.255.0"));
            assert_eq!(change.gateway.as_deref(), Some("192.168.1.1"));
        }

        #[test]
        fn minimal_profile_has_no_pairing_rule_and_sends_only_ip() {
            let mut controller = controller(FormProfile::minimal());
            controller.set_ip("10.0.0.9".to_string());

            let change = controller.network_change().expect("change");
            assert_eq!(change.new_ip, "10.0.0.9");
            assert_eq!(change.subnet_mask, None);
            assert_eq!(change.gateway, None);
            assert_eq!(change.dns1, None);
            assert_eq!(change.dns2, None);
        }
    }

    mod interval {
        use super::*;

        #[test]
        fn rejects_interval_below_minimum() {
            let mut controller = controller(FormProfile::full());
            controller.set_interval_secs(4);

            assert_eq!(
                controller.interval_change().unwrap_err(),
                ValidationError::IntervalTooLow { min: 5, got: 4 }
            );
        }

        #[test]
        fn accepts_interval_at_minimum() {
            let controller = controller(FormProfile::full());

            let change = controller.interval_change().expect("change");
            assert_eq!(change.interval, 5);
        }

        #[test]
        fn interval_echoes_selected_mode() {
            let mut controller = controller(FormProfile::full());
            controller.set_mode(OperatingMode::Wind);
            controller.set_interval_secs(30);

            let change = controller.interval_change().expect("change");
            assert_eq!(change.mode, OperatingMode::Wind);
            assert_eq!(change.interval, 30);
        }
    }

    mod mode_echo {
        use super::*;

        #[test]
        fn broker_change_carries_mode_at_call_time() {
            let mut controller = controller(FormProfile::full());
            controller.set_broker_address("broker.local".to_string());
            controller.set_broker_username("dev".to_string());
            controller.set_broker_password("pw".to_string());

            assert_eq!(controller.broker_change().mode, OperatingMode::Elevator);

            controller.set_mode(OperatingMode::Wind);
            assert_eq!(controller.broker_change().mode, OperatingMode::Wind);
        }

        #[test]
        fn backend_change_carries_mode_and_fields() {
            let mut controller = controller(FormProfile::minimal());
            controller.set_backend_url("203.0.113.7".to_string());
            controller.set_backend_port("8443".to_string());

            let change = controller.backend_change();
            assert_eq!(change.mode, OperatingMode::Wind);
            assert_eq!(change.backend_url, "203.0.113.7");
            assert_eq!(change.backend_port, "8443");
        }
    }

    mod model_file {
        use super::*;

        #[tokio::test]
        async fn submit_without_selected_file_fails() {
            let controller = controller(FormProfile::full());

            assert_eq!(
                controller.submit_model().await.unwrap_err(),
                ValidationError::MissingFile
            );
        }
    }

    #[test]
    fn defaults_follow_the_profile() {
        let full = controller(FormProfile::full());
        let minimal = controller(FormProfile::minimal());

        assert_eq!(full.mode(), OperatingMode::Elevator);
        assert_eq!(minimal.mode(), OperatingMode::Wind);
        assert_eq!(full.interval_secs, 5);
    }
}

pub mod controller;
pub mod device_client;
pub mod drafts;
pub mod types;

pub use crate::{
    controller::{FormController, ValidationError},
    device_client::DeviceClient,
    drafts::DraftFile,
    types::{BackendSettings, BrokerSettings, FormProfile, NetworkSettings, OperatingMode},
};

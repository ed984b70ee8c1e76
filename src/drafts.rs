use crate::types::{BackendSettings, BrokerSettings, NetworkSettings, OperatingMode};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Draft values read from a TOML file for the `apply` subcommand.
///
/// Only the groups present in the file are submitted; partial tables fall
/// back to the draft defaults (e.g. the subnet mask).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftFile {
    pub mode: Option<OperatingMode>,
    pub network: Option<NetworkSettings>,
    pub broker: Option<BrokerSettings>,
    pub backend: Option<BackendSettings>,
    pub interval_secs: Option<u32>,
    pub model_file: Option<PathBuf>,
}

impl DraftFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read draft file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse draft file {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid draft file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_draft_file() {
        let drafts = DraftFile::parse(
            r#"
            mode = "wind"
            interval_secs = 30

            [network]
            ip = "192.168.1.50"
            gateway = "192.168.1.1"

            [broker]
            address = "broker.local"
            username = "dev"
            password = "pw"

            [backend]
            url = "203.0.113.7"
            port = "8443"
            "#,
        )
        .expect("parse");

        assert_eq!(drafts.mode, Some(OperatingMode::Wind));
        assert_eq!(drafts.interval_secs, Some(30));
        assert_eq!(drafts.broker.as_ref().map(|b| b.address.as_str()), Some("broker.local"));
        assert_eq!(drafts.backend.as_ref().map(|b| b.port.as_str()), Some("8443"));
        assert!(drafts.model_file.is_none());
    }

    #[test]
    fn partial_network_table_inherits_subnet_default() {
        let drafts = DraftFile::parse(
            r#"
            [network]
            ip = "192.168.1.50"
            "#,
        )
        .expect("parse");

        let network = drafts.network.expect("network group");
        assert_eq!(network.ip, "192.168.1.50");
        assert_eq!(network.subnet_mask, "255.255.255.0");
        assert!(network.dns1.is_empty());
    }

    #[test]
    fn absent_groups_stay_absent() {
        let drafts = DraftFile::parse("interval_secs = 7\n").expect("parse");

        assert!(drafts.network.is_none());
        assert!(drafts.broker.is_none());
        assert!(drafts.backend.is_none());
        assert_eq!(drafts.interval_secs, Some(7));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(DraftFile::parse("upload_interval = 7\n").is_err());
        assert!(
            DraftFile::parse(
                r#"
                [network]
                ipaddr = "192.168.1.50"
                "#,
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(DraftFile::parse(r#"mode = "solar""#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let result = DraftFile::load(Path::new("/nonexistent/drafts.toml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to read draft file")
        );
    }
}

use anyhow::{Result, ensure};
use clap::{Parser, Subcommand, ValueEnum};
use edge_admin::{DeviceClient, DraftFile, FormController, FormProfile, OperatingMode};
use env_logger::{Builder, Env, Target};
use log::{debug, error};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "edge-admin", version, about)]
struct Cli {
    /// Base URL of the device, e.g. http://192.168.1.50
    #[arg(long, env = "DEVICE_URL")]
    device_url: String,

    /// Operating mode echoed into most submissions
    #[arg(long, value_enum)]
    mode: Option<OperatingMode>,

    /// Which variant of the admin form to run as
    #[arg(long, value_enum, default_value = "full")]
    profile: Profile,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Full,
    Minimal,
}

#[derive(Subcommand)]
enum Command {
    /// Submit network addressing to /change-ip
    Network {
        #[arg(long, default_value = "")]
        ip: String,
        /// Defaults to 255.255.255.0 when not given; pass an empty string
        /// together with an empty --ip to leave the group untouched
        #[arg(long)]
        subnet_mask: Option<String>,
        #[arg(long, default_value = "")]
        gateway: String,
        #[arg(long, default_value = "")]
        dns1: String,
        #[arg(long, default_value = "")]
        dns2: String,
    },
    /// Submit broker credentials to /change-mqtt
    Broker {
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Submit the backend endpoint to /change-backend
    Backend {
        #[arg(long)]
        url: String,
        #[arg(long)]
        port: String,
    },
    /// Submit the telemetry upload interval to /change-interval
    Interval {
        #[arg(long)]
        seconds: u32,
    },
    /// Upload a model file to /api/upload-model
    UploadModel {
        #[arg(long)]
        file: PathBuf,
    },
    /// Drop an arbitrary file onto the device at the given path
    PutFile {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        target_path: String,
    },
    /// Read drafts from a TOML file and submit every group present in it
    Apply {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    debug!("edge-admin {}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = DeviceClient::new(&cli.device_url)?;

    let profile = match cli.profile {
        Profile::Full => FormProfile::full(),
        Profile::Minimal => FormProfile::minimal(),
    };

    let mut controller = FormController::new(client.clone(), profile);

    if let Some(mode) = cli.mode {
        controller.set_mode(mode);
    }

    match cli.command {
        Command::Network {
            ip,
            subnet_mask,
            gateway,
            dns1,
            dns2,
        } => {
            controller.set_ip(ip);
            if let Some(subnet_mask) = subnet_mask {
                controller.set_subnet_mask(subnet_mask);
            }
            controller.set_gateway(gateway);
            controller.set_dns1(dns1);
            controller.set_dns2(dns2);
            controller.submit_network().await?;
        }
        Command::Broker {
            address,
            username,
            password,
        } => {
            controller.set_broker_address(address);
            controller.set_broker_username(username);
            controller.set_broker_password(password);
            controller.submit_broker().await?;
        }
        Command::Backend { url, port } => {
            controller.set_backend_url(url);
            controller.set_backend_port(port);
            controller.submit_backend().await?;
        }
        Command::Interval { seconds } => {
            controller.set_interval_secs(seconds);
            controller.submit_interval().await?;
        }
        Command::UploadModel { file } => {
            ensure!(file.is_file(), "model file {} not found", file.display());
            controller.select_model_file(file);
            controller.submit_model().await?;
        }
        Command::PutFile { file, target_path } => {
            ensure!(file.is_file(), "file {} not found", file.display());
            client.upload_file(&file, &target_path).await;
        }
        Command::Apply { file } => {
            apply_drafts(&mut controller, &file).await?;
        }
    }

    Ok(())
}

/// Submit every group present in the draft file, each as its own independent
/// request; the first validation error aborts the remainder.
async fn apply_drafts(controller: &mut FormController, path: &Path) -> Result<()> {
    let drafts = DraftFile::load(path)?;

    if let Some(mode) = drafts.mode {
        controller.set_mode(mode);
    }

    if let Some(network) = drafts.network {
        controller.set_ip(network.ip);
        controller.set_subnet_mask(network.subnet_mask);
        controller.set_gateway(network.gateway);
        controller.set_dns1(network.dns1);
        controller.set_dns2(network.dns2);
        controller.submit_network().await?;
    }

    if let Some(broker) = drafts.broker {
        controller.set_broker_address(broker.address);
        controller.set_broker_username(broker.username);
        controller.set_broker_password(broker.password);
        controller.submit_broker().await?;
    }

    if let Some(backend) = drafts.backend {
        controller.set_backend_url(backend.url);
        controller.set_backend_port(backend.port);
        controller.submit_backend().await?;
    }

    if let Some(seconds) = drafts.interval_secs {
        controller.set_interval_secs(seconds);
        controller.submit_interval().await?;
    }

    if let Some(model_file) = drafts.model_file {
        ensure!(
            model_file.is_file(),
            "model file {} not found",
            model_file.display()
        );
        controller.select_model_file(model_file);
        controller.submit_model().await?;
    }

    Ok(())
}

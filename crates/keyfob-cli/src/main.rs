//! keyfob CLI
//!
//! Verifies a one-time password against the YubiCloud validation service
//! (or any compatible endpoint set) and reports the verdict: exit code 0
//! when the OTP is valid and authorized, 1 when it is rejected by policy
//! or the allow-list, 2 when verification itself fails.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyfob_cli::config::FileConfig;
use keyfob_otp::{ApiCredential, OtpVerifier, VerifierConfig, public_id};

#[derive(Parser, Debug)]
#[command(name = "keyfob")]
#[command(version, about = "Verify a YubiKey one-time password remotely")]
struct Cli {
    /// The one-time password to verify.
    otp: String,

    /// API client id issued by the validation service.
    #[arg(long, env = "KEYFOB_CLIENT_ID")]
    client_id: Option<String>,

    /// Base64 API secret key issued by the validation service.
    #[arg(long, env = "KEYFOB_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Device public id to authorize. Repeatable; omit to accept any device.
    #[arg(long = "device", value_name = "PUBLIC_ID")]
    devices: Vec<String>,

    /// Accept only factory-programmed ("cc") devices.
    #[arg(long)]
    factory_only: bool,

    /// Overall verification deadline in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The verdict owns stdout; diagnostics go to stderr.
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "keyfob=info".into()),
    );
    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(?err, "Verification aborted");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let file = FileConfig::load()?;

    let client_id = cli.client_id.or(file.client_id).ok_or_else(|| {
        anyhow::anyhow!(
            "No client id: pass --client-id, set KEYFOB_CLIENT_ID, or add client_id to the config file"
        )
    })?;
    let secret_key = cli.secret_key.or(file.secret_key).ok_or_else(|| {
        anyhow::anyhow!(
            "No secret key: pass --secret-key, set KEYFOB_SECRET_KEY, or add secret_key to the config file"
        )
    })?;

    let mut config = VerifierConfig::new(ApiCredential {
        client_id,
        secret_key,
    });
    config.factory_only = cli.factory_only || file.factory_only.unwrap_or(false);
    if let Some(secs) = cli.timeout_secs.or(file.timeout_secs) {
        config.timeout = Duration::from_secs(secs);
    }

    let verifier = OtpVerifier::new(config)?;
    debug!(
        devices = cli.devices.len(),
        "Submitting OTP for verification"
    );

    let result = if cli.devices.is_empty() {
        verifier.verify(&cli.otp).await
    } else {
        let devices: Vec<&str> = cli.devices.iter().map(String::as_str).collect();
        verifier.verify_any(&cli.otp, &devices).await
    };

    Ok(report(&cli.otp, result))
}

/// Print the verdict line and map the outcome to the exit-code contract.
#[allow(clippy::print_stdout)]
fn report(otp: &str, result: keyfob_otp::Result<bool>) -> ExitCode {
    match result {
        Ok(true) => {
            println!("OK: {} accepted", public_id(otp));
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("REJECTED: {} not authorized", public_id(otp));
            ExitCode::from(1)
        }
        Err(err) => {
            println!("FAILED: {err}");
            ExitCode::from(2)
        }
    }
}

// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! dormwatch - scheduled dormitory electricity and roll-call notifier.
//!
//! This is the binary entry point. Each subcommand runs one job to
//! completion and exits; scheduling is left to cron or CI.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dormwatch_config::{render_errors, DormwatchConfig, ElecSettings, RollcallSettings};
use dormwatch_core::{DormwatchError, Notifier};
use dormwatch_dingtalk::DingTalkNotifier;
use dormwatch_elec::BalanceClient;
use dormwatch_qmsg::QmsgNotifier;
use dormwatch_rollcall::HttpRosterSource;
use secrecy::ExposeSecret;
use tracing::error;

/// dormwatch - dormitory electricity balance and roll-call notifier.
#[derive(Parser, Debug)]
#[command(name = "dormwatch", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Query every configured room and post reports to DingTalk.
    Elec,
    /// Summarize the evening roll-call and push it to Qmsg recipients.
    Rollcall,
    /// Load and validate configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match dormwatch_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    dormwatch::logging::init_tracing(
        &config.log.level,
        dormwatch::logging::secret_values(&config),
    );

    let result = match cli.command {
        Commands::Elec => elec(&config).await,
        Commands::Rollcall => rollcall(&config).await,
        Commands::CheckConfig => check_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn elec(config: &DormwatchConfig) -> Result<(), DormwatchError> {
    let settings = resolve(ElecSettings::from_config(config))?;
    let client = BalanceClient::new(settings.query_timeout)?;
    let notifier = DingTalkNotifier::new(
        settings.webhook.clone(),
        secrecy::SecretString::from(settings.signing_key.expose_secret().to_string()),
        settings.notify_timeout,
    )?;

    dormwatch::run_elec(&settings, &client, &notifier).await;
    Ok(())
}

async fn rollcall(config: &DormwatchConfig) -> Result<(), DormwatchError> {
    let settings = resolve(RollcallSettings::from_config(config))?;
    let source = HttpRosterSource::new(settings.fetch_timeout)?;
    let notifiers: Vec<Box<dyn Notifier>> = QmsgNotifier::for_recipients(
        &settings.qmsg_endpoint,
        &settings.qmsg_key,
        &settings.targets,
        settings.notify_timeout,
    )?
    .into_iter()
    .map(|n| Box::new(n) as Box<dyn Notifier>)
    .collect();

    dormwatch::run_rollcall(&settings, &source, &notifiers).await;
    Ok(())
}

/// Reports which jobs the configuration can run. Fails when none can.
fn check_config(config: &DormwatchConfig) -> Result<(), DormwatchError> {
    let elec = ElecSettings::from_config(config);
    let rollcall = RollcallSettings::from_config(config);

    let mut runnable = 0;
    for (job, missing) in [
        ("elec", elec.err()),
        ("rollcall", rollcall.err()),
    ] {
        match missing {
            None => {
                runnable += 1;
                eprintln!("dormwatch: {job}: ready");
            }
            Some(errors) => {
                eprintln!("dormwatch: {job}: not runnable");
                render_errors(&errors);
            }
        }
    }

    if runnable == 0 {
        return Err(DormwatchError::Config("no job is runnable with this configuration".into()));
    }
    Ok(())
}

/// Renders settings errors and converts them into a startup failure.
fn resolve<T>(settings: Result<T, Vec<dormwatch_config::ConfigError>>) -> Result<T, DormwatchError> {
    settings.map_err(|errors| {
        render_errors(&errors);
        DormwatchError::Config(format!("{} required value(s) missing or invalid", errors.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_global_config_flag() {
        let cli = Cli::try_parse_from(["dormwatch", "elec", "--config", "/tmp/d.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Elec));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/d.toml")));
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["dormwatch"]).is_err());
    }

    #[test]
    fn check_config_subcommand_name() {
        let cli = Cli::try_parse_from(["dormwatch", "check-config"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[test]
    fn default_config_is_not_runnable() {
        let config = dormwatch_config::load_and_validate_str("").unwrap();
        assert!(resolve(ElecSettings::from_config(&config)).is_err());
    }

    #[test]
    fn check_config_fails_when_no_job_is_runnable() {
        let config = dormwatch_config::load_and_validate_str("").unwrap();
        assert!(matches!(check_config(&config), Err(DormwatchError::Config(_))));
    }

    #[test]
    fn check_config_passes_when_one_job_is_runnable() {
        let config = dormwatch_config::load_and_validate_str(
            r#"
[qmsg]
key = "qkey"
targets = ["10001"]

[rollcall]
class_name = "网安2401班"
members = ["张三"]
pending_list_url = "https://i.jielong.com/c/a"
approved_list_url = "https://i.jielong.com/c/b"
"#,
        )
        .unwrap();
        assert!(check_config(&config).is_ok());
    }
}

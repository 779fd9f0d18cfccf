mod app;
mod cli;
mod config;
mod logging;
mod services;
mod ui;
mod worker;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::api::{ApiClientConfig, ServerClient, SettingsRecord};
use crate::worker::ping_outcome;
use anyhow::{Context, Result};
use clap::Parser;
use std::panic;

fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        eprintln!("garuda-dashboard panic: {info}");
        if let Some(location) = info.location() {
            eprintln!("  at {}:{}", location.file(), location.line());
        }
    }));

    let cli = cli::Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let settings = AppConfig::load(&cli)?;
    log::debug!("using server at {}", settings.base_url);

    if let Some(command) = cli.command.clone() {
        return handle_command(&settings, command);
    }

    if cli.headless {
        println!("Headless mode runs subcommands only. Launching UI skipped.");
        return Ok(());
    }

    app::run(settings)
}

fn handle_command(settings: &AppConfig, command: Command) -> Result<()> {
    let client_config = ApiClientConfig::try_from_url(&settings.base_url)?
        .with_timeout(settings.request_timeout());
    let client = ServerClient::new(client_config)?;

    if let Command::DownloadUrl { name } = &command {
        println!("{}", client.download_url(name)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building async runtime")?;

    runtime.block_on(async move {
        match command {
            Command::Ping => println!("{}", ping_outcome(client.ping().await)),
            Command::Files => print_files(&client).await?,
            Command::Remove { name } => {
                let result = client
                    .delete_file(&name)
                    .await
                    .with_context(|| format!("deleting {name}"))?;
                log::info!("deleted {name}: {result}");
                print_files(&client).await?;
            }
            Command::Settings => {
                let current = client.fetch_settings().await.context("fetching settings")?;
                println!("{}", serde_json::to_string_pretty(&current)?);
            }
            Command::SaveSettings {
                max_file_size,
                fetch_time,
            } => {
                let record = SettingsRecord {
                    max_file_size: Some(max_file_size),
                    fetch_time: Some(fetch_time),
                };
                client
                    .save_settings(&record)
                    .await
                    .context("saving settings")?;
                println!("Settings saved successfully");
            }
            Command::DownloadUrl { .. } => {}
        }
        Ok::<(), anyhow::Error>(())
    })
}

async fn print_files(client: &ServerClient) -> Result<()> {
    let files = client.list_files().await.context("fetching files")?;
    if files.is_empty() {
        println!("No files listed");
    }
    for file in files {
        println!("{}\t{}", file.id, file.name);
    }
    Ok(())
}

use crate::services::api::{ApiError, FileDescriptor, PingReport, ServerClient, SettingsRecord};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use log::{debug, error, info};
use std::thread;
use tokio::runtime::Runtime;

pub const PING_FALLBACK: &str = "No response";
pub const PING_FAILED: &str = "Ping failed";
pub const PING_ERROR: &str = "Ping error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Ping { token: u64 },
    LoadFiles,
    RemoveFile { name: String },
    LoadSettings,
    SaveSettings(SettingsRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PingCompleted { token: u64, outcome: String },
    FilesLoaded(Vec<FileDescriptor>),
    SettingsLoaded(SettingsRecord),
    SettingsSaved,
    SettingsSaveFailed,
}

/// Maps a ping response onto the text shown next to the Ping button.
pub fn ping_outcome(result: Result<PingReport, ApiError>) -> String {
    match result {
        Ok(report) => report
            .latency
            .filter(|latency| !latency.is_empty())
            .unwrap_or_else(|| PING_FALLBACK.to_string()),
        Err(err) if err.is_http_status() => {
            debug!("ping rejected: {err}");
            PING_FAILED.to_string()
        }
        Err(err) => {
            debug!("ping errored: {err}");
            PING_ERROR.to_string()
        }
    }
}

/// Runs one command to completion and returns the events the view should see.
/// Failures outside of ping are logged and yield no event, leaving the view's
/// previous state in place.
pub async fn execute(client: &ServerClient, command: AppCommand) -> Vec<AppEvent> {
    match command {
        AppCommand::Ping { token } => {
            let outcome = ping_outcome(client.ping().await);
            vec![AppEvent::PingCompleted { token, outcome }]
        }
        AppCommand::LoadFiles => load_files(client).await.into_iter().collect(),
        AppCommand::RemoveFile { name } => match client.delete_file(&name).await {
            Ok(result) => {
                info!("deleted {name}: {result}");
                load_files(client).await.into_iter().collect()
            }
            Err(err) => {
                error!("Failed to delete file {name}: {err}");
                Vec::new()
            }
        },
        AppCommand::LoadSettings => match client.fetch_settings().await {
            Ok(settings) => vec![AppEvent::SettingsLoaded(settings)],
            Err(err) => {
                error!("Failed to fetch settings: {err}");
                Vec::new()
            }
        },
        AppCommand::SaveSettings(settings) => match client.save_settings(&settings).await {
            Ok(()) => {
                info!("Settings saved successfully");
                vec![AppEvent::SettingsSaved]
            }
            Err(err) => {
                error!("Failed to save settings: {err}");
                vec![AppEvent::SettingsSaveFailed]
            }
        },
    }
}

async fn load_files(client: &ServerClient) -> Option<AppEvent> {
    match client.list_files().await {
        Ok(files) => Some(AppEvent::FilesLoaded(files)),
        Err(err) => {
            error!("Failed to fetch files: {err}");
            None
        }
    }
}

/// Spawns the thread that owns the async runtime. Each command becomes its own
/// task, so requests overlap freely and finish in whatever order the server
/// answers.
pub fn spawn_background_worker(
    client: ServerClient,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
    repaint: egui::Context,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("Unable to start async runtime: {err}");
                return;
            }
        };

        while let Ok(command) = command_rx.recv() {
            debug!("dispatching {command:?}");
            let client = client.clone();
            let event_tx = event_tx.clone();
            let repaint = repaint.clone();
            runtime.spawn(async move {
                for event in execute(&client, command).await {
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
                repaint.request_repaint();
            });
        }

        debug!("command channel closed; worker exiting");
    })
}

use crate::config::AppConfig;
use crate::services::api::{ApiClientConfig, ServerClient};
use crate::ui::{apply_theme, render_dashboard, DashboardAction, DashboardState, ServerInfo};
use crate::worker::{spawn_background_worker, AppCommand, AppEvent};
use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use eframe::{egui, App, CreationContext, NativeOptions};
use log::{error, info, warn};

pub fn run(config: AppConfig) -> Result<()> {
    let client_config = ApiClientConfig::try_from_url(&config.base_url)?
        .with_timeout(config.request_timeout());
    let client = ServerClient::new(client_config)?;
    let app_name = config.application_name.clone();
    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(app_name.clone())
            .with_inner_size([960.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        &app_name,
        native_options,
        Box::new(move |cc| Ok(GarudaDashboardApp::new(cc, config, client))),
    )
    .map_err(|err| anyhow!(err.to_string()))
}

struct GarudaDashboardApp {
    config: AppConfig,
    client: ServerClient,
    dashboard_state: DashboardState,
    server_info: ServerInfo,
    command_tx: Sender<AppCommand>,
    event_rx: Receiver<AppEvent>,
    worker_failed: bool,
}

impl GarudaDashboardApp {
    fn new(cc: &CreationContext<'_>, config: AppConfig, client: ServerClient) -> Box<dyn App> {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        apply_theme(&cc.egui_ctx, config.dark_mode);
        spawn_background_worker(client.clone(), command_rx, event_tx, cc.egui_ctx.clone());

        let mut app = Self {
            dashboard_state: DashboardState::new(config.server_name.clone()),
            server_info: ServerInfo {
                endpoint: config.base_url.clone(),
            },
            config,
            client,
            command_tx,
            event_rx,
            worker_failed: false,
        };

        for command in app.dashboard_state.mount_commands() {
            app.send(command);
        }

        Box::new(app)
    }

    fn send(&mut self, command: AppCommand) {
        if let Err(err) = self.command_tx.send(command) {
            self.worker_failed = true;
            error!("Unable to schedule request: {err}");
        }
    }

    fn consume_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.dashboard_state.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.worker_failed {
                        error!("Background worker disconnected");
                    }
                    self.worker_failed = true;
                    break;
                }
            }
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: DashboardAction) {
        match action {
            DashboardAction::Command(command) => self.send(command),
            DashboardAction::Download(name) => match self.client.download_url(&name) {
                Ok(url) => {
                    info!("Opening download for {name}");
                    ctx.open_url(egui::OpenUrl::new_tab(url));
                }
                Err(err) => warn!("Cannot build download URL for {name}: {err}"),
            },
        }
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(&self.config.application_name);
            if self.worker_failed {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        "Background worker stopped. Restart the dashboard.",
                    );
                });
            }
        });
    }
}

impl App for GarudaDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.consume_events();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.small("© 2023 Server Management Dashboard. All rights reserved.");
            });
        });

        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        render_dashboard(ui, &mut self.dashboard_state, &self.server_info)
                    })
                    .inner
            })
            .inner;

        for action in actions {
            self.handle_action(ctx, action);
        }
    }
}

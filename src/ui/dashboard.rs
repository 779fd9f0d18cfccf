use super::theme::status_color;
use crate::services::api::{FileDescriptor, SettingsRecord};
use crate::worker::{AppCommand, AppEvent};
use eframe::egui;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Online,
    Offline,
    Rebooting,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Online => write!(f, "Online"),
            ServerStatus::Offline => write!(f, "Offline"),
            ServerStatus::Rebooting => write!(f, "Rebooting"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSummary {
    pub name: String,
    pub status: ServerStatus,
}

/// Static facts shown in the "Server Information" card.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub endpoint: String,
}

/// Raw text of the two settings inputs. Parsing happens on read so that
/// whatever the operator typed stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub max_file_size: String,
    pub fetch_time: String,
}

impl SettingsForm {
    pub fn from_record(record: &SettingsRecord) -> Self {
        let text = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();
        Self {
            max_file_size: text(record.max_file_size),
            fetch_time: text(record.fetch_time),
        }
    }

    pub fn record(&self) -> SettingsRecord {
        SettingsRecord {
            max_file_size: parse_int(&self.max_file_size),
            fetch_time: parse_int(&self.fetch_time),
        }
    }
}

/// Reads the leading integer of `text`: optional whitespace, an optional
/// sign, then digits. Anything after the digits is ignored. Returns `None`
/// when no digit follows, or on overflow.
pub fn parse_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// What the view asks the application to do after a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    Command(AppCommand),
    Download(String),
}

#[derive(Debug)]
pub struct DashboardState {
    server: ServerSummary,
    pinging: bool,
    ping_token: u64,
    ping_result: Option<String>,
    files: Vec<FileDescriptor>,
    settings: SettingsForm,
    saving: bool,
}

impl DashboardState {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server: ServerSummary {
                name: server_name.into(),
                status: ServerStatus::Online,
            },
            pinging: false,
            ping_token: 0,
            ping_result: None,
            files: Vec::new(),
            settings: SettingsForm::from_record(&SettingsRecord::default()),
            saving: false,
        }
    }

    /// Requests issued once when the view is created.
    pub fn mount_commands(&self) -> Vec<AppCommand> {
        vec![AppCommand::LoadFiles, AppCommand::LoadSettings]
    }

    pub fn server(&self) -> &ServerSummary {
        &self.server
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn ping_result(&self) -> Option<&str> {
        self.ping_result.as_deref()
    }

    pub fn is_pinging(&self) -> bool {
        self.pinging
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn settings_form(&self) -> &SettingsForm {
        &self.settings
    }

    pub fn settings_form_mut(&mut self) -> &mut SettingsForm {
        &mut self.settings
    }

    pub fn can_ping(&self) -> bool {
        !self.pinging && self.server.status != ServerStatus::Offline
    }

    /// Local only; no server round-trip confirms the new status.
    pub fn refresh_status(&mut self) {
        self.server.status = ServerStatus::Online;
    }

    pub fn set_status(&mut self, status: ServerStatus) {
        self.server.status = status;
    }

    pub fn begin_ping(&mut self) -> Option<AppCommand> {
        if !self.can_ping() {
            return None;
        }
        self.ping_token += 1;
        self.pinging = true;
        self.ping_result = None;
        Some(AppCommand::Ping {
            token: self.ping_token,
        })
    }

    pub fn remove_file(&self, name: &str) -> AppCommand {
        AppCommand::RemoveFile {
            name: name.to_string(),
        }
    }

    pub fn begin_save(&mut self) -> Option<AppCommand> {
        if self.saving {
            return None;
        }
        self.saving = true;
        Some(AppCommand::SaveSettings(self.settings.record()))
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PingCompleted { token, outcome } => {
                // Only the latest ping may write the result slot.
                if token == self.ping_token {
                    self.pinging = false;
                    self.ping_result = Some(outcome);
                }
            }
            AppEvent::FilesLoaded(files) => self.files = files,
            AppEvent::SettingsLoaded(record) => {
                self.settings = SettingsForm::from_record(&record);
            }
            AppEvent::SettingsSaved | AppEvent::SettingsSaveFailed => self.saving = false,
        }
    }
}

pub fn render(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    info: &ServerInfo,
) -> Vec<DashboardAction> {
    let mut actions = Vec::new();

    ui.columns(2, |columns| {
        render_status_card(&mut columns[0], state, &mut actions);
        render_info_card(&mut columns[1], info);
    });

    ui.add_space(12.0);
    render_files_card(ui, state, &mut actions);

    ui.add_space(12.0);
    render_settings_card(ui, state, &mut actions);

    actions
}

fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

fn render_status_card(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    actions: &mut Vec<DashboardAction>,
) {
    card(ui, |ui| {
        ui.heading("Server Status");
        ui.weak(&state.server().name);
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let status = state.server().status;
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter()
                .circle_filled(rect.center(), 6.0, status_color(status));
            ui.strong(status.to_string());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").clicked() {
                    state.refresh_status();
                }
            });
        });

        ui.separator();

        let label = if state.is_pinging() { "Pinging..." } else { "Ping" };
        if ui
            .add_enabled(state.can_ping(), egui::Button::new(label))
            .clicked()
        {
            if let Some(command) = state.begin_ping() {
                actions.push(DashboardAction::Command(command));
            }
        }

        if let Some(result) = state.ping_result() {
            ui.horizontal(|ui| {
                ui.strong("Ping result:");
                ui.label(result);
            });
        }
    });
}

fn render_info_card(ui: &mut egui::Ui, info: &ServerInfo) {
    card(ui, |ui| {
        ui.heading("Server Information");
        egui::Grid::new("server_information")
            .num_columns(2)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for (label, value) in [
                    ("Endpoint", info.endpoint.as_str()),
                    ("IP Address", "Unavailable"),
                    ("Location", "Unavailable"),
                    ("Uptime", "99.9%"),
                ] {
                    ui.weak(label);
                    ui.label(value);
                    ui.end_row();
                }
            });
    });
}

fn render_files_card(
    ui: &mut egui::Ui,
    state: &DashboardState,
    actions: &mut Vec<DashboardAction>,
) {
    card(ui, |ui| {
        ui.heading("JSON Files");
        ui.weak("Manage your server configuration files");
        ui.separator();

        if state.files().is_empty() {
            ui.colored_label(egui::Color32::GRAY, "No files listed");
            return;
        }

        egui::Grid::new("json_files").striped(true).show(ui, |ui| {
            for file in state.files() {
                ui.label(&file.name);
                if ui.button("Remove").clicked() {
                    actions.push(DashboardAction::Command(state.remove_file(&file.name)));
                }
                if ui.button("Download").clicked() {
                    actions.push(DashboardAction::Download(file.name.clone()));
                }
                ui.end_row();
            }
        });
    });
}

fn render_settings_card(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    actions: &mut Vec<DashboardAction>,
) {
    card(ui, |ui| {
        ui.heading("Server Settings");

        let form = state.settings_form_mut();
        ui.label("Max File Quantity");
        ui.text_edit_singleline(&mut form.max_file_size);
        ui.label("Fetch Time (seconds)");
        ui.text_edit_singleline(&mut form.fetch_time);

        ui.add_space(6.0);
        let label = if state.is_saving() { "Saving..." } else { "Save Settings" };
        if ui
            .add_enabled(!state.is_saving(), egui::Button::new(label))
            .clicked()
        {
            if let Some(command) = state.begin_save() {
                actions.push(DashboardAction::Command(command));
            }
        }
    });
}

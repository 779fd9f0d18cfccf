mod dashboard;
mod theme;

pub use dashboard::{render as render_dashboard, DashboardAction, DashboardState, ServerInfo};
pub use theme::apply_theme;

use std::path::Path;
use std::sync::Arc;

use crate::aggregate::ClimateViews;
use crate::data;
use crate::models::ClimateTable;

#[derive(Debug)]
enum DashboardState {
    Ready(ClimateViews),
    /// Loading failed; every page shows this message instead of charts.
    Failed(String),
}

/// The process-wide, read-only dashboard state shared by all requests.
///
/// Built once at startup. Cloning only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Dashboard {
    state: Arc<DashboardState>,
}

impl Dashboard {
    /// Load the CSV at `path` and precompute every view.
    ///
    /// A load failure does not abort startup: the dashboard is created in a
    /// failed state so the message can be shown to the user.
    pub fn open(path: impl AsRef<Path>) -> Self {
        match data::load_csv(path) {
            Ok(table) => Self::from_table(&table),
            Err(e) => {
                tracing::error!("Failed to load climate data: {}", e);
                Self::failed(e.to_string())
            }
        }
    }

    pub fn from_table(table: &ClimateTable) -> Self {
        Self {
            state: Arc::new(DashboardState::Ready(ClimateViews::build(table))),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: Arc::new(DashboardState::Failed(message.into())),
        }
    }

    /// The cached views, or the load error message.
    pub fn views(&self) -> Result<&ClimateViews, &str> {
        match self.state.as_ref() {
            DashboardState::Ready(views) => Ok(views),
            DashboardState::Failed(message) => Err(message.as_str()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.views().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_failed_dashboard() {
        let dashboard = Dashboard::open("/definitely/not/here.csv");
        let message = dashboard.views().unwrap_err();
        assert!(message.contains("not found"));
        assert!(!dashboard.is_ready());
    }

    #[test]
    fn clones_share_state() {
        let dashboard = Dashboard::from_table(&ClimateTable::default());
        let clone = dashboard.clone();
        assert!(std::ptr::eq(
            dashboard.views().unwrap(),
            clone.views().unwrap()
        ));
    }
}

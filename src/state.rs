use std::sync::Arc;

use crate::config::Config;
use crate::sheets::Workbook;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub workbook: Workbook,
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::link::LinkBuilder;
use crate::registry::FileRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<FileRegistry>,
    pub links: LinkBuilder,
}

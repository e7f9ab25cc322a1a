use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, storage::UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: AppConfig) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone());
        Self {
            orm,
            config: Arc::new(config),
            uploads,
        }
    }
}

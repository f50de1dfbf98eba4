use std::sync::Arc;

use crate::config::Config;
use crate::notify::Notifier;
use crate::store::SubmissionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub notifier: Arc<dyn Notifier>,
    pub store: SubmissionStore,
}

use std::sync::Arc;

use crate::backend::NotificationBackend;
use crate::config::Config;
use crate::session::Session;

#[derive(Clone)]
pub struct NotifyContext {
    pub config: Arc<Config>,
    pub session: Session,
    pub backend: Arc<dyn NotificationBackend>,
}

impl NotifyContext {
    pub fn new(config: Config, backend: Arc<dyn NotificationBackend>) -> Self {
        let session = Session::new(config.api.bearer_token.clone());

        NotifyContext {
            config: Arc::new(config),
            session,
            backend,
        }
    }
}

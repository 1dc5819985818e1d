use shared::Config;
use tracing::{info, warn};

use crate::db::MessageStore;
use crate::webhook::SignatureVerifier;

/// Estado compartido de la aplicación.
/// Contiene el store de mensajes, el verificador de firmas y la configuración.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: MessageStore,
    pub verifier: SignatureVerifier,
    pub config: Config,
}

impl AppState {
    /// Opens the database and makes sure the schema exists.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = MessageStore::connect(&config.database).await?;
        store
            .init_schema()
            .await
            .map_err(|e| anyhow::anyhow!("failed to initialise schema: {}", e))?;

        let verifier = SignatureVerifier::new(config.webhook.configured_secret());
        if verifier.is_configured() {
            info!("🔐 Webhook signature verification enabled");
        } else {
            warn!("⚠️ WEBHOOK_SECRET is not set: every webhook will be rejected and readiness will fail");
        }

        Ok(Self::from_parts(store, verifier, config))
    }

    pub fn from_parts(store: MessageStore, verifier: SignatureVerifier, config: Config) -> Self {
        Self {
            store,
            verifier,
            config,
        }
    }
}

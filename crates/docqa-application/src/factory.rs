//! Wires collaborator implementations from configuration.

use docqa_core::config::{ClientConfig, ServiceMode};
use docqa_core::error::DocQaError;
use docqa_core::{DocumentService, QaService};
use docqa_interaction::{HttpDocQaClient, SimulatedDocQaService};
use std::sync::Arc;

/// The pair of collaborators a session controller needs.
#[derive(Clone)]
pub struct Services {
    pub document: Arc<dyn DocumentService>,
    pub qa: Arc<dyn QaService>,
}

impl Services {
    /// Uses one object for both contracts.
    pub fn shared<S>(service: Arc<S>) -> Self
    where
        S: DocumentService + QaService + 'static,
    {
        Self {
            document: service.clone(),
            qa: service,
        }
    }
}

/// Builds the collaborators selected by `config.mode`.
///
/// # Errors
///
/// Returns a config error if the configuration is invalid for the selected
/// mode or the HTTP client cannot be built.
pub fn build_services(config: &ClientConfig) -> Result<Services, DocQaError> {
    config.validate()?;

    match config.mode {
        ServiceMode::Simulated => {
            tracing::info!("Using simulated document services");
            Ok(Services::shared(Arc::new(SimulatedDocQaService::new(
                config.simulation.clone(),
            ))))
        }
        ServiceMode::Http => {
            tracing::info!(base_url = %config.base_url, "Using HTTP document services");
            Ok(Services::shared(Arc::new(HttpDocQaClient::from_config(config)?)))
        }
    }
}

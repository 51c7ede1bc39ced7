use std::sync::Arc;

use lyricreel_core::{
    Config, GenerationOrchestrator, MediaProvider, SanitizedConfig, StatusChecker, TaskStore,
    UploadStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    provider: Arc<dyn MediaProvider>,
    tasks: Arc<dyn TaskStore>,
    orchestrator: GenerationOrchestrator,
    status_checker: StatusChecker,
    uploads: UploadStore,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn MediaProvider>,
        tasks: Arc<dyn TaskStore>,
        uploads: UploadStore,
    ) -> Self {
        let orchestrator = GenerationOrchestrator::new(
            Arc::clone(&provider),
            Arc::clone(&tasks),
            config.generation.clone(),
        );
        let status_checker = StatusChecker::new(Arc::clone(&provider), Arc::clone(&tasks));

        Self {
            config,
            provider,
            tasks,
            orchestrator,
            status_checker,
            uploads,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn provider_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn task_store(&self) -> &dyn TaskStore {
        self.tasks.as_ref()
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    pub fn status_checker(&self) -> &StatusChecker {
        &self.status_checker
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }
}

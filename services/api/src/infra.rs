use metrics_exporter_prometheus::PrometheusHandle;
use riskform::assessment::AssessmentService;
use riskform::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load, validate and compile the form in `form_dir`.
pub(crate) fn load_service(form_dir: &Path) -> Result<Arc<AssessmentService>, AppError> {
    let service = AssessmentService::from_dir(form_dir)?;
    info!(
        form_dir = %form_dir.display(),
        risks = service.compiled().risks.len(),
        "assessment service initialised"
    );
    Ok(Arc::new(service))
}

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAssessmentRepository, InMemoryAttemptRepository, InMemoryDriveRepository,
    InMemoryNotificationStore, InMemorySlotRepository, InMemoryStudentRepository,
};
use crate::routes::{with_placement_routes, DashboardContext};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placement::config::AppConfig;
use placement::error::AppError;
use placement::telemetry;
use placement::workflows::assessments::AssessmentService;
use placement::workflows::directory::DirectoryService;
use placement::workflows::drives::DriveService;
use placement::workflows::interviews::InterviewService;
use placement::workflows::notifications::NotificationDispatcher;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let students = Arc::new(InMemoryStudentRepository::default());
    let drives = Arc::new(InMemoryDriveRepository::default());
    let assessments = Arc::new(InMemoryAssessmentRepository::default());
    let attempts = Arc::new(InMemoryAttemptRepository::default());
    let slots = Arc::new(InMemorySlotRepository::default());
    let notifications = Arc::new(InMemoryNotificationStore::default());

    let dispatcher = Arc::new(NotificationDispatcher::new(notifications));
    let directory_service = Arc::new(DirectoryService::new(students.clone()));
    let drive_service = Arc::new(DriveService::new(
        students.clone(),
        drives.clone(),
        dispatcher.clone(),
    ));
    let assessment_service = Arc::new(AssessmentService::new(
        assessments.clone(),
        attempts,
        students.clone(),
    ));
    let interview_service = Arc::new(InterviewService::new(
        slots,
        students.clone(),
        drives.clone(),
        dispatcher.clone(),
    ));
    let dashboard = DashboardContext {
        students,
        drives,
        assessments,
    };

    let app = with_placement_routes(
        directory_service,
        drive_service,
        assessment_service,
        interview_service,
        dispatcher,
        dashboard,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

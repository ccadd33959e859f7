// Child Growth Calculator - Web Server
// Stateless JSON API plus a single HTML form; each request carries its own measurement

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use child_growth::{
    certificate_bytes, compare_snapshot, compute_bmi, evaluate, nutrition_advice, render_page, weight_chart,
    AppConfig, BmiResult, Evaluation, Measurement, NutritionAdvice, Page, PageView, SessionSnapshot, WeightChart,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Everything the calculator, chart, BMI and advice pages show for one measurement
#[derive(Serialize)]
struct EvaluateResponse {
    snapshot: SessionSnapshot,
    evaluation: Evaluation,
    bmi: BmiResult,
    chart: WeightChart,
    advice: NutritionAdvice,
}

#[derive(Deserialize, Default)]
struct PageRequest {
    #[serde(default)]
    measurement: Option<Measurement>,
}

fn reject(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    if status.is_server_error() {
        tracing::error!("Internal error: {}", message);
    } else {
        tracing::warn!("Rejected request: {}", message);
    }
    (status, Json(ApiResponse::err(message))).into_response()
}

/// Input-layer range check shared by every endpoint
fn accept(measurement: Measurement) -> Result<SessionSnapshot, Response> {
    measurement
        .check_input_domains()
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(SessionSnapshot::capture(measurement))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/evaluate - Full evaluation of one measurement
async fn evaluate_measurement(Json(measurement): Json<Measurement>) -> Response {
    let snapshot = match accept(measurement) {
        Ok(s) => s,
        Err(response) => return response,
    };

    let m = &snapshot.measurement;
    let response = EvaluateResponse {
        evaluation: evaluate(&snapshot),
        bmi: compute_bmi(m.weight_kg, m.height_cm),
        chart: weight_chart(&snapshot),
        advice: nutrition_advice(&snapshot),
        snapshot: snapshot.clone(),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// POST /api/pages/:page - Page view for an optional measurement
///
/// The body must be JSON; `{}` or `{"measurement": null}` asks for the view without a submission.
async fn page_view(Path(page): Path<String>, request: Result<Json<PageRequest>, JsonRejection>) -> Response {
    let page = match Page::parse(&page) {
        Some(p) => p,
        None => return reject(StatusCode::NOT_FOUND, format!("Unknown page: {}", page)),
    };

    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => return reject(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let snapshot = match request.measurement.map(accept).transpose() {
        Ok(s) => s,
        Err(response) => return response,
    };

    let view: PageView = render_page(page, snapshot.as_ref());
    (StatusCode::OK, Json(ApiResponse::ok(view))).into_response()
}

/// POST /api/certificate - PDF certificate, built in per-request paths
async fn download_certificate(State(state): State<AppState>, Json(measurement): Json<Measurement>) -> Response {
    let snapshot = match accept(measurement) {
        Ok(s) => s,
        Err(response) => return response,
    };

    let dir = state.config.artifact_dir.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let (weight_status, height_status) = compare_snapshot(&snapshot);
        certificate_bytes(
            &snapshot.measurement,
            snapshot.ideal_weight,
            weight_status,
            height_status,
            &dir,
        )
    })
    .await;

    match rendered {
        Ok(Ok(bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"hasil_perkembangan.pdf\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => reject(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)),
        Err(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, format!("certificate task failed: {}", e)),
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn build_router(state: AppState) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/evaluate", post(evaluate_measurement))
        .route("/pages/:page", post(page_view))
        .route("/certificate", post(download_certificate))
        .with_state(state);

    // Build main router
    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// ============================================================================
// Main Server
// ============================================================================

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "child_growth=info,growth_server=info,tower_http=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    println!("🌐 Child Growth Calculator - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::from_args(&args).expect("Failed to load configuration");
    println!("✓ Artifacts directory: {:?}", config.artifact_dir);

    let addr = config.server_addr.clone();
    let app = build_router(AppState {
        config: Arc::new(config),
    });

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Child growth server listening on http://{}", addr);
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/evaluate", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

// ============================================================================
// Tests
// ============================================================================

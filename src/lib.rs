// Child Growth Calculator - Core Library
// Exposes all modules for use in the TUI, the one-shot CLI, the web server and tests

pub mod measurement;   // Input model + session snapshot
pub mod ideal_weight;  // Broca index
pub mod bmi;           // BMI value + child bands
pub mod advisor;       // Comparison, conclusion, nutrition advice
pub mod chart;         // Ideal vs actual bar data
pub mod qr;            // QR module grid + PNG
pub mod certificate;   // PDF certificate
pub mod pages;         // Five-page dispatch
pub mod config;        // Paths + server address

// Re-export commonly used types
pub use measurement::{
    Measurement, Sex, SessionSnapshot, display_measure,
    AGE_RANGE, WEIGHT_RANGE_KG, HEIGHT_RANGE_CM,
};
pub use ideal_weight::compute_ideal_weight;
pub use bmi::{compute_bmi, BmiCategory, BmiResult};
pub use advisor::{
    compare_to_ideal, compare_snapshot, evaluate, nutrition_advice,
    AdviceTone, ComparisonStatus, Evaluation, NutritionAdvice,
};
pub use chart::{weight_chart, ChartBar, WeightChart};
pub use qr::QrMatrix;
pub use certificate::{
    certificate_bytes, format_certificate, ArtifactPaths, CertificateContent, ScopedArtifacts,
};
pub use pages::{render_page, Page, PageView, MISSING_SUBMISSION};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Submit a measurement the way the calculator page does: capture the
/// snapshot, then write the certificate to the configured fixed paths.
pub fn submit(measurement: Measurement, config: &AppConfig) -> anyhow::Result<(SessionSnapshot, ArtifactPaths)> {
    let snapshot = SessionSnapshot::capture(measurement);
    let (weight_status, height_status) = compare_snapshot(&snapshot);

    let paths = ArtifactPaths::new(&config.certificate_path, &config.qr_image_path);
    let written = format_certificate(
        &snapshot.measurement,
        snapshot.ideal_weight,
        weight_status,
        height_status,
        &paths,
    )?;

    Ok((snapshot, written))
}

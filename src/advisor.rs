// 🍎 Comparison Advisor - actual vs ideal, conclusion text and nutrition advice

use crate::measurement::{display_measure, SessionSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Differences strictly below this are treated as ideal, whatever the sign
pub const IDEAL_TOLERANCE: f64 = 1.0;

// ============================================================================
// COMPARISON STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Ideal,
    Below,
    Above,
}

impl ComparisonStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ComparisonStatus::Ideal => "ideal",
            ComparisonStatus::Below => "kurang",
            ComparisonStatus::Above => "berlebih",
        }
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tolerance is checked before ordering.
pub fn compare_to_ideal(actual: f64, ideal: f64) -> ComparisonStatus {
    if (actual - ideal).abs() < IDEAL_TOLERANCE {
        ComparisonStatus::Ideal
    } else if actual < ideal {
        ComparisonStatus::Below
    } else {
        ComparisonStatus::Above
    }
}

/// Weight against the Broca ideal, height against the measured height.
///
/// There is no reference height model, so the height status is always
/// `Ideal`. See DESIGN.md (open questions).
pub fn compare_snapshot(snapshot: &SessionSnapshot) -> (ComparisonStatus, ComparisonStatus) {
    let m = &snapshot.measurement;
    let reference_height = m.height_cm;

    let weight_status = compare_to_ideal(m.weight_kg, snapshot.ideal_weight);
    let height_status = compare_to_ideal(m.height_cm, reference_height);

    (weight_status, height_status)
}

// ============================================================================
// EVALUATION (calculator page result)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub ideal_weight: f64,
    /// `weight - ideal_weight`, signed
    pub weight_delta: f64,
    pub weight_status: ComparisonStatus,
    pub height_status: ComparisonStatus,
    pub conclusion: String,
}

impl Evaluation {
    /// `"45.00 kg"`
    pub fn ideal_weight_text(&self) -> String {
        format!("{:.2} kg", self.ideal_weight)
    }

    /// `"+15.00 kg"` / `"-5.00 kg"`
    pub fn weight_delta_text(&self) -> String {
        format!("{:+.2} kg", self.weight_delta)
    }
}

pub fn evaluate(snapshot: &SessionSnapshot) -> Evaluation {
    let m = &snapshot.measurement;
    let (weight_status, height_status) = compare_snapshot(snapshot);

    let conclusion = format!(
        "{}, usia {} tahun, memiliki berat badan {} dan tinggi badan {} dibandingkan dengan nilai ideal berdasarkan Indeks Broca.",
        m.name, m.age_years, weight_status, height_status
    );

    Evaluation {
        ideal_weight: snapshot.ideal_weight,
        weight_delta: m.weight_kg - snapshot.ideal_weight,
        weight_status,
        height_status,
        conclusion,
    }
}

/// `"Tinggi Sekarang"` metric
pub fn current_height_text(snapshot: &SessionSnapshot) -> String {
    format!("{:.1} cm", snapshot.measurement.height_cm)
}

/// Used in the one-shot CLI summary
pub fn describe_measurement(snapshot: &SessionSnapshot) -> String {
    let m = &snapshot.measurement;
    format!(
        "{} ({}), {} tahun, {} kg, {} cm",
        m.name,
        m.sex,
        m.age_years,
        display_measure(m.weight_kg),
        display_measure(m.height_cm)
    )
}

// ============================================================================
// NUTRITION ADVICE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceTone {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionAdvice {
    pub status: ComparisonStatus,
    pub tone: AdviceTone,
    pub message: &'static str,
}

pub fn advice_for(status: ComparisonStatus) -> NutritionAdvice {
    let (tone, message) = match status {
        ComparisonStatus::Ideal => (
            AdviceTone::Success,
            "Berat anak sudah ideal. Pertahankan pola makan dan aktivitasnya!",
        ),
        ComparisonStatus::Below => (
            AdviceTone::Warning,
            "Berat anak kurang. Disarankan menambah asupan gizi seperti protein, susu, dan vitamin.",
        ),
        ComparisonStatus::Above => (
            AdviceTone::Error,
            "Berat anak berlebih. Kurangi makanan tinggi gula dan lemak, serta perbanyak aktivitas fisik.",
        ),
    };

    NutritionAdvice { status, tone, message }
}

/// Advice only depends on the weight status
pub fn nutrition_advice(snapshot: &SessionSnapshot) -> NutritionAdvice {
    let m = &snapshot.measurement;
    advice_for(compare_to_ideal(m.weight_kg, snapshot.ideal_weight))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{Measurement, Sex};

    fn ani() -> SessionSnapshot {
        SessionSnapshot::capture(Measurement::new("Ani", 6, Sex::Female, 18.0, 110.0))
    }

    #[test]
    fn test_within_tolerance_is_ideal() {
        assert_eq!(compare_to_ideal(50.0, 49.5), ComparisonStatus::Ideal);
        assert_eq!(compare_to_ideal(49.5, 50.0), ComparisonStatus::Ideal);
        assert_eq!(compare_to_ideal(45.0, 45.0), ComparisonStatus::Ideal);
    }

    #[test]
    fn test_above_and_below() {
        assert_eq!(compare_to_ideal(60.0, 45.0), ComparisonStatus::Above);
        assert_eq!(compare_to_ideal(40.0, 45.0), ComparisonStatus::Below);
    }

    #[test]
    fn test_tolerance_is_exclusive() {
        assert_eq!(compare_to_ideal(46.0, 45.0), ComparisonStatus::Above);
        assert_eq!(compare_to_ideal(44.0, 45.0), ComparisonStatus::Below);
    }

    #[test]
    fn test_height_status_is_always_ideal() {
        for height in [0.0, 87.5, 150.0, 200.0] {
            let snapshot = SessionSnapshot::capture(Measurement::new("x", 8, Sex::Male, 20.0, height));
            let (_, height_status) = compare_snapshot(&snapshot);
            assert_eq!(height_status, ComparisonStatus::Ideal);
        }
    }

    #[test]
    fn test_end_to_end_ani() {
        let snapshot = ani();
        let evaluation = evaluate(&snapshot);

        assert!((evaluation.ideal_weight - 8.5).abs() < 1e-9);
        assert_eq!(evaluation.weight_status, ComparisonStatus::Above);
        assert_eq!(evaluation.height_status, ComparisonStatus::Ideal);
        assert_eq!(evaluation.ideal_weight_text(), "8.50 kg");
        assert_eq!(evaluation.weight_delta_text(), "+9.50 kg");
        assert_eq!(
            evaluation.conclusion,
            "Ani, usia 6 tahun, memiliki berat badan berlebih dan tinggi badan ideal dibandingkan dengan nilai ideal berdasarkan Indeks Broca."
        );
    }

    #[test]
    fn test_negative_delta_text() {
        let snapshot = SessionSnapshot::capture(Measurement::new("Budi", 9, Sex::Male, 40.0, 150.0));
        assert_eq!(evaluate(&snapshot).weight_delta_text(), "-5.00 kg");
        assert_eq!(current_height_text(&snapshot), "150.0 cm");
    }

    #[test]
    fn test_advice_per_status() {
        assert_eq!(advice_for(ComparisonStatus::Ideal).tone, AdviceTone::Success);
        assert_eq!(advice_for(ComparisonStatus::Below).tone, AdviceTone::Warning);
        let above = advice_for(ComparisonStatus::Above);
        assert_eq!(above.tone, AdviceTone::Error);
        assert!(above.message.starts_with("Berat anak berlebih."));
    }

    #[test]
    fn test_nutrition_advice_follows_weight_status() {
        assert_eq!(nutrition_advice(&ani()).status, ComparisonStatus::Above);
    }

    #[test]
    fn test_describe_measurement() {
        assert_eq!(describe_measurement(&ani()), "Ani (Perempuan), 6 tahun, 18.0 kg, 110.0 cm");
    }

    #[test]
    fn test_evaluate_is_pure() {
        let snapshot = ani();
        assert_eq!(evaluate(&snapshot), evaluate(&snapshot));
    }
}

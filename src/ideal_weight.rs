// ⚖️ Ideal Weight - Broca index with sex-specific correction

use crate::measurement::Sex;

const MALE_CORRECTION: f64 = 0.10;
const FEMALE_CORRECTION: f64 = 0.15;

/// Broca index: `(height - 100)` reduced by 10% (male) or 15% (female).
/// Non-positive height yields 0 instead of an error.
pub fn compute_ideal_weight(height_cm: f64, sex: Sex) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }

    let base = height_cm - 100.0;
    let correction = match sex {
        Sex::Male => MALE_CORRECTION,
        Sex::Female => FEMALE_CORRECTION,
    };

    base - correction * base
}

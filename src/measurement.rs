// 📏 Measurement - what the calculator page collects per submission
// Ephemeral input plus the session snapshot handed to every page

use crate::ideal_weight::compute_ideal_weight;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

// ============================================================================
// INPUT DOMAINS (enforced by the input layer, not by the calculators)
// ============================================================================

pub const AGE_RANGE: RangeInclusive<u32> = 5..=60;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 0.0..=100.0;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 0.0..=200.0;

pub const DEFAULT_AGE: u32 = 5;
pub const DEFAULT_WEIGHT_KG: f64 = 25.0;
pub const DEFAULT_HEIGHT_CM: f64 = 150.0;

// ============================================================================
// SEX
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Label shown in the form and on the certificate
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Laki-laki",
            Sex::Female => "Perempuan",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }

    /// Accepts the English keyword or the Indonesian label (case-insensitive)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "male" | "m" | "laki-laki" | "l" => Some(Sex::Male),
            "female" | "f" | "perempuan" | "p" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// MEASUREMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub name: String,
    pub age_years: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
}

impl Measurement {
    pub fn new(name: impl Into<String>, age_years: u32, sex: Sex, weight_kg: f64, height_cm: f64) -> Self {
        Measurement {
            name: name.into(),
            age_years,
            sex,
            weight_kg,
            height_cm,
        }
    }

    /// Range check performed by the input layer before a submission is accepted
    pub fn check_input_domains(&self) -> Result<()> {
        if !AGE_RANGE.contains(&self.age_years) {
            bail!(
                "Usia harus antara {} dan {} tahun (diberikan {})",
                AGE_RANGE.start(),
                AGE_RANGE.end(),
                self.age_years
            );
        }
        if !WEIGHT_RANGE_KG.contains(&self.weight_kg) {
            bail!(
                "Berat badan harus antara {} dan {} kg (diberikan {})",
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end(),
                self.weight_kg
            );
        }
        if !HEIGHT_RANGE_CM.contains(&self.height_cm) {
            bail!(
                "Tinggi badan harus antara {} dan {} cm (diberikan {})",
                HEIGHT_RANGE_CM.start(),
                HEIGHT_RANGE_CM.end(),
                self.height_cm
            );
        }
        Ok(())
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Measurement::new("", DEFAULT_AGE, Sex::Male, DEFAULT_WEIGHT_KG, DEFAULT_HEIGHT_CM)
    }
}

/// Renders a measured value the way it was entered: integral values keep
/// their trailing `.0` (`18.0`, `110.5`).
pub fn display_measure(value: f64) -> String {
    format!("{:?}", value)
}

// ============================================================================
// SESSION SNAPSHOT
// ============================================================================

/// Most recent submission and its ideal weight.
/// Replaced wholesale on every submission; pages only ever borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub measurement: Measurement,
    pub ideal_weight: f64,
}

impl SessionSnapshot {
    pub fn capture(measurement: Measurement) -> Self {
        let ideal_weight = compute_ideal_weight(measurement.height_cm, measurement.sex);
        SessionSnapshot {
            measurement,
            ideal_weight,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

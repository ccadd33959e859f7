// 🧮 Body Mass Index - index value plus fixed child bands
//
// Bands are lower-bound inclusive: <14, [14,17), [17,20), [20,25), >=25.
// They are not the adult WHO bands.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    VerySkinny,
    Skinny,
    Normal,
    Excess,
    Obese,
    /// Height was zero, no index could be computed
    Invalid,
}

impl BmiCategory {
    pub fn from_index(index: f64) -> Self {
        if index < 14.0 {
            BmiCategory::VerySkinny
        } else if index < 17.0 {
            BmiCategory::Skinny
        } else if index < 20.0 {
            BmiCategory::Normal
        } else if index < 25.0 {
            BmiCategory::Excess
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::VerySkinny => "Sangat Kurus",
            BmiCategory::Skinny => "Kurus",
            BmiCategory::Normal => "Normal",
            BmiCategory::Excess => "Berlebih",
            BmiCategory::Obese => "Obesitas",
            BmiCategory::Invalid => "Tidak Valid",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub index: f64,
    pub category: BmiCategory,
}

impl BmiResult {
    pub fn is_valid(&self) -> bool {
        self.category != BmiCategory::Invalid
    }
}

pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> BmiResult {
    if height_cm == 0.0 {
        return BmiResult {
            index: 0.0,
            category: BmiCategory::Invalid,
        };
    }

    let height_m = height_cm / 100.0;
    let index = weight_kg / (height_m * height_m);

    BmiResult {
        index,
        category: BmiCategory::from_index(index),
    }
}

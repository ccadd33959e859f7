// 📊 Weight chart - two labeled bars for the charting widget

use crate::measurement::SessionSnapshot;
use serde::Serialize;

pub const IDEAL_BAR_COLOR: &str = "#90caf9";
pub const CHILD_BAR_COLOR: &str = "#f06292";
pub const Y_AXIS_LABEL: &str = "Berat Badan (kg)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
    /// `#rrggbb`
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightChart {
    pub title: String,
    pub y_label: &'static str,
    pub bars: [ChartBar; 2],
}

impl WeightChart {
    /// Upper bound for a y axis that fits both bars
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

pub fn weight_chart(snapshot: &SessionSnapshot) -> WeightChart {
    let m = &snapshot.measurement;

    WeightChart {
        title: format!("Perbandingan Berat Badan: {}", m.name),
        y_label: Y_AXIS_LABEL,
        bars: [
            ChartBar {
                label: "Ideal",
                value: snapshot.ideal_weight,
                color: IDEAL_BAR_COLOR,
            },
            ChartBar {
                label: "Anak",
                value: m.weight_kg,
                color: CHILD_BAR_COLOR,
            },
        ],
    }
}

/// `#rrggbb` -> (r, g, b)
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{Measurement, Sex};

    #[test]
    fn test_chart_bars_ideal_then_child() {
        let snapshot = SessionSnapshot::capture(Measurement::new("Ani", 6, Sex::Female, 18.0, 110.0));
        let chart = weight_chart(&snapshot);

        assert_eq!(chart.title, "Perbandingan Berat Badan: Ani");
        assert_eq!(chart.y_label, "Berat Badan (kg)");
        assert_eq!(chart.bars[0].label, "Ideal");
        assert!((chart.bars[0].value - 8.5).abs() < 1e-9);
        assert_eq!(chart.bars[1].label, "Anak");
        assert_eq!(chart.bars[1].value, 18.0);
        assert_eq!(chart.max_value(), 18.0);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(IDEAL_BAR_COLOR), Some((0x90, 0xca, 0xf9)));
        assert_eq!(hex_to_rgb(CHILD_BAR_COLOR), Some((0xf0, 0x62, 0x92)));
        assert_eq!(hex_to_rgb("90caf9"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }
}

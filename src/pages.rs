// 🧭 Pages - the five navigation targets and what each one shows
// Every front end dispatches through `render_page`; the snapshot is passed in.

use crate::advisor::{current_height_text, evaluate, nutrition_advice, Evaluation, NutritionAdvice};
use crate::bmi::{compute_bmi, BmiResult};
use crate::chart::{weight_chart, WeightChart};
use crate::measurement::SessionSnapshot;
use serde::{Deserialize, Serialize};

pub const MISSING_SUBMISSION: &str = "Silakan isi data terlebih dahulu di menu Kalkulator.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Calculator,
    Chart,
    Bmi,
    NutritionAdvice,
    About,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Calculator,
        Page::Chart,
        Page::Bmi,
        Page::NutritionAdvice,
        Page::About,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Calculator => Page::Chart,
            Page::Chart => Page::Bmi,
            Page::Bmi => Page::NutritionAdvice,
            Page::NutritionAdvice => Page::About,
            Page::About => Page::Calculator,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Calculator => Page::About,
            Page::Chart => Page::Calculator,
            Page::Bmi => Page::Chart,
            Page::NutritionAdvice => Page::Bmi,
            Page::About => Page::NutritionAdvice,
        }
    }

    /// Sidebar label
    pub fn title(&self) -> &'static str {
        match self {
            Page::Calculator => "Kalkulator",
            Page::Chart => "Grafik",
            Page::Bmi => "IMT",
            Page::NutritionAdvice => "Saran Gizi",
            Page::About => "Tentang",
        }
    }

    /// Heading shown above the page content
    pub fn heading(&self) -> &'static str {
        match self {
            Page::Calculator => "Kalkulator Perkembangan Anak",
            Page::Chart => "Grafik Perbandingan Berat Anak",
            Page::Bmi => "Indeks Massa Tubuh (IMT) Anak",
            Page::NutritionAdvice => "Rekomendasi Gizi Anak",
            Page::About => "Tentang Aplikasi",
        }
    }

    /// Accepts the route slug (`nutrition_advice`) or the sidebar label
    pub fn parse(input: &str) -> Option<Self> {
        let lowered = input.trim().to_lowercase();
        Page::ALL.into_iter().find(|page| {
            page.title().to_lowercase() == lowered || page.slug() == lowered
        })
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Calculator => "calculator",
            Page::Chart => "chart",
            Page::Bmi => "bmi",
            Page::NutritionAdvice => "nutrition_advice",
            Page::About => "about",
        }
    }
}

// ============================================================================
// PAGE VIEWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorResult {
    pub evaluation: Evaluation,
    pub current_height: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    /// The form is always shown; results only after a submission
    Calculator { result: Option<CalculatorResult> },
    Chart { chart: WeightChart },
    Bmi { bmi: BmiResult, index_text: String },
    NutritionAdvice { advice: NutritionAdvice },
    About { sections: &'static [AboutSection] },
    /// Neutral state for pages that need a submission first
    AwaitingSubmission { requested: Page, message: &'static str },
}

pub fn render_page(page: Page, snapshot: Option<&SessionSnapshot>) -> PageView {
    match (page, snapshot) {
        (Page::Calculator, snapshot) => PageView::Calculator {
            result: snapshot.map(|s| CalculatorResult {
                evaluation: evaluate(s),
                current_height: current_height_text(s),
            }),
        },
        (Page::About, _) => PageView::About { sections: ABOUT },
        (requested, None) => PageView::AwaitingSubmission {
            requested,
            message: MISSING_SUBMISSION,
        },
        (Page::Chart, Some(s)) => PageView::Chart { chart: weight_chart(s) },
        (Page::Bmi, Some(s)) => {
            let m = &s.measurement;
            let bmi = compute_bmi(m.weight_kg, m.height_cm);
            PageView::Bmi {
                index_text: format!("{:.2}", bmi.index),
                bmi,
            }
        }
        (Page::NutritionAdvice, Some(s)) => PageView::NutritionAdvice {
            advice: nutrition_advice(s),
        },
    }
}

// ============================================================================
// ABOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutSection {
    pub heading: &'static str,
    pub paragraphs: &'static [&'static str],
}

pub const ABOUT: &[AboutSection] = &[
    AboutSection {
        heading: "Kalkulator Perkembangan Anak",
        paragraphs: &[
            "Aplikasi untuk membantu orang tua, tenaga medis, dan guru dalam memantau dan mengevaluasi perkembangan anak-anak: menghitung berat badan ideal, memeriksa status perkembangan fisik, serta memberikan saran gizi.",
        ],
    },
    AboutSection {
        heading: "Fitur-fitur Utama",
        paragraphs: &[
            "1. Kalkulator Berat dan Tinggi Ideal: menggunakan rumus Indeks Broca untuk menghitung berat badan ideal berdasarkan tinggi badan anak.",
            "2. Perhitungan IMT (Indeks Massa Tubuh): menentukan kategori berat badan anak (sangat kurus, kurus, normal, berlebih, obesitas).",
            "3. Laporan dalam Format Sertifikat PDF: hasil analisis lengkap dengan kode QR, untuk dokumentasi orang tua, tenaga medis, atau arsip sekolah.",
            "4. Rekomendasi Gizi: saran pola makan berdasarkan status berat badan anak.",
            "5. Visualisasi Grafik: perbandingan berat badan anak dengan berat ideal.",
        ],
    },
    AboutSection {
        heading: "Cara Penggunaan Aplikasi",
        paragraphs: &[
            "1. Masukkan nama, usia, jenis kelamin, berat badan, dan tinggi badan anak pada halaman Kalkulator.",
            "2. Tekan Cek Ideal untuk mengetahui status berat badan (kurang, ideal, atau berlebih) dan tinggi badan anak.",
            "3. Sertifikat PDF disimpan setelah perhitungan selesai.",
            "4. Buka Grafik dan Saran Gizi untuk perbandingan berat dan rekomendasi pola makan.",
        ],
    },
    AboutSection {
        heading: "Dibuat oleh",
        paragraphs: &["Mr. Zuzawa", "\"Membantu tumbuh kembang anak, dimulai dari data yang baik.\""],
    },
    AboutSection {
        heading: "Saran dan Masukan",
        paragraphs: &[
            "Kami sangat menghargai setiap saran dan masukan dari Anda untuk meningkatkan aplikasi ini. Jika Anda memiliki pertanyaan atau feedback, jangan ragu untuk menghubungi kami melalui WhatsApp:",
            FEEDBACK_LINK,
        ],
    },
];

/// WhatsApp chat link with a prefilled feedback greeting
pub const FEEDBACK_LINK: &str =
    "https://wa.me/628123456789?text=Halo%20saya%20ingin%20memberikan%20masukan%20untuk%20aplikasi%20ini.";

// ============================================================================
// TESTS
// ============================================================================

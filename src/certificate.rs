// 📜 Certificate - fixed-layout A4 report with an embedded QR code
//
// Layout coordinates below are measured from the top-left corner in mm and
// flipped to PDF space (origin bottom-left) at draw time.

use crate::advisor::ComparisonStatus;
use crate::measurement::{display_measure, Measurement};
use crate::qr::{self, QrMatrix};
use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use chrono::{Local, NaiveDate};
use image::GrayImage;
use printpdf::lopdf::Document;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Line, Mm,
    PdfDocument, PdfLayerReference, Point, Px, Rgb,
};
use serde::Serialize;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const TITLE: &str = "SERTIFIKAT PERKEMBANGAN ANAK";
pub const SIGNATURE_LINE: &str = "________________________";
pub const SIGNATURE_MOTTO: &str = "Berbagi itu indah";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const RULE_Y: f32 = 25.0;
const BODY_TOP: f32 = 35.0;
const BODY_LINE_HEIGHT: f32 = 8.0;
const BODY_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const BODY_FONT_SIZE: f32 = 12.0;
const QR_X: f32 = 10.0;
const QR_Y: f32 = 230.0;
const QR_WIDTH: f32 = 30.0;

// Average glyph advance as a share of the font size, used for alignment
const REGULAR_ADVANCE: f32 = 0.5;
const BOLD_ADVANCE: f32 = 0.56;
const PT_TO_MM: f32 = 0.3528;

// Builtin Helvetica is written with this single-byte encoding
const BUILTIN_ENCODING: &str = "WinAnsiEncoding";

// ============================================================================
// CONTENT (pure)
// ============================================================================

/// `Nama: {name}, Usia: {age}, Berat: {weight}, Tinggi: {height}`
pub fn qr_payload(m: &Measurement) -> String {
    format!(
        "Nama: {}, Usia: {}, Berat: {}, Tinggi: {}",
        m.name,
        m.age_years,
        display_measure(m.weight_kg),
        display_measure(m.height_cm)
    )
}

/// Long human-readable form, e.g. `17 October 2026`
pub fn issued_date_text(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateContent {
    pub title: String,
    pub body_lines: Vec<String>,
    pub issued_line: String,
    pub qr_payload: String,
}

impl CertificateContent {
    pub fn compose(
        measurement: &Measurement,
        ideal_weight: f64,
        weight_status: ComparisonStatus,
        height_status: ComparisonStatus,
        issued_on: NaiveDate,
    ) -> Self {
        let m = measurement;
        let body_lines = vec![
            String::new(),
            "Dengan ini menyatakan bahwa:".to_string(),
            String::new(),
            format!("Nama              : {}", m.name),
            format!("Usia              : {} tahun", m.age_years),
            format!("Berat Badan       : {} kg", display_measure(m.weight_kg)),
            format!("Tinggi Badan      : {} cm", display_measure(m.height_cm)),
            String::new(),
            format!("Berat ideal berdasarkan Indeks Broca adalah {:.2} kg.", ideal_weight),
            String::new(),
            format!("Status Berat      : {}", weight_status),
            format!("Status Tinggi     : {}", height_status),
        ];

        CertificateContent {
            title: TITLE.to_string(),
            body_lines,
            issued_line: format!("Diterbitkan pada: {}", issued_date_text(issued_on)),
            qr_payload: qr_payload(m),
        }
    }

    /// Every string drawn with the builtin fonts, signature included
    pub fn drawn_text(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.issued_line.as_str()]
            .into_iter()
            .chain(self.body_lines.iter().map(String::as_str))
            .chain([SIGNATURE_LINE, SIGNATURE_MOTTO])
    }

    /// Fails on the first character the builtin fonts would silently drop
    pub fn ensure_printable(&self) -> Result<()> {
        for text in self.drawn_text() {
            if let Some(ch) = unprintable_char(text) {
                bail!(
                    "{:?} contains {:?} (U+{:04X}), which the certificate font cannot print",
                    text,
                    ch,
                    ch as u32
                );
            }
        }
        Ok(())
    }
}

fn unprintable_char(text: &str) -> Option<char> {
    let mut buf = [0u8; 4];
    text.chars()
        .find(|ch| Document::encode_text(Some(BUILTIN_ENCODING), ch.encode_utf8(&mut buf)).is_empty())
}

/// Greedy wrap at `max_width` mm, breaking at the last space that fits or mid-word
/// when a word alone is wider than the line. Runs of spaces inside a line are kept.
pub fn wrap_to_width(text: &str, max_width: f32, font_size: f32, advance: f32) -> Vec<String> {
    let glyph = font_size * advance * PT_TO_MM;
    let per_line = ((max_width / glyph).floor() as usize).max(1);
    let chars: Vec<char> = text.chars().collect();

    let mut lines = Vec::new();
    let mut start = 0;
    while chars.len() - start > per_line {
        let window = &chars[start..=start + per_line];
        match window.iter().rposition(|&c| c == ' ') {
            Some(space) if space > 0 => {
                lines.push(chars[start..start + space].iter().collect());
                start += space + 1;
            }
            _ => {
                lines.push(chars[start..start + per_line].iter().collect());
                start += per_line;
            }
        }
    }
    lines.push(chars[start..].iter().collect());
    lines
}

// ============================================================================
// PDF RENDERING
// ============================================================================

fn pdf_error<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow!("PDF rendering failed: {:?}", err)
}

fn from_top(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn gray(level: u8) -> Color {
    let v = level as f32 / 255.0;
    Color::Rgb(Rgb::new(v, v, v, None))
}

fn text_width(text: &str, font_size: f32, advance: f32) -> f32 {
    text.chars().count() as f32 * font_size * advance * PT_TO_MM
}

/// Baseline for a text cell of `height` whose top edge sits at `top`
fn baseline(top: f32, height: f32) -> Mm {
    from_top(top + height * 0.7)
}

/// Places the QR raster as an image XObject, QR_WIDTH mm square
fn place_qr(layer: &PdfLayerReference, raster: &GrayImage) {
    let (width, height) = raster.dimensions();
    let image = Image::from(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Greyscale,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: raster.as_raw().clone(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    });

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(QR_X)),
            translate_y: Some(from_top(QR_Y + QR_WIDTH)),
            dpi: Some(width as f32 * 25.4 / QR_WIDTH),
            ..Default::default()
        },
    );
}

/// Render the certificate to PDF bytes
pub fn render_pdf(content: &CertificateContent, qr_raster: &GrayImage) -> Result<Vec<u8>> {
    content.ensure_printable()?;

    let (doc, page, layer) = PdfDocument::new(
        content.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Sertifikat",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let bold: IndirectFontRef = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(pdf_error)?;

    // Header
    let title_width = text_width(&content.title, 20.0, BOLD_ADVANCE);
    layer.set_fill_color(gray(40));
    layer.use_text(
        content.title.as_str(),
        20.0,
        Mm((PAGE_WIDTH - title_width) / 2.0),
        baseline(MARGIN, 10.0),
        &bold,
    );

    layer.set_outline_thickness(0.5);
    layer.set_outline_color(gray(100));
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), from_top(RULE_Y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), from_top(RULE_Y)), false),
        ],
        is_closed: false,
    });

    // Body
    layer.set_fill_color(gray(30));
    let mut cursor = BODY_TOP;
    for line in &content.body_lines {
        for segment in wrap_to_width(line, BODY_WIDTH, BODY_FONT_SIZE, REGULAR_ADVANCE) {
            if !segment.is_empty() {
                layer.use_text(segment, BODY_FONT_SIZE, Mm(MARGIN), baseline(cursor, BODY_LINE_HEIGHT), &regular);
            }
            cursor += BODY_LINE_HEIGHT;
        }
    }

    // Issuance date
    cursor += 10.0;
    layer.use_text(
        content.issued_line.as_str(),
        BODY_FONT_SIZE,
        Mm(MARGIN),
        baseline(cursor, 10.0),
        &regular,
    );
    cursor += 10.0;

    // Signature, right aligned
    cursor += 15.0;
    for text in [SIGNATURE_LINE, SIGNATURE_MOTTO] {
        let x = PAGE_WIDTH - MARGIN - text_width(text, 11.0, REGULAR_ADVANCE);
        layer.use_text(text, 11.0, Mm(x), baseline(cursor, 6.0), &italic);
        cursor += 6.0;
    }

    place_qr(&layer, qr_raster);

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(pdf_error)?;
    writer.into_inner().context("Failed to flush PDF buffer")
}

// ============================================================================
// ARTIFACTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub pdf: PathBuf,
    pub qr_image: PathBuf,
}

impl ArtifactPaths {
    pub fn new(pdf: impl Into<PathBuf>, qr_image: impl Into<PathBuf>) -> Self {
        ArtifactPaths {
            pdf: pdf.into(),
            qr_image: qr_image.into(),
        }
    }

    /// Unique pair of paths in `dir`, one uuid per request
    pub fn unique_in(dir: &Path) -> Self {
        let id = uuid::Uuid::new_v4();
        ArtifactPaths {
            pdf: dir.join(format!("sertifikat-{}.pdf", id)),
            qr_image: dir.join(format!("qr-{}.png", id)),
        }
    }
}

/// Writes the QR raster then the certificate, overwriting both paths.
/// Dated today; any I/O or encoding fault is returned unchanged in kind.
/// Text the builtin fonts cannot print is refused before either file is touched.
pub fn format_certificate(
    measurement: &Measurement,
    ideal_weight: f64,
    weight_status: ComparisonStatus,
    height_status: ComparisonStatus,
    paths: &ArtifactPaths,
) -> Result<ArtifactPaths> {
    let today = Local::now().date_naive();
    format_certificate_on(measurement, ideal_weight, weight_status, height_status, today, paths)
}

pub fn format_certificate_on(
    measurement: &Measurement,
    ideal_weight: f64,
    weight_status: ComparisonStatus,
    height_status: ComparisonStatus,
    issued_on: NaiveDate,
    paths: &ArtifactPaths,
) -> Result<ArtifactPaths> {
    let content = CertificateContent::compose(measurement, ideal_weight, weight_status, height_status, issued_on);
    content
        .ensure_printable()
        .with_context(|| format!("Certificate for {:?} cannot be rendered", measurement.name))?;

    let qr = QrMatrix::encode(&content.qr_payload)?;
    qr.save_png(&paths.qr_image)?;
    let raster = qr::load_png(&paths.qr_image)?;

    let bytes = render_pdf(&content, &raster)?;
    fs::write(&paths.pdf, &bytes)
        .with_context(|| format!("Failed to write certificate: {:?}", paths.pdf))?;

    tracing::debug!(pdf = ?paths.pdf, qr = ?paths.qr_image, bytes = bytes.len(), "certificate written");
    Ok(paths.clone())
}

/// Per-request artifact pair, removed when dropped
pub struct ScopedArtifacts {
    paths: ArtifactPaths,
}

impl ScopedArtifacts {
    pub fn new_in(dir: &Path) -> Self {
        ScopedArtifacts {
            paths: ArtifactPaths::unique_in(dir),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }
}

impl Drop for ScopedArtifacts {
    fn drop(&mut self) {
        for path in [&self.paths.pdf, &self.paths.qr_image] {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = ?path, error = %e, "failed to remove artifact");
                }
            }
        }
    }
}

/// Certificate bytes built in unique temporary paths under `dir`
pub fn certificate_bytes(
    measurement: &Measurement,
    ideal_weight: f64,
    weight_status: ComparisonStatus,
    height_status: ComparisonStatus,
    dir: &Path,
) -> Result<Vec<u8>> {
    let scoped = ScopedArtifacts::new_in(dir);
    format_certificate(measurement, ideal_weight, weight_status, height_status, scoped.paths())?;
    fs::read(&scoped.paths().pdf)
        .with_context(|| format!("Failed to read certificate back: {:?}", scoped.paths().pdf))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Sex;

    fn ani() -> Measurement {
        Measurement::new("Ani", 6, Sex::Female, 18.0, 110.0)
    }

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    /// Text operand as the builtin fonts write it into the page stream
    fn shown(bytes: &[u8]) -> Vec<u8> {
        let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        format!("<{}> Tj", hex).into_bytes()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn write_for(m: &Measurement, dir: &Path) -> (ArtifactPaths, Result<ArtifactPaths>) {
        let paths = ArtifactPaths::new(dir.join("out.pdf"), dir.join("qr.png"));
        let result = format_certificate_on(m, 8.5, ComparisonStatus::Above, ComparisonStatus::Ideal, issued(), &paths);
        (paths, result)
    }

    #[test]
    fn test_qr_payload() {
        assert_eq!(qr_payload(&ani()), "Nama: Ani, Usia: 6, Berat: 18.0, Tinggi: 110.0");
    }

    #[test]
    fn test_issued_date_text() {
        assert_eq!(issued_date_text(issued()), "17 October 2026");
        assert_eq!(
            issued_date_text(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()),
            "05 March 2025"
        );
    }

    #[test]
    fn test_compose_body() {
        let content =
            CertificateContent::compose(&ani(), 8.5, ComparisonStatus::Above, ComparisonStatus::Ideal, issued());

        assert_eq!(content.title, "SERTIFIKAT PERKEMBANGAN ANAK");
        assert_eq!(content.issued_line, "Diterbitkan pada: 17 October 2026");
        assert!(content.body_lines.contains(&"Nama              : Ani".to_string()));
        assert!(content.body_lines.contains(&"Usia              : 6 tahun".to_string()));
        assert!(content.body_lines.contains(&"Berat Badan       : 18.0 kg".to_string()));
        assert!(content
            .body_lines
            .contains(&"Berat ideal berdasarkan Indeks Broca adalah 8.50 kg.".to_string()));
        assert!(content.body_lines.contains(&"Status Berat      : berlebih".to_string()));
        assert!(content.body_lines.contains(&"Status Tinggi     : ideal".to_string()));
    }

    #[test]
    fn test_empty_name_is_allowed() {
        let m = Measurement::new("", 5, Sex::Male, 25.0, 150.0);
        let content = CertificateContent::compose(&m, 45.0, ComparisonStatus::Below, ComparisonStatus::Ideal, issued());
        assert_eq!(content.qr_payload, "Nama: , Usia: 5, Berat: 25.0, Tinggi: 150.0");
    }

    #[test]
    fn test_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("out.pdf"), dir.path().join("qr.png"));

        let written =
            format_certificate_on(&ani(), 8.5, ComparisonStatus::Above, ComparisonStatus::Ideal, issued(), &paths)
                .unwrap();

        assert_eq!(written, paths);
        let pdf = fs::read(&paths.pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert!(paths.qr_image.exists());

        assert!(contains(&pdf, &shown(TITLE.as_bytes())));
        assert!(contains(&pdf, &shown(b"Nama              : Ani")));
        assert!(contains(&pdf, &shown(b"Status Berat      : berlebih")));
        assert!(contains(&pdf, &shown(b"Diterbitkan pada: 17 October 2026")));
        assert!(contains(&pdf, &shown(SIGNATURE_MOTTO.as_bytes())));
    }

    #[test]
    fn test_qr_is_embedded_as_image() {
        let dir = tempfile::tempdir().unwrap();
        let (paths, result) = write_for(&ani(), dir.path());
        result.unwrap();

        let pdf = fs::read(&paths.pdf).unwrap();
        assert!(contains(&pdf, b"/Subtype/Image"));
        assert!(contains(&pdf, b"/ColorSpace/DeviceGray"));

        let raster = qr::load_png(&paths.qr_image).unwrap();
        let width = format!("/Width {}", raster.width());
        assert!(contains(&pdf, width.as_bytes()));
    }

    #[test]
    fn test_unprintable_name_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let m = Measurement::new("小明", 6, Sex::Male, 20.0, 115.0);

        let (paths, result) = write_for(&m, dir.path());

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("小明"));
        assert!(message.contains("U+5C0F"));
        assert!(!paths.pdf.exists());
        assert!(!paths.qr_image.exists());
    }

    #[test]
    fn test_latin_accents_are_printed() {
        let dir = tempfile::tempdir().unwrap();
        let m = Measurement::new("Zoë", 6, Sex::Female, 18.0, 110.0);

        let (paths, result) = write_for(&m, dir.path());
        result.unwrap();

        let pdf = fs::read(&paths.pdf).unwrap();
        let mut line = b"Nama              : Zo".to_vec();
        line.push(0xEB);
        assert!(contains(&pdf, &shown(&line)));
    }

    #[test]
    fn test_wrap_keeps_short_lines() {
        let line = "Nama              : Ani";
        assert_eq!(wrap_to_width(line, BODY_WIDTH, BODY_FONT_SIZE, REGULAR_ADVANCE), vec![line.to_string()]);
        assert_eq!(wrap_to_width("", BODY_WIDTH, BODY_FONT_SIZE, REGULAR_ADVANCE), vec![String::new()]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces_within_width() {
        let name = "Anak Agung Gede Ngurah ".repeat(8);
        let line = format!("Nama              : {}", name.trim_end());

        let segments = wrap_to_width(&line, BODY_WIDTH, BODY_FONT_SIZE, REGULAR_ADVANCE);

        assert!(segments.len() >= 2);
        for segment in &segments {
            assert!(text_width(segment, BODY_FONT_SIZE, REGULAR_ADVANCE) <= BODY_WIDTH);
            assert!(!segment.starts_with(' '));
        }
        assert!(segments[0].starts_with("Nama              : Anak"));
        assert_eq!(segments.join(" "), line);
    }

    #[test]
    fn test_wrap_splits_unbroken_words() {
        let word = "A".repeat(200);
        let segments = wrap_to_width(&word, BODY_WIDTH, BODY_FONT_SIZE, REGULAR_ADVANCE);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments.concat(), word);
        for segment in &segments {
            assert!(text_width(segment, BODY_FONT_SIZE, REGULAR_ADVANCE) <= BODY_WIDTH);
        }
    }

    #[test]
    fn test_long_name_wraps_in_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let name = "Anak Agung Gede Ngurah ".repeat(8);
        let m = Measurement::new(name.trim_end(), 6, Sex::Male, 20.0, 115.0);

        let (paths, result) = write_for(&m, dir.path());
        result.unwrap();

        let line = format!("Nama              : {}", m.name);
        let pdf = fs::read(&paths.pdf).unwrap();
        assert!(!contains(&pdf, &shown(line.as_bytes())));
        for segment in wrap_to_width(&line, BODY_WIDTH, BODY_FONT_SIZE, REGULAR_ADVANCE) {
            assert!(contains(&pdf, &shown(segment.as_bytes())));
        }
    }

    #[test]
    fn test_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("out.pdf"), dir.path().join("qr.png"));
        fs::write(&paths.pdf, b"stale").unwrap();

        format_certificate(&ani(), 8.5, ComparisonStatus::Above, ComparisonStatus::Ideal, &paths).unwrap();

        assert!(fs::read(&paths.pdf).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let paths = ArtifactPaths::new("/nonexistent/dir/out.pdf", "/nonexistent/dir/qr.png");
        let result = format_certificate(&ani(), 8.5, ComparisonStatus::Above, ComparisonStatus::Ideal, &paths);
        assert!(result.is_err());
    }

    #[test]
    fn test_unique_paths_differ() {
        let dir = Path::new("/tmp");
        assert_ne!(ArtifactPaths::unique_in(dir), ArtifactPaths::unique_in(dir));
    }

    #[test]
    fn test_certificate_bytes_cleans_up() {
        let dir = tempfile::tempdir().unwrap();

        let bytes =
            certificate_bytes(&ani(), 8.5, ComparisonStatus::Above, ComparisonStatus::Ideal, dir.path()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scoped_artifacts_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let scoped = ScopedArtifacts::new_in(dir.path());
        assert!(scoped.paths().pdf.starts_with(dir.path()));
        drop(scoped);
    }
}

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use child_growth::{compute_bmi, evaluate, nutrition_advice, submit, AppConfig, Measurement, Sex};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = AppConfig::from_args(&args)?;

    let positional = positional_args(args.get(1..).unwrap_or(&[]));
    if positional.first().map(|s| s.as_str()) == Some("certify") {
        // One-shot mode
        init_tracing();
        run_certify(&positional[1..], &config)?;
    } else {
        // UI mode (default)
        run_ui_mode(config)?;
    }

    Ok(())
}

/// Console logging for the one-shot mode; the TUI owns the terminal instead
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "child_growth=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Arguments with `--config <path>` removed, wherever it appears
fn positional_args(args: &[String]) -> Vec<String> {
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            iter.next();
            continue;
        }
        positional.push(arg.clone());
    }
    positional
}

fn parse_certify_args(args: &[String]) -> Result<Measurement> {
    let positional = positional_args(args);

    if positional.len() != 5 {
        anyhow::bail!("usage: child-growth certify <name> <age> <male|female> <weight_kg> <height_cm>");
    }

    let age = positional[1]
        .parse::<u32>()
        .with_context(|| format!("Invalid age: {}", positional[1]))?;
    let sex = Sex::parse(&positional[2])
        .with_context(|| format!("Invalid sex: {} (expected male or female)", positional[2]))?;
    let weight = positional[3]
        .parse::<f64>()
        .with_context(|| format!("Invalid weight: {}", positional[3]))?;
    let height = positional[4]
        .parse::<f64>()
        .with_context(|| format!("Invalid height: {}", positional[4]))?;

    let measurement = Measurement::new(positional[0].as_str(), age, sex, weight, height);
    measurement.check_input_domains()?;
    Ok(measurement)
}

fn run_certify(args: &[String], config: &AppConfig) -> Result<()> {
    println!("🧒 Kalkulator Perkembangan Anak");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let measurement = parse_certify_args(args)?;
    tracing::info!(name = %measurement.name, age = measurement.age_years, "evaluating submission");

    // 1. Evaluate and write artifacts
    let (snapshot, written) = submit(measurement, config)?;
    let evaluation = evaluate(&snapshot);

    println!("\n📏 {}", child_growth::advisor::describe_measurement(&snapshot));
    println!("✓ Berat Ideal: {} ({})", evaluation.ideal_weight_text(), evaluation.weight_delta_text());
    println!("✓ Status Berat: {}", evaluation.weight_status);
    println!("✓ Status Tinggi: {}", evaluation.height_status);

    // 2. BMI
    let m = &snapshot.measurement;
    let bmi = compute_bmi(m.weight_kg, m.height_cm);
    println!("\n⚖️  IMT: {:.2} ({})", bmi.index, bmi.category);

    // 3. Advice
    println!("🍎 {}", nutrition_advice(&snapshot).message);

    println!("\n📝 {}", evaluation.conclusion);
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📄 Sertifikat: {}", written.pdf.display());
    println!("🔳 Kode QR:    {}", written.qr_image.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: AppConfig) -> Result<()> {
    let mut app = ui::App::new(config);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use one-shot mode: child-growth certify <name> <age> <male|female> <weight_kg> <height_cm>");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_certify_args() {
        let m = parse_certify_args(&args(&["Ani", "6", "female", "18", "110"])).unwrap();
        assert_eq!(m.name, "Ani");
        assert_eq!(m.sex, Sex::Female);
        assert_eq!(m.weight_kg, 18.0);
    }

    #[test]
    fn test_parse_certify_args_skips_config_flag() {
        let m = parse_certify_args(&args(&["Budi", "7", "male", "30", "150", "--config", "x.json"])).unwrap();
        assert_eq!(m.height_cm, 150.0);
    }

    #[test]
    fn test_certify_detected_after_config_flag() {
        let full = args(&["child-growth", "--config", "x.json", "certify", "Ani", "6", "female", "18", "110"]);
        let positional = positional_args(&full[1..]);
        assert_eq!(positional[0], "certify");

        let m = parse_certify_args(&positional[1..]).unwrap();
        assert_eq!(m.name, "Ani");
        assert_eq!(m.height_cm, 110.0);
    }

    #[test]
    fn test_positional_args_without_subcommand() {
        let full = args(&["child-growth", "--config", "x.json"]);
        assert!(positional_args(&full[1..]).is_empty());
    }

    #[test]
    fn test_parse_certify_args_rejects_bad_input() {
        assert!(parse_certify_args(&args(&["Ani", "6", "female", "18"])).is_err());
        assert!(parse_certify_args(&args(&["Ani", "six", "female", "18", "110"])).is_err());
        assert!(parse_certify_args(&args(&["Ani", "6", "x", "18", "110"])).is_err());
        assert!(parse_certify_args(&args(&["Ani", "3", "female", "18", "110"])).is_err());
    }
}

//! Subcommand handlers.

use std::path::PathBuf;
use std::time::Duration;

use color_eyre::Result;
use ecmo_core::catalog::all_fields;
use ecmo_core::{
    Config, DrugAnalyzer, FieldKind, FieldProgress, FileStorage, HttpGateway, QaGateway, Storage,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

/// Characters of each answer shown in the run summary.
const PREVIEW_CHARS: usize = 100;

pub fn list_fields() -> Result<()> {
    println!("=== Available Analysis Fields ===");
    for (i, field) in all_fields().iter().enumerate() {
        println!("\n{}. {} ({})", i + 1, field.name, field.kind.slug());
        println!("   Definition: {}", field.definition);
        println!("   Structure: {}", field.structure);
    }
    Ok(())
}

pub fn show_questions(
    config: &Config,
    drug: &str,
    field: Option<FieldKind>,
    papers: Option<PathBuf>,
) -> Result<()> {
    // No engine call is made; the gateway is never touched.
    let analyzer = build_analyzer(config, drug, papers)?;

    println!("Drug: {}", analyzer.drug_name());
    println!("Directory: {}", analyzer.paper_directory().display());

    let kinds = match field {
        Some(kind) => vec![kind],
        None => FieldKind::ALL.to_vec(),
    };

    for kind in kinds {
        let field = kind.field();
        let settings = analyzer.analysis_settings(&field);
        println!("\n=== {} ===", field.name);
        println!("Question: {}", analyzer.question(&field));
        println!("System prompt: {}", settings.system_prompt());
    }

    Ok(())
}

pub async fn analyze(
    config: &Config,
    drug: &str,
    fields: &[FieldKind],
    papers: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let analyzer = build_analyzer(config, drug, papers)?;
    let storage = FileStorage::with_config(config.storage.clone());
    let drug = analyzer.drug_name().to_string();

    let paper_dir = analyzer.paper_directory();
    if !paper_dir.is_dir() {
        warn!(path = %paper_dir.display(), "paper directory does not exist on this machine");
    }

    if let [field] = fields {
        let spinner = create_spinner(&format!("Analyzing {} for {}...", field.name(), drug));
        let result = analyzer.analyze_kind(*field).await;
        spinner.finish_and_clear();
        let result = result?;

        println!("{}", serde_json::to_string_pretty(&result)?);
        let path = storage.save_result(&drug, *field, &result, output.as_deref())?;
        println!("\nResults saved to {}", path.display());
        return Ok(());
    }

    let kinds = if fields.is_empty() {
        FieldKind::ALL.to_vec()
    } else {
        fields.to_vec()
    };

    println!("=== {} ECMO Analysis ===", drug);
    println!("Running analysis for {} fields...", kinds.len());

    let bar = create_progress_bar(kinds.len() as u64);
    let report = analyzer
        .run_fields(&kinds, |progress| match progress {
            FieldProgress::Started { field, .. } => bar.set_message(field.name()),
            FieldProgress::Finished { .. } => bar.inc(1),
        })
        .await;
    bar.finish_and_clear();
    let report = report?;

    let path = storage.save_report(&drug, &report, output.as_deref())?;

    println!("\n=== Analysis Summary ===");
    for (field_name, result) in &report {
        println!("\n{}:", field_name);
        println!("  {}", result.answer_preview(PREVIEW_CHARS));
    }
    println!("\nResults saved to {}", path.display());

    Ok(())
}

fn build_analyzer(
    config: &Config,
    drug: &str,
    papers: Option<PathBuf>,
) -> Result<DrugAnalyzer<Box<dyn QaGateway>>> {
    let gateway: Box<dyn QaGateway> = Box::new(HttpGateway::from_config(&config.gateway)?);
    let mut analyzer = DrugAnalyzer::new(gateway, drug).with_defaults(config.analysis.clone());
    if let Some(dir) = papers {
        analyzer = analyzer.with_paper_directory(dir);
    }
    Ok(analyzer)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

use crate::catalog;
use crate::generator::{
    GenerateYamlConfig, Generator, GeneratorConfig, RowCounts, DEFAULT_ROWS, DEFAULT_SEED,
};
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

pub fn run(
    output: PathBuf,
    rows: Option<usize>,
    seed: Option<u64>,
    as_of: Option<String>,
    config: Option<PathBuf>,
    progress: bool,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => GenerateYamlConfig::load(&path)
            .with_context(|| format!("failed to load config file: {}", path.display()))?,
        None => GenerateYamlConfig::default(),
    };

    // CLI flags win over the config file
    let seed = seed.or(config.seed).unwrap_or(DEFAULT_SEED);
    let counts = RowCounts::from_config(rows.unwrap_or(DEFAULT_ROWS), &config);
    for table in catalog::TABLES {
        if counts.rows_for(table.name) == 0 {
            anyhow::bail!("row count for {} must be at least 1", table.name);
        }
    }

    let as_of = match as_of {
        Some(s) => parse_as_of(&s)?,
        None => Utc::now().naive_utc(),
    };

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    eprintln!(
        "Generating dataset into {} [seed: {}, as-of: {}]",
        output.display(),
        seed,
        as_of.format("%Y-%m-%d %H:%M:%S")
    );
    eprintln!();

    let start = Instant::now();

    let pb = if progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message("Generating tables...");
        Some(pb)
    } else {
        None
    };

    let mut generator = Generator::new(GeneratorConfig {
        seed,
        counts,
        as_of,
    });
    let dataset = generator.generate()?;

    if let Some(pb) = &pb {
        pb.set_message("Writing tables...");
    }

    for table in &dataset.tables {
        let path = table.write_csv(&output)?;
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        eprintln!("Generated {} records in {}", table.rows.len(), file);
    }

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    eprintln!();
    eprintln!("Dataset generated successfully in {:.2?}", start.elapsed());
    Ok(())
}

fn parse_as_of(s: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!(
            "invalid --as-of value: {} (expected YYYY-MM-DD or \"YYYY-MM-DD HH:MM:SS\")",
            s
        )
    })?;
    date.and_hms_opt(0, 0, 0)
        .context("could not anchor --as-of date at midnight")
}

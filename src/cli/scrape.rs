//! The `scrape` command.

use std::path::PathBuf;

use console::style;

use dirscrape::config::Settings;
use dirscrape::export::{to_csv, to_json, ExportFormat};
use dirscrape::pipeline::{
    DynScraper, PageOutcome, ScrapeOutcome, ScrapeProgress, ScrapeReport, ScrapeRequest,
};

use super::helpers::{arrow, error, print_records_table, spinner, success, warning};
use super::OutputFormat;

pub struct ScrapeOptions {
    pub max_records: usize,
    pub api_key: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

pub async fn cmd_scrape(settings: &Settings, url: &str, options: ScrapeOptions) -> anyhow::Result<()> {
    let request = ScrapeRequest::new(url)
        .with_max_records(options.max_records)
        .with_api_key(options.api_key);
    let scraper = DynScraper::from_settings(settings, request.api_key.as_deref())?;

    let pb = spinner(format!("Discovering pages from {}...", url))?;
    let report = scraper
        .run_with_progress(&request, |event| match event {
            ScrapeProgress::Discovered { candidates } => {
                pb.set_message(format!("Scraping {} candidate pages...", candidates));
            }
            ScrapeProgress::Page {
                index,
                total,
                collected,
                ..
            } => {
                pb.set_message(format!(
                    "[{}/{}] {} records collected",
                    index + 1,
                    total,
                    collected
                ));
            }
        })
        .await;
    pb.finish_and_clear();

    if options.verbose {
        print_report(&report);
    }

    match &report.outcome {
        ScrapeOutcome::Records(records) => {
            match options.format {
                OutputFormat::Table => print_records_table(records),
                OutputFormat::Json => println!("{}", to_json(records)?),
                OutputFormat::Csv => print!("{}", to_csv(records)),
            }

            if let Some(path) = &options.output {
                let contents = ExportFormat::from_path(path).render(records)?;
                tokio::fs::write(path, contents).await?;
                eprintln!(
                    "{} Wrote {} records to {}",
                    success(),
                    records.len(),
                    path.display()
                );
            }
        }
        ScrapeOutcome::Degraded(raw) => {
            eprintln!(
                "{} No structured records could be extracted; raw model output follows",
                warning()
            );
            println!("{}", raw);
            if let Some(path) = &options.output {
                eprintln!("  {} Nothing written to {}", arrow(), path.display());
            }
        }
    }

    Ok(())
}

fn print_report(report: &ScrapeReport) {
    eprintln!("\n{}", style("Pages").bold());
    for page in &report.pages {
        let icon = match page.outcome {
            PageOutcome::Records { .. } => success(),
            PageOutcome::Skipped { .. } => warning(),
            PageOutcome::Failed { .. } => error(),
        };
        eprintln!(
            "  {} {:<18} {}",
            icon,
            page.method.as_str(),
            page.url
        );
        eprintln!("      {} {}", arrow(), page.outcome);
    }
    for candidate in report.candidates.iter().skip(report.pages.len()) {
        eprintln!(
            "  {} {:<18} {} (not visited)",
            style("○").dim(),
            candidate.method.as_str(),
            candidate.url
        );
    }
    eprintln!(
        "\n{} records from {} pages in {}s\n",
        report.record_count(),
        report.pages_extracted(),
        report.elapsed().num_seconds()
    );
}

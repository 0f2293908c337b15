//! Shared helpers for CLI output.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

use dirscrape::extract::BusinessRecord;

pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

pub fn warning() -> StyledObject<&'static str> {
    style("!").yellow()
}

pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

pub fn arrow() -> StyledObject<&'static str> {
    style("→").dim()
}

/// Ticking spinner on stderr.
pub fn spinner(message: impl Into<String>) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Shorten to `max` characters, ending with "..." when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn print_records_table(records: &[BusinessRecord]) {
    println!(
        "\n{:<30}  {:<16}  {:<28}  Address",
        "Name", "Phone", "Email"
    );
    println!("{}", "-".repeat(110));

    for record in records {
        println!(
            "{:<30}  {:<16}  {:<28}  {}",
            truncate(&record.name, 30),
            truncate(record.phone.as_deref().unwrap_or("-"), 16),
            truncate(record.email.as_deref().unwrap_or("-"), 28),
            truncate(record.address.as_deref().unwrap_or("-"), 40)
        );
    }

    println!("\n{} records", records.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Acme Plumbing Services", 10), "Acme Pl...");
        assert_eq!(truncate("Café Müller GmbH", 8), "Café ...");
    }
}

use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use dradis_search_api::Match;

pub const NO_RESULTS: &str = "No results found";
pub const HEADER: &str = "Found the following issues:";

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Numbered list of issue URLs with titles
    #[default]
    Text,
    /// JSON array of matches
    Json,
    /// One issue URL per line
    Quiet,
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, matches: &[Match]) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, matches)?;
        out.flush()?;
        Ok(())
    }

    /// Write `matches` in discovery order. An empty slice always produces
    /// the single no-results line, whatever the format.
    pub fn render_to<W: Write>(&self, out: &mut W, matches: &[Match]) -> Result<()> {
        if matches.is_empty() {
            writeln!(out, "{NO_RESULTS}")?;
            return Ok(());
        }

        match self.format {
            OutputFormat::Text => {
                writeln!(out, "{HEADER}")?;
                for (i, m) in matches.iter().enumerate() {
                    writeln!(out, "{}: {}", i + 1, m)?;
                }
            }
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(matches)?)?;
            }
            OutputFormat::Quiet => {
                for m in matches {
                    writeln!(out, "{}", m.url)?;
                }
            }
        }

        Ok(())
    }
}

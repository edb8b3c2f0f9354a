//! PageScrape CLI - scrape web pages into a timestamped markdown file

use clap::{Parser, ValueEnum};
use pagescrape::client::SCROLL_STEPS;
use pagescrape::writer::DEFAULT_OUTPUT_DIR;
use pagescrape::{ScrapeReport, Scraper};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Summary format printed to stdout
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Md,
    /// JSON report
    Json,
}

/// Scrape websites and save their content to a Markdown file
#[derive(Parser, Debug)]
#[command(name = "scraper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// One or more URLs to scrape
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Output Markdown file name (e.g. my_output.md); a timestamp is added automatically
    #[arg(long, short)]
    output: Option<String>,

    /// Directory the Markdown file is written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Custom User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Path to the Chrome/Chromium binary used for dynamic pages
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Extra hostname substring rendered with the headless browser (repeatable)
    #[arg(long = "dynamic-host", value_name = "HOST")]
    dynamic_hosts: Vec<String>,

    /// Scroll-to-bottom steps per dynamic page
    #[arg(long, default_value_t = SCROLL_STEPS)]
    scroll_steps: u32,

    /// Delay after each scroll step, in milliseconds
    #[arg(long, default_value_t = 3000)]
    scroll_delay_ms: u64,

    /// Summary format
    #[arg(long, default_value = "md")]
    format: OutputFormat,
}

impl Cli {
    fn scraper(&self) -> Scraper {
        let mut builder = Scraper::builder()
            .output_dir(&self.output_dir)
            .scroll_steps(self.scroll_steps)
            .scroll_delay(Duration::from_millis(self.scroll_delay_ms));

        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua);
        }
        if let Some(chrome) = &self.chrome {
            builder = builder.chrome_executable(chrome);
        }
        for host in &self.dynamic_hosts {
            builder = builder.dynamic_host(host);
        }

        builder.build()
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let scraper = cli.scraper();

    let report = scraper.scrape(&cli.urls).await;

    let saved = match scraper.save_report(&report, cli.output.as_deref()).await {
        Ok(saved) => saved,
        Err(e) => {
            eprintln!("Failed to save scraped content: {}", e);
            std::process::exit(1);
        }
    };

    match cli.format {
        OutputFormat::Md => writeln_safe(&format_summary(&report, saved.as_deref())),
        OutputFormat::Json => {
            let json = format_json(&report, saved.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error serializing report: {}", e);
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Human-readable summary of a batch
fn format_summary(report: &ScrapeReport, saved: Option<&Path>) -> String {
    let mut output = match saved {
        Some(path) => format!("Scraped content saved to: {}", path.display()),
        None => "No content was scraped.".to_string(),
    };

    if !report.errors.is_empty() {
        output.push_str("\n\nEncountered errors during scraping:");
        for err in &report.errors {
            output.push_str(&format!("\n- {}", err));
        }
    }

    output
}

/// JSON report with the saved path
fn format_json(report: &ScrapeReport, saved: Option<&Path>) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(report)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "saved_path".to_string(),
            saved
                .map(|p| serde_json::Value::String(p.display().to_string()))
                .unwrap_or(serde_json::Value::Null),
        );
    }
    serde_json::to_string_pretty(&value)
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

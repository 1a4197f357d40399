use clap::{Parser, ValueEnum};
use seo_lens::export::ExportFormat;
use seo_lens::render::Tab;
use seo_lens::{InspectError, PageSource};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seo-lens")]
#[command(about = "On-page SEO inspector: headings, images, links, meta tags and structured data")]
#[command(version)]
pub struct Args {
    /// Page to inspect (http(s) URL or saved HTML file)
    pub target: String,

    /// How to load the page; guessed from the target when omitted
    #[arg(short, long, value_enum)]
    pub source: Option<SourceArg>,

    /// Page URL to assume for a saved HTML file
    #[arg(long)]
    pub url: Option<String>,

    /// Tab to show
    #[arg(short, long, value_enum, default_value_t = TabArg::All)]
    pub tab: TabArg,

    /// Write the exports of the shown tabs in this format
    #[arg(short, long, value_enum)]
    pub export: Option<ExportArg>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page load timeout in seconds, overriding the configuration
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Resolve and print the robots.txt and sitemap links
    #[arg(long)]
    pub footer: bool,

    /// Print the help text of every field shown
    #[arg(long)]
    pub explain: bool,

    /// Flag images without alt text and report how many there are
    #[arg(long)]
    pub highlight: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Http,
    Webdriver,
    File,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Overview,
    Headings,
    Images,
    Links,
    Social,
    Schema,
    All,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportArg {
    Csv,
    Json,
    Text,
    Html,
}

impl TabArg {
    pub fn tabs(&self) -> Vec<Tab> {
        match self {
            TabArg::Overview => vec![Tab::Overview],
            TabArg::Headings => vec![Tab::Headings],
            TabArg::Images => vec![Tab::Images],
            TabArg::Links => vec![Tab::Links],
            TabArg::Social => vec![Tab::Social],
            TabArg::Schema => vec![Tab::Schema],
            TabArg::All => Tab::ALL.to_vec(),
        }
    }
}

impl ExportArg {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Json => ExportFormat::Json,
            ExportArg::Text => ExportFormat::Text,
            ExportArg::Html => ExportFormat::Html,
        }
    }
}

/// Convert from CLI arguments to a page source
pub fn convert_source(
    arg: Option<SourceArg>,
    target: &str,
    url: Option<String>,
) -> Result<PageSource, InspectError> {
    let source = match arg {
        None => match PageSource::detect(target) {
            PageSource::File(path, _) => PageSource::File(path, url),
            other => other,
        },
        Some(SourceArg::Http) => PageSource::Http(target.to_string()),
        Some(SourceArg::Webdriver) => PageSource::WebDriver(target.to_string()),
        Some(SourceArg::File) => {
            let path = PathBuf::from(target);
            if !path.is_file() {
                return Err(InspectError::Config(format!(
                    "{} is not a readable file",
                    path.display()
                )));
            }
            PageSource::File(path, url)
        }
    };
    Ok(source)
}

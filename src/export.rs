use crate::error::{InspectError, Result};
use crate::results::{HeadingRecord, ImageRecord, LinkRecord};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File formats the exporters can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain",
            ExportFormat::Html => "text/html",
        }
    }
}

/// A generated export file, ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub contents: String,
}

impl Download {
    pub fn new(page_url: &str, kind: &str, format: ExportFormat, contents: String) -> Self {
        Self {
            filename: crate::utils::export_filename(page_url, kind, format.extension()),
            mime: format.mime(),
            contents,
        }
    }

    /// Writes the file into `dir`, creating the directory if needed
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents)?;
        ::log::info!("Saved {} ({} bytes)", path.display(), self.contents.len());
        Ok(path)
    }
}

/// A record that can be written as one CSV row
pub trait CsvRow {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

impl CsvRow for ImageRecord {
    fn header() -> &'static [&'static str] {
        &["Source", "Alt", "Title", "Width", "Height"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.src.clone(),
            self.alt.clone(),
            self.title.clone(),
            self.width.to_string(),
            self.height.to_string(),
        ]
    }
}

impl CsvRow for LinkRecord {
    fn header() -> &'static [&'static str] {
        &["URL", "Anchor Text", "Type", "Has Text"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.href.clone(),
            self.text.clone(),
            if self.is_internal { "internal" } else { "external" }.to_string(),
            if self.has_text { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl CsvRow for HeadingRecord {
    fn header() -> &'static [&'static str] {
        &["Level", "Text", "Id", "Classes", "Navigation"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            format!("H{}", self.level),
            self.text.clone(),
            self.id.clone(),
            self.classes.clone(),
            if self.is_navigation { "yes" } else { "no" }.to_string(),
        ]
    }
}

/// CSV writer shared by every export; fields are quoted only when they need it
#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

impl CsvExporter {
    pub fn new(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(InspectError::Config(format!(
                "CSV delimiter must be ASCII, got {delimiter:?}"
            )));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }

    /// Header row followed by one row per record
    pub fn write<R: CsvRow>(&self, records: &[R]) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(R::header())?;
        for record in records {
            writer.write_record(record.fields())?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| InspectError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Pretty-printed JSON with 2-space indentation
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Which images an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    All,
    MissingAlt,
    WithAlt,
}

impl ImageFilter {
    pub fn apply(&self, images: &[ImageRecord]) -> Vec<ImageRecord> {
        images
            .iter()
            .filter(|img| match self {
                ImageFilter::All => true,
                ImageFilter::MissingAlt => img.is_missing_alt(),
                ImageFilter::WithAlt => !img.is_missing_alt(),
            })
            .cloned()
            .collect()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageFilter::All => "images",
            ImageFilter::MissingAlt => "images_missing_alt",
            ImageFilter::WithAlt => "images_with_alt",
        }
    }
}

/// Which links an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFilter {
    All,
    Unique,
    Internal,
    External,
}

impl LinkFilter {
    pub fn apply(&self, links: &[LinkRecord]) -> Vec<LinkRecord> {
        match self {
            LinkFilter::All => links.to_vec(),
            LinkFilter::Unique => crate::parsers::links::unique(links),
            LinkFilter::Internal => links.iter().filter(|l| l.is_internal).cloned().collect(),
            LinkFilter::External => links.iter().filter(|l| !l.is_internal).cloned().collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LinkFilter::All => "links",
            LinkFilter::Unique => "links_unique",
            LinkFilter::Internal => "links_internal",
            LinkFilter::External => "links_external",
        }
    }
}

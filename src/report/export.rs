//! Export adapters rendering the markdown report into documents.

use crate::types::{AppError, Result};
use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// A4 geometry, millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 5.0;
const FONT_SIZE: f32 = 10.0;
/// Characters per wrapped line at the font size above.
const WRAP_WIDTH: usize = 95;

/// Converts a finished report into distributable document formats.
#[async_trait]
pub trait ExportAdapter: Send + Sync {
    async fn to_pdf(&self, report: &str) -> Result<PathBuf>;
    async fn to_docx(&self, report: &str) -> Result<PathBuf>;
}

/// Writes PDF and DOCX renderings of a report under the output directory.
pub struct DocumentExporter {
    output_dir: PathBuf,
}

impl DocumentExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn fresh_path(&self, extension: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| AppError::Export(format!("cannot create output dir: {}", e)))?;
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        Ok(self
            .output_dir
            .join(format!("report_{}_{}.{}", stamp, Uuid::new_v4(), extension)))
    }
}

#[async_trait]
impl ExportAdapter for DocumentExporter {
    async fn to_pdf(&self, report: &str) -> Result<PathBuf> {
        let path = self.fresh_path("pdf")?;
        let report = report.to_string();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_pdf(&report, &target))
            .await
            .map_err(|e| AppError::Export(format!("pdf export task failed: {}", e)))??;
        Ok(path)
    }

    async fn to_docx(&self, report: &str) -> Result<PathBuf> {
        let path = self.fresh_path("docx")?;
        let report = report.to_string();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_docx(&report, &target))
            .await
            .map_err(|e| AppError::Export(format!("docx export task failed: {}", e)))??;
        Ok(path)
    }
}

fn write_pdf(report: &str, path: &Path) -> Result<()> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Research Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "text");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Export(format!("pdf font: {}", e)))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in wrap_lines(report, WRAP_WIDTH) {
        if y < MARGIN {
            let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "text");
            layer = doc.get_page(page).get_layer(layer_index);
            y = PAGE_HEIGHT - MARGIN;
        }
        if !line.is_empty() {
            layer.use_text(line, FONT_SIZE, Mm(MARGIN), Mm(y), &font);
        }
        y -= LINE_HEIGHT;
    }

    let file = fs::File::create(path)
        .map_err(|e| AppError::Export(format!("cannot create {}: {}", path.display(), e)))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Export(format!("pdf save: {}", e)))
}

fn write_docx(report: &str, path: &Path) -> Result<()> {
    let mut docx = Docx::new();
    for line in report.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = fs::File::create(path)
        .map_err(|e| AppError::Export(format!("cannot create {}: {}", path.display(), e)))?;
    docx.build()
        .pack(file)
        .map_err(|e| AppError::Export(format!("docx pack: {}", e)))
}

/// Split report text into display lines no wider than `width` characters,
/// breaking on word boundaries.
fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        if raw.chars().count() <= width {
            lines.push(raw.to_string());
            continue;
        }
        let mut current = String::new();
        for word in raw.split_whitespace() {
            if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Housing and Interest Rates\n\nHigher rates cool demand.\n";

    #[test]
    fn test_wrap_lines_respects_width() {
        let long = "word ".repeat(60);
        for line in wrap_lines(&long, 40) {
            assert!(line.chars().count() <= 40, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn test_wrap_lines_keeps_short_lines() {
        assert_eq!(wrap_lines("short line", 95), vec!["short line"]);
    }

    #[tokio::test]
    async fn test_pdf_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DocumentExporter::new(dir.path());

        let path = exporter.to_pdf(SAMPLE).await.unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_docx_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DocumentExporter::new(dir.path());

        let path = exporter.to_docx(SAMPLE).await.unwrap();
        let bytes = fs::read(&path).unwrap();
        // DOCX is a zip container.
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_exports_land_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DocumentExporter::new(dir.path().join("nested"));

        let pdf = exporter.to_pdf(SAMPLE).await.unwrap();
        let docx = exporter.to_docx(SAMPLE).await.unwrap();
        assert!(pdf.starts_with(dir.path().join("nested")));
        assert!(docx.starts_with(dir.path().join("nested")));
        assert_ne!(pdf, docx);
    }
}

//! Test fixtures and PDF builders.
//!
//! Report fixtures mimic the operators' stop listings: a header, then
//! `Linha:` / `Atendimento Principal:` sections with an `Ativo:` flag
//! and one stop per line.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use stopmap::extraction::DocumentText;

/// Page 1 of the sample report: one active and one inactive line.
pub const REPORT_PAGE_1: &str = "RELATORIO DE PONTOS DE PARADA
Empresa: Real Alagoas
Linha: 001 - Ponta Verde / Centro
Ativo: Sim
Codigo Endereco Latitude Longitude
PN987 Av. Alvaro Otacilio, 3500 -9,6650 -35,7120
PN988 Rua Jangadeiros Alagoanos -9,6612 -35,7080
Linha: 002 - Desativada
Ativo: Nao
PN990 Rua Antiga -9,6400 -35,7300";

/// Page 2: an active section repeating a stop and listing one outside Maceió.
pub const REPORT_PAGE_2: &str = "Atendimento Principal: 003 - Benedito Bentes
Ativo: SIM
PP52 Av. Durval de Goes Monteiro -9,5501 -35,7222
PN987 Av. Alvaro Otacilio, 3500 -9,6650 -35,7120
-9,9000 -35,7000";

/// The sample report as extracted document text.
pub fn sample_document() -> DocumentText {
    DocumentText::from_pages([REPORT_PAGE_1, REPORT_PAGE_2])
}

/// Builder for creating test PDFs with one text object per line.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_page("Linha: 001\nAtivo: Sim\nPN1 Rua A -9,6650 -35,7120")
///     .build(Path::new("/tmp/report.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    /// Creates a new test PDF builder with A4 pages.
    pub fn new() -> Self {
        Self {
            title: "Stop Report".to_string(),
            pages: Vec::new(),
            page_width: Mm(210.0),
            page_height: Mm(297.0),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a page; each line of `text` becomes its own text object.
    pub fn with_page(mut self, text: &str) -> Self {
        self.pages
            .push(text.lines().map(|l| l.to_string()).collect());
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let mut targets = vec![(first_page, first_layer)];
        for _ in 1..self.pages.len() {
            targets.push(doc.add_page(self.page_width, self.page_height, "Layer 1"));
        }

        for ((page, layer), lines) in targets.into_iter().zip(&self.pages) {
            let current_layer = doc.get_page(page).get_layer(layer);
            for (row, line) in lines.iter().enumerate() {
                let y = 280.0 - row as f32 * 8.0;
                current_layer.use_text(line.as_str(), 10.0, Mm(15.0), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Quick helper to create the two-page sample report as a PDF.
pub fn create_sample_report(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Real Alagoas")
        .with_page(REPORT_PAGE_1)
        .with_page(REPORT_PAGE_2)
        .build(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_pattern() {
        let builder = TestPdfBuilder::new()
            .with_title("Test")
            .with_page("a\nb")
            .with_page("c");

        assert_eq!(builder.title, "Test");
        assert_eq!(builder.pages.len(), 2);
        assert_eq!(builder.pages[0], vec!["a", "b"]);
    }

    #[test]
    fn test_create_sample_report() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("report.pdf");

        create_sample_report(&pdf_path)?;

        assert!(pdf_path.exists());
        assert!(fs::metadata(&pdf_path)?.len() > 0);
        Ok(())
    }
}

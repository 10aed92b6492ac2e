//! Conversion of heterogeneous input files to PDF.
//!
//! Office documents go through headless LibreOffice, PDFs are copied, and
//! everything else is treated as plain text and rendered to an A4 PDF.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::ConvertError;

const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt"];

/// How an input file reaches PDF form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Office,
    Pdf,
    Text,
}

/// Classify an input file by extension. Anything that is neither an office
/// document nor a PDF is rendered as plain text.
pub fn classify(path: &Path) -> FileKind {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if OFFICE_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Office
    } else if ext == "pdf" {
        FileKind::Pdf
    } else {
        FileKind::Text
    }
}

/// Output file name for a converted input, derived from its path relative
/// to the input root: components joined with `-`, `.pdf` appended unless
/// already present. A leading dot (hidden file) is dropped so the name
/// stays visible.
pub fn pdf_output_name(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("-");
    if joined.ends_with(".pdf") {
        joined
    } else if let Some(stripped) = joined.strip_prefix('.') {
        format!("{}.pdf", stripped)
    } else {
        format!("{}.pdf", joined)
    }
}

/// Outcome of a conversion run over one input listing.
#[derive(Debug, Default)]
pub struct ConvertStats {
    pub converted: usize,
    /// Per-file failures; conversion is best-effort and the pipeline
    /// continues with the remaining files.
    pub failures: Vec<(PathBuf, String)>,
}

/// Convert every listed input file (paths relative to `in_dir`) into
/// `out_dir`. Failures are collected, not fatal.
pub fn convert_files(files: &[PathBuf], in_dir: &Path, out_dir: &Path) -> ConvertStats {
    let mut stats = ConvertStats::default();
    for relative in files {
        let input = in_dir.join(relative);
        let result = match classify(relative) {
            FileKind::Office => office_to_pdf(&input, out_dir),
            FileKind::Pdf => copy_pdf(&input, &out_dir.join(pdf_output_name(relative))),
            FileKind::Text => text_to_pdf(&input, &out_dir.join(pdf_output_name(relative))),
        };
        match result {
            Ok(()) => stats.converted += 1,
            Err(e) => stats.failures.push((relative.clone(), e.to_string())),
        }
    }
    stats
}

fn copy_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    fs::copy(input, output)?;
    Ok(())
}

/// Convert an office document via headless LibreOffice. The converter
/// names the output itself (input stem + `.pdf`) inside `out_dir`.
fn office_to_pdf(input: &Path, out_dir: &Path) -> Result<(), ConvertError> {
    which::which("libreoffice")
        .map_err(|_| ConvertError::ConverterNotFound("libreoffice".to_string()))?;

    let output = Command::new("libreoffice")
        .args(["--headless", "--convert-to", "pdf"])
        .arg(input)
        .arg("--outdir")
        .arg(out_dir)
        .output()?;

    if !output.status.success() {
        return Err(ConvertError::ConversionFailed {
            path: input.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Render a plain-text file to an A4 PDF, one source line per output line,
/// breaking to a new page at the bottom margin.
fn text_to_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let content = fs::read_to_string(input)?;

    let (doc, first_page, first_layer) =
        PdfDocument::new("docvec text rendering", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ConvertError::RenderError {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;

    let top = 283.0;
    let bottom = 14.0;
    let leading = 5.3;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = top;
    for line in content.lines() {
        if y < bottom {
            let (page, new_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            layer = doc.get_page(page).get_layer(new_layer);
            y = top;
        }
        layer.use_text(line.trim_end(), 10.0, Mm(14.0), Mm(y), &font);
        y -= leading;
    }

    let file = fs::File::create(output)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ConvertError::RenderError {
            path: input.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify(Path::new("report.docx")), FileKind::Office);
        assert_eq!(classify(Path::new("slides.PPTX")), FileKind::Office);
        assert_eq!(classify(Path::new("paper.pdf")), FileKind::Pdf);
        assert_eq!(classify(Path::new("notes.txt")), FileKind::Text);
        assert_eq!(classify(Path::new("README")), FileKind::Text);
        assert_eq!(classify(Path::new("data.csv")), FileKind::Text);
    }

    #[test]
    fn test_pdf_output_name() {
        assert_eq!(pdf_output_name(Path::new("notes.txt")), "notes.txt.pdf");
        assert_eq!(
            pdf_output_name(Path::new("sub/dir/file.txt")),
            "sub-dir-file.txt.pdf"
        );
        assert_eq!(pdf_output_name(Path::new("paper.pdf")), "paper.pdf");
        assert_eq!(pdf_output_name(Path::new(".env")), "env.pdf");
    }

    #[test]
    fn test_text_to_pdf_writes_a_pdf() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let output = dir.path().join("notes.txt.pdf");
        fs::write(&input, "first line\nsecond line\n").unwrap();

        text_to_pdf(&input, &output).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_text_to_pdf_paginates_long_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("long.txt");
        let output = dir.path().join("long.txt.pdf");
        let many_lines = "line\n".repeat(200);
        fs::write(&input, many_lines).unwrap();

        text_to_pdf(&input, &output).unwrap();
        assert!(fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn test_convert_files_copies_pdfs_and_renders_text() {
        let in_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        fs::write(in_dir.path().join("doc.pdf"), b"%PDF-1.4 fake").unwrap();
        fs::write(in_dir.path().join("notes.txt"), "some text\n").unwrap();

        let files = vec![PathBuf::from("doc.pdf"), PathBuf::from("notes.txt")];
        let stats = convert_files(&files, in_dir.path(), out_dir.path());

        assert_eq!(stats.converted, 2);
        assert!(stats.failures.is_empty());
        assert!(out_dir.path().join("doc.pdf").exists());
        assert!(out_dir.path().join("notes.txt.pdf").exists());
    }

    #[test]
    fn test_convert_files_records_failures_and_continues() {
        let in_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        fs::write(in_dir.path().join("ok.txt"), "fine\n").unwrap();

        // listed but missing on disk: the copy fails, the rest proceeds
        let files = vec![PathBuf::from("missing.pdf"), PathBuf::from("ok.txt")];
        let stats = convert_files(&files, in_dir.path(), out_dir.path());

        assert_eq!(stats.converted, 1);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].0, PathBuf::from("missing.pdf"));
    }
}

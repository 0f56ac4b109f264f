use crate::error::{GuideError, Result};
use crate::model::GuideAnalysis;
use crate::render::render_markdown;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Writes a rendered study guide to disk, converting to PDF via pandoc.
///
/// Pandoc is invoked as a subprocess; when it is missing or fails the
/// markdown is written next to the requested output instead so the run
/// never loses the generated content.
pub struct OutputGenerator;

impl OutputGenerator {
    /// Render `analysis` and convert it to a PDF at `output_path`.
    ///
    /// Returns the path actually written. On pandoc failure the markdown
    /// fallback is written first, then [`GuideError::PandocFailed`] is
    /// returned carrying the fallback path.
    pub async fn write_pdf(analysis: &GuideAnalysis, output_path: &Path) -> Result<PathBuf> {
        let markdown = render_markdown(analysis);

        let mut tmp = tempfile::Builder::new().suffix(".md").tempfile()?;
        tmp.write_all(markdown.as_bytes())?;
        tmp.flush()?;

        let status = Command::new("pandoc")
            .arg(tmp.path())
            .arg("-o")
            .arg(output_path)
            .arg("--pdf-engine=pdflatex")
            .arg("--variable")
            .arg("geometry:margin=1in")
            .arg("--variable")
            .arg("fontsize=11pt")
            .arg("--toc")
            .arg("--toc-depth=2")
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                log::info!("study guide written to {}", output_path.display());
                Ok(output_path.to_path_buf())
            }
            Ok(status) => {
                let fallback = Self::write_markdown_fallback(&markdown, output_path)?;
                Err(GuideError::PandocFailed {
                    reason: format!("pandoc exited with {status}"),
                    fallback,
                })
            }
            Err(err) => {
                let fallback = Self::write_markdown_fallback(&markdown, output_path)?;
                Err(GuideError::PandocFailed {
                    reason: format!("failed to launch pandoc: {err}"),
                    fallback,
                })
            }
        }
    }

    /// Write the guide as plain markdown, skipping PDF conversion.
    pub fn write_markdown(analysis: &GuideAnalysis, output_path: &Path) -> Result<PathBuf> {
        let markdown = render_markdown(analysis);
        std::fs::write(output_path, markdown)?;
        log::info!("study guide written to {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    fn write_markdown_fallback(markdown: &str, output_path: &Path) -> Result<PathBuf> {
        let fallback = output_path.with_extension("md");
        std::fs::write(&fallback, markdown)?;
        log::warn!(
            "pdf conversion failed, markdown saved to {}",
            fallback.display()
        );
        Ok(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn analysis() -> GuideAnalysis {
        GuideAnalysis {
            topics: vec![],
            explanations: Default::default(),
            source_exams: vec!["quiz.pdf".to_string()],
        }
    }

    #[test]
    fn write_markdown_produces_the_requested_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guide.md");
        let written = OutputGenerator::write_markdown(&analysis(), &path).unwrap();
        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Exam Study Guide"));
    }

    #[tokio::test]
    async fn pandoc_failure_leaves_a_markdown_fallback() {
        let dir = TempDir::new().unwrap();
        // Point output into a directory that exists so only the pandoc
        // invocation can fail (either missing binary or a latex error).
        let path = dir.path().join("guide.pdf");
        match OutputGenerator::write_pdf(&analysis(), &path).await {
            Ok(written) => assert_eq!(written, path),
            Err(GuideError::PandocFailed { fallback, .. }) => {
                let content = std::fs::read_to_string(&fallback).unwrap();
                assert!(content.starts_with("# Exam Study Guide"));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

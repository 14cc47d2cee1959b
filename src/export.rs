//! PDF export pipeline: scratch file, external LaTeX compile, cleanup.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ExportConfig;

/// Compiles rendered LaTeX into an in-memory PDF via an external engine.
///
/// Scratch names are derived from a fresh uuid per call, never from caller
/// input, so concurrent exports cannot collide.
pub struct Exporter {
    scratch_dir: PathBuf,
    engine: String,
    timeout: Duration,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            scratch_dir: config.scratch_dir,
            engine: config.engine,
            timeout: config.timeout,
        }
    }

    /// Reduces a caller-supplied download name to a safe `.pdf` base name:
    /// directory components and traversal sequences are stripped.
    pub fn sanitize_filename(name: &str) -> String {
        let base = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
            .trim_end_matches(".pdf")
            .replace("..", "");
        let base = base.trim_matches('.');
        if base.is_empty() {
            "report.pdf".to_string()
        } else {
            format!("{base}.pdf")
        }
    }

    /// Validates, writes, compiles, reads back the artifact, and removes
    /// every scratch file regardless of outcome.
    pub async fn compile(&self, latex: &str) -> ApiResult<Vec<u8>> {
        if !latex.contains(r"\documentclass") || !latex.contains(r"\begin{document}") {
            return Err(ApiError::validation(
                "Invalid LaTeX content: Missing document structure",
            ));
        }

        tokio::fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(|err| ApiError::Export(format!("Failed to create scratch dir: {err}")))?;

        let base = Uuid::new_v4().simple().to_string();
        let tex_path = self.scratch_dir.join(format!("{base}.tex"));
        tokio::fs::write(&tex_path, latex)
            .await
            .map_err(|err| ApiError::Export(format!("Failed to write scratch file: {err}")))?;

        let result = self.run_engine(&base).await;
        self.cleanup(&base).await;
        result
    }

    async fn run_engine(&self, base: &str) -> ApiResult<Vec<u8>> {
        let tex_path = self.scratch_dir.join(format!("{base}.tex"));
        let pdf_path = self.scratch_dir.join(format!("{base}.pdf"));

        let mut command = Command::new(&self.engine);
        command
            .arg("-pdf")
            .arg(r#"-pdflatex=pdflatex -interaction=nonstopmode"#)
            .arg(format!("-outdir={}", self.scratch_dir.display()))
            .arg(&tex_path)
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ApiError::Export("PDF compiler timed out".to_string()))?
            .map_err(|err| ApiError::Export(format!("Failed to run PDF compiler: {err}")))?;

        if !pdf_path.exists() {
            let diagnostics = String::from_utf8_lossy(&output.stderr);
            let tail: String = diagnostics
                .lines()
                .rev()
                .take(20)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ApiError::Export(format!(
                "PDF file was not generated. Compiler output: {tail}"
            )));
        }

        tokio::fs::read(&pdf_path)
            .await
            .map_err(|err| ApiError::Export(format!("Failed to read produced PDF: {err}")))
    }

    /// Best-effort removal of every scratch file sharing the base name,
    /// including compiler byproducts (.aux, .log, .fls and friends).
    async fn cleanup(&self, base: &str) {
        let mut entries = match tokio::fs::read_dir(&self.scratch_dir).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list export scratch dir for cleanup");
                return;
            }
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_name().to_string_lossy().starts_with(base) {
                if let Err(err) = tokio::fs::remove_file(entry.path()).await {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %err,
                        "failed to remove export scratch file"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exporter(dir: &std::path::Path, engine: &str) -> Exporter {
        Exporter::new(ExportConfig {
            scratch_dir: dir.to_path_buf(),
            engine: engine.to_string(),
            timeout: Duration::from_secs(120),
        })
    }

    #[test]
    fn sanitize_strips_directories_and_traversal() {
        assert_eq!(Exporter::sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(Exporter::sanitize_filename("report"), "report.pdf");
        assert_eq!(
            Exporter::sanitize_filename("../../etc/passwd"),
            "passwd.pdf"
        );
        assert_eq!(
            Exporter::sanitize_filename(r"c:\dir\sales.pdf"),
            "sales.pdf"
        );
        assert_eq!(Exporter::sanitize_filename("a..b.pdf"), "ab.pdf");
        assert_eq!(Exporter::sanitize_filename("..."), "report.pdf");
        assert_eq!(Exporter::sanitize_filename(""), "report.pdf");
    }

    #[tokio::test]
    async fn rejects_content_without_markers_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        // An engine that cannot exist: validation must fail first.
        let exporter = exporter(dir.path(), "no-such-latex-engine");
        let err = exporter.compile("hello world").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        // Nothing was written either.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_engine_fails_and_leaves_no_scratch_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path(), "no-such-latex-engine");
        let doc = r"\documentclass{article}\begin{document}hi\end{document}";
        let err = exporter.compile(doc).await.unwrap_err();
        assert!(matches!(err, ApiError::Export(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn compiles_a_minimal_document_when_latexmk_is_available() {
        if std::process::Command::new("latexmk")
            .arg("-version")
            .output()
            .is_err()
        {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path(), "latexmk");
        let doc = "\\documentclass{article}\n\\begin{document}\nhello\n\\end{document}\n";
        let pdf = exporter.compile(doc).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

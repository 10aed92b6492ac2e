//! Operator-facing summary output.

use std::fmt::Write as FmtWrite;

/// Counters accumulated over one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub files_found: u64,
    pub files_converted: u64,
    pub files_failed: u64,
    pub chunks_created: u64,
    pub chunks_stored: u64,
    pub total_tokens: u64,
    pub duration_ms: u64,
}

impl IngestStats {
    pub fn render(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Ingestion complete").unwrap();
        writeln!(out, "------------------").unwrap();
        writeln!(out, "Files found:     {}", self.files_found).unwrap();
        writeln!(out, "Files converted: {}", self.files_converted).unwrap();
        if self.files_failed > 0 {
            writeln!(out, "Files failed:    {}", self.files_failed).unwrap();
        }
        writeln!(out, "Chunks created:  {}", self.chunks_created).unwrap();
        writeln!(out, "Chunks stored:   {}", self.chunks_stored).unwrap();
        writeln!(out, "Total tokens:    {}", self.total_tokens).unwrap();
        writeln!(out, "Duration:        {}ms", self.duration_ms).unwrap();
        out
    }
}

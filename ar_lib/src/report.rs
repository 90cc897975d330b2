//! The human readable text stored in the report object.

use stats::LengthSummary;
use std::fmt;

const RAW_CONTIGS_HEADER: &str = "============= Raw Contigs ============";
const FILTERED_CONTIGS_HEADER: &str = "========== Filtered Contigs ==========";
const JOB_LOG_HEADER: &str = "============== Job Log ===============";

/// Everything that goes into the report text.
#[derive(Debug)]
pub struct AssemblyReport<'a> {
    /// `<workspace>/<contig set name>` the contigs were saved to.
    pub contig_set_ref: &'a str,
    pub summary: &'a LengthSummary,
    /// Report text from the backend, describing the unfiltered assembly.
    pub backend_report: &'a str,
    pub job_log: &'a str,
}

/// Format a float the way it is printed in the report, always with a
/// fractional part (`325.0`, `333.3333333333333`).
fn bp(x: f64) -> String {
    format!("{x:?}")
}

impl fmt::Display for AssemblyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RAW_CONTIGS_HEADER}")?;
        writeln!(f, "{}", self.backend_report)?;
        writeln!(f, "{FILTERED_CONTIGS_HEADER}")?;
        writeln!(f, "ContigSet saved to: {}", self.contig_set_ref)?;
        writeln!(f, "Assembled into {} contigs.", self.summary.count)?;
        match self.summary.mean_length {
            Some(mean) => {
                writeln!(f, "Average Length: {} bp.", bp(mean))?;
                if let Some(n50) = self.summary.n50 {
                    writeln!(f, "N50: {n50} bp.")?;
                }
                writeln!(
                    f,
                    "Contig Length Distribution (# of contigs -- min to max basepairs):"
                )?;
                for bin in &self.summary.histogram {
                    writeln!(
                        f,
                        "   {}\t--\t{} to {} bp",
                        bin.count,
                        bp(bin.lower),
                        bp(bin.upper)
                    )?;
                }
            }
            None => writeln!(f, "No contigs passed the length filter.")?,
        }
        writeln!(f, "{JOB_LOG_HEADER}")?;
        write!(f, "{}", self.job_log)
    }
}

/// Render the report text for an assembly.
pub fn render_report(
    contig_set_ref: &str,
    summary: &LengthSummary,
    backend_report: &str,
    job_log: &str,
) -> String {
    AssemblyReport {
        contig_set_ref,
        summary,
        backend_report,
        job_log,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_layout() {
        let summary = stats::summarize(&[250, 400]);
        let text = render_report("ws1/out1", &summary, "raw report", "job log\n");
        let expected = "\
============= Raw Contigs ============
raw report
========== Filtered Contigs ==========
ContigSet saved to: ws1/out1
Assembled into 2 contigs.
Average Length: 325.0 bp.
N50: 400 bp.
Contig Length Distribution (# of contigs -- min to max basepairs):
   1\t--\t250.0 to 265.0 bp
   0\t--\t265.0 to 280.0 bp
   0\t--\t280.0 to 295.0 bp
   0\t--\t295.0 to 310.0 bp
   0\t--\t310.0 to 325.0 bp
   0\t--\t325.0 to 340.0 bp
   0\t--\t340.0 to 355.0 bp
   0\t--\t355.0 to 370.0 bp
   0\t--\t370.0 to 385.0 bp
   1\t--\t385.0 to 400.0 bp
============== Job Log ===============
job log
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_single_contig_has_one_bin() {
        let summary = stats::summarize(&[400]);
        let text = render_report("ws1/out1", &summary, "", "");
        assert!(text.contains("Assembled into 1 contigs.\nAverage Length: 400.0 bp.\n"));
        assert!(text.contains("   1\t--\t400.0 to 401.0 bp\n"));
        assert_eq!(text.matches("\t--\t").count(), 1);
    }

    #[test]
    fn test_zero_contigs() {
        let summary = stats::summarize(&[]);
        let text = render_report("ws1/out1", &summary, "raw", "log");
        assert!(text.contains("Assembled into 0 contigs.\nNo contigs passed the length filter.\n"));
        assert!(!text.contains("Average Length"));
        assert!(!text.contains("Contig Length Distribution"));
        assert!(text.ends_with("============== Job Log ===============\nlog"));
    }
}

/// Object store type of a saved contig set.
pub const CONTIG_SET_TYPE: &str = "KBaseGenomes.ContigSet";

/// Object store type of a saved report.
pub const REPORT_TYPE: &str = "KBaseReport.Report";

/// `source` field written into every assembled contig set.
pub const CONTIG_SET_SOURCE: &str = "User assembled contigs from reads in KBase";

/// `source_id` field written into every assembled contig set.
pub const CONTIG_SET_SOURCE_ID: &str = "none";

/// The contig set level checksum is not computed, only the per-contig ones.
pub const CONTIG_SET_MD5_PLACEHOLDER: &str = "none";

/// Description attached to the contig set in the report's `objects_created`.
pub const ASSEMBLED_CONTIGS_DESCRIPTION: &str = "Assembled contigs";

/// Simplified read library type names.
pub const PAIRED_END_LIBRARY: &str = "PairedEndLibrary";
pub const SINGLE_END_LIBRARY: &str = "SingleEndLibrary";

/// Environment variables read by the `ar-*` command line tools.
pub const AUTH_TOKEN_ENV: &str = "KB_AUTH_TOKEN";
pub const ARAST_URL_ENV: &str = "ARAST_URL";

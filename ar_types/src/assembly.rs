use crate::constants::{
    ASSEMBLED_CONTIGS_DESCRIPTION, CONTIG_SET_MD5_PLACEHOLDER, CONTIG_SET_SOURCE,
    CONTIG_SET_SOURCE_ID,
};
use crate::AssemblyError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Name of an assembler known to the job backend, passed to `ar-run -a`.
///
/// The set is open: any identifier made of letters, digits, underscores and
/// dashes is accepted and handed through unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Assembler(String);

impl Assembler {
    /// Assemblers with a dedicated entry point.
    pub const KNOWN: &'static [&'static str] = &[
        "kiki", "velvet", "miniasm", "spades", "idba", "megahit", "ray", "masurca", "a5", "a6",
    ];

    pub fn new(name: &str) -> Result<Self, AssemblyError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_' | '-'))
        {
            return Err(AssemblyError::invalid_field(
                "assembler",
                format!(
                    "invalid assembler {name:?}: must contain only letters, digits, underscores, and dashes."
                ),
            ));
        }
        Ok(Assembler(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl fmt::Display for Assembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Assembler {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Assembler::new(s)
    }
}

impl TryFrom<String> for Assembler {
    type Error = AssemblyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Assembler::new(&s)
    }
}

impl From<Assembler> for String {
    fn from(a: Assembler) -> String {
        a.0
    }
}

/// The request as the caller sends it. Required fields are optional here so
/// that a missing one can be reported by name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AssemblyParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_library_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_contigset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_contig_len: Option<i64>,
    /// Assembler specific parameters.
    #[serde(flatten)]
    pub extra_params: Map<String, Value>,
}

fn required(value: Option<String>, field: &str) -> Result<String, AssemblyError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AssemblyError::missing_field(field)),
    }
}

impl AssemblyParams {
    /// Check the required fields and resolve the minimum contig length.
    /// An absent or zero `min_contig_len` falls back to `default_min_contig_len`.
    pub fn validate(self, default_min_contig_len: usize) -> Result<AssemblyRequest, AssemblyError> {
        let workspace_name = required(self.workspace_name, "workspace_name")?;
        let read_library_name = required(self.read_library_name, "read_library_name")?;
        let output_contigset_name = required(self.output_contigset_name, "output_contigset_name")?;
        let min_contig_len = match self.min_contig_len {
            None | Some(0) => default_min_contig_len,
            Some(n) => usize::try_from(n).map_err(|_| {
                AssemblyError::invalid_field(
                    "min_contig_len",
                    format!("min_contig_len parameter shouldn't be negative ({n})"),
                )
            })?,
        };
        Ok(AssemblyRequest {
            workspace_name,
            read_library_name,
            output_contigset_name,
            min_contig_len,
            extra_params: self.extra_params,
        })
    }
}

/// A validated assembly request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AssemblyRequest {
    pub workspace_name: String,
    pub read_library_name: String,
    pub output_contigset_name: String,
    pub min_contig_len: usize,
    pub extra_params: Map<String, Value>,
}

impl AssemblyRequest {
    /// `<workspace>/<read library>`
    pub fn read_library_ref(&self) -> String {
        format!("{}/{}", self.workspace_name, self.read_library_name)
    }

    /// `<workspace>/<output contig set>`
    pub fn output_ref(&self) -> String {
        format!("{}/{}", self.workspace_name, self.output_contigset_name)
    }
}

/// A job accepted by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: u64,
    pub assembler: Assembler,
}

impl JobHandle {
    /// Name of the report object saved for this job.
    pub fn report_name(&self) -> String {
        format!("{}.report.{}", self.assembler, self.job_id)
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} job {}", self.assembler, self.job_id)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContigRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub length: usize,
    pub sequence: String,
    pub md5: String,
}

/// The persisted contig set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContigSet {
    pub id: String,
    pub source: String,
    pub source_id: String,
    pub md5: String,
    pub contigs: Vec<ContigRecord>,
}

impl ContigSet {
    pub fn new(assembler: &Assembler, contigs: Vec<ContigRecord>) -> Self {
        ContigSet {
            id: format!("{assembler}.contigset"),
            source: CONTIG_SET_SOURCE.to_string(),
            source_id: CONTIG_SET_SOURCE_ID.to_string(),
            md5: CONTIG_SET_MD5_PLACEHOLDER.to_string(),
            contigs,
        }
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.contigs.iter().map(|c| c.length).collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreatedObject {
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: String,
}

/// The persisted report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub objects_created: Vec<CreatedObject>,
    pub text_message: String,
}

impl Report {
    pub fn for_contig_set(contig_set_ref: String, text_message: String) -> Self {
        Report {
            objects_created: vec![CreatedObject {
                reference: contig_set_ref,
                description: ASSEMBLED_CONTIGS_DESCRIPTION.to_string(),
            }],
            text_message,
        }
    }
}

/// What an assembly entry point returns.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AssemblyOutput {
    pub report_name: String,
    pub report_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assembler_names() {
        for s in ["kiki", "a5", "spades", "my-asm_2"] {
            assert!(Assembler::new(s).is_ok(), "{s} should be a valid assembler");
        }
        for s in ["", "ki ki", "a;rm", "velvet\n"] {
            assert!(Assembler::new(s).is_err(), "{s:?} should be invalid");
        }
        assert!(Assembler::new("megahit").unwrap().is_known());
        assert!(!Assembler::new("my-asm_2").unwrap().is_known());
        assert!(serde_json::from_value::<Assembler>(json!("bad name")).is_err());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let params: AssemblyParams = serde_json::from_value(json!({
            "workspace_name": "ws1",
            "read_library_name": "lib1",
        }))
        .unwrap();
        match params.validate(200) {
            Err(AssemblyError::Validation { field, .. }) => {
                assert_eq!(field, "output_contigset_name")
            }
            other => panic!("unexpected {other:?}"),
        }

        let params: AssemblyParams = serde_json::from_value(json!({
            "workspace_name": "",
            "read_library_name": "lib1",
            "output_contigset_name": "out1",
        }))
        .unwrap();
        assert!(matches!(
            params.validate(200),
            Err(AssemblyError::Validation { field, .. }) if field == "workspace_name"
        ));
    }

    #[test]
    fn test_validate_min_contig_len() {
        let base = AssemblyParams {
            workspace_name: Some("ws1".to_string()),
            read_library_name: Some("lib1".to_string()),
            output_contigset_name: Some("out1".to_string()),
            ..Default::default()
        };
        assert_eq!(base.clone().validate(200).unwrap().min_contig_len, 200);

        let zero = AssemblyParams {
            min_contig_len: Some(0),
            ..base.clone()
        };
        assert_eq!(zero.validate(300).unwrap().min_contig_len, 300);

        let explicit = AssemblyParams {
            min_contig_len: Some(500),
            ..base.clone()
        };
        let req = explicit.validate(200).unwrap();
        assert_eq!(req.min_contig_len, 500);
        assert_eq!(req.read_library_ref(), "ws1/lib1");
        assert_eq!(req.output_ref(), "ws1/out1");

        let negative = AssemblyParams {
            min_contig_len: Some(-5),
            ..base
        };
        assert!(matches!(
            negative.validate(200),
            Err(AssemblyError::Validation { field, .. }) if field == "min_contig_len"
        ));
    }

    #[test]
    fn test_extra_params_are_kept() {
        let params: AssemblyParams = serde_json::from_value(json!({
            "workspace_name": "ws1",
            "read_library_name": "lib1",
            "output_contigset_name": "out1",
            "kmer": 31,
        }))
        .unwrap();
        let req = params.validate(200).unwrap();
        assert_eq!(req.extra_params.get("kmer"), Some(&json!(31)));
    }

    #[test]
    fn test_report_name_and_contig_set_id() {
        let job = JobHandle {
            job_id: 42,
            assembler: Assembler::new("kiki").unwrap(),
        };
        assert_eq!(job.report_name(), "kiki.report.42");
        assert_eq!(ContigSet::new(&job.assembler, vec![]).id, "kiki.contigset");
    }
}

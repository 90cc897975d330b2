// Warning groups (as of rust 1.55)
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]
// Other warnings (as of rust 1.55)
#![deny(
    bindings_with_variant_name,
    confusable_idents,
    const_item_mutation,
    deprecated,
    drop_bounds,
    dyn_drop,
    elided_lifetimes_in_paths,
    exported_private_dependencies,
    function_item_references,
    irrefutable_let_patterns,
    mixed_script_confusables,
    non_shorthand_field_patterns,
    overlapping_range_endpoints,
    renamed_and_removed_lints,
    stable_features,
    trivial_bounds,
    type_alias_bounds,
    uncommon_codepoints,
    unconditional_recursion,
    unknown_lints,
    unused_comparisons,
    while_true
)]

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Adapter settings, read from `parameters.toml`.
///
/// These are immutable once loaded and handed to each request explicitly.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Command used to submit assembly jobs.
    pub run_cmd: String,
    /// Command used to retrieve job outputs.
    pub get_cmd: String,
    /// Command used to drop short contigs from the retrieved stream.
    /// When unset the contigs are filtered in process.
    pub filter_cmd: Option<String>,
    /// Job backend endpoint, exported to the commands as ARAST_URL.
    pub arast_url: Option<String>,
    /// Object store JSON-RPC endpoint.
    pub workspace_url: Option<String>,
    /// Directory under which request-scoped scratch directories are created.
    pub scratch: PathBuf,
    /// Upper bound on the run time of any single backend command.
    pub command_timeout_secs: Option<u64>,
    /// Minimum contig length used when a request does not set one.
    pub default_min_contig_len: usize,
    /// Per-assembler minimum contig length defaults.
    pub min_contig_len_overrides: BTreeMap<String, usize>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            run_cmd: "ar-run".to_string(),
            get_cmd: "ar-get".to_string(),
            filter_cmd: Some("ar-filter".to_string()),
            arast_url: None,
            workspace_url: None,
            scratch: std::env::temp_dir(),
            command_timeout_secs: None,
            default_min_contig_len: 200,
            // miniasm produces long, unpolished unitigs; short ones are noise
            min_contig_len_overrides: BTreeMap::from([("miniasm".to_string(), 300)]),
        }
    }
}

macro_rules! warn_non_default {
    ($params:expr, $defaults:expr, $($field:ident),+ $(,)?) => {
        $(
            if $defaults.$field != $params.$field {
                warn!("using non-default {} = {:?}", stringify!($field), $params.$field);
            }
        )+
    };
}

impl Parameters {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load parameters from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| path.display().to_string())?;
        let params = Self::from_toml_str(&s).with_context(|| path.display().to_string())?;
        params.warn_non_default();
        Ok(params)
    }

    /// Load parameters from `path` if it is given and exists, otherwise fall
    /// back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                warn!(
                    "could not find parameters at {}, falling back to defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// The minimum contig length to use for `assembler` when the request
    /// leaves it unset.
    pub fn min_contig_len_for(&self, assembler: &str) -> usize {
        self.min_contig_len_overrides
            .get(assembler)
            .copied()
            .unwrap_or(self.default_min_contig_len)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    fn warn_non_default(&self) {
        let defaults = Self::default();
        warn_non_default!(
            self,
            defaults,
            run_cmd,
            get_cmd,
            filter_cmd,
            command_timeout_secs,
            default_min_contig_len,
            min_contig_len_overrides,
        );
    }
}

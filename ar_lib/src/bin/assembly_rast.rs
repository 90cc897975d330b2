//! assembly_rast
#![deny(missing_docs)]

use anyhow::{Context, Result};
use ar_lib::{Orchestrator, WorkspaceClient};
use ar_types::constants::AUTH_TOKEN_ENV;
use ar_types::{Assembler, AssemblyParams, ProvenanceAction, RequestContext};
use ar_wrap::{BackendConfig, CommandBackend};
use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use parameters_toml::Parameters;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Assemble a read library stored in a workspace and save the contigs and a
/// report next to it. Prints the report name and reference as JSON.
#[derive(Parser, Debug)]
#[clap(name = "assembly_rast")]
struct Args {
    /// Assembler to run, e.g. kiki, velvet, spades.
    assembler: Assembler,

    /// JSON file holding the request parameters. Flags below override it.
    #[clap(long)]
    params: Option<PathBuf>,

    /// Workspace holding the read library; the output is saved there too.
    #[clap(long)]
    workspace_name: Option<String>,

    /// Name of the read library object.
    #[clap(long)]
    read_library_name: Option<String>,

    /// Name for the output contig set.
    #[clap(long)]
    output_contigset_name: Option<String>,

    /// Drop contigs shorter than this. 0 uses the assembler's default.
    #[clap(long, allow_negative_numbers = true)]
    min_contig_len: Option<i64>,

    /// Adapter settings.
    #[clap(long, default_value = "parameters.toml")]
    config: PathBuf,

    /// Workspace service URL, overriding the config file.
    #[clap(long)]
    workspace_url: Option<String>,

    /// Auth token. Read from KB_AUTH_TOKEN if not given.
    #[clap(long)]
    token: Option<String>,

    /// JSON file with the provenance actions of the calling context.
    #[clap(long)]
    provenance: Option<PathBuf>,

    /// Log level; RUST_LOG is used if not given.
    #[clap(long)]
    log_level: Option<LevelFilter>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| path.display().to_string())?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| path.display().to_string())
}

impl Args {
    fn request_params(&self) -> Result<AssemblyParams> {
        let mut params: AssemblyParams = match &self.params {
            Some(path) => read_json(path)?,
            None => AssemblyParams::default(),
        };
        if let Some(v) = &self.workspace_name {
            params.workspace_name = Some(v.clone());
        }
        if let Some(v) = &self.read_library_name {
            params.read_library_name = Some(v.clone());
        }
        if let Some(v) = &self.output_contigset_name {
            params.output_contigset_name = Some(v.clone());
        }
        if let Some(v) = self.min_contig_len {
            params.min_contig_len = Some(v);
        }
        Ok(params)
    }

    fn context(&self) -> Result<RequestContext> {
        let provenance: Vec<ProvenanceAction> = match &self.provenance {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };
        Ok(RequestContext {
            token: self
                .token
                .clone()
                .or_else(|| std::env::var(AUTH_TOKEN_ENV).ok()),
            provenance,
        })
    }
}

fn setup_logging(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] - {}",
            buf.timestamp_seconds(),
            record.level(),
            record.args()
        )
    });
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn inner_main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let mut parameters = Parameters::load_or_default(Some(&args.config))?;
    if let Some(url) = &args.workspace_url {
        parameters.workspace_url = Some(url.clone());
    }
    let workspace_url = parameters
        .workspace_url
        .clone()
        .context("no workspace URL: pass --workspace-url or set workspace_url in the config")?;

    let store = WorkspaceClient::new(&workspace_url, parameters.command_timeout())?;
    let backend = CommandBackend::new(BackendConfig::from(&parameters));
    let orchestrator = Orchestrator::new(store, backend, parameters);

    let ctx = args.context()?;
    let params = args.request_params()?;
    let output = orchestrator
        .run(&ctx, params, &args.assembler)
        .with_context(|| format!("{} assembly failed", args.assembler))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match inner_main() {
        Ok(exit_code) => exit_code,
        Err(err) => {
            ar_wrap::utils::print_error_chain(&err);
            ExitCode::FAILURE
        }
    }
}

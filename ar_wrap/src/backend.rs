//! The job backend interface and its implementation on top of the
//! `ar-run`/`ar-get`/`ar-filter` command line tools.

use crate::command::{run, run_pipeline, Capture};
use crate::parse_job_id;
use ar_types::constants::{ARAST_URL_ENV, AUTH_TOKEN_ENV};
use ar_types::{
    Assembler, AssemblyError, BackendStage, JobHandle, JobInputDescriptor, RequestContext,
};
use log::{debug, info};
use parameters_toml::Parameters;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Name of the job input file written into the request's scratch directory.
pub const JOB_INPUT_FILE: &str = "assembly_input.json";

/// Contig stream written by [`JobBackend::fetch_sequences`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSequences {
    pub path: PathBuf,
    /// False if the stream still contains contigs shorter than the requested
    /// minimum and must be filtered by the caller.
    pub length_filtered: bool,
}

/// An asynchronous compute service that runs assembly jobs.
///
/// Calls block until the backend answers. Fetch calls assume the job has
/// finished (or wait for it); the adapter never polls or cancels.
pub trait JobBackend {
    /// Submit `descriptor` to be assembled by `assembler`. Scratch files go
    /// in `workdir`.
    fn submit(
        &self,
        ctx: &RequestContext,
        descriptor: &JobInputDescriptor,
        assembler: &Assembler,
        workdir: &Path,
    ) -> Result<JobHandle, AssemblyError>;

    /// Write the job's contigs as FASTA to `out_path`.
    fn fetch_sequences(
        &self,
        ctx: &RequestContext,
        job: &JobHandle,
        min_contig_len: usize,
        out_path: &Path,
    ) -> Result<FetchedSequences, AssemblyError>;

    /// The backend's own assembly report.
    fn fetch_report(&self, ctx: &RequestContext, job: &JobHandle) -> Result<String, AssemblyError>;

    /// The job log.
    fn fetch_log(&self, ctx: &RequestContext, job: &JobHandle) -> Result<String, AssemblyError>;
}

/// Settings for [`CommandBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub run_cmd: String,
    pub get_cmd: String,
    pub filter_cmd: Option<String>,
    pub arast_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl From<&Parameters> for BackendConfig {
    fn from(params: &Parameters) -> Self {
        BackendConfig {
            run_cmd: params.run_cmd.clone(),
            get_cmd: params.get_cmd.clone(),
            filter_cmd: params.filter_cmd.clone(),
            arast_url: params.arast_url.clone(),
            timeout: params.command_timeout(),
        }
    }
}

/// Drives the backend through its command line tools.
///
/// The auth token and endpoint are set on each child process, never on this
/// process, so one `CommandBackend` can serve concurrent requests.
pub struct CommandBackend {
    config: BackendConfig,
}

impl CommandBackend {
    pub fn new(config: BackendConfig) -> Self {
        CommandBackend { config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn command(&self, ctx: &RequestContext, program: &str) -> Command {
        let mut cmd = Command::new(program);
        if let Some(token) = &ctx.token {
            cmd.env(AUTH_TOKEN_ENV, token);
        }
        if let Some(url) = &self.config.arast_url {
            cmd.env(ARAST_URL_ENV, url);
        }
        cmd
    }

    /// `ar-get -j <id> -w <flag>`
    fn get_command(&self, ctx: &RequestContext, job: &JobHandle, flag: &str) -> Command {
        let mut cmd = self.command(ctx, &self.config.get_cmd);
        cmd.arg("-j").arg(job.job_id.to_string()).arg("-w").arg(flag);
        cmd
    }

    fn fetch_text(
        &self,
        ctx: &RequestContext,
        job: &JobHandle,
        flag: &str,
        stage: BackendStage,
    ) -> Result<String, AssemblyError> {
        let mut cmd = self.get_command(ctx, job, flag);
        let output = run(&mut cmd, stage, Capture::Separate, self.config.timeout)?;
        debug!("CMD: {}", output.command);
        Ok(output.check(stage)?.stdout)
    }
}

impl JobBackend for CommandBackend {
    fn submit(
        &self,
        ctx: &RequestContext,
        descriptor: &JobInputDescriptor,
        assembler: &Assembler,
        workdir: &Path,
    ) -> Result<JobHandle, AssemblyError> {
        let input_path = workdir.join(JOB_INPUT_FILE);
        let file = File::create(&input_path).map_err(|e| {
            AssemblyError::io(format!("creating {}", input_path.display()), e)
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), descriptor).map_err(|e| {
            AssemblyError::io(format!("writing {}", input_path.display()), e.into())
        })?;

        let mut cmd = self.command(ctx, &self.config.run_cmd);
        cmd.arg("-a")
            .arg(assembler.as_str())
            .arg("--data-json")
            .arg(&input_path);

        info!("Start {assembler} assembler");
        let output = run(
            &mut cmd,
            BackendStage::Submit,
            Capture::Combined,
            self.config.timeout,
        )?;
        debug!("CMD: {}", output.command);
        debug!("{}", output.stdout);
        let output = output.check(BackendStage::Submit)?;

        let job = JobHandle {
            job_id: parse_job_id(&output.stdout)?,
            assembler: assembler.clone(),
        };
        info!("Submitted {job}");
        Ok(job)
    }

    fn fetch_sequences(
        &self,
        ctx: &RequestContext,
        job: &JobHandle,
        min_contig_len: usize,
        out_path: &Path,
    ) -> Result<FetchedSequences, AssemblyError> {
        let mut get = self.get_command(ctx, job, "-p");
        match &self.config.filter_cmd {
            Some(filter_cmd) => {
                let mut filter = self.command(ctx, filter_cmd);
                filter.arg("-l").arg(min_contig_len.to_string());
                debug!(
                    "CMD: {} | {} > {}",
                    crate::command::command_line(&get),
                    crate::command::command_line(&filter),
                    out_path.display()
                );
                run_pipeline(
                    get,
                    filter,
                    out_path,
                    BackendStage::FetchSequences,
                    self.config.timeout,
                )?;
                Ok(FetchedSequences {
                    path: out_path.to_path_buf(),
                    length_filtered: true,
                })
            }
            None => {
                let output = run(
                    &mut get,
                    BackendStage::FetchSequences,
                    Capture::Separate,
                    self.config.timeout,
                )?;
                debug!("CMD: {} > {}", output.command, out_path.display());
                let output = output.check(BackendStage::FetchSequences)?;
                std::fs::write(out_path, output.stdout).map_err(|e| {
                    AssemblyError::io(format!("writing {}", out_path.display()), e)
                })?;
                Ok(FetchedSequences {
                    path: out_path.to_path_buf(),
                    length_filtered: false,
                })
            }
        }
    }

    fn fetch_report(&self, ctx: &RequestContext, job: &JobHandle) -> Result<String, AssemblyError> {
        self.fetch_text(ctx, job, "-r", BackendStage::FetchReport)
    }

    fn fetch_log(&self, ctx: &RequestContext, job: &JobHandle) -> Result<String, AssemblyError> {
        self.fetch_text(ctx, job, "-l", BackendStage::FetchLog)
    }
}

//! One assembly request, start to finish.

use crate::contigs::{filter_contigs, parse_contigs};
use crate::normalize::normalize;
use crate::persist::persist;
use crate::report::render_report;
use ar_types::{
    Assembler, AssemblyError, AssemblyOutput, AssemblyParams, ContigSet, ObjectSpecification,
    ObjectStore, Report, RequestContext,
};
use ar_wrap::JobBackend;
use log::{debug, info, warn};
use parameters_toml::Parameters;

/// Runs assembly requests against an object store and a job backend.
///
/// Holds no per-request state; the same orchestrator may serve many
/// requests.
pub struct Orchestrator<S, B> {
    store: S,
    backend: B,
    params: Parameters,
}

impl<S: ObjectStore, B: JobBackend> Orchestrator<S, B> {
    pub fn new(store: S, backend: B, params: Parameters) -> Self {
        Orchestrator {
            store,
            backend,
            params,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Assemble the read library named in `params` with `assembler`, save the
    /// contig set and a report, and return the report's name and reference.
    ///
    /// A job submitted before a later step fails is left running.
    pub fn run(
        &self,
        ctx: &RequestContext,
        params: AssemblyParams,
        assembler: &Assembler,
    ) -> Result<AssemblyOutput, AssemblyError> {
        let request = params.validate(self.params.min_contig_len_for(assembler.as_str()))?;
        if !assembler.is_known() {
            warn!("{assembler} is not a known assembler, submitting it as is");
        }
        let library_ref = request.read_library_ref();

        let library = self
            .store
            .get_objects(ctx, &[ObjectSpecification::new(&library_ref)])
            .and_then(|objects| {
                objects
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("no object returned"))
            })
            .map_err(|source| AssemblyError::ObjectFetch {
                reference: library_ref.clone(),
                source,
            })?;
        let container_id = library.info.wsid;
        let descriptor = normalize(std::slice::from_ref(&library))?;

        std::fs::create_dir_all(&self.params.scratch).map_err(|e| {
            AssemblyError::io(format!("creating {}", self.params.scratch.display()), e)
        })?;
        let workdir = tempfile::Builder::new()
            .prefix("output.")
            .tempdir_in(&self.params.scratch)
            .map_err(|e| AssemblyError::io("creating request scratch directory", e))?;
        debug!("scratch directory {}", workdir.path().display());

        let job = self
            .backend
            .submit(ctx, &descriptor, assembler, workdir.path())?;

        let fetched = self.backend.fetch_sequences(
            ctx,
            &job,
            request.min_contig_len,
            &workdir.path().join("contigs.fa"),
        )?;
        let contigs_path = if fetched.length_filtered {
            fetched.path
        } else {
            let filtered = workdir.path().join("contigs.filtered.fa");
            let kept = filter_contigs(&fetched.path, &filtered, request.min_contig_len)?;
            debug!("{kept} contigs of at least {} bp", request.min_contig_len);
            filtered
        };
        let backend_report = self.backend.fetch_report(ctx, &job)?;
        let job_log = self.backend.fetch_log(ctx, &job)?;

        let contig_set = ContigSet::new(assembler, parse_contigs(&contigs_path)?);
        let summary = stats::summarize(&contig_set.lengths());
        info!(
            "{job}: {} contigs of at least {} bp",
            summary.count, request.min_contig_len
        );

        let output_ref = request.output_ref();
        let text = render_report(&output_ref, &summary, &backend_report, &job_log);
        let report = Report::for_contig_set(output_ref, text);
        let report_name = job.report_name();
        let saved = persist(
            &self.store,
            ctx,
            &request,
            container_id,
            &contig_set,
            &report,
            &report_name,
        )?;

        Ok(AssemblyOutput {
            report_name,
            report_ref: saved.report.reference(),
        })
    }
}

macro_rules! assembler_entry_points {
    ($($fn_name:ident => $assembler:literal),+ $(,)?) => {
        impl<S: ObjectStore, B: JobBackend> Orchestrator<S, B> {
            $(
                #[doc = concat!("[`Orchestrator::run`] with the `", $assembler, "` assembler.")]
                pub fn $fn_name(
                    &self,
                    ctx: &RequestContext,
                    params: AssemblyParams,
                ) -> Result<AssemblyOutput, AssemblyError> {
                    self.run(ctx, params, &Assembler::new($assembler)?)
                }
            )+
        }
    };
}

assembler_entry_points! {
    run_kiki => "kiki",
    run_velvet => "velvet",
    run_miniasm => "miniasm",
    run_spades => "spades",
    run_idba => "idba",
    run_megahit => "megahit",
    run_ray => "ray",
    run_masurca => "masurca",
    run_a5 => "a5",
    run_a6 => "a6",
}

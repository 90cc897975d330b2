//! In-memory stand-ins for the object store and the job backend.

use anyhow::{anyhow, bail, Result};
use ar_types::{
    Assembler, AssemblyError, BackendStage, JobHandle, JobInputDescriptor, ObjectData, ObjectInfo,
    ObjectSpecification, ObjectStore, RequestContext, SaveObjectsParams,
};
use ar_wrap::{FetchedSequences, JobBackend};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const WSID: u64 = 7;

pub fn object_info(objid: u64, name: &str, type_string: &str) -> ObjectInfo {
    ObjectInfo {
        objid,
        name: name.to_string(),
        type_string: type_string.to_string(),
        save_date: "2024-01-01T00:00:00+0000".to_string(),
        version: 1,
        saved_by: "tester".to_string(),
        wsid: WSID,
        workspace: "ws1".to_string(),
        chsum: String::new(),
        size: 0,
        meta: None,
    }
}

/// A stored object named `lib1` of the given type.
pub fn object(type_string: &str, data: Value) -> ObjectData {
    ObjectData {
        data,
        info: object_info(3, "lib1", type_string),
    }
}

/// An object store holding a fixed set of objects that records every call.
#[derive(Default)]
pub struct FakeStore {
    pub objects: BTreeMap<String, ObjectData>,
    /// Saves of objects with this name are rejected.
    pub reject_name: Option<String>,
    pub gets: RefCell<Vec<String>>,
    pub saves: RefCell<Vec<SaveObjectsParams>>,
    next_objid: Cell<u64>,
}

impl FakeStore {
    pub fn with_object(reference: &str, object: ObjectData) -> Self {
        FakeStore {
            objects: BTreeMap::from([(reference.to_string(), object)]),
            next_objid: Cell::new(10),
            ..Default::default()
        }
    }

    /// Reject saves of objects named `name`.
    pub fn rejecting(mut self, name: &str) -> Self {
        self.reject_name = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.gets.borrow().len() + self.saves.borrow().len()
    }
}

impl ObjectStore for FakeStore {
    fn get_objects(
        &self,
        _ctx: &RequestContext,
        objects: &[ObjectSpecification],
    ) -> Result<Vec<ObjectData>> {
        objects
            .iter()
            .map(|spec| {
                self.gets.borrow_mut().push(spec.reference.clone());
                self.objects
                    .get(&spec.reference)
                    .cloned()
                    .ok_or_else(|| anyhow!("No object with name {}", spec.reference))
            })
            .collect()
    }

    fn save_objects(
        &self,
        _ctx: &RequestContext,
        params: &SaveObjectsParams,
    ) -> Result<Vec<ObjectInfo>> {
        self.saves.borrow_mut().push(params.clone());
        let mut infos = Vec::new();
        for object in &params.objects {
            if self.reject_name.as_deref() == Some(object.name.as_str()) {
                bail!("Object {} failed type checking", object.name);
            }
            let objid = self.next_objid.get();
            self.next_objid.set(objid + 1);
            let mut info = object_info(objid, &object.name, &object.type_string);
            info.wsid = params.id;
            infos.push(info);
        }
        Ok(infos)
    }
}

/// A job backend that answers from canned text and records every call.
pub struct FakeBackend {
    pub job_id: u64,
    pub contigs_fasta: String,
    pub report: String,
    pub log: String,
    /// Exit code returned by the submit command, if it fails.
    pub submit_exit_code: Option<i32>,
    pub calls: RefCell<Vec<String>>,
    pub submitted: RefCell<Vec<JobInputDescriptor>>,
    pub workdirs: RefCell<Vec<PathBuf>>,
}

impl FakeBackend {
    pub fn new(job_id: u64, contigs_fasta: &str) -> Self {
        FakeBackend {
            job_id,
            contigs_fasta: contigs_fasta.to_string(),
            report: "Assembly finished\n".to_string(),
            log: "[kiki] done\n".to_string(),
            submit_exit_code: None,
            calls: RefCell::new(Vec::new()),
            submitted: RefCell::new(Vec::new()),
            workdirs: RefCell::new(Vec::new()),
        }
    }

    fn check_job(&self, job: &JobHandle, stage: BackendStage) -> Result<(), AssemblyError> {
        if job.job_id == self.job_id {
            return Ok(());
        }
        Err(AssemblyError::BackendExecution {
            stage,
            command: format!("ar-get -j {}", job.job_id),
            exit_code: Some(1),
            output: "no such job".to_string(),
        })
    }
}

impl JobBackend for FakeBackend {
    fn submit(
        &self,
        _ctx: &RequestContext,
        descriptor: &JobInputDescriptor,
        assembler: &Assembler,
        workdir: &Path,
    ) -> Result<JobHandle, AssemblyError> {
        self.calls.borrow_mut().push(format!("submit {assembler}"));
        self.workdirs.borrow_mut().push(workdir.to_path_buf());
        if let Some(code) = self.submit_exit_code {
            return Err(AssemblyError::BackendExecution {
                stage: BackendStage::Submit,
                command: format!("ar-run -a {assembler}"),
                exit_code: Some(code),
                output: "submission refused".to_string(),
            });
        }
        self.submitted.borrow_mut().push(descriptor.clone());
        Ok(JobHandle {
            job_id: self.job_id,
            assembler: assembler.clone(),
        })
    }

    /// Writes the canned contigs unfiltered.
    fn fetch_sequences(
        &self,
        _ctx: &RequestContext,
        job: &JobHandle,
        min_contig_len: usize,
        out_path: &Path,
    ) -> Result<FetchedSequences, AssemblyError> {
        self.calls
            .borrow_mut()
            .push(format!("sequences {} {min_contig_len}", job.job_id));
        self.check_job(job, BackendStage::FetchSequences)?;
        std::fs::write(out_path, &self.contigs_fasta)
            .map_err(|e| AssemblyError::io("writing fake contigs", e))?;
        Ok(FetchedSequences {
            path: out_path.to_path_buf(),
            length_filtered: false,
        })
    }

    fn fetch_report(&self, _ctx: &RequestContext, job: &JobHandle) -> Result<String, AssemblyError> {
        self.calls.borrow_mut().push(format!("report {}", job.job_id));
        self.check_job(job, BackendStage::FetchReport)?;
        Ok(self.report.clone())
    }

    fn fetch_log(&self, _ctx: &RequestContext, job: &JobHandle) -> Result<String, AssemblyError> {
        self.calls.borrow_mut().push(format!("log {}", job.job_id));
        self.check_job(job, BackendStage::FetchLog)?;
        Ok(self.log.clone())
    }
}

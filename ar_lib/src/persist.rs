//! Saving the contig set and its report to the object store.

use ar_types::constants::{CONTIG_SET_TYPE, REPORT_TYPE};
use ar_types::{
    AssemblyError, AssemblyRequest, ContigSet, ObjectInfo, ObjectSaveData, ObjectStore,
    ProvenanceAction, Report, RequestContext, SaveObjectsParams,
};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Metadata of the two objects written for one assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedObjects {
    pub contig_set: ObjectInfo,
    pub report: ObjectInfo,
}

struct SaveTarget<'a, S> {
    store: &'a S,
    ctx: &'a RequestContext,
    container_id: u64,
    provenance: Vec<ProvenanceAction>,
}

impl<S: ObjectStore> SaveTarget<'_, S> {
    fn save(
        &self,
        type_string: &str,
        name: &str,
        data: &impl Serialize,
        hidden: bool,
    ) -> Result<ObjectInfo, AssemblyError> {
        let failed = |source: anyhow::Error| AssemblyError::Persistence {
            object_name: name.to_string(),
            source,
        };
        let params = SaveObjectsParams {
            id: self.container_id,
            objects: vec![ObjectSaveData {
                type_string: type_string.to_string(),
                data: serde_json::to_value(data).map_err(|e| failed(e.into()))?,
                name: name.to_string(),
                meta: BTreeMap::new(),
                provenance: self.provenance.clone(),
                hidden: hidden.then_some(1),
            }],
        };
        let mut infos = self.store.save_objects(self.ctx, &params).map_err(failed)?;
        if infos.len() != 1 {
            return Err(failed(anyhow::anyhow!(
                "expected one object info from save_objects, got {}",
                infos.len()
            )));
        }
        let info = infos.remove(0);
        info!("saved {type_string} {name} as {}", info.reference());
        Ok(info)
    }
}

/// Save `contig_set` under the requested output name, then `report` as a
/// hidden object named `report_name`, both into workspace `container_id`.
///
/// The saves are independent: if the report save fails the contig set stays.
pub fn persist<S: ObjectStore>(
    store: &S,
    ctx: &RequestContext,
    request: &AssemblyRequest,
    container_id: u64,
    contig_set: &ContigSet,
    report: &Report,
    report_name: &str,
) -> Result<PersistedObjects, AssemblyError> {
    let target = SaveTarget {
        store,
        ctx,
        container_id,
        provenance: ctx.provenance_for(&request.read_library_ref()),
    };
    let contig_set = target.save(
        CONTIG_SET_TYPE,
        &request.output_contigset_name,
        contig_set,
        false,
    )?;
    let report = target.save(REPORT_TYPE, report_name, report, true)?;
    Ok(PersistedObjects { contig_set, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStore;
    use ar_types::{Assembler, AssemblyParams};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request() -> AssemblyRequest {
        AssemblyParams {
            workspace_name: Some("ws1".to_string()),
            read_library_name: Some("lib1".to_string()),
            output_contigset_name: Some("out1".to_string()),
            ..Default::default()
        }
        .validate(200)
        .unwrap()
    }

    fn contig_set() -> ContigSet {
        ContigSet::new(&Assembler::new("kiki").unwrap(), vec![])
    }

    #[test]
    fn test_two_saves_with_shared_provenance() {
        let store = FakeStore::default();
        let ctx = RequestContext {
            token: None,
            provenance: serde_json::from_value(json!([
                {"service": "AssemblyRAST", "method": "run_kiki"},
                {"service": "other"},
            ]))
            .unwrap(),
        };
        let report = Report::for_contig_set("ws1/out1".to_string(), "text".to_string());
        let saved = persist(
            &store,
            &ctx,
            &request(),
            42,
            &contig_set(),
            &report,
            "kiki.report.9",
        )
        .unwrap();
        assert_eq!(saved.contig_set.name, "out1");
        assert_eq!(saved.report.name, "kiki.report.9");
        assert_eq!(saved.report.wsid, 42);

        let saves = store.saves.borrow();
        assert_eq!(saves.len(), 2);
        let (cs, rep) = (&saves[0].objects[0], &saves[1].objects[0]);
        assert_eq!((saves[0].id, saves[1].id), (42, 42));
        assert_eq!(cs.type_string, "KBaseGenomes.ContigSet");
        assert_eq!(cs.hidden, None);
        assert_eq!(rep.type_string, "KBaseReport.Report");
        assert_eq!(rep.hidden, Some(1));
        assert_eq!(cs.provenance, rep.provenance);
        assert_eq!(cs.provenance.len(), 2);
        assert_eq!(cs.provenance[0].method.as_deref(), Some("run_kiki"));
        assert_eq!(cs.provenance[0].input_ws_objects, vec!["ws1/lib1"]);
        assert!(cs.provenance[1].input_ws_objects.is_empty());
        assert_eq!(rep.data["objects_created"][0]["ref"], "ws1/out1");
    }

    #[test]
    fn test_report_rejection_keeps_contig_set() {
        let store = FakeStore::default().rejecting("kiki.report.9");
        let report = Report::for_contig_set("ws1/out1".to_string(), "text".to_string());
        let res = persist(
            &store,
            &RequestContext::default(),
            &request(),
            42,
            &contig_set(),
            &report,
            "kiki.report.9",
        );
        match res {
            Err(AssemblyError::Persistence { object_name, .. }) => {
                assert_eq!(object_name, "kiki.report.9")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(store.saves.borrow().len(), 2);
        assert_eq!(store.saves.borrow()[0].objects[0].name, "out1");
    }

    #[test]
    fn test_default_provenance() {
        let store = FakeStore::default();
        let report = Report::for_contig_set("ws1/out1".to_string(), String::new());
        persist(
            &store,
            &RequestContext::default(),
            &request(),
            1,
            &contig_set(),
            &report,
            "kiki.report.1",
        )
        .unwrap();
        let saves = store.saves.borrow();
        let provenance = &saves[0].objects[0].provenance;
        assert_eq!(provenance.len(), 1);
        assert_eq!(provenance[0].input_ws_objects, vec!["ws1/lib1"]);
        assert_eq!(provenance[0].service, None);
    }
}

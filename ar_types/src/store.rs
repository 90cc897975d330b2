//! The object store ("workspace") interface used by the adapter.
//!
//! Only the two calls the adapter needs are modeled. Object metadata comes
//! back from the store as a fixed-position tuple; [`ObjectInfo`] gives those
//! positions names.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Per-request state handed to every collaborator call. Nothing in here is
/// stored process-wide, so concurrent requests cannot clobber each other.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub provenance: Vec<ProvenanceAction>,
}

impl RequestContext {
    pub fn with_token(token: impl Into<String>) -> Self {
        RequestContext {
            token: Some(token.into()),
            provenance: Vec::new(),
        }
    }

    /// The provenance to attach to objects derived from `input_ref`: the
    /// caller's provenance (or a single empty action) with the input object
    /// recorded on the first action.
    pub fn provenance_for(&self, input_ref: &str) -> Vec<ProvenanceAction> {
        let mut provenance = self.provenance.clone();
        if provenance.is_empty() {
            provenance.push(ProvenanceAction::default());
        }
        provenance[0].input_ws_objects = vec![input_ref.to_string()];
        provenance
    }
}

/// One step in the history of a stored object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProvenanceAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_params: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_ws_objects: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ObjectSpecification {
    #[serde(rename = "ref")]
    pub reference: String,
}

impl ObjectSpecification {
    pub fn new(reference: impl Into<String>) -> Self {
        ObjectSpecification {
            reference: reference.into(),
        }
    }
}

/// Wire form of [`ObjectInfo`].
pub type ObjectInfoTuple = (
    u64,
    String,
    String,
    String,
    u64,
    String,
    u64,
    String,
    String,
    u64,
    Option<BTreeMap<String, String>>,
);

/// Object metadata as returned by `get_objects` and `save_objects`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "ObjectInfoTuple", into = "ObjectInfoTuple")]
pub struct ObjectInfo {
    pub objid: u64,
    pub name: String,
    /// Full type string, e.g. `KBaseFile.PairedEndLibrary-2.0`
    pub type_string: String,
    pub save_date: String,
    pub version: u64,
    pub saved_by: String,
    /// Id of the workspace (container) holding the object
    pub wsid: u64,
    pub workspace: String,
    pub chsum: String,
    pub size: u64,
    pub meta: Option<BTreeMap<String, String>>,
}

impl ObjectInfo {
    /// The `<wsid>/<objid>/<version>` reference of this object.
    pub fn reference(&self) -> String {
        format!("{}/{}/{}", self.wsid, self.objid, self.version)
    }

    /// The type name without module namespace or version,
    /// `KBaseFile.PairedEndLibrary-2.0` becomes `PairedEndLibrary`.
    pub fn type_name(&self) -> &str {
        let unqualified = match self.type_string.split_once('.') {
            Some((_module, rest)) => rest,
            None => &self.type_string,
        };
        match unqualified.split_once('-') {
            Some((name, _version)) => name,
            None => unqualified,
        }
    }
}

impl From<ObjectInfoTuple> for ObjectInfo {
    fn from(t: ObjectInfoTuple) -> Self {
        ObjectInfo {
            objid: t.0,
            name: t.1,
            type_string: t.2,
            save_date: t.3,
            version: t.4,
            saved_by: t.5,
            wsid: t.6,
            workspace: t.7,
            chsum: t.8,
            size: t.9,
            meta: t.10,
        }
    }
}

impl From<ObjectInfo> for ObjectInfoTuple {
    fn from(i: ObjectInfo) -> Self {
        (
            i.objid,
            i.name,
            i.type_string,
            i.save_date,
            i.version,
            i.saved_by,
            i.wsid,
            i.workspace,
            i.chsum,
            i.size,
            i.meta,
        )
    }
}

/// A fetched object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ObjectData {
    pub data: Value,
    pub info: ObjectInfo,
}

/// One object to be written by `save_objects`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ObjectSaveData {
    #[serde(rename = "type")]
    pub type_string: String,
    pub data: Value,
    pub name: String,
    pub meta: BTreeMap<String, String>,
    pub provenance: Vec<ProvenanceAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<u8>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SaveObjectsParams {
    /// Target workspace id
    pub id: u64,
    pub objects: Vec<ObjectSaveData>,
}

/// The calls the adapter makes against the object store.
pub trait ObjectStore {
    fn get_objects(
        &self,
        ctx: &RequestContext,
        objects: &[ObjectSpecification],
    ) -> Result<Vec<ObjectData>>;

    /// Save objects, returning one info tuple per saved object, in order.
    fn save_objects(
        &self,
        ctx: &RequestContext,
        params: &SaveObjectsParams,
    ) -> Result<Vec<ObjectInfo>>;
}

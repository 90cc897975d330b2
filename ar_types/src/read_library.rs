//! Read library objects and the job input built from them.
//!
//! Read library objects store their file handles in one of two shapes:
//! nested under a `lib1`/`lib2`/`lib` entry (`{"lib1": {"file": {...}}}`) or
//! flat (`{"handle_1": {...}}`). The shape is resolved once, when the object
//! is converted into a [`ReadLibrary`].

use crate::constants::{PAIRED_END_LIBRARY, SINGLE_END_LIBRARY};
use crate::store::ObjectData;
use crate::AssemblyError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A reference to a file in the reads file store.
///
/// Kept exactly as stored, null members included; the backend reads it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Handle(pub Map<String, Value>);

impl Handle {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}

/// Where a handle was found in the stored object.
#[derive(Clone, Debug, PartialEq)]
pub enum HandleSource {
    /// `lib1.file`, `lib2.file` or `lib.file`
    Nested(Handle),
    /// `handle_1`, `handle_2` or `handle`
    Flat(Handle),
}

impl HandleSource {
    /// Pick the nested handle if the object has one, the flat one otherwise.
    fn resolve(nested: Option<ReadsLib>, flat: Option<Handle>) -> Option<Self> {
        match (nested, flat) {
            (Some(lib), _) => Some(HandleSource::Nested(lib.file)),
            (None, Some(handle)) => Some(HandleSource::Flat(handle)),
            (None, None) => None,
        }
    }

    pub fn into_handle(self) -> Handle {
        match self {
            HandleSource::Nested(h) | HandleSource::Flat(h) => h,
        }
    }
}

#[derive(Deserialize)]
struct ReadsLib {
    file: Handle,
}

#[derive(Deserialize)]
struct PairedEndLibraryData {
    #[serde(default)]
    lib1: Option<ReadsLib>,
    #[serde(default)]
    lib2: Option<ReadsLib>,
    #[serde(default)]
    handle_1: Option<Handle>,
    #[serde(default)]
    handle_2: Option<Handle>,
    #[serde(default)]
    interleaved: Option<Value>,
}

#[derive(Deserialize)]
struct SingleEndLibraryData {
    #[serde(default)]
    lib: Option<ReadsLib>,
    #[serde(default)]
    handle: Option<Handle>,
}

/// A read library object, classified by its type.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadLibrary {
    PairedEnd {
        handle_1: Option<HandleSource>,
        handle_2: Option<HandleSource>,
        /// `true`/`false` or `1`/`0`, as stored
        interleaved: Option<Value>,
    },
    SingleEnd {
        handle: Option<HandleSource>,
    },
    /// Any other object type. It contributes nothing to the job input.
    Unsupported { type_name: String },
}

impl ReadLibrary {
    pub fn from_object(object: &ObjectData) -> Result<Self, AssemblyError> {
        let type_name = object.info.type_name();
        let invalid = |e: serde_json::Error| {
            AssemblyError::invalid_field(
                "read_library_name",
                format!(
                    "object {} of type {} is not a valid read library: {e}",
                    object.info.name, object.info.type_string
                ),
            )
        };
        Ok(match type_name {
            PAIRED_END_LIBRARY => {
                let data: PairedEndLibraryData =
                    serde_json::from_value(object.data.clone()).map_err(invalid)?;
                ReadLibrary::PairedEnd {
                    handle_1: HandleSource::resolve(data.lib1, data.handle_1),
                    handle_2: HandleSource::resolve(data.lib2, data.handle_2),
                    interleaved: data.interleaved,
                }
            }
            SINGLE_END_LIBRARY => {
                let data: SingleEndLibraryData =
                    serde_json::from_value(object.data.clone()).map_err(invalid)?;
                ReadLibrary::SingleEnd {
                    handle: HandleSource::resolve(data.lib, data.handle),
                }
            }
            _ => ReadLibrary::Unsupported {
                type_name: type_name.to_string(),
            },
        })
    }
}

/// A paired-end entry of the job input.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PairedEndLib {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_1: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_2: Option<Handle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interleaved: Option<Value>,
}

/// A single-end entry of the job input.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SingleEndLib {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<Handle>,
}

/// The backend-agnostic job input, handed to `ar-run --data-json`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct JobInputDescriptor {
    pub paired_end_libs: Vec<PairedEndLib>,
    pub single_end_libs: Vec<SingleEndLib>,
    pub references: Vec<Value>,
}

impl JobInputDescriptor {
    pub fn is_empty(&self) -> bool {
        self.paired_end_libs.is_empty()
            && self.single_end_libs.is_empty()
            && self.references.is_empty()
    }
}

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

//! Types shared by the assembly adapter crates: the request surface, the
//! read library and job input model, contig set and report payloads, the
//! object store interface and the error taxonomy.

pub mod assembly;
pub mod constants;
mod errors;
pub mod read_library;
pub mod store;

pub use assembly::{
    Assembler, AssemblyOutput, AssemblyParams, AssemblyRequest, ContigRecord, ContigSet,
    CreatedObject, JobHandle, Report,
};
pub use errors::{AssemblyError, BackendStage};
pub use read_library::{
    Handle, HandleSource, JobInputDescriptor, PairedEndLib, ReadLibrary, SingleEndLib,
};
pub use store::{
    ObjectData, ObjectInfo, ObjectSaveData, ObjectSpecification, ObjectStore, ProvenanceAction,
    RequestContext, SaveObjectsParams,
};

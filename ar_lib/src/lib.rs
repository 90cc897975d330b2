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

//! The assembly adapter: turn a read library stored in the workspace into an
//! assembled, summarized and persisted contig set.
//!
//! [`Orchestrator`] drives one request end to end. The object store and the
//! job backend are traits ([`ObjectStore`](ar_types::ObjectStore) and
//! [`JobBackend`](ar_wrap::JobBackend)) so they can be swapped for fakes.

pub mod contigs;
pub mod normalize;
pub mod orchestrator;
pub mod persist;
pub mod report;
pub mod workspace_client;

#[cfg(test)]
mod testing;

pub use orchestrator::Orchestrator;
pub use workspace_client::WorkspaceClient;

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

//! Everything that touches the external job backend: running the `ar-*`
//! commands, piping their output, and scraping job ids out of their text.
//! The rest of the adapter only sees [`JobHandle`](ar_types::JobHandle)s and
//! files on disk.

pub mod backend;
pub mod command;
mod job_id;
pub mod utils;

pub use backend::{BackendConfig, CommandBackend, FetchedSequences, JobBackend};
pub use job_id::parse_job_id;

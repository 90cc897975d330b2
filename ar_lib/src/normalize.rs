//! Build the backend job input from read library objects.

use ar_types::{
    AssemblyError, HandleSource, JobInputDescriptor, ObjectData, PairedEndLib, ReadLibrary,
    SingleEndLib,
};
use log::{debug, warn};

/// Combine `records` into one [`JobInputDescriptor`].
///
/// Handles and the `interleaved` flag are copied as stored. Objects of a type
/// other than paired-end or single-end library add nothing to the descriptor. An empty descriptor is returned as is; whether an
/// empty job is acceptable is up to the backend.
pub fn normalize(records: &[ObjectData]) -> Result<JobInputDescriptor, AssemblyError> {
    let mut descriptor = JobInputDescriptor::default();
    for record in records {
        match ReadLibrary::from_object(record)? {
            ReadLibrary::PairedEnd {
                handle_1,
                handle_2,
                interleaved,
            } => descriptor.paired_end_libs.push(PairedEndLib {
                handle_1: handle_1.map(HandleSource::into_handle),
                handle_2: handle_2.map(HandleSource::into_handle),
                interleaved,
            }),
            ReadLibrary::SingleEnd { handle } => descriptor.single_end_libs.push(SingleEndLib {
                handle: handle.map(HandleSource::into_handle),
            }),
            ReadLibrary::Unsupported { type_name } => warn!(
                "ignoring {} ({}): {type_name} is not a supported read library type",
                record.info.name,
                record.info.reference()
            ),
        }
    }
    debug!(
        "job input: {} paired-end, {} single-end libraries",
        descriptor.paired_end_libs.len(),
        descriptor.single_end_libs.len()
    );
    Ok(descriptor)
}

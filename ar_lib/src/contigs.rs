//! Reading and length-filtering the contig FASTA returned by the backend.

use ar_types::{AssemblyError, ContigRecord};
use bio::io::fasta;
use md5::{Digest, Md5};
use std::path::Path;

fn malformed(path: &Path, record: impl Into<String>, reason: impl ToString) -> AssemblyError {
    AssemblyError::MalformedRecord {
        path: path.to_path_buf(),
        record: record.into(),
        reason: reason.to_string(),
    }
}

fn open(path: &Path) -> Result<fasta::Reader<std::io::BufReader<std::fs::File>>, AssemblyError> {
    fasta::Reader::from_file(path).map_err(|e| {
        AssemblyError::io(
            format!("opening contigs {}", path.display()),
            std::io::Error::other(e.to_string()),
        )
    })
}

/// Read every record of the FASTA file at `path`.
///
/// `id` and `name` are the first word of the header and `description` is the
/// whole header line. An empty file gives no records.
pub fn parse_contigs(path: &Path) -> Result<Vec<ContigRecord>, AssemblyError> {
    open(path)?
        .records()
        .enumerate()
        .map(|(i, record)| {
            let record = record.map_err(|e| malformed(path, format!("#{}", i + 1), e))?;
            contig_record(path, &record)
        })
        .collect()
}

fn contig_record(path: &Path, record: &fasta::Record) -> Result<ContigRecord, AssemblyError> {
    record
        .check()
        .map_err(|reason| malformed(path, record.id(), reason))?;
    let seq = record.seq();
    if seq.is_empty() {
        return Err(malformed(path, record.id(), "record has no sequence"));
    }
    let description = match record.desc() {
        Some(desc) => format!("{} {desc}", record.id()),
        None => record.id().to_string(),
    };
    Ok(ContigRecord {
        id: record.id().to_string(),
        name: record.id().to_string(),
        description,
        length: seq.len(),
        sequence: String::from_utf8_lossy(seq).into_owned(),
        md5: hex::encode(Md5::digest(seq)),
    })
}

/// Copy the records of `input` that are at least `min_len` bases long to
/// `output`, returning how many were kept.
pub fn filter_contigs(input: &Path, output: &Path, min_len: usize) -> Result<usize, AssemblyError> {
    let write_error =
        |e: std::io::Error| AssemblyError::io(format!("writing {}", output.display()), e);
    let mut writer = fasta::Writer::to_file(output).map_err(write_error)?;
    let mut kept = 0;
    for (i, record) in open(input)?.records().enumerate() {
        let record = record.map_err(|e| malformed(input, format!("#{}", i + 1), e))?;
        if record.seq().len() >= min_len {
            writer.write_record(&record).map_err(write_error)?;
            kept += 1;
        }
    }
    writer.flush().map_err(write_error)?;
    Ok(kept)
}

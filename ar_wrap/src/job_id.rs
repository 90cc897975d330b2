use ar_types::AssemblyError;
use regex::Regex;
use std::sync::OnceLock;

static JOB_ID: OnceLock<Regex> = OnceLock::new();

/// Extract the job id from the text printed by the submit command: the first
/// run of decimal digits anywhere in the output. The id is numeric, so
/// leading zeros do not survive into names built from it.
pub fn parse_job_id(output: &str) -> Result<u64, AssemblyError> {
    let re = JOB_ID.get_or_init(|| Regex::new("[0-9]+").unwrap());
    let protocol_error = || AssemblyError::BackendProtocol {
        output: output.to_string(),
    };
    let digits = re.find(output).ok_or_else(protocol_error)?.as_str();
    match digits.parse::<u64>() {
        Ok(job_id) if job_id > 0 => Ok(job_id),
        _ => Err(protocol_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_digit_run() {
        assert_eq!(parse_job_id("queued as job 4821 ok").unwrap(), 4821);
        assert_eq!(parse_job_id("Job ID: 17\nserver 10.0.0.1").unwrap(), 17);
        assert_eq!(parse_job_id("job42").unwrap(), 42);
    }

    #[test]
    fn test_leading_zeros_are_dropped() {
        let job = ar_types::JobHandle {
            job_id: parse_job_id("[job] 007 queued").unwrap(),
            assembler: ar_types::Assembler::new("kiki").unwrap(),
        };
        assert_eq!(job.job_id, 7);
        assert_eq!(job.report_name(), "kiki.report.7");
    }

    #[test]
    fn test_no_digits_is_protocol_error() {
        for output in ["", "submitted", "Error: no such assembler\n"] {
            match parse_job_id(output) {
                Err(AssemblyError::BackendProtocol { output: o }) => assert_eq!(o, output),
                other => panic!("unexpected {other:?} for {output:?}"),
            }
        }
    }

    #[test]
    fn test_unusable_ids() {
        assert!(matches!(
            parse_job_id("job 0 queued"),
            Err(AssemblyError::BackendProtocol { .. })
        ));
        assert!(matches!(
            parse_job_id("job 99999999999999999999999 queued"),
            Err(AssemblyError::BackendProtocol { .. })
        ));
    }
}

//! Applying structural patches to many documents.

use super::{apply_patch_v2, ApplyOptions, ErrorMode};
use crate::error::{Error, Result};
use crate::model::{ParserResult, PatchV2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of one patch in a batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// The patched document
    Applied(ParserResult),
    /// The patch could not be applied (lenient mode only)
    Failed(Error),
}

impl BatchOutcome {
    /// Get the patched document, if the patch applied.
    pub fn document(&self) -> Option<&ParserResult> {
        match self {
            BatchOutcome::Applied(doc) => Some(doc),
            BatchOutcome::Failed(_) => None,
        }
    }

    /// Check if the patch failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed(_))
    }
}

/// Apply independent structural patches, one per document.
///
/// Inputs are never mutated, so the jobs may run in parallel. Outcomes are
/// returned in job order.
pub fn apply_batch_v2(
    jobs: &[(ParserResult, PatchV2)],
    options: &ApplyOptions,
) -> Result<Vec<BatchOutcome>> {
    let results = run_jobs(jobs, options.parallel);

    let mut outcomes = Vec::with_capacity(results.len());
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(doc) => outcomes.push(BatchOutcome::Applied(doc)),
            Err(e) => {
                if options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to apply patch {} ({}): {}", i, jobs[i].0.title, e);
                outcomes.push(BatchOutcome::Failed(e));
            }
        }
    }

    Ok(outcomes)
}

#[cfg(feature = "parallel")]
fn run_jobs(jobs: &[(ParserResult, PatchV2)], parallel: bool) -> Vec<Result<ParserResult>> {
    if parallel {
        jobs.par_iter()
            .map(|(doc, patch)| apply_patch_v2(doc, patch))
            .collect()
    } else {
        jobs.iter()
            .map(|(doc, patch)| apply_patch_v2(doc, patch))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_jobs(jobs: &[(ParserResult, PatchV2)], _parallel: bool) -> Vec<Result<ParserResult>> {
    jobs.iter()
        .map(|(doc, patch)| apply_patch_v2(doc, patch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentPart, PartOp};

    fn jobs() -> Vec<(ParserResult, PatchV2)> {
        let mut doc = ParserResult::new("Doc");
        doc.parts.push(ContentPart::paragraph("abc"));

        vec![
            (doc.clone(), PatchV2::new()),
            (doc.clone(), PatchV2::new().with_part(0, PartOp::new().with_diff("=9"))),
            (doc, PatchV2::new().with_part(0, PartOp::new().deleted())),
        ]
    }

    #[test]
    fn test_strict_batch_fails() {
        let options = ApplyOptions::new();
        assert!(apply_batch_v2(&jobs(), &options).is_err());
    }

    #[test]
    fn test_lenient_batch_continues() {
        for parallel in [true, false] {
            let options = ApplyOptions::new().lenient().with_parallel(parallel);
            let outcomes = apply_batch_v2(&jobs(), &options).unwrap();

            assert_eq!(outcomes.len(), 3);
            assert_eq!(outcomes[0].document().unwrap().parts.len(), 1);
            assert!(outcomes[1].is_failed());
            assert!(outcomes[2].document().unwrap().parts.is_empty());
        }
    }

    #[test]
    fn test_overflowing_delta_fails_its_job_only() {
        let mut doc = ParserResult::new("Doc");
        doc.parts.push(ContentPart::paragraph("abc"));
        let jobs = vec![
            (
                doc.clone(),
                PatchV2::new().with_part(0, PartOp::new().with_diff("=1\t=18446744073709551615")),
            ),
            (doc, PatchV2::new()),
        ];

        let options = ApplyOptions::new().lenient().sequential();
        let outcomes = apply_batch_v2(&jobs, &options).unwrap();

        assert!(outcomes[0].is_failed());
        assert_eq!(outcomes[1].document().unwrap().parts[0].text, "abc");
    }
}

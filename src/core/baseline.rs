use crate::types::{BaselineAnnotation, Product, StackError, StackResult};

/// Extension point for perpendicular (geometric/orbital) baselines
///
/// No concrete algorithm ships with the library; when no strategy is given
/// only the temporal baseline is computed.
pub trait PerpendicularStrategy {
    /// Perpendicular separation in meters, if computable for this pair
    fn perpendicular(&self, reference: &Product, candidate: &Product) -> Option<f64>;
}

/// Outcome of one annotation pass over a candidate set
///
/// Per-candidate failures land in `skipped` instead of aborting the batch,
/// so one malformed record never costs the rest of the stack.
#[derive(Debug, Default)]
pub struct BaselineReport {
    pub annotated: Vec<(Product, BaselineAnnotation)>,
    pub skipped: Vec<StackError>,
}

/// Computes per-candidate relative baselines against a reference product
pub struct BaselineCalculator;

impl BaselineCalculator {
    /// Annotate every candidate with its temporal baseline
    pub fn annotate(reference: &Product, candidates: &[Product]) -> StackResult<BaselineReport> {
        Self::annotate_with(reference, candidates, None)
    }

    /// Annotate candidates, additionally applying a perpendicular strategy
    ///
    /// The temporal baseline is the signed whole-day difference between the
    /// candidate's and the reference's acquisition dates. Fails with
    /// `InvalidReference` when the reference itself has no parseable date;
    /// a candidate with a bad date is recorded in the report and skipped.
    pub fn annotate_with(
        reference: &Product,
        candidates: &[Product],
        strategy: Option<&dyn PerpendicularStrategy>,
    ) -> StackResult<BaselineReport> {
        let reference_time = reference
            .start_time()
            .map_err(|_| StackError::InvalidReference {
                product_id: reference.display_id(),
                field: "startTime".to_string(),
            })?;
        let reference_date = reference_time.date_naive();

        let mut report = BaselineReport::default();
        for candidate in candidates {
            match candidate.start_time() {
                Ok(time) => {
                    let days = (time.date_naive() - reference_date).num_days();
                    let mut annotation = BaselineAnnotation::temporal(days);
                    if let Some(strategy) = strategy {
                        annotation.perpendicular = strategy.perpendicular(reference, candidate);
                    }
                    report.annotated.push((candidate.clone(), annotation));
                }
                Err(err) => {
                    log::warn!("Skipping candidate without temporal baseline: {}", err);
                    report.skipped.push(err);
                }
            }
        }

        Ok(report)
    }
}

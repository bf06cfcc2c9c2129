use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::core::baseline::{BaselineCalculator, PerpendicularStrategy};
use crate::types::{Product, Stack, StackEntry, StackError, StackResult};

/// How to proceed when the requested reference cannot anchor the stack
pub enum ReferenceStrategy {
    /// No replacement is attempted; an unusable reference is an error
    FailFast,
    /// Substitute the minimum candidate under the given total ordering
    ///
    /// Callers wanting the maximum invert their comparator.
    Custom(Box<dyn Fn(&Product, &Product) -> Ordering + Send + Sync>),
}

/// Orchestrates baseline annotation, date filtering, and deterministic ordering
pub struct StackAssembler;

impl StackAssembler {
    /// Assemble an ordered baseline stack from already-fetched candidates
    ///
    /// Candidates outside the inclusive `[start, end]` window are dropped; an
    /// absent bound is unbounded on that side. The reference is not
    /// force-included when a bound excludes it. Output is sorted by temporal
    /// baseline ascending, ties broken by acquisition timestamp, so identical
    /// inputs always yield identical stacks. No I/O happens here.
    pub fn assemble(
        reference: &Product,
        candidates: &[Product],
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        strategy: ReferenceStrategy,
    ) -> StackResult<Stack> {
        Self::assemble_with(reference, candidates, start, end, strategy, None)
    }

    /// Assemble with an optional perpendicular-baseline strategy
    pub fn assemble_with(
        reference: &Product,
        candidates: &[Product],
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        strategy: ReferenceStrategy,
        perpendicular: Option<&dyn PerpendicularStrategy>,
    ) -> StackResult<Stack> {
        reference
            .start_time()
            .map_err(|_| StackError::InvalidReference {
                product_id: reference.display_id(),
                field: "startTime".to_string(),
            })?;

        let anchor = Self::resolve_anchor(reference, candidates, strategy)?;
        let report = BaselineCalculator::annotate_with(&anchor, candidates, perpendicular)?;
        if !report.skipped.is_empty() {
            log::info!(
                "Annotated {} candidates, skipped {}",
                report.annotated.len(),
                report.skipped.len()
            );
        }

        let mut keyed: Vec<(DateTime<Utc>, StackEntry)> = Vec::with_capacity(report.annotated.len());
        for (product, baseline) in report.annotated {
            let time = product.start_time()?;
            if start.is_some_and(|bound| time < bound) {
                continue;
            }
            if end.is_some_and(|bound| time > bound) {
                continue;
            }
            keyed.push((time, StackEntry { product, baseline }));
        }

        keyed.sort_by(|a, b| {
            a.1.baseline
                .temporal_days
                .cmp(&b.1.baseline.temporal_days)
                .then_with(|| a.0.cmp(&b.0))
        });

        Ok(Stack::from_entries(
            keyed.into_iter().map(|(_, entry)| entry).collect(),
        ))
    }

    /// Choose the baseline anchor: the reference itself, or a replacement
    fn resolve_anchor(
        reference: &Product,
        candidates: &[Product],
        strategy: ReferenceStrategy,
    ) -> StackResult<Product> {
        if Self::is_anchor(reference) {
            return Ok(reference.clone());
        }

        match strategy {
            ReferenceStrategy::FailFast => Err(StackError::UnresolvableReference {
                product_id: reference.display_id(),
            }),
            ReferenceStrategy::Custom(compare) => {
                let replacement = candidates
                    .iter()
                    .filter(|candidate| Self::is_anchor(candidate))
                    .min_by(|a, b| compare(a, b))
                    .ok_or_else(|| StackError::UnresolvableReference {
                        product_id: reference.display_id(),
                    })?;
                log::info!(
                    "Reference {} cannot anchor the stack, substituting {}",
                    reference.display_id(),
                    replacement.display_id()
                );
                Ok(replacement.clone())
            }
        }
    }

    /// A product can anchor a stack when it has a parseable acquisition date
    /// and a non-empty footprint
    fn is_anchor(product: &Product) -> bool {
        product.start_time().is_ok() && !product.geometry.outer_ring().is_empty()
    }
}

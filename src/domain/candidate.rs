use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::CatalogEntry;
use crate::error::PipelineError;

/// A catalog row scaled up to meet a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCandidate {
    pub entry: CatalogEntry,
    pub count_needed: u32,
    /// `count_needed × rating` in the entry's rating unit
    pub total_rating: f64,
    pub total_cost: f64,
    /// `total_cost / total_rating`, or 0 when nothing is needed
    pub unit_cost_metric: f64,
}

impl ComponentCandidate {
    /// Expand `entry` to `ceil(requirement / rating)` units.
    ///
    /// Fails when the unit count is not finite or does not fit in a `u32`.
    pub fn sized(entry: CatalogEntry, requirement: f64) -> Result<Self, PipelineError> {
        let units = (requirement.max(0.0) / entry.rating()).ceil();
        if !units.is_finite() || units > u32::MAX as f64 {
            return Err(PipelineError::calculation(format!(
                "{} units of {} needed to cover {}",
                units,
                entry.model(),
                requirement
            )));
        }
        Ok(Self::with_count(entry, units as u32))
    }

    /// A single unit, as used for inverters and charge controllers.
    pub fn single(entry: CatalogEntry) -> Self {
        Self::with_count(entry, 1)
    }

    fn with_count(entry: CatalogEntry, count_needed: u32) -> Self {
        let total_rating = count_needed as f64 * entry.rating();
        let total_cost = count_needed as f64 * entry.price();
        let unit_cost_metric = if total_rating > 0.0 {
            total_cost / total_rating
        } else {
            0.0
        };
        Self {
            entry,
            count_needed,
            total_rating,
            total_cost,
            unit_cost_metric,
        }
    }

    pub fn model(&self) -> &str {
        self.entry.model()
    }

    pub fn voltage(&self) -> f64 {
        self.entry.voltage()
    }
}

/// Stable ascending sort on the unit-cost metric, then keep the first `limit`.
/// Equal metrics keep their input (catalog) order.
pub fn rank_by_unit_cost(
    mut candidates: Vec<ComponentCandidate>,
    limit: usize,
) -> Vec<ComponentCandidate> {
    candidates.sort_by_key(|c| OrderedFloat(c.unit_cost_metric));
    candidates.truncate(limit);
    candidates
}

use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use crate::domain::{Priority, SystemConfiguration};

/// Order configurations for `priority`. Every sort is stable, so equal keys
/// keep the matcher's ascending-cost order.
///
/// `balanced` sorts ascending on the balanced score while `reliability` and
/// `efficiency` sort descending on theirs. A missing score ranks as 0.
pub fn rank_by_priority(configurations: &mut [SystemConfiguration], priority: Priority) {
    match priority {
        Priority::Cost => configurations.sort_by_key(|c| OrderedFloat(c.total_cost)),
        Priority::Reliability => configurations
            .sort_by_key(|c| Reverse(OrderedFloat(c.scores.reliability.unwrap_or(0.0)))),
        Priority::Efficiency => configurations
            .sort_by_key(|c| Reverse(OrderedFloat(c.scores.efficiency.unwrap_or(0.0)))),
        Priority::Balanced => {
            configurations.sort_by_key(|c| OrderedFloat(c.scores.balanced.unwrap_or(0.0)))
        }
    }
}

/// The `limit` configurations whose cost is nearest the budget, stable on ties.
pub fn closest_to_budget(
    configurations: &[SystemConfiguration],
    budget: f64,
    limit: usize,
) -> Vec<SystemConfiguration> {
    let mut closest = configurations.to_vec();
    closest.sort_by_key(|c| OrderedFloat((c.total_cost - budget).abs()));
    closest.truncate(limit);
    closest
}

//! Client-identity aggregation
//!
//! Resolves one value per identity field by plurality vote over the
//! per-exhibit candidates. Ties go to the value seen first, so the caller
//! must supply candidates in a deterministic order (the final exhibit
//! order). Candidates are collected after extraction settles, never from
//! inside concurrent tasks.

use demandgen_common::models::{AggregatedClientInfo, ClientField, ClientInfo};
use std::collections::HashMap;

use super::coerce::is_placeholder;

/// Most frequent value, first-seen wins ties; `None` with no candidates
pub fn resolve_plurality<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    // value -> (count, first index)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, value) in values.into_iter().enumerate() {
        let value = value.trim();
        if is_placeholder(value) {
            continue;
        }
        tally.entry(value).or_insert((0, index)).0 += 1;
    }

    tally
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.to_string())
}

/// Resolve the case identity from an ordered list of per-exhibit values
pub fn aggregate_client_info<'a>(
    candidates: impl IntoIterator<Item = &'a ClientInfo>,
) -> AggregatedClientInfo {
    let candidates: Vec<&ClientInfo> = candidates.into_iter().collect();

    let mut resolved = AggregatedClientInfo::default();
    for field in ClientField::ALL {
        let value = resolve_plurality(candidates.iter().filter_map(|c| c.get(field)));
        resolved.set(field, value);
    }

    tracing::debug!(
        candidate_count = candidates.len(),
        client_name = ?resolved.client_name,
        "Client identity aggregated"
    );

    resolved
}

/// Per-field override: a present value in `overrides` replaces the base
pub fn apply_overrides(
    mut base: AggregatedClientInfo,
    overrides: Option<&ClientInfo>,
) -> AggregatedClientInfo {
    let Some(overrides) = overrides else {
        return base;
    };

    for field in ClientField::ALL {
        if let Some(value) = overrides.get(field).filter(|v| !is_placeholder(v)) {
            base.set(field, Some(value.trim().to_string()));
        }
    }
    base
}

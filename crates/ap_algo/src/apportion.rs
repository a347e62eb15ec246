//! Huntington–Hill (equal proportions) apportionment.
//!
//! Contract:
//! - Every roster entity is seeded with exactly one seat before proportional
//!   rounds begin (the constitutional floor).
//! - Remaining seats are awarded one per round to the entity with the greatest
//!   priority `A = weight / sqrt(n*(n-1))`, where `n` is the seat count the
//!   entity would hold if awarded this round's seat (current + 1, so `n >= 2`).
//! - Exact ties go to the earlier entity in roster order: the scan replaces
//!   the leader only on a strictly greater priority.
//! - Pure integers in the decision path; priorities are compared by squaring
//!   and cross-multiplying in u128, so no square root and no float division.
//!
//! Determinism:
//! - Scans iterate in roster slice order; no RNG anywhere.
//! - The u128 comparison is exact. Only on u128 overflow (weights near 2^64
//!   with very large divisors) does the comparison fall back to f64, which is
//!   deterministic IEEE-754.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use core::cmp::Ordering;
use core::fmt;

use ap_core::{entities::EntityItem, tokens::EntityId};

/// Errors surfaced before any seat is awarded. The loop itself is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApportionError {
    /// `total_seats` cannot cover the one-seat floor for every roster entity.
    SeatsBelowFloor { total_seats: u32, entity_count: u32 },
    /// Proportional rounds remain but every weight is zero (or the roster is
    /// empty), so no entity can ever hold the greatest priority.
    ZeroTotalWeight,
    /// The roster slice lists the same entity twice.
    DuplicateEntity(EntityId),
    /// The weight map keys an entity absent from the roster.
    UnknownEntity(EntityId),
}

impl fmt::Display for ApportionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApportionError::SeatsBelowFloor { total_seats, entity_count } => write!(
                f,
                "total seats {total_seats} below one-seat floor for {entity_count} entities"
            ),
            ApportionError::ZeroTotalWeight => {
                write!(f, "no positive weight to prioritize remaining seats")
            }
            ApportionError::DuplicateEntity(id) => write!(f, "duplicate entity in roster: {id}"),
            ApportionError::UnknownEntity(id) => write!(f, "weight for unknown entity: {id}"),
        }
    }
}

/// Apportion `total_seats` among the roster by the method of equal proportions.
///
/// Inputs:
/// - `weights`: per-entity weight (e.g. census population). Entities missing
///   from the map are treated as weight 0; keys not on the roster are rejected.
/// - `entities`: canonical roster; slice order is the scan order and decides
///   exact priority ties in favor of the earlier entry.
///
/// Notes:
/// - `total_seats == entities.len()` returns the floor allocation (one seat
///   each) without running a proportional round.
/// - An empty roster with `total_seats == 0` returns an empty map.
/// - Zero-weight entities keep their floor seat and never win another: any
///   positive weight compares strictly greater in every round.
pub fn apportion_equal_proportions(
    total_seats: u32,
    weights: &BTreeMap<EntityId, u64>,
    entities: &[EntityItem],
) -> Result<BTreeMap<EntityId, u32>, ApportionError> {
    check_roster_unique(entities)?;
    check_weight_keys(weights, entities)?;

    let entity_count: u32 = entities.len().try_into().unwrap_or(u32::MAX);
    if total_seats < entity_count {
        return Err(ApportionError::SeatsBelowFloor { total_seats, entity_count });
    }

    // Seed the floor: one seat per roster entity.
    let mut alloc: BTreeMap<EntityId, u32> =
        entities.iter().map(|e| (e.entity_id.clone(), 1)).collect();

    let mut remaining = total_seats - entity_count;
    if remaining == 0 {
        return Ok(alloc);
    }

    // Sum weights (u128 accumulator) to reject the all-zero corner case up
    // front; with every priority at 0 no round could name a winner.
    let total_weight: u128 = entities
        .iter()
        .map(|e| u128::from(weight_of(weights, &e.entity_id)))
        .sum();
    if total_weight == 0 {
        return Err(ApportionError::ZeroTotalWeight);
    }

    while remaining > 0 {
        let winner = next_award(&alloc, weights, entities);
        *alloc.get_mut(&winner).expect("winner must be in alloc") += 1;
        remaining -= 1;
    }

    Ok(alloc)
}

/// Missing keys are weight 0 (the entity keeps its floor seat and wins nothing).
#[inline]
fn weight_of(weights: &BTreeMap<EntityId, u64>, id: &EntityId) -> u64 {
    *weights.get(id).unwrap_or(&0)
}

/// Argmax of equal-proportions priorities across the roster; first entity in
/// roster order wins exact ties (strict greater-than replaces the leader).
fn next_award(
    seats_so_far: &BTreeMap<EntityId, u32>,
    weights: &BTreeMap<EntityId, u64>,
    entities: &[EntityItem],
) -> EntityId {
    let mut best: Option<(&EntityId, u64, u32)> = None;

    for e in entities {
        let w = weight_of(weights, &e.entity_id);
        let s = *seats_so_far.get(&e.entity_id).unwrap_or(&1);
        let n = s + 1; // n >= 2 in every round after the floor seeding

        match best {
            None => best = Some((&e.entity_id, w, n)),
            Some((_, b_w, b_n)) => {
                if cmp_priorities(w, n, b_w, b_n) == Ordering::Greater {
                    best = Some((&e.entity_id, w, n));
                }
            }
        }
    }

    best.map(|(id, _, _)| id.clone())
        .expect("caller guarantees a non-empty roster")
}

/// Compare equal-proportions priorities `w_a / sqrt(n_a*(n_a-1))` vs
/// `w_b / sqrt(n_b*(n_b-1))` without floats: both sides are non-negative, so
/// the order is preserved by squaring and cross-multiplying in u128.
///
/// Requires `n >= 2` on both sides (divisors are then >= 2, never zero).
/// Uses checked multiplication; in the unlikely event of overflow, falls back
/// to comparing the squared priorities in f64 (deterministic but lossy).
fn cmp_priorities(w_a: u64, n_a: u32, w_b: u64, n_b: u32) -> Ordering {
    let d_a = u128::from(n_a) * u128::from(n_a - 1);
    let d_b = u128::from(n_b) * u128::from(n_b - 1);
    let sq_a = u128::from(w_a) * u128::from(w_a);
    let sq_b = u128::from(w_b) * u128::from(w_b);

    if let (Some(lhs), Some(rhs)) = (sq_a.checked_mul(d_b), sq_b.checked_mul(d_a)) {
        lhs.cmp(&rhs)
    } else {
        let lhs = (w_a as f64) * (w_a as f64) / (d_a as f64);
        let rhs = (w_b as f64) * (w_b as f64) / (d_b as f64);
        lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
    }
}

/// Reject rosters that list the same entity twice.
fn check_roster_unique(entities: &[EntityItem]) -> Result<(), ApportionError> {
    let mut seen: BTreeSet<&EntityId> = BTreeSet::new();
    for e in entities {
        if !seen.insert(&e.entity_id) {
            return Err(ApportionError::DuplicateEntity(e.entity_id.clone()));
        }
    }
    Ok(())
}

/// Reject weight maps keyed by entities absent from the roster.
fn check_weight_keys(
    weights: &BTreeMap<EntityId, u64>,
    entities: &[EntityItem],
) -> Result<(), ApportionError> {
    let allowed: BTreeSet<&EntityId> = entities.iter().map(|e| &e.entity_id).collect();
    if let Some((bad_id, _)) = weights.iter().find(|(k, _)| !allowed.contains(k)) {
        return Err(ApportionError::UnknownEntity(bad_id.clone()));
    }
    Ok(())
}

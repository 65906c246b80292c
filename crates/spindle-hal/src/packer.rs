//! Turning basis-state probabilities into keyed distributions and shot counts.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Probabilities at or below this magnitude are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Render basis index `index` of an `n`-qubit register as a key.
///
/// Position 0 is qubit 0, the most significant bit of the index. Only
/// positions in `mqubits` are kept unless it is empty.
pub fn basis_key(index: usize, n: usize, mqubits: &BTreeSet<usize>) -> String {
    (0..n)
        .filter(|pos| mqubits.is_empty() || mqubits.contains(pos))
        .map(|pos| if (index >> (n - 1 - pos)) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Aggregate a probability vector over `2^n` basis states into keyed
/// probabilities.
///
/// States with probability at or below [`EPSILON`] are dropped; states
/// sharing a key after marginalization are summed. If the kept mass misses
/// one by more than [`EPSILON`], the residual is added to the last key.
pub fn pack_probabilities(
    probabilities: &[f64],
    mqubits: &BTreeSet<usize>,
) -> BTreeMap<String, f64> {
    let mut packed = BTreeMap::new();
    if probabilities.is_empty() {
        return packed;
    }
    let n = probabilities.len().ilog2() as usize;

    let mut sum = 0.0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p.abs() > EPSILON {
            *packed.entry(basis_key(i, n, mqubits)).or_insert(0.0) += p;
            sum += p;
        }
    }
    if (1.0 - sum).abs() > EPSILON {
        if let Some((key, last)) = packed.iter_mut().next_back() {
            debug!("Adding residual {:e} to '{key}'", 1.0 - sum);
            *last += 1.0 - sum;
        }
    }
    packed
}

/// Apportion `shots` over keyed probabilities.
///
/// Each key starts from `floor(p * shots)`. Keys whose product would round
/// up then receive one extra shot each, in key order, while shots remain.
/// Anything still left is dealt round-robin over the counted keys in key
/// order, or over every key if none was counted. Keys left at zero are
/// omitted. The counts sum to `shots` whenever `probabilities` is
/// non-empty.
pub fn calc_counts(probabilities: &BTreeMap<String, f64>, shots: u32) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut round_up = Vec::new();
    let mut assigned: u64 = 0;

    for (key, &p) in probabilities {
        let val = p * f64::from(shots);
        let floor = if val > 0.0 { val as u32 } else { 0 };
        if floor > 0 {
            counts.insert(key.clone(), floor);
            assigned += u64::from(floor);
        }
        if val.round() > val {
            round_up.push(key);
        }
    }

    let mut remaining = u64::from(shots).saturating_sub(assigned);
    for key in round_up {
        if remaining == 0 {
            break;
        }
        *counts.entry(key.clone()).or_insert(0) += 1;
        remaining -= 1;
    }

    if remaining > 0 && counts.is_empty() {
        // Every key rounded down to nothing; deal over all keys instead.
        for key in probabilities.keys() {
            counts.insert(key.clone(), 0);
        }
    }
    while remaining > 0 && !counts.is_empty() {
        for count in counts.values_mut() {
            *count += 1;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
    }
    counts.retain(|_, c| *c > 0);
    counts
}

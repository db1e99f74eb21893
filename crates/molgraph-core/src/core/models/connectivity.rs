//! Proof that a sequence of residues forms one unbroken bonded path.
//!
//! Residues are joined through their `previous`/`next` links, which
//! [`Model::link_residues`](super::model::Model::link_residues) only sets after bonding the
//! designated link atoms of the two residues. Walking those links is therefore walking bonds.

use super::ids::ResidueKey;
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    /// Raised while constructing a chain from an ordered residue list.
    #[error("Broken chain: residue {residue} is not linked to the residue that follows it")]
    BrokenChain { residue: String },
    /// Raised while verifying an unordered residue set.
    #[error("Residues do not form a single connected sequence ({reached} of {total} reachable)")]
    SequenceConnectivity { reached: usize, total: usize },
}

fn residue_name(residues: &SlotMap<ResidueKey, Residue>, key: ResidueKey) -> String {
    residues
        .get(key)
        .map_or_else(|| format!("{key:?}"), |r| r.id.clone())
}

/// Checks that `order` lists residues exactly as their links chain them together.
///
/// Every residue must appear once, and each residue's `next` must be the residue after it
/// (with the matching `previous` on the other side). The ends must not link back into the
/// list, so a ring is rejected. An empty list always passes.
///
/// # Errors
///
/// Returns [`ConnectivityError::BrokenChain`] naming the first residue whose link is missing,
/// the first residue that is listed twice, or the last residue of a ring.
pub fn validate_chain(
    residues: &SlotMap<ResidueKey, Residue>,
    order: &[ResidueKey],
) -> Result<(), ConnectivityError> {
    let mut seen = HashSet::with_capacity(order.len());
    for &key in order {
        if !residues.contains_key(key) || !seen.insert(key) {
            return Err(ConnectivityError::BrokenChain {
                residue: residue_name(residues, key),
            });
        }
    }

    for pair in order.windows(2) {
        let (up, down) = (pair[0], pair[1]);
        let linked = residues[up].next == Some(down) && residues[down].previous == Some(up);
        if !linked {
            return Err(ConnectivityError::BrokenChain {
                residue: residue_name(residues, up),
            });
        }
    }

    if let (Some(&first), Some(&last)) = (order.first(), order.last()) {
        let inside = |link: Option<ResidueKey>| link.is_some_and(|k| seen.contains(&k));
        if inside(residues[first].previous) || inside(residues[last].next) {
            return Err(ConnectivityError::BrokenChain {
                residue: residue_name(residues, last),
            });
        }
    }
    Ok(())
}

/// Verifies that an unordered set of residues is one linear path and returns it in order.
///
/// Starting from any candidate, the walk follows `previous` links back to the first residue of
/// the set, then `next` links forward. Links that leave the candidate set end the walk, so no
/// outside residue can act as an intermediate. The path must visit every candidate exactly once
/// and must not close into a ring. An empty set passes trivially.
///
/// # Errors
///
/// Returns [`ConnectivityError::SequenceConnectivity`] for gaps, disconnected subsets, rings or
/// keys that are not present in `residues`.
pub fn verify_sequence(
    residues: &SlotMap<ResidueKey, Residue>,
    candidates: &[ResidueKey],
) -> Result<Vec<ResidueKey>, ConnectivityError> {
    let members: HashSet<ResidueKey> = candidates.iter().copied().collect();
    let Some(&origin) = candidates.first() else {
        return Ok(Vec::new());
    };
    let failure = |reached: usize| ConnectivityError::SequenceConnectivity {
        reached,
        total: members.len(),
    };
    if members.iter().any(|&key| !residues.contains_key(key)) {
        return Err(failure(0));
    }

    let mut start = origin;
    while let Some(previous) = residues[start].previous.filter(|k| members.contains(k)) {
        if previous == origin {
            return Err(failure(members.len()));
        }
        start = previous;
    }

    let mut ordered = vec![start];
    let mut visited = HashSet::from([start]);
    let mut current = start;
    while let Some(next) = residues[current].next.filter(|k| members.contains(k)) {
        if !visited.insert(next) || residues[next].previous != Some(current) {
            return Err(failure(visited.len()));
        }
        ordered.push(next);
        current = next;
    }

    if visited.len() != members.len() {
        return Err(failure(visited.len()));
    }
    Ok(ordered)
}

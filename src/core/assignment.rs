use crate::domain::model::{Assignment, Participant};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::find_duplicate;
use rand::seq::SliceRandom;
use rand::Rng;

pub const MIN_PARTICIPANTS: usize = 3;

/// Draws a Secret Santa cycle using the thread-local RNG.
pub fn assign(participants: &[Participant]) -> Result<Vec<Assignment>> {
    assign_with_rng(participants, &mut rand::rng())
}

/// Shuffles a copy of `participants` and links each entry to the next one,
/// wrapping the last back to the first.
///
/// The result is always a single cycle through everyone, so nobody draws
/// themselves and everyone gives and receives exactly once. Only the (n-1)!
/// single-cycle derangements are reachable, not every derangement.
pub fn assign_with_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
) -> Result<Vec<Assignment>> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(SantaError::invalid_input(format!(
            "at least {} participants are required, got {}",
            MIN_PARTICIPANTS,
            participants.len()
        )));
    }

    if let Some(name) = find_duplicate(participants.iter().map(|p| p.name.as_str())) {
        return Err(SantaError::invalid_input(format!(
            "participant name '{}' appears more than once",
            name
        )));
    }

    let mut order = participants.to_vec();
    order.shuffle(rng);

    let n = order.len();
    let assignments = (0..n)
        .map(|i| Assignment {
            gifter: order[i].clone(),
            giftee: order[(i + 1) % n].clone(),
        })
        .collect();

    Ok(assignments)
}

//! Constraint solver for board contents.
//!
//! Hexes are filled strictly in topology order, so when hex `i` is visited
//! only its neighbors with a lower index already hold tiles. A dead end is
//! never repaired locally: the whole attempt is thrown away and both pools
//! are reshuffled.

use crate::board::{probability_weight, Board, NumberToken, Resource, TilePool, LOW_PROBABILITY_WEIGHT};
use crate::config::{GenerationSettings, SolverConfig};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, error, trace};

/// Solver failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("no valid board found after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// Why an attempt was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeadEnd {
    NoResource { hex: usize },
    NoNumber { hex: usize },
    ScarceOnCommonNumber { hex: usize },
    InvalidBoard,
}

/// Generate a board with the thread-local RNG and default tuning
pub fn generate_board(settings: &GenerationSettings) -> Result<Board, SolverError> {
    let mut rng = rand::thread_rng();
    solve(settings, &SolverConfig::default(), &mut rng)
}

/// Assign a resource to every hex and a number to every non-desert hex.
///
/// Restarts from fresh shuffles until an attempt succeeds or
/// `config.max_attempts` is reached.
pub fn solve<R: Rng + ?Sized>(
    settings: &GenerationSettings,
    config: &SolverConfig,
    rng: &mut R,
) -> Result<Board, SolverError> {
    let settings = settings.normalized();

    for attempt in 1..=config.max_attempts {
        match try_solve(&settings, rng) {
            Ok(board) => {
                debug!(
                    players = settings.player_count.get(),
                    attempts = attempt,
                    "Board generated"
                );
                return Ok(board);
            }
            Err(reason) => {
                trace!(attempt, ?reason, "Restarting board generation");
            }
        }
    }

    error!(
        attempts = config.max_attempts,
        ?settings,
        "Board generation gave up"
    );
    Err(SolverError::AttemptsExhausted {
        attempts: config.max_attempts,
    })
}

/// One forward pass over the topology with freshly shuffled pools
fn try_solve<R: Rng + ?Sized>(settings: &GenerationSettings, rng: &mut R) -> Result<Board, DeadEnd> {
    let size = settings.board_size();
    let mut pool = TilePool::for_player_count(settings.player_count);
    pool.shuffle(rng);

    let mut assigned: Vec<(Resource, Option<NumberToken>)> = Vec::with_capacity(size.hex_count());

    for (hex, entry) in size.hexes().iter().enumerate() {
        let earlier: Vec<(Resource, Option<NumberToken>)> = entry
            .adjacent
            .iter()
            .filter(|&&j| j < hex)
            .filter_map(|&j| assigned.get(j).copied())
            .collect();

        let resource_pos = pool
            .resources
            .iter()
            .position(|r| settings.resources_may_touch() || earlier.iter().all(|(n, _)| n != r))
            .ok_or(DeadEnd::NoResource { hex })?;
        let resource = pool.resources[resource_pos];

        let number = if resource.is_desert() {
            None
        } else {
            let number_pos = pick_number(settings, resource, &pool.numbers, &earlier, hex)?;
            Some(pool.numbers.remove(number_pos))
        };

        pool.resources.remove(resource_pos);
        assigned.push((resource, number));
    }

    Board::from_contents(size, &assigned).map_err(|_| DeadEnd::InvalidBoard)
}

/// Index into `numbers` of the token to place on a hex holding `resource`
fn pick_number(
    settings: &GenerationSettings,
    resource: Resource,
    numbers: &[NumberToken],
    earlier: &[(Resource, Option<NumberToken>)],
    hex: usize,
) -> Result<usize, DeadEnd> {
    let candidates: Vec<usize> = numbers
        .iter()
        .enumerate()
        .filter(|&(_, &n)| settings.numbers_may_touch() || earlier.iter().all(|&(_, m)| m != Some(n)))
        .map(|(i, _)| i)
        .collect();

    let mut pick = *candidates.first().ok_or(DeadEnd::NoNumber { hex })?;

    if settings.scarce_resource == Some(resource) {
        // min_by_key keeps the first of equal weights
        let lowest = candidates
            .iter()
            .copied()
            .min_by_key(|&i| probability_weight(numbers[i]))
            .unwrap_or(pick);
        let pick_weight = probability_weight(numbers[pick]);
        let lowest_weight = probability_weight(numbers[lowest]);

        if lowest_weight > LOW_PROBABILITY_WEIGHT && pick_weight > LOW_PROBABILITY_WEIGHT {
            return Err(DeadEnd::ScarceOnCommonNumber { hex });
        }
        if lowest_weight < pick_weight {
            pick = lowest;
        }
    }

    Ok(pick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerCount;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_number_prefers_first_candidate() {
        let settings = GenerationSettings::default();
        let numbers = [8, 2, 5];
        assert_eq!(pick_number(&settings, Resource::Ore, &numbers, &[], 0), Ok(0));
    }

    #[test]
    fn test_pick_number_skips_neighbor_numbers() {
        let settings = GenerationSettings::new(PlayerCount::Four, false, true, None);
        let numbers = [8, 2, 5];
        let earlier = [(Resource::Wood, Some(8)), (Resource::Desert, None)];
        assert_eq!(pick_number(&settings, Resource::Ore, &numbers, &earlier, 3), Ok(1));

        let earlier = [(Resource::Wood, Some(8)), (Resource::Hay, Some(2)), (Resource::Sheep, Some(5))];
        assert_eq!(
            pick_number(&settings, Resource::Ore, &numbers, &earlier, 3),
            Err(DeadEnd::NoNumber { hex: 3 })
        );
    }

    #[test]
    fn test_scarce_resource_swaps_to_lowest_weight() {
        let settings = GenerationSettings::new(PlayerCount::Four, false, false, Some(Resource::Ore));
        let numbers = [8, 3, 12, 2];
        // 12 and 2 share the lowest weight; the first one wins
        assert_eq!(pick_number(&settings, Resource::Ore, &numbers, &[], 0), Ok(2));
        // Other resources are untouched by the bias
        assert_eq!(pick_number(&settings, Resource::Wood, &numbers, &[], 0), Ok(0));
    }

    #[test]
    fn test_scarce_resource_restarts_without_low_numbers() {
        let settings = GenerationSettings::new(PlayerCount::Four, false, false, Some(Resource::Ore));
        let numbers = [8, 5, 10];
        assert_eq!(
            pick_number(&settings, Resource::Ore, &numbers, &[], 4),
            Err(DeadEnd::ScarceOnCommonNumber { hex: 4 })
        );
    }

    #[test]
    fn test_scarce_swap_respects_number_adjacency() {
        let settings = GenerationSettings::new(PlayerCount::Four, false, true, Some(Resource::Ore));
        let numbers = [9, 2, 3];
        let earlier = [(Resource::Wood, Some(2))];
        assert_eq!(pick_number(&settings, Resource::Ore, &numbers, &earlier, 1), Ok(2));
    }

    #[test]
    fn test_solve_is_deterministic_for_a_seed() {
        let settings = GenerationSettings::new(PlayerCount::Five, true, true, Some(Resource::Brick));
        let config = SolverConfig::default();
        let a = solve(&settings, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = solve(&settings, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_attempts_is_exhausted() {
        let config = SolverConfig { max_attempts: 0 };
        let result = solve(&GenerationSettings::default(), &config, &mut StdRng::seed_from_u64(1));
        assert_eq!(result, Err(SolverError::AttemptsExhausted { attempts: 0 }));
    }

    #[test]
    fn test_generate_board_uses_thread_rng() {
        let board = generate_board(&GenerationSettings::default()).unwrap();
        assert_eq!(board.hexes().len(), 19);
    }
}

//! Population operators: initialization, tournament selection, uniform
//! crossover, mutation and elitism.
//!
//! Every operator draws from an injected generator so seeded runs replay
//! exactly. Operators always build new, owned arrangements.

use crate::config::{CROSSOVER_PROBABILITY, INITIAL_ROTATION_PROBABILITY};
use crate::room::{Arrangement, CatalogItem, PlaceableItem, RoomBounds};
use rand::Rng;
use rand::seq::index;

/// Draw a uniformly random position that keeps the item inside the room at
/// its current orientation
fn place_randomly<R: Rng + ?Sized>(item: &mut PlaceableItem, room: &RoomBounds, rng: &mut R) {
    let (max_x, max_y) = item.max_position(room);
    let x = rng.gen_range(0.0..=max_x);
    let y = rng.gen_range(0.0..=max_y);
    item.set_position(x, y);
}

/// One random arrangement of the whole catalog
pub fn random_arrangement<R: Rng + ?Sized>(catalog: &[CatalogItem], room: &RoomBounds, rng: &mut R) -> Arrangement {
    let items = catalog
        .iter()
        .map(|entry| {
            let mut item = PlaceableItem::from_catalog(entry);
            if rng.gen_bool(INITIAL_ROTATION_PROBABILITY) {
                item.rotate();
            }
            place_randomly(&mut item, room, rng);
            item
        })
        .collect();
    Arrangement::new(items)
}

/// Initial population of `size` independent random arrangements
pub fn initialize_population<R: Rng + ?Sized>(
    catalog: &[CatalogItem],
    room: &RoomBounds,
    size: usize,
    rng: &mut R,
) -> Vec<Arrangement> {
    (0..size).map(|_| random_arrangement(catalog, room, rng)).collect()
}

/// Index of the fittest among `tournament_size` distinct, uniformly sampled
/// members. Ties go to the first sampled contender.
pub fn tournament_select<R: Rng + ?Sized>(fitness: &[f64], tournament_size: usize, rng: &mut R) -> usize {
    let contenders = index::sample(rng, fitness.len(), tournament_size);
    let mut winner: Option<usize> = None;
    for candidate in contenders.iter() {
        match winner {
            Some(best) if fitness[candidate] <= fitness[best] => {}
            _ => winner = Some(candidate),
        }
    }
    winner.unwrap_or(0)
}

/// Two independent tournaments; both may return the same member
pub fn select_parents<R: Rng + ?Sized>(fitness: &[f64], tournament_size: usize, rng: &mut R) -> (usize, usize) {
    let first = tournament_select(fitness, tournament_size, rng);
    let second = tournament_select(fitness, tournament_size, rng);
    (first, second)
}

/// Uniform crossover: each slot comes from `parent_a` or `parent_b` with equal odds
pub fn crossover<R: Rng + ?Sized>(parent_a: &Arrangement, parent_b: &Arrangement, rng: &mut R) -> Arrangement {
    debug_assert_eq!(parent_a.len(), parent_b.len(), "parents must be index-aligned");
    let items = parent_a
        .iter()
        .zip(parent_b.iter())
        .map(|(a, b)| {
            if rng.gen_bool(CROSSOVER_PROBABILITY) {
                a.clone()
            } else {
                b.clone()
            }
        })
        .collect();
    Arrangement::new(items)
}

/// Per item, independently: maybe redraw the position for the current
/// orientation, then maybe rotate once.
pub fn mutate<R: Rng + ?Sized>(arrangement: &mut Arrangement, room: &RoomBounds, mutation_rate: f64, rng: &mut R) {
    for item in arrangement.items.iter_mut() {
        if rng.gen_bool(mutation_rate) {
            place_randomly(item, room, rng);
        }
        if rng.gen_bool(mutation_rate) {
            item.rotate();
        }
    }
}

/// Indices of the `count` fittest members, best first. The sort is stable,
/// so equal scores keep population order.
pub fn elite_indices(fitness: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
    order.truncate(count);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Orientation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("Sofa", 0.9, 2.2),
            CatalogItem::new("Bed", 1.5, 2.0),
            CatalogItem::new("Chair", 0.5, 0.5),
        ]
    }

    fn inside(item: &PlaceableItem, room: &RoomBounds) -> bool {
        let rect = item.footprint();
        rect.x_min >= 0.0 && rect.y_min >= 0.0 && rect.x_max <= room.length + 1e-9 && rect.y_max <= room.width + 1e-9
    }

    #[test]
    fn initialized_items_stay_in_the_room() {
        let mut rng = StdRng::seed_from_u64(7);
        let room = RoomBounds::new(5.0, 4.0);
        let population = initialize_population(&catalog(), &room, 40, &mut rng);
        assert_eq!(population.len(), 40);
        for arrangement in &population {
            assert_eq!(arrangement.len(), 3);
            for (item, entry) in arrangement.iter().zip(catalog()) {
                assert_eq!(item.name, entry.name);
                assert!(matches!(item.orientation, Orientation::Deg0 | Orientation::Deg90));
                assert!(inside(item, &room));
            }
        }
    }

    #[test]
    fn tournament_over_whole_population_picks_the_best() {
        let mut rng = StdRng::seed_from_u64(1);
        let fitness = [3.0, 9.0, 1.0, 4.0];
        for _ in 0..20 {
            assert_eq!(tournament_select(&fitness, 4, &mut rng), 1);
        }
    }

    #[test]
    fn tournament_never_picks_the_worst_with_two_contenders() {
        let mut rng = StdRng::seed_from_u64(2);
        let fitness = [5.0, 0.5, 7.0];
        for _ in 0..50 {
            assert_ne!(tournament_select(&fitness, 2, &mut rng), 1);
        }
    }

    #[test]
    fn crossover_copies_slots_from_either_parent() {
        let mut rng = StdRng::seed_from_u64(3);
        let room = RoomBounds::new(5.0, 4.0);
        let a = random_arrangement(&catalog(), &room, &mut rng);
        let b = random_arrangement(&catalog(), &room, &mut rng);
        for _ in 0..10 {
            let child = crossover(&a, &b, &mut rng);
            assert_eq!(child.len(), a.len());
            for (i, item) in child.iter().enumerate() {
                assert!(*item == a.items[i] || *item == b.items[i]);
            }
        }
    }

    #[test]
    fn zero_rate_mutation_is_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        let room = RoomBounds::new(5.0, 4.0);
        let original = random_arrangement(&catalog(), &room, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, &room, 0.0, &mut rng);
        assert_eq!(mutated, original);
    }

    #[test]
    fn full_rate_mutation_moves_and_rotates_every_item() {
        let mut rng = StdRng::seed_from_u64(5);
        let room = RoomBounds::new(5.0, 4.0);
        let original = random_arrangement(&catalog(), &room, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, &room, 1.0, &mut rng);
        for (before, after) in original.iter().zip(mutated.iter()) {
            assert_eq!(after.orientation, before.orientation.rotated());
            assert_ne!((after.x, after.y), (before.x, before.y));
        }
    }

    #[test]
    fn elites_are_stable_on_ties() {
        let fitness = [2.0, 5.0, 5.0, 1.0, 5.0];
        assert_eq!(elite_indices(&fitness, 3), vec![1, 2, 4]);
        assert_eq!(elite_indices(&fitness, 0), Vec::<usize>::new());
        assert_eq!(elite_indices(&fitness, 5), vec![1, 2, 4, 0, 3]);
    }
}

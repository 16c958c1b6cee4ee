use rand::SeedableRng;
use rand::rngs::StdRng;
use room_layout_evo::fitness::count_item_overlaps;
use room_layout_evo::population::random_arrangement;
use room_layout_evo::{
    CatalogItem, FitnessEvaluator, FitnessModel, GaParams, LayoutError, LayoutProblem, Obstacle, Optimizer, RoomBounds,
    StopReason,
};

fn bedroom() -> LayoutProblem {
    LayoutProblem::new(
        RoomBounds::new(5.0, 4.0),
        vec![Obstacle::new("Door", 2.0, 0.0, 0.9, 0.2)],
        vec![CatalogItem::new("Sofa", 0.9, 2.2), CatalogItem::new("Bed", 1.5, 2.0)],
    )
}

fn params(generations: usize) -> GaParams {
    GaParams {
        population_size: 50,
        generations,
        ..GaParams::default()
    }
}

/// A full run on a small bedroom should separate the bed from the sofa
#[test]
fn test_bedroom_run_finds_overlap_free_layout() {
    let optimizer = Optimizer::new(bedroom(), params(200)).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let result = optimizer.run(&mut rng);

    assert_eq!(result.stop_reason, StopReason::Completed);
    assert_eq!(result.generations_run, 200);
    assert_eq!(result.history.len(), 200);
    assert_eq!(result.best.len(), 2);
    assert!(result.fitness > 0.0);
    assert_eq!(count_item_overlaps(&result.best), 0);
    assert_eq!(result.history.last().copied(), Some(result.fitness));
    assert_eq!(optimizer.evaluator().evaluate(&result.best), result.fitness);
}

#[test]
fn test_history_never_decreases() {
    let optimizer = Optimizer::new(bedroom(), params(60)).unwrap();
    let result = optimizer.run(&mut StdRng::seed_from_u64(3));
    assert!(result.history.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let optimizer = Optimizer::new(bedroom(), params(40)).unwrap();

    let mut first = optimizer.start(StdRng::seed_from_u64(11));
    let mut second = optimizer.start(StdRng::seed_from_u64(11));
    while !first.is_finished() {
        first.advance_generation();
        second.advance_generation();
        assert_eq!(first.population(), second.population());
        assert_eq!(first.history(), second.history());
    }
    assert!(second.is_finished());

    let a = first.into_result();
    let b = second.into_result();
    assert_eq!(a, b);
}

#[test]
fn test_observer_sees_every_generation() {
    let optimizer = Optimizer::new(bedroom(), params(25)).unwrap();
    let mut reports = Vec::new();
    let result = optimizer.run_with_observer(&mut StdRng::seed_from_u64(5), |report| reports.push(*report));

    assert_eq!(reports.len(), 25);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.generation, i);
        assert!(report.generation_best <= report.best_ever);
        assert_eq!(report.best_ever, result.history[i]);
    }
}

#[test]
fn test_raised_cancel_flag_stops_before_first_evaluation() {
    let optimizer = Optimizer::new(bedroom(), params(50)).unwrap();
    let flag = optimizer.cancel_handle();
    flag.store(true, std::sync::atomic::Ordering::Relaxed);

    let result = optimizer.run(&mut StdRng::seed_from_u64(1));
    assert!(result.cancelled());
    assert!(result.history.is_empty());
    assert_eq!(result.generations_run, 0);
}

#[test]
fn test_random_arrangements_score_non_negative() {
    let problem = bedroom();
    let evaluator = FitnessEvaluator::new(problem.room, problem.obstacles.clone(), FitnessModel::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let arrangement = random_arrangement(&problem.catalog, &problem.room, &mut rng);
        let score = evaluator.evaluate(&arrangement);
        assert!(score >= 0.0);
        assert!(score.is_finite());
    }
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let too_many_elites = GaParams {
        population_size: 4,
        elitism_count: 5,
        tournament_size: 2,
        ..GaParams::default()
    };
    assert!(matches!(
        Optimizer::new(bedroom(), too_many_elites),
        Err(LayoutError::ElitismTooLarge { .. })
    ));

    assert!(matches!(
        Optimizer::new(bedroom(), params(0)),
        Err(LayoutError::NoGenerations)
    ));

    let mut problem = bedroom();
    problem.catalog.push(CatalogItem::new("Wardrobe", 0.6, 4.5));
    assert!(matches!(
        Optimizer::new(problem, params(10)),
        Err(LayoutError::ItemDoesNotFit { .. })
    ));
}

#[test]
fn test_empty_catalog_returns_empty_layout() {
    let problem = LayoutProblem::new(RoomBounds::new(3.0, 3.0), Vec::new(), Vec::new());
    let result = Optimizer::new(problem, params(10)).unwrap().run(&mut StdRng::seed_from_u64(0));
    assert_eq!(result.stop_reason, StopReason::EmptyCatalog);
    assert!(result.best.is_empty());
    assert_eq!(result.fitness, 0.0);
    assert!(result.history.is_empty());
}

//! Generational loop with elitism and best-ever tracking.

use crate::config::{FitnessModel, GaParams, PROGRESS_LOG_INTERVAL};
use crate::error::{LayoutError, Result};
use crate::fitness::FitnessEvaluator;
use crate::population::{crossover, elite_indices, initialize_population, mutate, select_parents};
use crate::room::{Arrangement, LayoutProblem};
use bevy::log::{debug, info};
use rand::Rng;
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where an [`Evolution`] currently is in its generational loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Evaluating,
    Breeding,
    Terminated,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every configured generation was evaluated
    Completed,
    /// The cancel flag was raised at a generation boundary
    Cancelled,
    /// The best-ever fitness stopped improving for `stall_generations`
    Stalled,
    /// Nothing to place
    EmptyCatalog,
}

/// Snapshot published after each evaluated generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    /// Zero-based index of the generation just evaluated
    pub generation: usize,
    /// Highest score within this generation
    pub generation_best: f64,
    /// Highest score seen so far
    pub best_ever: f64,
}

/// What a finished run hands to rendering and persistence
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub best: Arrangement,
    pub fitness: f64,
    /// Best-ever fitness after each generation, non-decreasing
    pub history: Vec<f64>,
    pub generations_run: usize,
    pub stop_reason: StopReason,
}

impl OptimizationResult {
    pub fn cancelled(&self) -> bool {
        self.stop_reason == StopReason::Cancelled
    }
}

/// A validated problem plus GA parameters, ready to run
#[derive(Debug, Clone)]
pub struct Optimizer {
    problem: LayoutProblem,
    params: GaParams,
    evaluator: FitnessEvaluator,
    cancel: Arc<AtomicBool>,
}

impl Optimizer {
    pub fn new(problem: LayoutProblem, params: GaParams) -> Result<Self> {
        Self::with_model(problem, params, FitnessModel::default())
    }

    /// Validate everything up front so no run starts on a bad configuration
    pub fn with_model(problem: LayoutProblem, params: GaParams, model: FitnessModel) -> Result<Self> {
        validate_params(&params)?;
        problem.validate()?;
        let evaluator = FitnessEvaluator::new(problem.room, problem.obstacles.clone(), model)?;
        Ok(Self {
            problem,
            params,
            evaluator,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Share an externally owned cancel flag
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn problem(&self) -> &LayoutProblem {
        &self.problem
    }

    pub fn params(&self) -> &GaParams {
        &self.params
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// A steppable run driven by `rng`
    pub fn start<R: Rng>(&self, rng: R) -> Evolution<R> {
        Evolution::new(self.clone(), rng)
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> OptimizationResult {
        self.run_with_observer(rng, |_| {})
    }

    /// Run to termination, calling `observer` after every evaluated generation
    pub fn run_with_observer<R, F>(&self, rng: &mut R, mut observer: F) -> OptimizationResult
    where
        R: Rng + ?Sized,
        F: FnMut(&GenerationReport),
    {
        let mut evolution = self.start(rng);
        while !evolution.is_finished() {
            if let Some(report) = evolution.advance_generation() {
                observer(&report);
            }
        }
        evolution.into_result()
    }
}

fn validate_params(params: &GaParams) -> Result<()> {
    if params.population_size == 0 {
        return Err(LayoutError::EmptyPopulation);
    }
    if params.generations == 0 {
        return Err(LayoutError::NoGenerations);
    }
    if params.elitism_count > params.population_size {
        return Err(LayoutError::ElitismTooLarge {
            elitism_count: params.elitism_count,
            population_size: params.population_size,
        });
    }
    if params.tournament_size == 0 || params.tournament_size > params.population_size {
        return Err(LayoutError::InvalidTournamentSize {
            tournament_size: params.tournament_size,
            population_size: params.population_size,
        });
    }
    if !(0.0..=1.0).contains(&params.mutation_rate) {
        return Err(LayoutError::InvalidMutationRate(params.mutation_rate));
    }
    Ok(())
}

/// One optimization run as a state machine.
///
/// `step` advances a single phase; `advance_generation` runs to the next
/// generation boundary. The population is replaced wholesale on every
/// breeding pass and the best-ever arrangement is kept as its own copy.
pub struct Evolution<R> {
    optimizer: Optimizer,
    rng: R,
    phase: Phase,
    population: Vec<Arrangement>,
    fitness: Vec<f64>,
    best: Option<Arrangement>,
    best_fitness: f64,
    history: Vec<f64>,
    generation: usize,
    stalled_for: usize,
    stop_reason: Option<StopReason>,
    last_report: Option<GenerationReport>,
}

impl<R: Rng> Evolution<R> {
    pub fn new(optimizer: Optimizer, rng: R) -> Self {
        Self {
            optimizer,
            rng,
            phase: Phase::Initializing,
            population: Vec::new(),
            fitness: Vec::new(),
            best: None,
            best_fitness: f64::NEG_INFINITY,
            history: Vec::new(),
            generation: 0,
            stalled_for: 0,
            stop_reason: None,
            last_report: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Terminated
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Number of generations evaluated so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Arrangement] {
        &self.population
    }

    /// Scores of the current population; empty until it has been evaluated
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn best(&self) -> Option<&Arrangement> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|_| self.best_fitness)
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn last_report(&self) -> Option<GenerationReport> {
        self.last_report
    }

    pub fn optimizer(&self) -> &Optimizer {
        &self.optimizer
    }

    /// Stop immediately; the best-ever arrangement so far is kept
    pub fn cancel(&mut self) {
        if self.phase != Phase::Terminated {
            self.terminate(StopReason::Cancelled);
        }
    }

    /// Advance a single phase and return the phase entered
    pub fn step(&mut self) -> Phase {
        match self.phase {
            Phase::Initializing => self.initialize(),
            Phase::Evaluating => self.evaluate(),
            Phase::Breeding => self.breed(),
            Phase::Terminated => {}
        }
        self.phase
    }

    /// Run until one more generation has been evaluated and its successor bred
    /// (or the run ends). Returns the report of the evaluated generation.
    pub fn advance_generation(&mut self) -> Option<GenerationReport> {
        let start = self.generation;
        while self.phase != Phase::Terminated {
            self.step();
            if self.generation > start && self.phase != Phase::Breeding {
                break;
            }
        }
        if self.generation > start { self.last_report } else { None }
    }

    /// Finish the run (cancelling it if still in progress) and hand back the result
    pub fn into_result(mut self) -> OptimizationResult {
        self.cancel();
        self.result()
    }

    /// Result as of now, without consuming the run
    pub fn result(&self) -> OptimizationResult {
        let fitness = if self.best.is_some() { self.best_fitness } else { 0.0 };
        OptimizationResult {
            best: self.best.clone().unwrap_or_default(),
            fitness,
            history: self.history.clone(),
            generations_run: self.generation,
            stop_reason: self.stop_reason.unwrap_or(StopReason::Cancelled),
        }
    }

    fn terminate(&mut self, reason: StopReason) {
        self.phase = Phase::Terminated;
        self.stop_reason = Some(reason);
        match reason {
            StopReason::Completed | StopReason::Stalled => info!(
                "Optimization complete after {} generations ({:?}). Best fitness: {:.2}",
                self.generation, reason, self.best_fitness
            ),
            StopReason::Cancelled => info!("Optimization cancelled after {} generations", self.generation),
            StopReason::EmptyCatalog => info!("Empty catalog, nothing to optimize"),
        }
    }

    fn initialize(&mut self) {
        let problem = &self.optimizer.problem;
        if problem.catalog.is_empty() {
            self.best = Some(Arrangement::default());
            self.best_fitness = 0.0;
            self.terminate(StopReason::EmptyCatalog);
            return;
        }

        let params = &self.optimizer.params;
        info!(
            "Starting optimization: {} items, {} obstacles, population {}, {} generations",
            problem.catalog.len(),
            problem.obstacles.len(),
            params.population_size,
            params.generations
        );
        self.population = initialize_population(&problem.catalog, &problem.room, params.population_size, &mut self.rng);
        self.fitness.clear();
        self.best = None;
        self.best_fitness = f64::NEG_INFINITY;
        self.history.clear();
        self.generation = 0;
        self.stalled_for = 0;
        self.phase = Phase::Evaluating;
    }

    fn evaluate(&mut self) {
        if self.optimizer.cancel.load(Ordering::Relaxed) {
            self.terminate(StopReason::Cancelled);
            return;
        }

        let evaluator = &self.optimizer.evaluator;
        // collect() keeps slot order, so tie-breaks below do not depend on scheduling
        self.fitness = self.population.par_iter().map(|a| evaluator.evaluate(a)).collect();

        let mut leader = 0;
        for (i, &score) in self.fitness.iter().enumerate() {
            if score > self.fitness[leader] {
                leader = i;
            }
        }
        let generation_best = self.fitness[leader];

        if generation_best > self.best_fitness {
            debug!(
                "Generation {}: best fitness improved {:.2} -> {:.2}",
                self.generation, self.best_fitness, generation_best
            );
            self.best = Some(self.population[leader].clone());
            self.best_fitness = generation_best;
            self.stalled_for = 0;
        } else {
            self.stalled_for += 1;
        }
        self.history.push(self.best_fitness);

        self.last_report = Some(GenerationReport {
            generation: self.generation,
            generation_best,
            best_ever: self.best_fitness,
        });
        if self.generation % PROGRESS_LOG_INTERVAL == 0 {
            debug!("Generation {}, Best Fitness: {:.2}", self.generation, self.best_fitness);
        }
        self.generation += 1;

        let params = &self.optimizer.params;
        if self.generation >= params.generations {
            self.terminate(StopReason::Completed);
        } else if params.stall_generations.is_some_and(|limit| limit > 0 && self.stalled_for >= limit) {
            self.terminate(StopReason::Stalled);
        } else {
            self.phase = Phase::Breeding;
        }
    }

    fn breed(&mut self) {
        let params = self.optimizer.params;
        let room = self.optimizer.problem.room;

        let mut next = Vec::with_capacity(params.population_size);
        for index in elite_indices(&self.fitness, params.elitism_count) {
            next.push(self.population[index].clone());
        }

        while next.len() < params.population_size {
            let (a, b) = select_parents(&self.fitness, params.tournament_size, &mut self.rng);
            let mut child = crossover(&self.population[a], &self.population[b], &mut self.rng);
            mutate(&mut child, &room, params.mutation_rate, &mut self.rng);
            next.push(child);
        }

        self.population = next;
        self.fitness.clear();
        self.phase = Phase::Evaluating;
    }
}

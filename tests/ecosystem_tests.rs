#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use geo::Point;
use smart_eaters::simulation::darwin::{Genome, Population};
use smart_eaters::simulation::ecosystem::Ecosystem;
use smart_eaters::simulation::error::Error;
use smart_eaters::simulation::params::Params;

fn create_test_params() -> Params {
    Params {
        population_size: 10,
        food_count: 20,
        ticks_per_gen: 5,
        box_width: 800.0,
        box_height: 600.0,
        seed: Some(42),
        ..Params::default()
    }
}

/// Population with fixed genes. All-zero genes make every network output zero,
/// so eaters never turn.
#[derive(Debug, Clone)]
struct StillPopulation {
    genomes: Vec<Genome>,
    matings: usize,
}

impl StillPopulation {
    fn new(params: &Params) -> Self {
        Self::with_genes(params, &vec![0.0; params.genome_length()])
    }

    fn with_genes(params: &Params, genes: &[f32]) -> Self {
        Self {
            genomes: (0..params.population_size)
                .map(|_| Genome::new(genes.to_vec()))
                .collect(),
            matings: 0,
        }
    }
}

// Gene offsets for the default [4, 6, 2] topology: layer 0 weights are 6 x 4
// row-major at 0..24, layer 1 weights are 2 x 6 at 30..42, output biases at 42..44.
const HIDDEN0_FROM_LOOKAT_Y: usize = 1;
const HIDDEN0_FROM_FOOD_Y: usize = 3;
const TURN_LEFT_FROM_HIDDEN0: usize = 30;
const TURN_LEFT_BIAS: usize = 42;
const TURN_RIGHT_BIAS: usize = 43;

fn steered_ecosystem(genes: &[f32], heading: f32, food: Point<f32>) -> Ecosystem<StillPopulation> {
    let params = single_eater_params();
    assert_eq!(genes.len(), params.genome_length());
    let population = StillPopulation::with_genes(&params, genes);
    let mut ecosystem = Ecosystem::with_population(&params, population).unwrap();

    ecosystem.eaters_mut()[0].pos = Point::new(400.0, 300.0);
    ecosystem.eaters_mut()[0].set_heading(heading);
    ecosystem.food_mut()[0].pos = food;
    ecosystem
}

impl Population for StillPopulation {
    fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    fn mate(&mut self) {
        self.matings += 1;
        self.genomes = self
            .genomes
            .iter()
            .map(|g| Genome::new(g.genes().to_vec()))
            .collect();
    }

    fn add_fitness(&mut self, index: usize, amount: f32) {
        self.genomes[index].add_fitness(amount);
    }
}

fn single_eater_params() -> Params {
    Params {
        population_size: 1,
        food_count: 1,
        ..create_test_params()
    }
}

#[test]
fn test_ecosystem_creation() {
    let params = create_test_params();
    let ecosystem = Ecosystem::new(&params).unwrap();

    assert_eq!(ecosystem.eaters().len(), params.population_size);
    assert_eq!(ecosystem.food().len(), params.food_count);
    assert_eq!(ecosystem.ticks(), 0);
    assert_eq!(ecosystem.generation(), 0);
    assert!(ecosystem.selected().is_none());

    let indices: HashSet<usize> = ecosystem.eaters().iter().map(|e| e.genome_index()).collect();
    assert_eq!(indices.len(), params.population_size);
    assert!(indices.iter().all(|&i| i < params.population_size));

    for eater in ecosystem.eaters() {
        assert!(eater.heading() >= 0.0 && eater.heading() < std::f32::consts::TAU);
        assert!(eater.pos.x() >= 0.0 && eater.pos.x() < params.box_width);
        assert!(eater.pos.y() >= 0.0 && eater.pos.y() < params.box_height);
    }
}

#[test]
fn test_invalid_configuration_fails_fast() {
    let cases = [
        (
            Params {
                population_size: 0,
                ..create_test_params()
            },
            "population",
        ),
        (
            Params {
                hidden_layers_sizes: vec![],
                ..create_test_params()
            },
            "hidden",
        ),
        (
            Params {
                ticks_per_gen: 0,
                ..create_test_params()
            },
            "ticks",
        ),
        (
            Params {
                food_count: 0,
                ..create_test_params()
            },
            "food",
        ),
    ];

    for (params, what) in cases {
        let err = Ecosystem::new(&params).unwrap_err();
        let ok = match what {
            "population" => matches!(err, Error::EmptyPopulation),
            "hidden" => matches!(err, Error::NoHiddenLayers),
            "ticks" => matches!(err, Error::ZeroTicksPerGen),
            _ => matches!(err, Error::NoFood),
        };
        assert!(ok, "unexpected error for {what}: {err}");
    }
}

#[test]
fn test_population_must_match_configuration() {
    let params = create_test_params();

    let short = StillPopulation::new(&Params {
        population_size: 3,
        ..params.clone()
    });
    assert!(matches!(
        Ecosystem::with_population(&params, short),
        Err(Error::PopulationMismatch {
            expected: 10,
            actual: 3
        })
    ));

    let mut wrong_length = StillPopulation::new(&params);
    wrong_length.genomes[0] = Genome::new(vec![0.0; 3]);
    assert!(matches!(
        Ecosystem::with_population(&params, wrong_length),
        Err(Error::DimensionMismatch {
            expected: 44,
            actual: 3
        })
    ));
}

#[test]
fn test_epoch_boundary() {
    let params = create_test_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();

    for _ in 0..params.ticks_per_gen {
        ecosystem.tick();
    }
    assert_eq!(ecosystem.generation(), 0);
    assert_eq!(ecosystem.ticks(), params.ticks_per_gen);

    ecosystem.tick();
    assert_eq!(ecosystem.generation(), 1);
    assert_eq!(ecosystem.ticks(), 0);
    assert_eq!(ecosystem.eaters().len(), params.population_size);
    assert_eq!(ecosystem.food().len(), params.food_count);

    for eater in ecosystem.eaters() {
        assert!(eater.pos.x() >= 0.0 && eater.pos.x() <= params.box_width);
        assert!(eater.pos.y() >= 0.0 && eater.pos.y() <= params.box_height);
    }

    let stats = ecosystem.last_generation_stats().unwrap();
    assert_eq!(stats.generation, 0);
}

#[test]
fn test_longest_epoch_does_not_overflow() {
    let params = Params {
        ticks_per_gen: u32::MAX,
        ..create_test_params()
    };
    let mut ecosystem = Ecosystem::new(&params).unwrap();

    for _ in 0..3 {
        ecosystem.tick();
    }
    assert_eq!(ecosystem.ticks(), 3);
    assert_eq!(ecosystem.generation(), 0);
}

#[test]
fn test_epoch_clears_selection() {
    let params = create_test_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();

    assert!(ecosystem.set_selected(3));
    assert_eq!(ecosystem.selected_index(), Some(3));
    assert!(!ecosystem.set_selected(params.population_size));
    assert_eq!(ecosystem.selected_index(), Some(3));

    for _ in 0..=params.ticks_per_gen {
        ecosystem.tick();
    }
    assert!(ecosystem.selected().is_none());
}

#[test]
fn test_mating_freeze_keeps_population() {
    let params = create_test_params();
    let population = StillPopulation::new(&params);
    let mut ecosystem = Ecosystem::with_population(&params, population).unwrap();

    assert!(ecosystem.toggle_mating_freeze());
    for _ in 0..=params.ticks_per_gen {
        ecosystem.tick();
    }
    assert_eq!(ecosystem.population().matings, 0);
    assert_eq!(ecosystem.generation(), 0);
    assert_eq!(ecosystem.ticks(), 0);

    assert!(!ecosystem.toggle_mating_freeze());
    for _ in 0..=params.ticks_per_gen {
        ecosystem.tick();
    }
    assert_eq!(ecosystem.population().matings, 1);
    assert_eq!(ecosystem.generation(), 1);
}

#[test]
fn test_pause_skips_ticks() {
    let params = create_test_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();
    let before: Vec<_> = ecosystem.eaters().iter().map(|e| e.pos).collect();

    assert!(ecosystem.toggle_pause());
    ecosystem.tick();
    assert_eq!(ecosystem.ticks(), 0);
    let after: Vec<_> = ecosystem.eaters().iter().map(|e| e.pos).collect();
    assert_eq!(before, after);

    assert!(!ecosystem.toggle_pause());
    ecosystem.tick();
    assert_eq!(ecosystem.ticks(), 1);
}

#[test]
fn test_consumption_just_inside_radius() {
    let params = single_eater_params();
    let population = StillPopulation::new(&params);
    let mut ecosystem = Ecosystem::with_population(&params, population).unwrap();

    let radius = params.consumption_radius();
    ecosystem.eaters_mut()[0].pos = Point::new(100.0, 100.0);
    ecosystem.food_mut()[0].pos = Point::new(100.0 + radius - 0.01, 100.0);

    ecosystem.tick();

    assert_eq!(ecosystem.fitness_of(0), Some(1.0));
    assert_ne!(ecosystem.food()[0].pos, Point::new(100.0 + radius - 0.01, 100.0));
    assert_eq!(ecosystem.food().len(), 1);
}

#[test]
fn test_no_consumption_just_outside_radius() {
    let params = single_eater_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();

    let radius = params.consumption_radius();
    let food_pos = Point::new(100.0 + radius + 0.01, 100.0);
    ecosystem.eaters_mut()[0].pos = Point::new(100.0, 100.0);
    ecosystem.food_mut()[0].pos = food_pos;

    ecosystem.tick();

    assert_eq!(ecosystem.fitness_of(0), Some(0.0));
    assert_eq!(ecosystem.food()[0].pos, food_pos);
    assert_eq!(ecosystem.eaters()[0].closest_food, food_pos);
}

#[test]
fn test_one_consumption_per_tick() {
    let params = Params {
        population_size: 1,
        food_count: 2,
        ..create_test_params()
    };
    let mut ecosystem = Ecosystem::new(&params).unwrap();

    ecosystem.eaters_mut()[0].pos = Point::new(300.0, 300.0);
    ecosystem.food_mut()[0].pos = Point::new(301.0, 300.0);
    ecosystem.food_mut()[1].pos = Point::new(302.0, 300.0);

    ecosystem.tick();

    assert_eq!(ecosystem.fitness_of(0), Some(1.0));
    assert_eq!(ecosystem.food()[1].pos, Point::new(302.0, 300.0));
}

#[test]
fn test_moves_along_sensed_heading() {
    let params = single_eater_params();
    let population = StillPopulation::new(&params);
    let mut ecosystem = Ecosystem::with_population(&params, population).unwrap();

    ecosystem.eaters_mut()[0].pos = Point::new(400.0, 300.0);
    ecosystem.eaters_mut()[0].set_heading(std::f32::consts::FRAC_PI_2);
    ecosystem.food_mut()[0].pos = Point::new(10.0, 10.0);

    ecosystem.tick();

    let eater = &ecosystem.eaters()[0];
    assert!((eater.pos.x() - 400.0).abs() < 1e-3);
    assert!((eater.pos.y() - (300.0 + params.max_speed)).abs() < 1e-3);
    assert!((eater.heading() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn test_turn_left_output_raises_heading_after_moving() {
    let mut genes = vec![0.0; single_eater_params().genome_length()];
    genes[TURN_LEFT_BIAS] = 5.0;
    let mut ecosystem = steered_ecosystem(&genes, 0.0, Point::new(10.0, 10.0));
    let max_turn_rate = ecosystem.params().max_turn_rate;

    ecosystem.tick();

    // moved along the old heading, turn clamped to the max rate
    let eater = &ecosystem.eaters()[0];
    assert!((eater.pos.x() - 402.0).abs() < 1e-3);
    assert!((eater.pos.y() - 300.0).abs() < 1e-3);
    assert!((eater.heading() - max_turn_rate).abs() < 1e-6);
    assert_eq!(eater.lookat, Point::new(1.0, 0.0));
}

#[test]
fn test_turn_right_output_lowers_heading() {
    let mut genes = vec![0.0; single_eater_params().genome_length()];
    genes[TURN_RIGHT_BIAS] = 5.0;
    let mut ecosystem = steered_ecosystem(&genes, 0.0, Point::new(10.0, 10.0));
    let max_turn_rate = ecosystem.params().max_turn_rate;

    ecosystem.tick();

    let eater = &ecosystem.eaters()[0];
    assert!((eater.pos.x() - 402.0).abs() < 1e-3);
    assert!((eater.pos.y() - 300.0).abs() < 1e-3);
    assert!((eater.heading() - (std::f32::consts::TAU - max_turn_rate)).abs() < 1e-5);
}

#[test]
fn test_second_input_is_lookat_y() {
    let mut genes = vec![0.0; single_eater_params().genome_length()];
    genes[HIDDEN0_FROM_LOOKAT_Y] = 0.1;
    genes[TURN_LEFT_FROM_HIDDEN0] = 1.0;
    // food to the left of the eater so the food direction has no y component
    let heading = std::f32::consts::FRAC_PI_2;
    let mut ecosystem = steered_ecosystem(&genes, heading, Point::new(10.0, 300.0));

    ecosystem.tick();

    let eater = &ecosystem.eaters()[0];
    assert!((eater.heading() - (heading + 0.1)).abs() < 1e-5);
}

#[test]
fn test_fourth_input_is_food_direction_y() {
    let mut genes = vec![0.0; single_eater_params().genome_length()];
    genes[HIDDEN0_FROM_FOOD_Y] = 0.1;
    genes[TURN_LEFT_FROM_HIDDEN0] = 1.0;
    // heading 0 has no y component, food straight down has direction (0, 1)
    let mut ecosystem = steered_ecosystem(&genes, 0.0, Point::new(400.0, 500.0));

    ecosystem.tick();

    let eater = &ecosystem.eaters()[0];
    assert_eq!(eater.food_dir, Point::new(0.0, 1.0));
    assert!((eater.heading() - 0.1).abs() < 1e-5);
}

#[test]
fn test_wrap_around() {
    let params = single_eater_params();
    let population = StillPopulation::new(&params);
    let mut ecosystem = Ecosystem::with_population(&params, population).unwrap();

    ecosystem.eaters_mut()[0].pos = Point::new(params.box_width - 1.0, 300.0);
    ecosystem.eaters_mut()[0].set_heading(0.0);
    ecosystem.food_mut()[0].pos = Point::new(10.0, 10.0);

    ecosystem.tick();

    let eater = &ecosystem.eaters()[0];
    assert_eq!(eater.pos.x(), 0.0);
    assert!((eater.pos.y() - 300.0).abs() < 1e-3);
}

#[test]
fn test_clamp_borders() {
    let params = Params {
        wrap_borders: false,
        ..single_eater_params()
    };
    let population = StillPopulation::new(&params);
    let mut ecosystem = Ecosystem::with_population(&params, population).unwrap();

    ecosystem.eaters_mut()[0].pos = Point::new(params.box_width - 1.0, 300.0);
    ecosystem.eaters_mut()[0].set_heading(0.0);
    ecosystem.food_mut()[0].pos = Point::new(10.0, 10.0);

    ecosystem.tick();

    assert_eq!(ecosystem.eaters()[0].pos.x(), params.box_width);
}

#[test]
fn test_zero_distance_food_is_safe() {
    let params = single_eater_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();

    ecosystem.eaters_mut()[0].pos = Point::new(50.0, 50.0);
    ecosystem.food_mut()[0].pos = Point::new(50.0, 50.0);

    ecosystem.tick();

    let eater = &ecosystem.eaters()[0];
    assert_eq!(eater.food_dir, Point::new(0.0, 0.0));
    assert!(eater.heading().is_finite());
    assert!(eater.pos.x().is_finite() && eater.pos.y().is_finite());
    assert_eq!(ecosystem.fitness_of(0), Some(1.0));
}

#[test]
fn test_brain_extraction() {
    let params = create_test_params();
    let ecosystem = Ecosystem::new(&params).unwrap();

    let brain = ecosystem.eater_brain(0).unwrap();
    let outputs = brain(&[1.0, 0.0, 0.0, 1.0]).unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(matches!(
        brain(&[1.0, 0.0]),
        Err(Error::InputMismatch {
            expected: 4,
            actual: 2
        })
    ));

    let fittest = ecosystem.fittest_brain().unwrap();
    assert_eq!(fittest(&[0.0; 4]).unwrap().len(), 2);
    assert!(ecosystem.eater_brain(params.population_size).is_none());
}

#[test]
fn test_fittest_brain_matches_fittest_eater() {
    let params = create_test_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();
    let food_pos = ecosystem.food()[0].pos;
    ecosystem.eaters_mut()[3].pos = food_pos;

    ecosystem.tick();

    assert!(ecosystem.fittest_fitness() >= 1.0);
    let idx = ecosystem.fittest_index().unwrap();
    let fittest = ecosystem.fittest_brain().unwrap();
    let eater = ecosystem.eater_brain(idx).unwrap();
    for inputs in [[1.0, 0.0, 0.0, 1.0], [0.0, -1.0, 0.6, 0.8]] {
        assert_eq!(fittest(&inputs).unwrap(), eater(&inputs).unwrap());
    }
}

#[test]
fn test_select_at_point() {
    let params = single_eater_params();
    let mut ecosystem = Ecosystem::new(&params).unwrap();
    ecosystem.eaters_mut()[0].pos = Point::new(200.0, 200.0);

    assert_eq!(ecosystem.select_at(Point::new(205.0, 200.0)), Some(0));
    assert!(ecosystem.selected().is_some());
    assert_eq!(ecosystem.select_at(Point::new(500.0, 500.0)), None);
    assert!(ecosystem.selected().is_none());
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let params = create_test_params();
    let mut a = Ecosystem::new(&params).unwrap();
    let mut b = Ecosystem::new(&params).unwrap();

    for _ in 0..20 {
        a.tick();
        b.tick();
    }

    assert_eq!(a.eaters(), b.eaters());
    assert_eq!(a.food(), b.food());
    assert_eq!(a.average_fitness(), b.average_fitness());
}

//! Genome population and the genetic algorithm that evolves it.
//!
//! The simulation only talks to genomes through the [`Population`] trait, so any
//! selection scheme can sit behind it. [`Darwin`] is the default: elitism,
//! fitness-proportionate parent selection, crossover and per-gene mutation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Error, Result};

/// A fixed-length real-valued parameter vector with a fitness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<f32>,
    fitness: f32,
}

impl Genome {
    /// Creates a genome with zero fitness.
    pub fn new(genes: Vec<f32>) -> Self {
        Self {
            genes,
            fitness: 0.0,
        }
    }

    /// Gene values.
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    /// Current fitness.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Adds `amount` to the fitness score.
    pub fn add_fitness(&mut self, amount: f32) {
        self.fitness += amount;
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the genome carries no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Capability interface over an evolving population of genomes.
///
/// Implementors must keep the population size and genome length constant across
/// [`Population::mate`], and reset every fitness to zero when they do.
pub trait Population {
    /// Genomes in stable order for the current generation.
    fn genomes(&self) -> &[Genome];

    /// Replaces the population with the next generation.
    fn mate(&mut self);

    /// Adds `amount` to the fitness of genome `index`.
    fn add_fitness(&mut self, index: usize, amount: f32);

    /// Genome with the highest fitness; ties go to the earliest one.
    fn fittest(&self) -> Option<&Genome> {
        self.fittest_index().map(|i| &self.genomes()[i])
    }

    /// Index of [`Population::fittest`].
    fn fittest_index(&self) -> Option<usize> {
        let genomes = self.genomes();
        let mut best: Option<usize> = None;
        for (i, genome) in genomes.iter().enumerate() {
            match best {
                Some(b) if genome.fitness <= genomes[b].fitness => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Mean fitness over the population, `0.0` when empty.
    fn average_fitness(&self) -> f32 {
        let genomes = self.genomes();
        if genomes.is_empty() {
            return 0.0;
        }
        genomes.iter().map(Genome::fitness).sum::<f32>() / genomes.len() as f32
    }
}

/// How two parent genomes are recombined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverMethod {
    /// Swap tails after one random cut.
    #[default]
    SinglePoint,
    /// Swap the segment between two random cuts.
    TwoPoint,
    /// Swap each gene independently with probability one half.
    Uniform,
}

/// Tuning knobs for [`Darwin`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticParams {
    /// Number of genomes in the population.
    pub population_size: usize,
    /// Number of genes per genome.
    pub chromosome_length: usize,
    /// Probability that a parent pair is recombined rather than copied.
    pub crossover_rate: f32,
    /// Per-gene probability of replacement with a fresh random value.
    pub mutation_rate: f32,
    /// Number of fittest genomes carried over unchanged.
    pub elite_count: usize,
    /// Copies of each elite genome carried over.
    pub elite_copies: usize,
    /// Recombination operator.
    pub crossover_method: CrossoverMethod,
}

/// Default genetic algorithm population.
#[derive(Debug, Clone)]
pub struct Darwin {
    params: GeneticParams,
    genomes: Vec<Genome>,
    rng: SmallRng,
}

impl Darwin {
    /// Creates a population of random genomes with genes in `[-1, 1)`.
    pub fn new(params: GeneticParams, seed: Option<u64>) -> Result<Self> {
        if params.population_size == 0 {
            return Err(Error::EmptyPopulation);
        }
        for (name, value) in [
            ("crossover_rate", params.crossover_rate),
            ("mutation_rate", params.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter { name, value });
            }
        }

        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let genomes = (0..params.population_size)
            .map(|_| Genome::new(random_genes(&mut rng, params.chromosome_length)))
            .collect();

        debug!(
            population_size = params.population_size,
            chromosome_length = params.chromosome_length,
            "created population"
        );

        Ok(Self {
            params,
            genomes,
            rng,
        })
    }

    /// Settings this population evolves with.
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    /// Picks a parent with probability proportional to fitness.
    fn roulette(&mut self, total_fitness: f32) -> usize {
        let n = self.genomes.len();
        if total_fitness <= 0.0 {
            return self.rng.random_range(0..n);
        }

        let target = self.rng.random::<f32>() * total_fitness;
        let mut running = 0.0;
        for (i, genome) in self.genomes.iter().enumerate() {
            running += genome.fitness.max(0.0);
            if running > target {
                return i;
            }
        }
        n - 1
    }

    fn crossover(&mut self, mom: &[f32], dad: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let mut a = mom.to_vec();
        let mut b = dad.to_vec();
        let len = a.len();
        if len < 2 || self.rng.random::<f32>() >= self.params.crossover_rate {
            return (a, b);
        }

        match self.params.crossover_method {
            CrossoverMethod::SinglePoint => {
                let cut = self.rng.random_range(1..len);
                a[cut..].swap_with_slice(&mut b[cut..]);
            }
            CrossoverMethod::TwoPoint => {
                let first = self.rng.random_range(0..len);
                let second = self.rng.random_range(0..len);
                let (lo, hi) = (first.min(second), first.max(second));
                a[lo..hi].swap_with_slice(&mut b[lo..hi]);
            }
            CrossoverMethod::Uniform => {
                for i in 0..len {
                    if self.rng.random::<bool>() {
                        std::mem::swap(&mut a[i], &mut b[i]);
                    }
                }
            }
        }
        (a, b)
    }

    fn mutate(&mut self, genes: &mut [f32]) {
        for gene in genes {
            if self.rng.random::<f32>() < self.params.mutation_rate {
                *gene = self.rng.random_range(-1.0..1.0);
            }
        }
    }
}

impl Population for Darwin {
    fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    fn mate(&mut self) {
        let size = self.genomes.len();
        let mut next: Vec<Genome> = Vec::with_capacity(size);

        // stable sort keeps population order among equal fitness
        let mut ranked: Vec<usize> = (0..size).collect();
        ranked.sort_by(|&a, &b| {
            self.genomes[b]
                .fitness
                .total_cmp(&self.genomes[a].fitness)
        });
        'elites: for &i in ranked.iter().take(self.params.elite_count) {
            for _ in 0..self.params.elite_copies {
                if next.len() == size {
                    break 'elites;
                }
                next.push(Genome::new(self.genomes[i].genes.clone()));
            }
        }

        let total_fitness: f32 = self.genomes.iter().map(|g| g.fitness.max(0.0)).sum();
        while next.len() < size {
            let mom = self.roulette(total_fitness);
            let dad = self.roulette(total_fitness);
            let mom_genes = self.genomes[mom].genes.clone();
            let dad_genes = self.genomes[dad].genes.clone();

            let (mut a, mut b) = self.crossover(&mom_genes, &dad_genes);
            self.mutate(&mut a);
            self.mutate(&mut b);

            next.push(Genome::new(a));
            if next.len() < size {
                next.push(Genome::new(b));
            }
        }

        self.genomes = next;
    }

    fn add_fitness(&mut self, index: usize, amount: f32) {
        if let Some(genome) = self.genomes.get_mut(index) {
            genome.add_fitness(amount);
        }
    }
}

fn random_genes<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

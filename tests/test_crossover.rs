use std::sync::Arc;

use breedsim::{
    crossover::{CrossSpec, CrossoverEngine, CrossoverMask},
    error::BreedingError,
    genetic_map::{GeneticMap, MarkerRecord},
    population::{self, Population},
    rng::RandomNumberGenerator,
    simulator::BreedingSimulator,
    SimulatorConfig,
};
use ndarray::{s, Axis};

fn map(rows: &[(i32, f32)]) -> GeneticMap {
    let records: Vec<_> = rows
        .iter()
        .map(|&(chromosome, rate)| MarkerRecord::new(chromosome, rate, vec![1.0]))
        .collect();
    GeneticMap::from_records(&records).unwrap()
}

fn varied_map() -> GeneticMap {
    map(&[
        (1, 0.01),
        (1, 0.1),
        (1, 0.3),
        (1, 0.9),
        (1, 0.0),
        (2, 0.2),
        (2, 0.05),
        (2, 1.0),
        (2, 0.4),
        (3, 0.7),
    ])
}

/// Individual 0 carries the effect allele on haplotype 0 only, so the
/// haplotype 0 it transmits spells out its crossover mask.
fn marker_parent(n_markers: usize) -> Population {
    Population::from_shape_fn((2, n_markers, 2), |(individual, _, haplotype)| {
        individual == 0 && haplotype == 0
    })
}

#[test]
fn test_recombination_vector_shifts_and_resets() {
    let map = varied_map();
    let vector = map.recombination_vector();
    let raw = map.recombination_rates();

    for (i, &p) in vector.as_slice().iter().enumerate() {
        assert!((0.0..=1.0).contains(&p));
        if map.chromosome_starts().contains(&i) {
            assert_eq!(p, 0.5, "marker {} starts a chromosome", i);
        } else {
            assert_eq!(p, raw[i - 1], "marker {} takes the previous raw rate", i);
        }
    }
}

#[test]
fn test_empirical_crossover_rate() {
    let map = varied_map();
    let engine = CrossoverEngine::new(Arc::new(map.recombination_vector()), 1000);
    let mut rng = RandomNumberGenerator::from_seed(2024);
    let trials = 20_000;

    let mut counts = vec![0usize; map.n_markers()];
    for _ in 0..trials {
        let events = engine.crossover_mask(&mut rng).events();
        for (count, event) in counts.iter_mut().zip(events) {
            *count += usize::from(event);
        }
    }

    for (i, (&count, &expected)) in counts
        .iter()
        .zip(engine.recombination().as_slice())
        .enumerate()
    {
        let observed = count as f32 / trials as f32;
        assert!(
            (observed - expected).abs() < 0.02,
            "marker {}: observed {}, expected {}",
            i,
            observed,
            expected
        );
    }
}

#[test]
fn test_empirical_crossover_rate_through_cross() {
    let map = varied_map();
    let n_markers = map.n_markers();
    let config = SimulatorConfig::builder()
        .seed(11)
        .parallel_threshold(1)
        .build()
        .unwrap();
    let expected = map.recombination_vector();
    let mut simulator = BreedingSimulator::new(map, config).unwrap();

    let parents = marker_parent(n_markers);
    let spec = CrossSpec::new(vec![(0, 1)], 20_000).unwrap();
    let progeny = simulator.cross(&parents, &spec).unwrap();

    let gametes = progeny.slice(s![.., .., 0]);
    for marker in 0..n_markers {
        let switches = gametes
            .axis_iter(Axis(0))
            .filter(|gamete| {
                let previous = marker.checked_sub(1).map_or(true, |m| gamete[m]);
                gamete[marker] != previous
            })
            .count();
        let observed = switches as f32 / spec.n_progeny() as f32;
        let expected = expected.as_slice()[marker];
        assert!(
            (observed - expected).abs() < 0.02,
            "marker {}: observed {}, expected {}",
            marker,
            observed,
            expected
        );
    }
}

#[test]
fn test_three_marker_scenario_without_crossovers() {
    let map = map(&[(1, 0.0), (1, 0.5), (1, 0.0)]);
    let vector = map.recombination_vector();
    assert_eq!(vector.as_slice(), [0.5, 0.0, 0.5]);

    let engine = CrossoverEngine::new(Arc::new(vector), 1000);
    let parents = population::homozygous(&[vec![true; 3], vec![false; 3]]).unwrap();
    let no_crossover = CrossoverMask::from_events([false, false, false]);

    let progeny = engine
        .cross_with_masks(&parents.view(), (0, 1), [&no_crossover, &no_crossover])
        .unwrap();
    assert_eq!(
        progeny,
        ndarray::array![[true, false], [true, false], [true, false]]
    );

    // Homozygous parents transmit the same gamete whatever the mask.
    let every_crossover = CrossoverMask::from_events([true, true, true]);
    let progeny_with_crossovers = engine
        .cross_with_masks(&parents.view(), (0, 1), [&every_crossover, &no_crossover])
        .unwrap();
    assert_eq!(progeny, progeny_with_crossovers);
}

#[test]
fn test_three_marker_scenario_with_random_draws() {
    let map = map(&[(1, 0.0), (1, 0.5), (1, 0.0)]);
    let engine = CrossoverEngine::new(Arc::new(map.recombination_vector()), 1000);
    let parents = population::homozygous(&[vec![true; 3], vec![false; 3]]).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(0);

    let spec = CrossSpec::new(vec![(0, 1), (1, 0)], 5).unwrap();
    let progeny = engine.cross(&parents.view(), &spec, &mut rng).unwrap();

    for (i, individual) in progeny.outer_iter().enumerate() {
        let first_parent_is_0 = i < 5;
        assert!(individual.column(0).iter().all(|&a| a == first_parent_is_0));
        assert!(individual.column(1).iter().all(|&a| a != first_parent_is_0));
    }
}

#[test]
fn test_cross_shape_is_pairs_times_offspring() {
    let map = varied_map();
    let mut simulator = BreedingSimulator::new(map, SimulatorConfig::default()).unwrap();
    let population = simulator.random_population(6);

    for (pairs, offspring) in [(1, 1), (3, 4), (6, 10)] {
        let spec = CrossSpec::new((0..pairs).map(|p| (p, (p + 1) % 6)).collect(), offspring)
            .unwrap();
        let progeny = simulator.cross(&population, &spec).unwrap();
        assert_eq!(progeny.dim(), (pairs * offspring, 10, 2));
    }
}

#[test]
fn test_cross_leaves_population_untouched() {
    let mut simulator = BreedingSimulator::new(varied_map(), SimulatorConfig::default()).unwrap();
    let population = simulator.random_population(4);
    let before = population.clone();

    simulator
        .cross(&population, &CrossSpec::new(vec![(0, 3)], 3).unwrap())
        .unwrap();
    assert_eq!(population, before);
}

#[test]
fn test_cross_errors() {
    let mut simulator = BreedingSimulator::new(varied_map(), SimulatorConfig::default()).unwrap();

    let wrong_markers = Population::from_elem((2, 9, 2), false);
    let spec = CrossSpec::single(vec![(0, 1)]).unwrap();
    assert!(matches!(
        simulator.cross(&wrong_markers, &spec),
        Err(BreedingError::ShapeMismatch { .. })
    ));

    let population = simulator.random_population(2);
    let spec = CrossSpec::single(vec![(0, 2)]).unwrap();
    assert!(matches!(
        simulator.cross(&population, &spec),
        Err(BreedingError::IndexOutOfBounds { index: 2, len: 2 })
    ));
}

#[test]
fn test_chromosomes_assort_independently() {
    // No recombination within a chromosome: each is inherited whole, and the
    // choice of parental haplotype is independent between chromosomes.
    let map = map(&[(1, 0.0), (1, 0.0), (2, 0.0), (2, 0.0)]);
    let engine = CrossoverEngine::new(Arc::new(map.recombination_vector()), 1000);
    let mut rng = RandomNumberGenerator::from_seed(77);
    let trials = 10_000;

    let mut same_origin = 0;
    for _ in 0..trials {
        let mask = engine.crossover_mask(&mut rng);
        let m = mask.as_slice();
        assert_eq!(m[0], m[1]);
        assert_eq!(m[2], m[3]);
        same_origin += usize::from(m[0] == m[2]);
    }
    let fraction = same_origin as f32 / trials as f32;
    assert!((fraction - 0.5).abs() < 0.03, "fraction = {}", fraction);
}

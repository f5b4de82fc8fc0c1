//! Non-dominated sorting, crowding distance, and NSGA-II selection over
//! formulation populations. Used both for parent selection and for survivor
//! truncation in the generation loop.

use std::cmp::Ordering;

use crate::formulation::{Fitness, Formulation};

fn fitness_of(individual: &Formulation) -> Fitness {
    individual
        .fitness
        .expect("individual must be evaluated before selection")
}

/// Partitions the population into ranked fronts by mutual non-domination:
/// front 0 is undominated, front 1 is undominated once front 0 is removed,
/// and so on. Returned as index lists into `population`.
pub fn fast_non_dominated_sort(population: &[Formulation]) -> Vec<Vec<usize>> {
    let n = population.len();
    if n == 0 {
        return Vec::new();
    }
    let fitnesses: Vec<Fitness> = population.iter().map(fitness_of).collect();

    let mut fronts = vec![vec![]];
    let mut domination_count = vec![0usize; n];
    let mut dominated_indices: Vec<Vec<usize>> = vec![vec![]; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if fitnesses[i].dominates(&fitnesses[j]) {
                dominated_indices[i].push(j);
            } else if fitnesses[j].dominates(&fitnesses[i]) {
                domination_count[i] += 1;
            }
        }
        if domination_count[i] == 0 {
            fronts[0].push(i);
        }
    }

    let mut current = 0;
    while current < fronts.len() && !fronts[current].is_empty() {
        let mut next_front = vec![];
        for &i in &fronts[current] {
            for &j in &dominated_indices[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }
        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
        current += 1;
    }
    fronts
}

/// Crowding distance for one front, aligned with `front`'s order. Boundary
/// points per objective get infinite distance so selection keeps the spread;
/// interior points accumulate normalized gaps to their neighbors.
pub fn crowding_distance(population: &[Formulation], front: &[usize]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let values: Vec<[f64; 3]> = front
        .iter()
        .map(|&i| fitness_of(&population[i]).values())
        .collect();

    let mut distance = vec![0.0; n];
    for objective in 0..3 {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            values[a][objective]
                .partial_cmp(&values[b][objective])
                .unwrap_or(Ordering::Equal)
        });

        distance[order[0]] = f64::INFINITY;
        distance[order[n - 1]] = f64::INFINITY;

        let range = values[order[n - 1]][objective] - values[order[0]][objective];
        if range > 0.0 {
            for i in 1..(n - 1) {
                if distance[order[i]] != f64::INFINITY {
                    distance[order[i]] += (values[order[i + 1]][objective]
                        - values[order[i - 1]][objective])
                        / range;
                }
            }
        }
    }
    distance
}

/// NSGA-II selection: fills whole fronts in rank order and truncates the
/// overflowing front by descending crowding distance, returning exactly
/// `k` individuals (or the whole population when `k` exceeds it).
pub fn select(population: &[Formulation], k: usize) -> Vec<Formulation> {
    let fronts = fast_non_dominated_sort(population);
    let mut selected = Vec::with_capacity(k.min(population.len()));

    for front in &fronts {
        let remaining = k - selected.len();
        if remaining == 0 {
            break;
        }
        if front.len() <= remaining {
            selected.extend(front.iter().map(|&i| population[i].clone()));
        } else {
            let distance = crowding_distance(population, front);
            let mut order: Vec<usize> = (0..front.len()).collect();
            order.sort_by(|&a, &b| {
                distance[b]
                    .partial_cmp(&distance[a])
                    .unwrap_or(Ordering::Equal)
            });
            selected.extend(
                order
                    .into_iter()
                    .take(remaining)
                    .map(|j| population[front[j]].clone()),
            );
            break;
        }
    }
    selected
}

/// The first front: every individual no other member of the population
/// dominates.
pub fn pareto_front(population: &[Formulation]) -> Vec<Formulation> {
    fast_non_dominated_sort(population)
        .first()
        .map(|front| front.iter().map(|&i| population[i].clone()).collect())
        .unwrap_or_default()
}

//! Permutation operators for QAP specimens.
//!
//! Specimens are permutations of `1..=n`. Crossover cuts both parents at one
//! point and swaps tails, which can duplicate some locations and drop
//! others; [`repair_permutation`] restores validity deterministically.
//! Mutation only transposes genes, so it never needs repair.
//!
//! # Crossover
//!
//! - [`cut_point_crossover`]: single cut, tail exchange, then repair
//! - [`crossover`]: the same, gated by the crossover probability
//! - [`breed`]: fills a whole generation from a mating pool
//!
//! # Mutation
//!
//! - [`swap_mutation`]: per-gene swap with a random other position
//! - [`mutate_all`]: applies it to every specimen

use super::types::Specimen;
use rand::Rng;

// ============================================================================
// Repair
// ============================================================================

/// Restores the permutation invariant in place.
///
/// Scans left to right. The first occurrence of each value in `1..=n` is
/// kept; later occurrences (and out-of-range values) mark their position as
/// defective. Defective positions then receive the unused values in
/// ascending order, left to right. Valid permutations are left untouched.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the number of missing values differs from the number of
/// defective positions, which cannot happen for a slice of length `n`.
pub fn repair_permutation(genes: &mut [usize]) {
    let n = genes.len();
    let mut used = vec![false; n + 1];
    let mut defective = Vec::new();

    for (pos, &value) in genes.iter().enumerate() {
        if (1..=n).contains(&value) && !used[value] {
            used[value] = true;
        } else {
            defective.push(pos);
        }
    }

    let missing: Vec<usize> = (1..=n).filter(|&v| !used[v]).collect();
    assert_eq!(
        missing.len(),
        defective.len(),
        "repair pool mismatch: {} missing values for {} defective positions",
        missing.len(),
        defective.len()
    );

    for (pos, value) in defective.into_iter().zip(missing) {
        genes[pos] = value;
    }
}

// ============================================================================
// Crossover
// ============================================================================

/// Single cut-point crossover with repair.
///
/// Picks `cut` uniformly in `[0, n)`. Child A is `parent1[..cut]` followed
/// by `parent2[cut..]`, child B the complement. Both are repaired.
///
/// # Panics
/// Panics if the parents have different lengths or are empty.
pub fn cut_point_crossover<R: Rng + ?Sized>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let cut = rng.random_range(0..n);
    let (mut child_a, mut child_b) = exchange_tails(parent1, parent2, cut);
    repair_permutation(&mut child_a);
    repair_permutation(&mut child_b);
    (child_a, child_b)
}

fn exchange_tails(parent1: &[usize], parent2: &[usize], cut: usize) -> (Vec<usize>, Vec<usize>) {
    let mut child_a = Vec::with_capacity(parent1.len());
    child_a.extend_from_slice(&parent1[..cut]);
    child_a.extend_from_slice(&parent2[cut..]);

    let mut child_b = Vec::with_capacity(parent2.len());
    child_b.extend_from_slice(&parent2[..cut]);
    child_b.extend_from_slice(&parent1[cut..]);

    (child_a, child_b)
}

/// Recombines two parents with probability `probability`.
///
/// Draws a uniform real in `[0, 1)`; below `probability` the parents are
/// recombined with [`cut_point_crossover`], otherwise cloned unchanged.
pub fn crossover<R: Rng + ?Sized>(
    parent1: &Specimen,
    parent2: &Specimen,
    probability: f64,
    rng: &mut R,
) -> (Specimen, Specimen) {
    if rng.random::<f64>() < probability {
        let (a, b) = cut_point_crossover(parent1.genes(), parent2.genes(), rng);
        (Specimen::new(a), Specimen::new(b))
    } else {
        (parent1.clone(), parent2.clone())
    }
}

/// Builds exactly `pool.len()` children from a mating pool.
///
/// Runs `ceil(len / 2)` crossovers, each on two parents drawn uniformly
/// with replacement from the whole pool, and drops the surplus child when
/// `len` is odd.
pub fn breed<R: Rng + ?Sized>(
    pool: &[Specimen],
    crossover_probability: f64,
    rng: &mut R,
) -> Vec<Specimen> {
    let n = pool.len();
    let mut children = Vec::with_capacity(n + 1);
    if n == 0 {
        return children;
    }

    for _ in 0..n.div_ceil(2) {
        let p1 = &pool[rng.random_range(0..n)];
        let p2 = &pool[rng.random_range(0..n)];
        let (a, b) = crossover(p1, p2, crossover_probability, rng);
        children.push(a);
        children.push(b);
    }
    children.truncate(n);
    children
}

// ============================================================================
// Mutation
// ============================================================================

/// Per-gene swap mutation.
///
/// Every position `i` independently, with probability `probability`, swaps
/// with position `(i + offset) % n` for a random `offset` in `[1, n)`, so
/// the partner always differs from `i`. A specimen of `n` genes receives
/// `n · probability` swaps on average.
///
/// # Complexity
/// O(n)
pub fn swap_mutation<R: Rng + ?Sized>(genes: &mut [usize], probability: f64, rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        if rng.random::<f64>() < probability {
            let offset = rng.random_range(1..n);
            genes.swap(i, (i + offset) % n);
        }
    }
}

/// Applies [`swap_mutation`] to every specimen in order.
pub fn mutate_all<R: Rng + ?Sized>(specimens: &mut [Specimen], probability: f64, rng: &mut R) {
    for specimen in specimens.iter_mut() {
        swap_mutation(specimen.genes_mut(), probability, rng);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::types::is_permutation;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use std::collections::HashSet;

    // ---- Repair ----

    #[test]
    fn test_repair_fills_in_scan_order() {
        let mut genes = vec![3, 3, 11, 2, 12, 5, 6, 7, 8, 1, 4, 9];
        repair_permutation(&mut genes);
        assert_eq!(genes, vec![3, 10, 11, 2, 12, 5, 6, 7, 8, 1, 4, 9]);
    }

    #[test]
    fn test_repair_multiple_defects() {
        // duplicates at positions 2, 3, 5; missing 3, 5, 6 in ascending order
        let mut genes = vec![1, 2, 2, 1, 4, 4];
        repair_permutation(&mut genes);
        assert_eq!(genes, vec![1, 2, 3, 5, 4, 6]);
    }

    #[test]
    fn test_repair_out_of_range_values() {
        let mut genes = vec![0, 2, 9];
        repair_permutation(&mut genes);
        assert_eq!(genes, vec![1, 2, 3]);
    }

    #[test]
    fn test_repair_leaves_valid_permutation_alone() {
        let mut genes = vec![4, 1, 3, 2];
        repair_permutation(&mut genes);
        assert_eq!(genes, vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_repair_empty() {
        let mut genes: Vec<usize> = vec![];
        repair_permutation(&mut genes);
        assert!(genes.is_empty());
    }

    // ---- Crossover ----

    #[test]
    fn test_exchange_tails() {
        let (a, b) = exchange_tails(&[1, 2, 3, 4], &[4, 3, 2, 1], 1);
        assert_eq!(a, vec![1, 3, 2, 1]);
        assert_eq!(b, vec![4, 2, 3, 4]);

        let (a, b) = exchange_tails(&[1, 2, 3], &[3, 1, 2], 0);
        assert_eq!(a, vec![3, 1, 2]);
        assert_eq!(b, vec![1, 2, 3]);
    }

    #[test]
    fn test_cut_point_crossover_produces_valid_permutations() {
        let mut rng = create_rng(42);
        let p1: Vec<usize> = (1..=12).collect();
        let p2: Vec<usize> = (1..=12).rev().collect();

        for _ in 0..200 {
            let (c1, c2) = cut_point_crossover(&p1, &p2, &mut rng);
            assert!(is_permutation(&c1), "child1 not valid: {c1:?}");
            assert!(is_permutation(&c2), "child2 not valid: {c2:?}");
        }
    }

    #[test]
    fn test_cut_point_crossover_identical_parents() {
        let mut rng = create_rng(42);
        let p = vec![2, 4, 1, 3];
        let (c1, c2) = cut_point_crossover(&p, &p, &mut rng);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_crossover_probability_zero_passes_parents_through() {
        let mut rng = create_rng(1);
        let p1 = Specimen::new(vec![1, 2, 3, 4, 5]);
        let p2 = Specimen::new(vec![5, 4, 3, 2, 1]);
        for _ in 0..100 {
            let (a, b) = crossover(&p1, &p2, 0.0, &mut rng);
            assert_eq!(a, p1);
            assert_eq!(b, p2);
        }
    }

    #[test]
    fn test_crossover_probability_one_always_recombines() {
        let mut rng = create_rng(1);
        let p1 = Specimen::new((1..=30).collect());
        let p2 = Specimen::new((1..=30).rev().collect());
        let changed = (0..100)
            .filter(|_| {
                let (a, _) = crossover(&p1, &p2, 1.0, &mut rng);
                a != p1
            })
            .count();
        // Cuts in the upper half repair back into parent1; the lower half differ.
        assert!(changed > 25, "expected recombination, changed {changed}/100");
    }

    #[test]
    fn test_breed_keeps_population_size() {
        let mut rng = create_rng(7);
        for size in [1usize, 2, 3, 10, 11, 25] {
            let pool: Vec<Specimen> = (0..size).map(|_| Specimen::random(9, &mut rng)).collect();
            let children = breed(&pool, 0.9, &mut rng);
            assert_eq!(children.len(), size);
            assert!(children.iter().all(Specimen::is_valid_permutation));
        }
    }

    #[test]
    fn test_breed_empty_pool() {
        let mut rng = create_rng(7);
        assert!(breed(&[], 0.5, &mut rng).is_empty());
    }

    // ---- Mutation ----

    #[test]
    fn test_swap_mutation_zero_probability_is_noop() {
        let mut rng = create_rng(42);
        let mut genes: Vec<usize> = (1..=10).collect();
        swap_mutation(&mut genes, 0.0, &mut rng);
        assert_eq!(genes, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_swap_mutation_full_probability_changes_and_stays_valid() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut genes: Vec<usize> = (1..=10).collect();
            swap_mutation(&mut genes, 1.0, &mut rng);
            assert!(is_permutation(&genes));
        }
    }

    #[test]
    fn test_swap_mutation_two_genes_swap_back() {
        let mut rng = create_rng(3);
        let mut genes = vec![1, 2];
        // position 0 swaps with 1, then position 1 swaps back
        swap_mutation(&mut genes, 1.0, &mut rng);
        assert_eq!(genes, vec![1, 2]);

        let mut single = vec![1];
        swap_mutation(&mut single, 1.0, &mut rng);
        assert_eq!(single, vec![1]);
    }

    #[test]
    fn test_swap_mutation_rate_per_gene() {
        // Each applied swap moves two genes; with p small the number of
        // displaced genes is about 2 * n * p.
        let mut rng = create_rng(11);
        let n = 50;
        let trials = 2000;
        let mut displaced = 0usize;
        for _ in 0..trials {
            let mut genes: Vec<usize> = (1..=n).collect();
            swap_mutation(&mut genes, 0.01, &mut rng);
            displaced += genes.iter().enumerate().filter(|&(i, &g)| g != i + 1).count();
        }
        let per_specimen = displaced as f64 / trials as f64;
        assert!(
            (0.7..1.3).contains(&per_specimen),
            "expected about 1 displaced gene per specimen, got {per_specimen}"
        );
    }

    #[test]
    fn test_mutate_all_preserves_validity() {
        let mut rng = create_rng(5);
        let mut specimens: Vec<Specimen> = (0..20).map(|_| Specimen::random(15, &mut rng)).collect();
        mutate_all(&mut specimens, 0.3, &mut rng);
        assert!(specimens.iter().all(Specimen::is_valid_permutation));
    }

    // ---- Properties ----

    /// A permutation of `1..=n` with `k` positions overwritten by values
    /// that already occur elsewhere.
    fn with_duplicates(n: usize, k: usize, seed: u64) -> Vec<usize> {
        let mut rng = create_rng(seed);
        let mut genes: Vec<usize> = (1..=n).collect();
        genes.shuffle(&mut rng);
        let mut positions: Vec<usize> = (0..n).collect();
        positions.shuffle(&mut rng);
        let (overwritten, kept) = positions.split_at(k);
        for &pos in overwritten {
            genes[pos] = genes[kept[rng.random_range(0..kept.len())]];
        }
        genes
    }

    proptest! {
        #[test]
        fn prop_repair_restores_permutation(
            (n, k, seed) in (1usize..40).prop_flat_map(|n| (Just(n), 0..n, any::<u64>()))
        ) {
            let mut genes = with_duplicates(n, k, seed);
            let before = genes.clone();
            repair_permutation(&mut genes);

            prop_assert!(is_permutation(&genes), "not a permutation: {:?}", genes);

            // first occurrences survive, exactly k repeats are rewritten
            let mut seen = HashSet::new();
            for (pos, &value) in before.iter().enumerate() {
                if seen.insert(value) {
                    prop_assert_eq!(genes[pos], value);
                }
            }
            let changed = genes.iter().zip(&before).filter(|(a, b)| a != b).count();
            prop_assert_eq!(changed, k);
        }

        #[test]
        fn prop_operators_preserve_permutation(
            n in 1usize..30,
            seed in any::<u64>(),
            px in 0.0f64..=1.0,
            pm in 0.0f64..=1.0,
        ) {
            let mut rng = create_rng(seed);
            let pool: Vec<Specimen> = (0..6).map(|_| Specimen::random(n, &mut rng)).collect();
            let mut children = breed(&pool, px, &mut rng);
            mutate_all(&mut children, pm, &mut rng);
            prop_assert_eq!(children.len(), pool.len());
            for child in &children {
                prop_assert!(child.is_valid_permutation(), "invalid child: {:?}", child);
            }
        }
    }
}

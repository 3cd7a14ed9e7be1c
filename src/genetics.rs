/** ===============================================================================
 * File: genetics.rs
 * Author: Scott Stack
 * Description: Genetic operators applied at the generation boundary - random
 * genome generation, two-point crossover and per-genome bit-flip mutation
 * ===============================================================================*/
use crate::gene::Gene;
use rand::Rng;

//===============================================================================
// CONSTANTS
//===============================================================================

pub const GENE_BITS : u32 = 64;     // Width of one packed gene

//===============================================================================
// Genetic operators
//===============================================================================

/// Generate a uniformly random genome of the given length
pub fn random_genome<R : Rng>(genome_length : usize, rng : &mut R) -> Vec<Gene> {
    let mut genome : Vec<Gene> = Vec::with_capacity(genome_length);
    for _gene_num in 0..genome_length {
        genome.push(Gene(rng.gen::<u64>()));
    }
    return genome;
}

/// Two-point crossover at gene granularity with the crossover window supplied
/// by the caller. Genes with index in `[crossover1, crossover2)` come from
/// parent2, the rest from parent1. The points are swapped first if given out of
/// order. Genes are copied whole - crossover never splits a 64-bit gene
pub fn crossover_at_points(parent1 : &[Gene], parent2 : &[Gene], crossover1 : usize, crossover2 : usize) -> Vec<Gene> {
    let (lo, hi) = if crossover1 > crossover2 {
        (crossover2, crossover1)
    } else {
        (crossover1, crossover2)
    };

    let mut offspring : Vec<Gene> = Vec::with_capacity(parent1.len());
    for i in 0..parent1.len() {
        if i >= lo && i < hi {
            offspring.push(parent2[i]);
        } else {
            offspring.push(parent1[i]);
        }
    }
    return offspring;
}

/// Two-point crossover with uniformly chosen points in `[0, G)`, producing a
/// single offspring genome
pub fn two_point_crossover<R : Rng>(parent1 : &[Gene], parent2 : &[Gene], rng : &mut R) -> Vec<Gene> {
    if parent1.is_empty() {
        return Vec::new();
    }
    let crossover1 = rng.gen_range(0..parent1.len());
    let crossover2 = rng.gen_range(0..parent1.len());
    return crossover_at_points(parent1, parent2, crossover1, crossover2);
}

/// Mutate a genome in place. With probability `mutation_rate` (per genome, not
/// per bit) one uniformly chosen bit of one uniformly chosen gene is flipped,
/// so the Hamming distance to the input is exactly 0 or 1
pub fn mutate<R : Rng>(genome : &mut [Gene], mutation_rate : f32, rng : &mut R) {
    if genome.is_empty() {
        return;
    }
    if rng.gen::<f32>() < mutation_rate {
        let gene_idx = rng.gen_range(0..genome.len());
        let bit = rng.gen_range(0..GENE_BITS);
        genome[gene_idx].0 ^= 1u64 << bit;
    }
}


/// Unit tests for the genetic operators
#[cfg(test)]
mod genetics_test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Total Hamming distance (in bits) between two genomes
    fn hamming_distance(a : &[Gene], b : &[Gene]) -> u32 {
        let mut dist = 0;
        for i in 0..a.len() {
            dist += (a[i].0 ^ b[i].0).count_ones();
        }
        return dist;
    }

    fn test_parents(genome_length : usize) -> (Vec<Gene>, Vec<Gene>) {
        let mut rng = StdRng::seed_from_u64(21);
        let parent1 = random_genome(genome_length, &mut rng);
        let parent2 = random_genome(genome_length, &mut rng);
        return (parent1, parent2);
    }

    /// Window [0, G) yields parent2; an empty window yields parent1
    #[test]
    fn test_crossover_boundary_laws() {
        let (parent1, parent2) = test_parents(12);

        let all_p2 = crossover_at_points(&parent1, &parent2, 0, parent1.len());
        assert_eq!(all_p2, parent2);

        let all_p1 = crossover_at_points(&parent1, &parent2, 5, 5);
        assert_eq!(all_p1, parent1);
    }

    /// Out-of-order points are swapped, and each offspring gene comes whole
    /// from one of the parents
    #[test]
    fn test_crossover_window() {
        let (parent1, parent2) = test_parents(10);

        let offspring = crossover_at_points(&parent1, &parent2, 7, 3);
        for i in 0..offspring.len() {
            if i >= 3 && i < 7 {
                assert_eq!(offspring[i], parent2[i]);
            } else {
                assert_eq!(offspring[i], parent1[i]);
            }
        }
    }

    /// Randomly chosen points still produce an offspring drawn gene-wise from
    /// the two parents
    #[test]
    fn test_two_point_crossover_genes_from_parents() {
        let (parent1, parent2) = test_parents(32);
        let mut rng = StdRng::seed_from_u64(33);

        for _round in 0..20 {
            let offspring = two_point_crossover(&parent1, &parent2, &mut rng);
            assert_eq!(offspring.len(), parent1.len());
            for i in 0..offspring.len() {
                assert!(offspring[i] == parent1[i] || offspring[i] == parent2[i]);
            }
        }
    }

    /// Mutation at rate 1.0 flips exactly one bit; at rate 0.0 it flips none
    #[test]
    fn test_mutation_hamming_distance() {
        let mut rng = StdRng::seed_from_u64(44);
        let original = random_genome(16, &mut rng);

        for _round in 0..50 {
            let mut mutated = original.clone();
            mutate(&mut mutated, 1.0, &mut rng);
            assert_eq!(hamming_distance(&original, &mutated), 1);
        }

        let mut unmutated = original.clone();
        mutate(&mut unmutated, 0.0, &mut rng);
        assert_eq!(hamming_distance(&original, &unmutated), 0);
    }

    /// Empty genomes pass through every operator without panicking
    #[test]
    fn test_empty_genome_operators() {
        let mut rng = StdRng::seed_from_u64(55);
        let empty : Vec<Gene> = Vec::new();

        assert!(two_point_crossover(&empty, &empty, &mut rng).is_empty());
        let mut still_empty = empty.clone();
        mutate(&mut still_empty, 1.0, &mut rng);
        assert!(still_empty.is_empty());
    }
}

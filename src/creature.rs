/** ===============================================================================
 * File: creature.rs
 * Author: Scott Stack
 * Description: Describes a single creature - its position, energy and the
 * genome + brain pair that it exclusively owns
 * ===============================================================================*/
use crate::brain::Brain;
use crate::gene::Gene;
use crate::genetics;
use rand::Rng;
use serde::{Deserialize, Serialize};

//===============================================================================
// CONSTANTS
//===============================================================================

pub const DEFAULT_STARTING_ENERGY : f32 = 100.0;    // Energy a creature is "born" with

//===============================================================================
// Creature Declarations
//===============================================================================

/// Position of a creature on the grid
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x : usize,
    pub y : usize,
}

/// A single creature. The creature exclusively owns its genome and the brain
/// built from it; the grid refers to the creature only through its ID
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creature {
    /// Stable ID used as the grid occupant tag (never zero)
    pub id : u32,

    /// Current position on the grid
    pub position : Position,

    /// Executable neural graph decoded from the genome
    pub brain : Brain,

    /// The fixed-length genome this creature was built from
    pub genome : Vec<Gene>,

    /// Current energy level. A creature with energy <= 0 is dead
    pub energy : f32,

    /// Age in ticks
    pub age : u32,

    /// Generation number this creature belongs to
    pub generation : u32,
}

impl Creature {

    /// Create a creature from an existing genome, building its brain
    pub fn from_genome(id : u32, genome : Vec<Gene>) -> Creature {
        let brain = Brain::from_genome(&genome);
        return Creature {
            id : id,
            position : Position { x : 0, y : 0 },
            brain : brain,
            genome : genome,
            energy : DEFAULT_STARTING_ENERGY,
            age : 0,
            generation : 0,
        };
    }

    /// Create a creature with a uniformly random genome of the given length
    pub fn spawn_random<R : Rng>(id : u32, genome_length : usize, rng : &mut R) -> Creature {
        let genome = genetics::random_genome(genome_length, rng);
        return Creature::from_genome(id, genome);
    }

    /// Set position on the board
    pub fn set_position(&mut self, x : usize, y : usize) {
        self.position.x = x;
        self.position.y = y;
    }

    /// Returns true if the creature is out of energy
    pub fn is_dead(&self) -> bool {
        return self.energy <= 0.0;
    }
}


/// Unit tests for the creature
#[cfg(test)]
mod creature_test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Random spawn produces a full-length genome and default vitals
    #[test]
    fn test_spawn_random() {
        let mut rng = StdRng::seed_from_u64(11);
        let creature = Creature::spawn_random(1, 16, &mut rng);

        assert_eq!(creature.id, 1);
        assert_eq!(creature.genome.len(), 16);
        assert_eq!(creature.energy, DEFAULT_STARTING_ENERGY);
        assert_eq!(creature.age, 0);
        assert_eq!(creature.generation, 0);
    }

    /// An empty genome still builds a (zero-neuron) brain
    #[test]
    fn test_empty_genome_creature() {
        let creature = Creature::from_genome(1, Vec::new());
        assert_eq!(creature.brain.num_neurons(), 0);
    }
}

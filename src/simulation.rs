/** ===============================================================================
 * File: simulation.rs
 * Author: Scott Stack
 * Description: Core simulation driver. Implements the per-tick loop (sense ->
 * propagate -> act for every creature on the grid) and the generation boundary
 * (survival selection, crossover + mutation breeding, repopulation)
 * ===============================================================================*/
use crate::creature::*;
use crate::genetics;
use crate::grid::Grid;
use crate::neurons::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

//===============================================================================
// CONSTANTS
//===============================================================================

pub const DEBUG_LEVEL : usize = 0;                  // Debug print level (higher number = more detail)

// Simulation step params
pub const TICK_ENERGY_COST : f32 = 0.01;            // Energy every creature burns per tick just by existing
pub const DEFAULT_MUTATION_RATE : f32 = 0.0001;     // Default probability that one bit of an offspring genome flips

// Sensor values for the "look" neurons
pub const LOOK_VAL_BLANK : f32 = 0.0;               // Adjacent cell is unoccupied
pub const LOOK_VAL_OCCUPIED : f32 = -1.0;           // Adjacent cell holds another creature
pub const LOOK_VAL_OFF_GRID : f32 = -2.0;           // Adjacent cell is outside the grid

// Offsets for the 8 directions shared by the look/look-for-wall/move rosters,
// in neuron ID order (N, NE, E, SE, S, SW, W, NW)
pub const DIRECTION_OFFSETS : [(isize, isize); 8] = [
    (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1),
];

const FREE_CELL_SEARCH_WATCHDOG : usize = 10_000;   // Attempts before giving up on random placement

//===============================================================================
// Simulation Declarations
//===============================================================================

/// Defines all possible error codes for the simulation
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimErrors {
    ExtinctErr,     // No creature met the survival criterion - the population is extinct
}

/// Structure that defines all input parameters to a new simulation. All values
/// are static for the whole run
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct SimParams {
    pub grid_width : usize,         // X size of the grid in cells
    pub grid_height : usize,        // Y size of the grid in cells
    pub max_creatures : usize,      // Number of creatures each generation is populated with
    pub max_steps : usize,          // Number of ticks per generation
    pub genome_length : usize,      // Number of genes in each creature's genome
    pub mutation_rate : f32,        // Per-genome probability of a single bit flip per offspring
    pub num_walls : usize,          // Number of wall cells scattered over the grid at startup
}

impl SimParams {
    /// Return a default version of the parameters
    pub fn new() -> SimParams {
        return SimParams {
            grid_width : 64,
            grid_height : 64,
            max_creatures : 100,
            max_steps : 250,
            genome_length : 24,
            mutation_rate : DEFAULT_MUTATION_RATE,
            num_walls : 0,
        };
    }

    /// Load parameters from a JSON file, falling back to the defaults if the
    /// file can't be read or parsed
    pub fn load_from_json_file(json_file : &str) -> SimParams {
        let contents = match std::fs::read_to_string(json_file) {
            Err(e) => {
                println!("Error: could not open parameter file {}. Error = {}", json_file, e);
                return SimParams::new();
            }
            Ok(contents) => contents,
        };

        match serde_json::from_str::<SimParams>(&contents) {
            Err(e) => {
                println!("Error: could not parse parameter file {}. Error = {}", json_file, e);
                return SimParams::new();
            }
            Ok(params) => return params,
        }
    }
}

/// The whole simulation - the grid plus the authoritative creature store. The
/// grid refers to creatures only by ID; every creature exclusively owns its
/// genome and brain
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Simulation {
    pub params : SimParams,
    pub grid : Grid,
    pub creatures : Vec<Creature>,
}

impl Simulation {

    /// Create a new randomly populated simulation - scatter the requested walls,
    /// then spawn `max_creatures` random-genome creatures on random free cells
    pub fn new_rand<R : Rng>(params : &SimParams, rng : &mut R) -> Simulation {
        // Cap the population at the number of cells on the board
        let mut max_creatures = params.max_creatures;
        if max_creatures > params.grid_width * params.grid_height {
            max_creatures = params.grid_width * params.grid_height;
        }

        let mut grid = Grid::new(params.grid_width, params.grid_height, max_creatures);

        // Scatter walls on cells that aren't already walls
        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < params.num_walls {
            let x = rng.gen_range(0..grid.width);
            let y = rng.gen_range(0..grid.height);
            if !grid.get_cell(x, y).flags.wall {
                grid.add_wall(x, y);
                walls_placed += 1;
            } else {
                attempts += 1;
                if attempts > FREE_CELL_SEARCH_WATCHDOG {
                    panic!("Error: could not place {} walls on the board!", params.num_walls);
                }
            }
        }

        let mut creatures : Vec<Creature> = Vec::with_capacity(max_creatures);
        for creature_num in 0..max_creatures {
            let mut creature = Creature::spawn_random((creature_num + 1) as u32, params.genome_length, rng);
            let pos = get_rand_blank_cell(&grid, rng);
            creature.set_position(pos.x, pos.y);
            grid.set_occupant(pos.x, pos.y, creature.id);
            creatures.push(creature);
        }
        grid.num_creatures = creatures.len();

        return Simulation {
            params : *params,
            grid : grid,
            creatures : creatures,
        };
    }

    /// Advance the simulation one tick. The occupant IDs are snapshotted in
    /// row-major order at tick start so that a creature moving into a cell
    /// later in the sweep still acts exactly once
    pub fn advance_tick<R : Rng>(&mut self, rng : &mut R) {
        self.grid.tick += 1;

        if DEBUG_LEVEL > 0 {
            println!("===================== TICK {} (gen {}) ===============", self.grid.tick, self.grid.generation);
        }

        let order = self.grid.occupant_ids_row_major();
        for creature_id in order {
            match self.creature_idx_from_id(creature_id) {
                Some(creature_idx) => self.update_creature(creature_idx, rng),
                None => (),
            }
        }
    }

    /// Run one full generation - `max_steps` ticks followed by the generation
    /// boundary. Returns the survivor count, or an error if the population went
    /// extinct (either mid-generation or at selection)
    pub fn run_generation<R : Rng>(&mut self, rng : &mut R) -> Result<usize, SimErrors> {
        for _step in 0..self.params.max_steps {
            self.advance_tick(rng);
            if self.grid.num_creatures == 0 {
                return Err(SimErrors::ExtinctErr);
            }
        }
        return self.next_generation(rng);
    }

    /// Update a single creature for this tick: vacate if dead, otherwise sense,
    /// propagate, and dispatch the winning action
    fn update_creature<R : Rng>(&mut self, creature_idx : usize, rng : &mut R) {
        let creature = &mut self.creatures[creature_idx];

        // Dead creatures vacate their cell and are skipped
        if creature.is_dead() {
            self.grid.clear_occupant(creature.position.x, creature.position.y);
            if self.grid.num_creatures > 0 {
                self.grid.num_creatures -= 1;
            }
            return;
        }

        creature.age += 1;
        creature.energy -= TICK_ENERGY_COST;

        // Load fresh sensory inputs. Overwriting the sensory accumulators here is
        // also their per-tick reset
        for sensory_pos in 0..creature.brain.sensory_indices.len() {
            let neuron_idx = creature.brain.sensory_indices[sensory_pos];
            let sensory_id = creature.brain.neurons[neuron_idx].id;
            let value = sense(sensory_id, creature.position.x, creature.position.y, &self.grid);
            creature.brain.neurons[neuron_idx].data = value;
        }

        creature.brain.propagate();

        // Dispatch the strongest action if it's in the action bank and beats its
        // activation threshold
        if let Some(action_idx) = creature.brain.select_action() {
            let action_id = creature.brain.neurons[action_idx].id;
            let action_data = creature.brain.neurons[action_idx].data;
            let threshold = creature.brain.neurons[action_idx].activation_threshold;

            if action_id >= ACTION_NEURONS_OFFSET && action_data > threshold {
                if DEBUG_LEVEL > 1 {
                    println!("Creature {} takes action {} ({:.3})", creature.id, neuron_label(action_id), action_data);
                }
                perform_action(action_id, &mut self.grid, creature, rng);
            }
        }
    }

    /// Indices of the creatures that meet the survival criterion: still alive
    /// and in the upper half of the grid
    pub fn survivors(&self) -> Vec<usize> {
        let mut survivor_indices : Vec<usize> = Vec::new();
        for creature_idx in 0..self.creatures.len() {
            let creature = &self.creatures[creature_idx];
            if creature.energy > 0.0 && creature.position.y < self.grid.height / 2 {
                survivor_indices.push(creature_idx);
            }
        }
        return survivor_indices;
    }

    /// Fire the generation boundary - select survivors, breed `max_creatures`
    /// offspring from them, and repopulate the board.
    ///
    /// The new creature vector replaces the old one in a single swap, so every
    /// previous brain and genome is released there and no half-replaced creature
    /// can be observed. All occupants are cleared before placement so stale
    /// occupancy never accumulates across generations
    pub fn next_generation<R : Rng>(&mut self, rng : &mut R) -> Result<usize, SimErrors> {
        let survivor_indices = self.survivors();
        self.grid.num_survivors_last_gen = survivor_indices.len();

        if DEBUG_LEVEL > 0 {
            println!("Generation {} over: {} survivors", self.grid.generation, survivor_indices.len());
        }
        if survivor_indices.is_empty() {
            return Err(SimErrors::ExtinctErr);
        }

        // Breed the next population. Both parents are drawn uniformly (with
        // replacement) from the survivors, so a creature may breed with itself
        let next_generation_num = self.grid.generation + 1;
        let mut new_creatures : Vec<Creature> = Vec::with_capacity(self.grid.max_creatures);
        for creature_num in 0..self.grid.max_creatures {
            let parent1 = &self.creatures[survivor_indices[rng.gen_range(0..survivor_indices.len())]];
            let parent2 = &self.creatures[survivor_indices[rng.gen_range(0..survivor_indices.len())]];

            let mut child_genome = genetics::two_point_crossover(&parent1.genome, &parent2.genome, rng);
            genetics::mutate(&mut child_genome, self.params.mutation_rate, rng);

            let mut child = Creature::from_genome((creature_num + 1) as u32, child_genome);
            child.generation = next_generation_num;
            new_creatures.push(child);
        }

        // Transactional swap - the previous generation's brains and genomes are
        // dropped here, before any offspring is placed
        self.creatures = new_creatures;
        self.grid.clear_all_occupants();

        for creature_idx in 0..self.creatures.len() {
            let pos = get_rand_blank_cell(&self.grid, rng);
            self.creatures[creature_idx].set_position(pos.x, pos.y);
            self.grid.set_occupant(pos.x, pos.y, self.creatures[creature_idx].id);
        }

        self.grid.num_creatures = self.creatures.len();
        self.grid.generation = next_generation_num;
        self.grid.tick = 0;

        return Ok(self.grid.num_survivors_last_gen);
    }

    /// Get the index of the creature into the creatures array from creature ID
    pub fn creature_idx_from_id(&self, creature_id : u32) -> Option<usize> {
        for creature_idx in 0..self.creatures.len() {
            if self.creatures[creature_idx].id == creature_id {
                return Some(creature_idx);
            }
        }
        return None;
    }

    /// Print the current state of the board
    pub fn show(&self) {
        println!();
        let num_dashes = self.grid.width * 3 + 2;
        println!("{:-<width$}", " ", width = num_dashes); // print horizontal dashes
        for y in 0..self.grid.height {
            print!("|");
            for x in 0..self.grid.width {
                let cell = self.grid.get_cell(x, y);
                if cell.flags.occupied {
                    print!("{:3}", cell.creature_id % 1000); // just wrap around if the creature id goes beyond 3 digits
                } else if cell.flags.wall {
                    print!("|-|");
                } else {
                    print!("   ");
                }
            }
            println!("|");
        }
        println!("{:-<width$}", " ", width = num_dashes);
        println!("Key:\nCreature = <id num>\nWall = |-|");
    }

    /// Print all creature info in columns to stdout
    pub fn show_all_creature_info(&self) {
        println!("{:12} {:12} {:12} {:12} {:12}", "Creature Id", "Age", "Energy", "Position", "Generation");
        for creature_idx in 0..self.creatures.len() {
            let creature = &self.creatures[creature_idx];
            let pos = format!("({},{})", creature.position.x, creature.position.y);
            println!("{:<12} {:<12} {:<12.2} {:<12} {:<12}", creature.id, creature.age, creature.energy, pos, creature.generation);
        }
    }

    /// Return a JSON string snapshot of the whole simulation
    pub fn to_json(&self) -> String {
        let json_string = serde_json::to_string_pretty(&self);
        return json_string.expect("Error converting simulation to JSON");
    }
}

//===============================================================================
// Sensors / actuators
//===============================================================================

/// Translate a sensory neuron ID plus a creature position into a scalar input.
///
/// * `L_*` look neurons report the adjacent cell one step away: 0.0 when blank,
///   -1.0 when occupied, -2.0 when off-grid.
/// * `LW_*` look-for-wall neurons walk until a wall cell or the board edge and
///   report the reciprocal of the step distance (or the raw distance when it
///   is zero, i.e. standing at the edge).
/// * Any other ID yields the minimum-float "no data" sentinel
pub fn sense(sensory_id : NeuronId, x : usize, y : usize, grid : &Grid) -> f32 {
    match sensory_id {
        L_N..=L_NW => {
            let (dx, dy) = DIRECTION_OFFSETS[(sensory_id - L_N) as usize];
            let target_x = x as isize + dx;
            let target_y = y as isize + dy;
            if !grid.in_bounds(target_x, target_y) {
                return LOOK_VAL_OFF_GRID;
            }
            if grid.get_cell(target_x as usize, target_y as usize).flags.occupied {
                return LOOK_VAL_OCCUPIED;
            }
            return LOOK_VAL_BLANK;
        }

        LW_N..=LW_NW => {
            let (dx, dy) = DIRECTION_OFFSETS[(sensory_id - LW_N) as usize];
            let mut steps : usize = 0;
            let mut cur_x = x as isize;
            let mut cur_y = y as isize;
            let distance : f32;
            loop {
                cur_x += dx;
                cur_y += dy;
                if !grid.in_bounds(cur_x, cur_y) {
                    // Reached the boundary without finding a wall
                    distance = steps as f32;
                    break;
                }
                steps += 1;
                if grid.get_cell(cur_x as usize, cur_y as usize).flags.wall {
                    distance = steps as f32;
                    break;
                }
            }
            if distance > 0.0 {
                return 1.0 / distance;
            }
            return distance;
        }

        _ => return f32::MIN,
    }
}

/// Execute an action neuron's grid mutation for a creature. The random-move
/// action is resolved to a uniformly chosen direction first. A move succeeds
/// only when the destination cell is inside the grid and unoccupied; otherwise
/// the tick is a no-op for this creature
pub fn perform_action<R : Rng>(action_id : NeuronId, grid : &mut Grid, creature : &mut Creature, rng : &mut R) {
    let mut action_id = action_id;
    if action_id == M_R {
        action_id = M_N + rng.gen_range(0..8);
    }
    if action_id < M_N || action_id > M_NW {
        return;
    }

    let (dx, dy) = DIRECTION_OFFSETS[(action_id - M_N) as usize];
    let target_x = creature.position.x as isize + dx;
    let target_y = creature.position.y as isize + dy;
    if !grid.in_bounds(target_x, target_y) {
        return;
    }

    let target_x = target_x as usize;
    let target_y = target_y as usize;
    if grid.get_cell(target_x, target_y).flags.occupied {
        return;
    }

    grid.clear_occupant(creature.position.x, creature.position.y);
    grid.set_occupant(target_x, target_y, creature.id);
    creature.set_position(target_x, target_y);
}

/// Get a random cell on the board that isn't already occupied
fn get_rand_blank_cell<R : Rng>(grid : &Grid, rng : &mut R) -> Position {
    let mut attempts : usize = 0;
    loop {
        let x = rng.gen_range(0..grid.width);
        let y = rng.gen_range(0..grid.height);
        if !grid.get_cell(x, y).flags.occupied {
            return Position { x : x, y : y };
        }

        attempts += 1;
        if attempts > FREE_CELL_SEARCH_WATCHDOG {
            panic!("Error! No blank cells left on the board!");
        }
    }
}

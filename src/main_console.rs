/** ===============================================================================
 * File: main_console.rs
 * Author: Scott Stack
 * Description: main application entry point for the console version of the
 * neural creatures evolution sim
 * ===============================================================================*/
use neural_creatures::simulation::*;
use neural_creatures::telemetry;
use std::env;

// Default parameters that the console simulation will start with
const DEFAULT_CONSOLE_PARAMS : SimParams = SimParams {
    grid_width : 48,
    grid_height : 32,
    max_creatures : 64,
    max_steps : 200,
    genome_length : 24,
    mutation_rate : DEFAULT_MUTATION_RATE,
    num_walls : 60,
};

// How often to re-draw the board on the console
const SHOW_BOARD_EVERY_N_GENERATIONS : u32 = 25;

// Telemetry output files (overwritten every generation)
const NEURONS_CSV_FILE : &str = "neurons.csv";
const CONNECTIONS_CSV_FILE : &str = "connections.csv";
const GRID_CSV_FILE : &str = "grid.csv";

/// Main function for the command line sim version. Takes an optional path to a
/// JSON parameter file as the only argument
fn main() {
    let args : Vec<String> = env::args().collect();
    let params : SimParams;
    if args.len() > 1 {
        params = SimParams::load_from_json_file(&args[1]);
    } else {
        params = DEFAULT_CONSOLE_PARAMS;
    }

    run_console_demo_mode(&params);
}

/// Run generations until the population goes extinct, printing survivor stats
/// and dumping telemetry for one sampled survivor each generation
fn run_console_demo_mode(params : &SimParams) {
    let mut rng = rand::thread_rng();
    let mut sim = Simulation::new_rand(params, &mut rng);

    println!("Starting sim: {}x{} board, {} creatures, {} steps/generation, genome length {}",
        params.grid_width, params.grid_height, sim.creatures.len(), params.max_steps, params.genome_length);
    sim.show();

    loop {
        // Run one generation's worth of ticks
        for _step in 0..params.max_steps {
            sim.advance_tick(&mut rng);
        }

        // Dump telemetry before the boundary replaces the population - sample
        // the first creature currently meeting the survival criterion
        if let Some(&survivor_idx) = sim.survivors().first() {
            let brain = &sim.creatures[survivor_idx].brain;
            if let Err(e) = telemetry::write_neurons_csv(brain, NEURONS_CSV_FILE) {
                println!("Error writing {}: {}", NEURONS_CSV_FILE, e);
            }
            if let Err(e) = telemetry::write_connections_csv(brain, CONNECTIONS_CSV_FILE) {
                println!("Error writing {}: {}", CONNECTIONS_CSV_FILE, e);
            }
        }
        if let Err(e) = telemetry::write_grid_csv(&sim.grid, GRID_CSV_FILE) {
            println!("Error writing {}: {}", GRID_CSV_FILE, e);
        }

        // Fire the generation boundary
        match sim.next_generation(&mut rng) {
            Ok(num_survivors) => {
                println!("Generation {:5} | survivors {:4} / {:4}",
                    sim.grid.generation, num_survivors, sim.grid.max_creatures);
                if sim.grid.generation % SHOW_BOARD_EVERY_N_GENERATIONS == 0 {
                    sim.show();
                }
            }
            Err(SimErrors::ExtinctErr) => {
                println!("Population extinct after {} generations", sim.grid.generation);
                sim.show();
                break;
            }
        }
    }
}

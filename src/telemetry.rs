/** ===============================================================================
 * File: telemetry.rs
 * Author: Scott Stack
 * Description: CSV telemetry writers - per-brain neuron/connection dumps and a
 * full grid dump, written once per generation for offline visualization
 * ===============================================================================*/
use crate::brain::Brain;
use crate::grid::Grid;
use crate::neurons::neuron_label;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};

/// Write one row per neuron of the given brain
pub fn write_neurons_csv(brain : &Brain, filename : &str) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "Index,Type,ID,Label")?;
    for idx in 0..brain.neurons.len() {
        let neuron = &brain.neurons[idx];
        writeln!(file, "{},{},{},{}", idx, neuron.ntype.label(), neuron.id, neuron_label(neuron.id))?;
    }
    return Ok(());
}

/// Write one row per connection of the given brain
pub fn write_connections_csv(brain : &Brain, filename : &str) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "SourceID,TargetID,Weight,ActivationFunction")?;
    for idx in 0..brain.neurons.len() {
        let neuron = &brain.neurons[idx];
        for conn_idx in 0..neuron.connections.len() {
            let conn = &neuron.connections[conn_idx];
            let target_id = brain.neurons[conn.dest].id;
            writeln!(file, "{},{},{:.6},{}", neuron.id, target_id, conn.weight, conn.activation.label())?;
        }
    }
    return Ok(());
}

/// Write one row per grid cell in row-major order, flags as 0/1
pub fn write_grid_csv(grid : &Grid, filename : &str) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "X,Y,Occupied,Food,Poison,Wall,Sunlit,Water,CreatureID")?;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let cell = grid.get_cell(x, y);
            writeln!(file, "{},{},{},{},{},{},{},{},{}",
                x, y,
                cell.flags.occupied as u8,
                cell.flags.food as u8,
                cell.flags.poison as u8,
                cell.flags.wall as u8,
                cell.flags.sunlit as u8,
                cell.flags.water as u8,
                cell.creature_id)?;
        }
    }
    return Ok(());
}

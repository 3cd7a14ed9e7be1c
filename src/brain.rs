/** ===============================================================================
 * File: brain.rs
 * Author: Scott Stack
 * Description: Builds an executable neural graph (the creature's "brain") from a
 * genome and propagates sensory signals through it to the action neurons
 * ===============================================================================*/
use crate::gene::Gene;
use crate::neurons::*;
use serde::{Deserialize, Serialize};

//===============================================================================
// Brain Declarations
//===============================================================================

/// The decoded, executable neural graph derived from a genome.
///
/// Neurons live in an arena vector in first-introduction order, so the dense
/// indices recorded by connections and by the sensory/action lists stay stable
/// for the brain's whole lifetime. The graph may contain cycles, including
/// self-loops
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Brain {
    /// All neurons referenced by the genome, in the order they first appeared
    pub neurons : Vec<Neuron>,

    /// Arena indices of sensory neurons, in first-introduction order
    pub sensory_indices : Vec<usize>,

    /// Arena indices of action neurons, in first-introduction order
    pub action_indices : Vec<usize>,
}

impl Brain {

    /// Build a brain from a genome.
    ///
    /// First pass scans the genome in order, interning the source and destination
    /// neuron of every non-inert gene the first time each ID is seen. Each neuron
    /// is tagged with the bank inferred from the gene that introduced it (the bank
    /// arithmetic keeps later introductions consistent, so a tag never changes).
    /// Second pass appends one outgoing connection per non-inert gene; duplicate
    /// source/dest pairs stay distinct. A genome in which every gene is inert
    /// produces a valid brain with zero neurons
    pub fn from_genome(genome : &[Gene]) -> Brain {
        // Reserve using the genome length as the upper bound on distinct neurons,
        // then shrink to the exact sizes once the structure is known
        let mut brain = Brain {
            neurons : Vec::with_capacity(genome.len() * 2),
            sensory_indices : Vec::with_capacity(genome.len()),
            action_indices : Vec::with_capacity(genome.len()),
        };

        for gene_idx in 0..genome.len() {
            if let Some(decoded) = genome[gene_idx].decode() {
                brain.intern(decoded.source_id, decoded.source_type);
                brain.intern(decoded.dest_id, decoded.dest_type);
            }
        }

        for gene_idx in 0..genome.len() {
            if let Some(decoded) = genome[gene_idx].decode() {
                // Both ends were interned in the first pass, so the lookups cannot miss
                let source_idx = match brain.index_of(decoded.source_id) {
                    Some(idx) => idx,
                    None => continue,
                };
                let dest_idx = match brain.index_of(decoded.dest_id) {
                    Some(idx) => idx,
                    None => continue,
                };
                brain.neurons[source_idx].connections.push(Connection {
                    dest : dest_idx,
                    weight : decoded.weight,
                    activation : decoded.activation,
                });
            }
        }

        brain.neurons.shrink_to_fit();
        brain.sensory_indices.shrink_to_fit();
        brain.action_indices.shrink_to_fit();

        return brain;
    }

    /// Add a neuron for the given ID if it hasn't been seen yet, recording
    /// sensory/action members into the brain's index lists as they appear
    fn intern(&mut self, id : NeuronId, ntype : NeuronType) {
        if self.index_of(id).is_some() {
            return;
        }

        self.neurons.push(Neuron::new(id, ntype));
        let arena_idx = self.neurons.len() - 1;
        match ntype {
            NeuronType::Sensory => self.sensory_indices.push(arena_idx),
            NeuronType::Action => self.action_indices.push(arena_idx),
            _ => (),
        }
    }

    /// Find the arena index of the neuron with the given ID
    pub fn index_of(&self, id : NeuronId) -> Option<usize> {
        for idx in 0..self.neurons.len() {
            if self.neurons[idx].id == id {
                return Some(idx);
            }
        }
        return None;
    }

    /// Total number of neurons in this brain
    pub fn num_neurons(&self) -> usize {
        return self.neurons.len();
    }

    /// Propagate signals from the sensory neurons to the rest of the graph.
    ///
    /// For each sensory neuron, in index-list order, a depth-first traversal
    /// follows outgoing connections. Crossing a connection adds
    /// `weight * activation(source.data)` to the destination's accumulator -
    /// the activation function is applied to the *source's* current data.
    /// A destination already on the current DFS path receives the contribution
    /// but is not re-entered; the on-path mark is cleared on return so the same
    /// neuron may be visited again from a sibling subtree. This makes the
    /// traversal equivalent to one pass of every simple directed path rooted at
    /// a sensory neuron, and guarantees termination on cyclic graphs.
    ///
    /// Accumulators are not reset here - within a tick contributions are
    /// cumulative, and the per-tick reset happens when the driver writes fresh
    /// sensory inputs
    pub fn propagate(&mut self) {
        let mut on_path : Vec<bool> = vec![false; self.neurons.len()];

        // Explicit (neuron index, next connection cursor) stack instead of
        // recursion, so a pathological genome can't exhaust the host stack
        let mut stack : Vec<(usize, usize)> = Vec::new();

        for sensory_pos in 0..self.sensory_indices.len() {
            let root = self.sensory_indices[sensory_pos];
            on_path[root] = true;
            stack.push((root, 0));

            while let Some(&(neuron_idx, cursor)) = stack.last() {
                if cursor >= self.neurons[neuron_idx].connections.len() {
                    on_path[neuron_idx] = false;
                    stack.pop();
                    continue;
                }
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }

                let conn = self.neurons[neuron_idx].connections[cursor];
                let source_data = self.neurons[neuron_idx].data;
                self.neurons[conn.dest].data += conn.weight * conn.activation.apply(source_data);

                if !on_path[conn.dest] {
                    on_path[conn.dest] = true;
                    stack.push((conn.dest, 0));
                }
            }
        }
    }

    /// Get the arena index of the action neuron with the highest accumulator.
    /// Ties go to the earliest entry in the action index list. Returns None for
    /// a brain with no action neurons
    pub fn select_action(&self) -> Option<usize> {
        let mut best_idx : Option<usize> = None;
        let mut best_data = f32::MIN;

        for action_pos in 0..self.action_indices.len() {
            let idx = self.action_indices[action_pos];
            if self.neurons[idx].data > best_data {
                best_data = self.neurons[idx].data;
                best_idx = Some(idx);
            }
        }
        return best_idx;
    }
}


/// Unit tests for brain building and signal propagation
#[cfg(test)]
mod brain_test {
    use super::*;
    use crate::gene::test_util::{make_gene, raw_weight_for};

    /// Build a minimal hand-assembled brain for propagation tests. `edges` are
    /// (source arena idx, dest arena idx, weight, activation); `roster` gives the
    /// (id, type) of each neuron in arena order
    fn assemble_brain(roster : &[(NeuronId, NeuronType)], edges : &[(usize, usize, f32, ActivationFunction)]) -> Brain {
        let mut brain = Brain {
            neurons : Vec::new(),
            sensory_indices : Vec::new(),
            action_indices : Vec::new(),
        };
        for i in 0..roster.len() {
            let (id, ntype) = roster[i];
            brain.neurons.push(Neuron::new(id, ntype));
            match ntype {
                NeuronType::Sensory => brain.sensory_indices.push(i),
                NeuronType::Action => brain.action_indices.push(i),
                _ => (),
            }
        }
        for &(src, dest, weight, activation) in edges {
            brain.neurons[src].connections.push(Connection { dest, weight, activation });
        }
        return brain;
    }

    /// A genome in which every gene is inert builds an empty brain
    #[test]
    fn test_all_inert_genome_builds_empty_brain() {
        let genome = vec![
            make_gene(3, 0, 1, 0, 0, 0),    // invalid input type
            make_gene(0, 0, 0, 0, 0, 0),    // invalid output type
            make_gene(2, 0, 3, 0, 0, 0),    // empty constant bank
        ];
        let brain = Brain::from_genome(&genome);
        assert_eq!(brain.num_neurons(), 0);
        assert!(brain.sensory_indices.is_empty());
        assert!(brain.action_indices.is_empty());

        // An empty brain still propagates and selects no action
        let mut brain = brain;
        brain.propagate();
        assert_eq!(brain.select_action(), None);
    }

    /// Neurons appear in the arena in first-introduction order and land in the
    /// right index lists
    #[test]
    fn test_builder_first_seen_order() {
        let genome = vec![
            make_gene(0, 0, 1, 0, 0, 0),    // L_n -> I_0
            make_gene(0, 2, 3, 0, 0, 0),    // L_e -> M_n
            make_gene(0, 0, 3, 0, 0, 0),    // L_n -> M_n (both already interned)
        ];
        let brain = Brain::from_genome(&genome);

        assert_eq!(brain.num_neurons(), 4);
        assert_eq!(brain.neurons[0].id, L_N);
        assert_eq!(brain.neurons[1].id, I_0);
        assert_eq!(brain.neurons[2].id, L_E);
        assert_eq!(brain.neurons[3].id, M_N);
        assert_eq!(brain.sensory_indices, vec![0, 2]);
        assert_eq!(brain.action_indices, vec![3]);

        // Connections resolved to arena indices, one per non-inert gene
        assert_eq!(brain.neurons[0].connections.len(), 2);
        assert_eq!(brain.neurons[0].connections[0].dest, 1);
        assert_eq!(brain.neurons[0].connections[1].dest, 3);
        assert_eq!(brain.neurons[2].connections.len(), 1);
        assert_eq!(brain.neurons[2].connections[0].dest, 3);
    }

    /// Duplicate source/dest pairs with different weights stay distinct
    #[test]
    fn test_duplicate_connections_stay_distinct() {
        let genome = vec![
            make_gene(0, 0, 1, 0, raw_weight_for(1.0), 0),
            make_gene(0, 0, 1, 0, raw_weight_for(2.0), 0),
        ];
        let brain = Brain::from_genome(&genome);
        assert_eq!(brain.neurons[0].connections.len(), 2);
        assert!((brain.neurons[0].connections[0].weight - 1.0).abs() < 1e-5);
        assert!((brain.neurons[0].connections[1].weight - 2.0).abs() < 1e-5);
    }

    /// On an acyclic chain S -> N1 -> N2 with positive data and ReLU (identity on
    /// positives), the terminal accumulator is the product of the weights and the
    /// sensory input
    #[test]
    fn test_linear_chain_propagation() {
        let mut brain = assemble_brain(
            &[(L_N, NeuronType::Sensory), (I_0, NeuronType::Internal), (M_N, NeuronType::Action)],
            &[
                (0, 1, 0.5, ActivationFunction::Relu),
                (1, 2, 0.25, ActivationFunction::Relu),
            ],
        );
        brain.neurons[0].data = 2.0;
        brain.propagate();

        assert!((brain.neurons[1].data - 1.0).abs() < 1e-6);        // 0.5 * 2.0
        assert!((brain.neurons[2].data - 0.25).abs() < 1e-6);       // 0.25 * (0.5 * 2.0)
    }

    /// A self-loop applies its contribution exactly once per DFS visit and
    /// terminates
    #[test]
    fn test_self_loop_terminates() {
        let mut brain = assemble_brain(
            &[(L_N, NeuronType::Sensory)],
            &[(0, 0, 0.5, ActivationFunction::Relu)],
        );
        brain.neurons[0].data = 2.0;
        brain.propagate();

        // data = 2.0 + 0.5 * relu(2.0)
        assert!((brain.neurons[0].data - 3.0).abs() < 1e-6);
    }

    /// A two-node cycle terminates; the back edge contributes once without
    /// re-entering the on-path node
    #[test]
    fn test_cycle_propagation() {
        let mut brain = assemble_brain(
            &[(L_N, NeuronType::Sensory), (I_0, NeuronType::Internal), (I_1, NeuronType::Internal)],
            &[
                (0, 1, 1.0, ActivationFunction::Relu),      // S -> A
                (1, 2, 1.0, ActivationFunction::Relu),      // A -> B
                (2, 1, 1.0, ActivationFunction::Relu),      // B -> A (back edge)
            ],
        );
        brain.neurons[0].data = 1.0;
        brain.propagate();

        // A picks up 1.0 from S, then 1.0 more from B's back edge once B has
        // been reached through it. B sees A's value at edge-crossing time (1.0)
        assert!((brain.neurons[1].data - 2.0).abs() < 1e-6);
        assert!((brain.neurons[2].data - 1.0).abs() < 1e-6);
    }

    /// The activation function is applied to the source's current accumulator,
    /// not the destination's
    #[test]
    fn test_activation_applies_to_source_data() {
        let mut brain = assemble_brain(
            &[(L_N, NeuronType::Sensory), (M_N, NeuronType::Action)],
            &[(0, 1, 3.0, ActivationFunction::Sigmoid)],
        );
        brain.neurons[0].data = 0.0;
        brain.propagate();

        // 3.0 * sigmoid(0.0) = 1.5
        assert!((brain.neurons[1].data - 1.5).abs() < 1e-6);
    }

    /// Action selection takes the maximum accumulator, ties going to the first
    /// entry in the action index list
    #[test]
    fn test_select_action_ties_break_first() {
        let mut brain = assemble_brain(
            &[(M_N, NeuronType::Action), (M_E, NeuronType::Action), (M_S, NeuronType::Action)],
            &[],
        );
        brain.neurons[0].data = 1.0;
        brain.neurons[1].data = 1.0;
        brain.neurons[2].data = 0.5;
        assert_eq!(brain.select_action(), Some(0));

        brain.neurons[2].data = 2.0;
        assert_eq!(brain.select_action(), Some(2));
    }
}

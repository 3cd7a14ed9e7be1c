/** ===============================================================================
 * File: neurons.rs
 * Author: Scott Stack
 * Description: Fixed neuron roster (sensory / internal / constant / action banks),
 * activation functions, and the runtime neuron + connection types
 * ===============================================================================*/
use num::Float;
use serde::{Deserialize, Serialize};

//===============================================================================
// CONSTANTS
//===============================================================================

// Sizes of each neuron bank. Together these define the contiguous neuron ID
// space 0..TOTAL_NEURONS that genes fold their raw source/dest fields into
pub const NUM_SENSORY_NEURONS : u16 = 16;
pub const NUM_INTERNAL_NEURONS : u16 = 5;
pub const NUM_CONSTANT_NEURONS : u16 = 0;   // empty, reserved
pub const NUM_ACTION_NEURONS : u16 = 9;

// Starting ID of each bank
pub const SENSORY_NEURONS_OFFSET : u16 = 0;
pub const INTERNAL_NEURONS_OFFSET : u16 = NUM_SENSORY_NEURONS;
pub const CONSTANT_NEURONS_OFFSET : u16 = NUM_SENSORY_NEURONS + NUM_INTERNAL_NEURONS;
pub const ACTION_NEURONS_OFFSET : u16 = NUM_SENSORY_NEURONS + NUM_INTERNAL_NEURONS + NUM_CONSTANT_NEURONS;
pub const TOTAL_NEURONS : u16 = ACTION_NEURONS_OFFSET + NUM_ACTION_NEURONS;

pub const NUM_ACTIVATION_FUNCTIONS : u8 = 3;

// Default activation threshold assigned to every neuron in a freshly built brain.
// An action only fires when its accumulator strictly exceeds this
pub const DEFAULT_ACTIVATION_THRESHOLD : f32 = 0.0;

/// Neuron IDs are indices into the fixed ID space laid out by the banks above
pub type NeuronId = u16;

// Sensory bank - "look" neurons report the occupancy of the adjacent cell in
// each of the 8 directions
pub const L_N : NeuronId = 0;
pub const L_NE : NeuronId = 1;
pub const L_E : NeuronId = 2;
pub const L_SE : NeuronId = 3;
pub const L_S : NeuronId = 4;
pub const L_SW : NeuronId = 5;
pub const L_W : NeuronId = 6;
pub const L_NW : NeuronId = 7;

// Sensory bank - "look for wall" neurons report the distance to the nearest
// wall in each of the 8 directions
pub const LW_N : NeuronId = 8;
pub const LW_NE : NeuronId = 9;
pub const LW_E : NeuronId = 10;
pub const LW_SE : NeuronId = 11;
pub const LW_S : NeuronId = 12;
pub const LW_SW : NeuronId = 13;
pub const LW_W : NeuronId = 14;
pub const LW_NW : NeuronId = 15;

// Internal bank
pub const I_0 : NeuronId = 16;
pub const I_1 : NeuronId = 17;
pub const I_2 : NeuronId = 18;
pub const I_3 : NeuronId = 19;
pub const I_4 : NeuronId = 20;

// Action bank - move in each of the 8 directions, plus a random move
pub const M_N : NeuronId = 21;
pub const M_NE : NeuronId = 22;
pub const M_E : NeuronId = 23;
pub const M_SE : NeuronId = 24;
pub const M_S : NeuronId = 25;
pub const M_SW : NeuronId = 26;
pub const M_W : NeuronId = 27;
pub const M_NW : NeuronId = 28;
pub const M_R : NeuronId = 29;

// Textual labels for each neuron ID in the roster. External telemetry
// consumers depend on these exact strings and their order
const NEURON_LABELS : [&str; TOTAL_NEURONS as usize] = [
    "L_n", "L_ne", "L_e", "L_se", "L_s", "L_sw", "L_w", "L_nw",
    "LW_n", "LW_ne", "LW_e", "LW_se", "LW_s", "LW_sw", "LW_w", "LW_nw",
    "I_0", "I_1", "I_2", "I_3", "I_4",
    "M_n", "M_ne", "M_e", "M_se", "M_s", "M_sw", "M_w", "M_nw", "M_r",
];

/// Get the textual label for a neuron ID
pub fn neuron_label(id : NeuronId) -> &'static str {
    if (id as usize) < NEURON_LABELS.len() {
        return NEURON_LABELS[id as usize];
    }
    return "unknown";
}

//===============================================================================
// Neuron type / activation function declarations
//===============================================================================

/// Which bank a neuron belongs to
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NeuronType {
    Sensory,    // populated externally each tick
    Internal,   // intermediate
    Constant,   // reserved (the constant bank is currently empty)
    Action,     // candidates for the creature's action each tick
}

impl NeuronType {
    /// Textual label used in telemetry output
    pub fn label(&self) -> &'static str {
        match self {
            NeuronType::Sensory => return "Sensory",
            NeuronType::Internal => return "Internal",
            NeuronType::Constant => return "Constant",
            NeuronType::Action => return "Action",
        }
    }
}

/// Activation function applied along a connection. `Identity` is never produced
/// by gene decoding (the raw field folds modulo NUM_ACTIVATION_FUNCTIONS) - it is
/// selected only for out-of-range indices so that dispatch stays total
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Relu,
    Sigmoid,
    Tanh,
    Identity,
}

impl ActivationFunction {
    /// Map an activation function index to the function it selects
    pub fn from_index(index : u8) -> ActivationFunction {
        match index {
            0 => return ActivationFunction::Relu,
            1 => return ActivationFunction::Sigmoid,
            2 => return ActivationFunction::Tanh,
            _ => return ActivationFunction::Identity,
        }
    }

    /// Evaluate the activation function on a value
    pub fn apply<T : Float>(&self, x : T) -> T {
        match self {
            ActivationFunction::Relu => {
                if x > T::zero() {
                    return x;
                }
                return T::zero();
            }
            ActivationFunction::Sigmoid => {
                return T::one() / (T::one() + (-x).exp());
            }
            ActivationFunction::Tanh => {
                return x.tanh();
            }
            ActivationFunction::Identity => {
                return x;
            }
        }
    }

    /// Textual label used in telemetry output
    pub fn label(&self) -> &'static str {
        match self {
            ActivationFunction::Relu => return "RELU",
            ActivationFunction::Sigmoid => return "SIGMOID",
            ActivationFunction::Tanh => return "TANH",
            ActivationFunction::Identity => return "IDENTITY",
        }
    }
}

//===============================================================================
// Runtime neuron / connection declarations
//===============================================================================

/// A single outgoing connection from one neuron to another
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Dense index of the destination neuron in the owning brain's arena
    /// (resolved once at build time, so propagation never looks IDs up)
    pub dest : usize,

    /// Connection weight
    pub weight : f32,

    /// Activation function applied to the source's data on this connection
    pub activation : ActivationFunction,
}

/// A single runtime neuron. Neurons live in a brain's arena and own their
/// outgoing connection list
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Neuron {
    /// ID within the fixed neuron ID space
    pub id : NeuronId,

    /// Bank this neuron was introduced from
    pub ntype : NeuronType,

    /// Scalar accumulator holding the neuron's current signal
    pub data : f32,

    /// Threshold an action neuron's data must strictly exceed to fire
    pub activation_threshold : f32,

    /// Outgoing connections in genome order
    pub connections : Vec<Connection>,
}

impl Neuron {
    /// Create a new neuron of the given type with no connections
    pub fn new(id : NeuronId, ntype : NeuronType) -> Neuron {
        return Neuron {
            id : id,
            ntype : ntype,
            data : 0.0,
            activation_threshold : DEFAULT_ACTIVATION_THRESHOLD,
            connections : Vec::new(),
        };
    }
}

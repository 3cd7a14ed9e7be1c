/** ===============================================================================
 * File: gene.rs
 * Author: Scott Stack
 * Description: Implements the 64-bit packed gene wire format and its decoder
 *
 * ===============================================================================*/
use crate::neurons::*;
use serde::{Deserialize, Serialize};

//===============================================================================
// CONSTANTS
//===============================================================================

// Raw weight field params. The 24 bit unsigned weight field is re-centered around
// zero and scaled down so that decoded weights land in roughly [-4.0, 4.0)
pub const WEIGHT_FIELD_BIAS : f32 = 8388608.0;      // 2^23
pub const WEIGHT_FIELD_SCALE : f32 = 2097152.0;     // 2^21

//===============================================================================
// Gene Declarations
//===============================================================================

/// A single gene - one 64-bit packed description of a candidate neural connection
///
/// Bit layout (most significant bit first):
/// * 2 bits  - input type (0 = sensory, 1 = internal, 2 = constant, 3 = invalid)
/// * 10 bits - raw source neuron ID (folded modulo the selected bank size, then offset)
/// * 2 bits  - output type (1 = internal, 3 = action, others invalid)
/// * 10 bits - raw destination neuron ID (folded modulo the selected bank size, then offset)
/// * 24 bits - raw weight (unsigned, re-centered to a signed float on decode)
/// * 8 bits  - activation function (modulo the number of activation functions)
/// * 8 bits  - reserved for future use
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene(pub u64);

/// Fully resolved form of a non-inert gene
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecodedGene {
    pub source_id : NeuronId,                   // resolved source neuron ID
    pub source_type : NeuronType,               // bank the source ID falls in
    pub dest_id : NeuronId,                     // resolved destination neuron ID
    pub dest_type : NeuronType,                 // bank the destination ID falls in
    pub weight : f32,                           // connection weight
    pub activation : ActivationFunction,        // activation function for the connection
}

impl Gene {

    /// Extract the input type field (top 2 bits)
    pub fn input_type(&self) -> u8 {
        return (self.0 >> 62) as u8;
    }

    /// Extract the raw (unfolded) source neuron ID field
    pub fn raw_source(&self) -> u16 {
        return ((self.0 >> 52) & 0x3FF) as u16;
    }

    /// Extract the output type field
    pub fn output_type(&self) -> u8 {
        return ((self.0 >> 50) & 0x3) as u8;
    }

    /// Extract the raw (unfolded) destination neuron ID field
    pub fn raw_dest(&self) -> u16 {
        return ((self.0 >> 40) & 0x3FF) as u16;
    }

    /// Extract the raw unsigned weight field
    pub fn raw_weight(&self) -> u32 {
        return ((self.0 >> 16) & 0xFF_FFFF) as u32;
    }

    /// Decoded connection weight as a float in roughly [-4.0, 4.0)
    pub fn weight(&self) -> f32 {
        return (self.raw_weight() as f32 - WEIGHT_FIELD_BIAS) / WEIGHT_FIELD_SCALE;
    }

    /// Extract the raw activation function field
    pub fn raw_activation(&self) -> u8 {
        return ((self.0 >> 8) & 0xFF) as u8;
    }

    /// Resolve the source bank selected by the input type. Returns the bank size,
    /// starting ID offset and type tag, or None if the input type is invalid
    fn source_bank(&self) -> Option<(u16, u16, NeuronType)> {
        match self.input_type() {
            0 => return Some((NUM_SENSORY_NEURONS, SENSORY_NEURONS_OFFSET, NeuronType::Sensory)),
            1 => return Some((NUM_INTERNAL_NEURONS, INTERNAL_NEURONS_OFFSET, NeuronType::Internal)),
            2 => return Some((NUM_CONSTANT_NEURONS, CONSTANT_NEURONS_OFFSET, NeuronType::Constant)),
            _ => return None,
        }
    }

    /// Resolve the destination bank selected by the output type. Only internal and
    /// action outputs are valid destinations
    fn dest_bank(&self) -> Option<(u16, u16, NeuronType)> {
        match self.output_type() {
            1 => return Some((NUM_INTERNAL_NEURONS, INTERNAL_NEURONS_OFFSET, NeuronType::Internal)),
            3 => return Some((NUM_ACTION_NEURONS, ACTION_NEURONS_OFFSET, NeuronType::Action)),
            _ => return None,
        }
    }

    /// Decode this gene against the fixed neuron banks. Returns None if the gene is
    /// inert (invalid input/output type, or a type that selects an empty bank) and
    /// therefore contributes no connection. Pure and total - decoding never fails
    /// in any other way
    pub fn decode(&self) -> Option<DecodedGene> {
        let (src_count, src_offset, source_type) = self.source_bank()?;
        let (dst_count, dst_offset, dest_type) = self.dest_bank()?;

        // A bank of size zero (the constant bank is currently empty) drops the gene
        if src_count == 0 || dst_count == 0 {
            return None;
        }

        return Some(DecodedGene {
            source_id : (self.raw_source() % src_count) + src_offset,
            source_type : source_type,
            dest_id : (self.raw_dest() % dst_count) + dst_offset,
            dest_type : dest_type,
            weight : self.weight(),
            activation : ActivationFunction::from_index(self.raw_activation() % NUM_ACTIVATION_FUNCTIONS),
        });
    }
}

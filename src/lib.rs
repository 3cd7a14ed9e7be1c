/**
 * @file
 * @author - Scott Stack
 * @description - Main file for the neural creatures evolution sim library that contains all core functionality
 */
pub mod gene;
pub mod neurons;
pub mod brain;
pub mod grid;
pub mod creature;
pub mod genetics;
pub mod simulation;
pub mod telemetry;

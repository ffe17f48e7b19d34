// modules for making sounds
pub mod audio;
pub mod envelope;
pub mod oscillator;
pub mod player;
pub mod wave;

// Teaching the scale
pub mod quiz;
pub mod scale;
pub mod session;
pub mod trainer;
pub mod view;

// Front end
pub mod cli;

// Utility modules
pub mod rng;

pub mod float;
pub mod activations;
pub mod losses;
pub mod initializer;
pub mod neuron;
pub mod layer;
pub mod network;
pub mod config;
pub mod normalization;
pub mod module;

pub mod prelude {
    pub use super::float::*;
    pub use super::activations::*;
    pub use super::losses::*;
    pub use super::initializer::*;
    pub use super::neuron::*;
    pub use super::layer::*;
    pub use super::network::*;
    pub use super::config::*;
    pub use super::normalization::*;
    pub use super::module::*;
}

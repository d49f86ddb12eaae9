pub mod neural_network;
pub mod table;

pub mod prelude {
    pub use super::neural_network::prelude::*;
    pub use super::table::*;
}

pub mod coords;
pub mod persist;
pub mod sim;
pub mod utils;
pub mod vision;
pub mod world;

pub use sim::{GameState, SimConfig, SimPlugin};
pub use world::{GenContext, WorldGrid, WorldPlugin};

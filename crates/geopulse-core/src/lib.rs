pub mod clock;
pub mod constants;
pub mod gate;
pub mod geo;
pub mod hud;
pub mod input;
pub mod mapping;
pub mod pulse;
pub mod state;

pub use clock::*;
pub use geo::*;
pub use mapping::*;
pub use state::*;

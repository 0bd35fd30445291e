mod mixer;
mod pointer;

pub use mixer::wire_mixer_sliders;
pub use pointer::{wire_pointer_handlers, PointerWiring};

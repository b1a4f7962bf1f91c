//! Architecture diagram: routing engine, highlight sequencer and the canvas
//! components that draw them.

mod component;
mod controller;
pub mod error;
pub mod layout;
mod legend;
pub mod routing;
mod render;
pub mod sequencer;
mod state;
pub mod types;

pub use component::FlowDiagramCanvas;
pub use controller::Controller;
pub use layout::builtin;
pub use legend::Legend;

//! Force fields: pure functions of position.

mod flow;

pub use flow::{flow_angle, flow_force, FlowFieldParams};

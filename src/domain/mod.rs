// Domain layer: flight-network models and ports (interfaces). Only std/serde/geo types here.

pub mod model;
pub mod ports;

// Domain layer: the Verdict model and the port to the text generator.

pub mod model;
pub mod ports;

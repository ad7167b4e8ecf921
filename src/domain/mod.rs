// Domain layer: booking models and the ports where behavior is injected.

pub mod model;
pub mod ports;

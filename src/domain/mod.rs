// Domain layer: upstream and catalog shapes plus the ports the core depends on.

pub mod catalog;
pub mod model;
pub mod ports;

// Domain layer: participants, assignments and the ports the pipeline drives.

pub mod model;
pub mod ports;

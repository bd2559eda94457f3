// Domain layer: session models and the ports the session store talks through.

pub mod model;
pub mod ports;

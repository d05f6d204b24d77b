// kickoff application layer: config, squad loading, generation sessions.

pub mod config;
pub mod session;
pub mod squad;

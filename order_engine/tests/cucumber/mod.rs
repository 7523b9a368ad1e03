mod ingest_world;
mod setups;
mod steps;

pub use ingest_world::IngestWorld;

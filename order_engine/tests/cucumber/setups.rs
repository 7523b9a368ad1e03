use cucumber::given;

use crate::cucumber::{ingest_world::IngestSystem, IngestWorld};

#[given("a fresh order store")]
async fn fresh_database(world: &mut IngestWorld) {
    let system = IngestSystem::new().await;
    world.system = Some(system);
}

#[given("the database is unavailable")]
async fn database_down(world: &mut IngestWorld) {
    world.system().db.close().await;
}

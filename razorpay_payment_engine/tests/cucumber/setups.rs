use cucumber::given;

use crate::cucumber::{world::ReconciliationSystem, ReconciliationWorld};

#[given("a fresh install")]
async fn fresh_install(world: &mut ReconciliationWorld) {
    let system = ReconciliationSystem::new();
    world.system = Some(system);
}

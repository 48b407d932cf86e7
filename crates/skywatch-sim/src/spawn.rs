//! Body factories for setting up the simulation world.

use rapier3d::prelude::*;

use skywatch_core::constants::{DRONE_HALF_EXTENTS, DRONE_LINEAR_DAMPING, DRONE_MASS};
use skywatch_core::types::Vec3;

use crate::world::{to_vector, PhysicsWorld};

/// Handles to the two dynamic drones. Created and destroyed together;
/// at any instant the world holds either zero drones or exactly this pair.
#[derive(Debug, Clone, Copy)]
pub struct DronePair {
    pub enemy: RigidBodyHandle,
    pub interceptor: RigidBodyHandle,
}

/// Spawn the static ground plane at y = 0.
pub fn spawn_ground(world: &mut PhysicsWorld) -> RigidBodyHandle {
    let body = RigidBodyBuilder::fixed().build();
    let handle = world.insert_rigid_body(body);
    let collider = ColliderBuilder::halfspace(Vector::y_axis()).build();
    world.insert_collider_with_parent(collider, handle);
    handle
}

/// Spawn one drone at the given position: unit mass, flat box collider,
/// heavy linear damping, sleeping disabled so small steering forces keep
/// integrating.
pub fn spawn_drone(world: &mut PhysicsWorld, position: Vec3) -> RigidBodyHandle {
    let body = RigidBodyBuilder::dynamic()
        .translation(to_vector(position))
        .linear_damping(DRONE_LINEAR_DAMPING)
        .can_sleep(false)
        .build();
    let handle = world.insert_rigid_body(body);

    let [hx, hy, hz] = DRONE_HALF_EXTENTS;
    let collider = ColliderBuilder::cuboid(hx, hy, hz).mass(DRONE_MASS).build();
    world.insert_collider_with_parent(collider, handle);

    handle
}

/// Spawn the enemy/interceptor pair.
pub fn spawn_drone_pair(
    world: &mut PhysicsWorld,
    enemy_pos: Vec3,
    interceptor_pos: Vec3,
) -> DronePair {
    DronePair {
        enemy: spawn_drone(world, enemy_pos),
        interceptor: spawn_drone(world, interceptor_pos),
    }
}

/// Remove both drones from the world.
pub fn despawn_drone_pair(world: &mut PhysicsWorld, pair: DronePair) {
    world.remove_rigid_body(pair.enemy);
    world.remove_rigid_body(pair.interceptor);
}

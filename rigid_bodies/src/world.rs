use experience::{
    math::{Isometry3, Number, Vector3},
    FixedFrameGenerator,
};
use rapier3d::prelude::*;

use crate::PhysicsError;

/// Friction and restitution applied to every collider.
#[derive(Debug, Clone, Copy)]
pub struct ContactMaterial {
    pub friction: Number,
    pub restitution: Number,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorldOptions {
    pub time_step: Number,
    pub max_substeps: usize,
    pub gravity: Vector3,
    pub contact: ContactMaterial,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            max_substeps: 3,
            gravity: Vector3::new(0.0, -9.82, 0.0),
            contact: ContactMaterial::default(),
        }
    }
}

pub struct PhysicsWorld {
    physics_pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    gravity: Vector3,
    contact: ContactMaterial,
    frames: FixedFrameGenerator,
}

impl PhysicsWorld {
    pub fn new(options: WorldOptions) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = options.time_step;
        Self {
            physics_pipeline: PhysicsPipeline::new(),
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: options.gravity,
            contact: options.contact,
            frames: FixedFrameGenerator::new(options.time_step)
                .with_max_substeps(options.max_substeps),
        }
    }

    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.gravity = gravity;
    }

    #[inline]
    pub fn gravity(&self) -> Vector3 {
        self.gravity
    }

    #[inline]
    pub fn time_step(&self) -> Number {
        self.integration_parameters.dt
    }

    pub fn set_time_step(&mut self, time_step: Number) {
        self.integration_parameters.dt = time_step;
        self.frames.set_time_step(time_step);
    }

    pub fn set_max_substeps(&mut self, max_substeps: usize) {
        self.frames.set_max_substeps(max_substeps);
    }

    /// Static ground plane through the origin, facing +y.
    pub fn add_floor(&mut self) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed().build();
        let collider = ColliderBuilder::halfspace(Vector::y_axis());
        self.insert(body, collider)
    }

    pub fn add_sphere(&mut self, radius: Number, position: Vector3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic().translation(position).build();
        self.insert(body, ColliderBuilder::ball(radius))
    }

    pub fn add_box(&mut self, half_extents: Vector3, position: Vector3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic().translation(position).build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.insert(body, collider)
    }

    fn insert(&mut self, body: RigidBody, collider: ColliderBuilder) -> RigidBodyHandle {
        let collider = collider
            .friction(self.contact.friction)
            .restitution(self.contact.restitution)
            .build();
        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        log::debug!("Added rigid body {:?}", handle);
        handle
    }

    /// Removes a body together with its colliders.
    pub fn remove(&mut self, handle: RigidBodyHandle) -> Result<(), PhysicsError> {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .map(|_| ())
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Runs the fixed steps due at `current_time` seconds and returns how many ran.
    pub fn advance(&mut self, current_time: Number) -> usize {
        let steps = self.frames.advance(current_time);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<Isometry3> {
        self.rigid_body_set.get(handle).map(|body| *body.position())
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(WorldOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_falls_onto_the_floor() {
        let mut world = PhysicsWorld::default();
        world.add_floor();
        let sphere = world.add_sphere(0.5, Vector3::new(0.0, 3.0, 0.0));

        for _ in 0..30 {
            world.step();
        }
        let falling = world.body_pose(sphere).unwrap().translation.vector.y;
        assert!(falling < 3.0);

        for _ in 0..600 {
            world.step();
        }
        let resting = world.body_pose(sphere).unwrap().translation.vector.y;
        assert!(resting > 0.4, "sphere sank to {resting}");
        assert!(resting < 1.0, "sphere still bouncing at {resting}");
    }

    #[test]
    fn advance_runs_capped_fixed_steps() {
        let mut world = PhysicsWorld::new(WorldOptions {
            time_step: 0.125,
            max_substeps: 2,
            ..Default::default()
        });
        let sphere = world.add_sphere(0.5, Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(world.advance(0.0), 1);
        assert_eq!(world.advance(0.0625), 0);
        assert_eq!(world.advance(1.0), 2);
        assert!(world.body_pose(sphere).unwrap().translation.vector.y < 10.0);
    }

    #[test]
    fn removing_a_body_twice_fails() {
        let mut world = PhysicsWorld::default();
        let cube = world.add_box(Vector3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(world.body_count(), 1);
        world.remove(cube).unwrap();
        assert!(!world.contains(cube));
        assert_eq!(world.body_count(), 0);
        assert!(matches!(world.remove(cube), Err(PhysicsError::UnknownBody(_))));
    }
}

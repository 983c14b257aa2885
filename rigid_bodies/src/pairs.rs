use experience::math::Isometry3;
use rapier3d::prelude::RigidBodyHandle;

use crate::PhysicsWorld;

/// A visual object whose transform follows a rigid body.
pub trait MirrorTransform {
    fn mirror(&mut self, pose: &Isometry3);
}

pub struct BodyMeshPair<M> {
    body: RigidBodyHandle,
    mesh: M,
    persistent: bool,
}

impl<M> BodyMeshPair<M> {
    #[inline]
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    #[inline]
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> &mut M {
        &mut self.mesh
    }

    /// Persistent pairs survive [`BodyMeshPairs::reset`].
    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }
}

/// Bodies of a [`PhysicsWorld`] paired with the meshes that show them.
pub struct BodyMeshPairs<M> {
    pairs: Vec<BodyMeshPair<M>>,
}

impl<M> Default for BodyMeshPairs<M> {
    fn default() -> Self {
        Self { pairs: vec![] }
    }
}

impl<M: MirrorTransform> BodyMeshPairs<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, body: RigidBodyHandle, mesh: M) {
        self.push(body, mesh, false);
    }

    pub fn track_persistent(&mut self, body: RigidBodyHandle, mesh: M) {
        self.push(body, mesh, true);
    }

    fn push(&mut self, body: RigidBodyHandle, mesh: M, persistent: bool) {
        self.pairs.push(BodyMeshPair {
            body,
            mesh,
            persistent,
        });
    }

    /// Copies every body pose into its mesh.
    pub fn sync(&mut self, world: &PhysicsWorld) {
        for pair in &mut self.pairs {
            if let Some(pose) = world.body_pose(pair.body) {
                pair.mesh.mirror(&pose);
            }
        }
    }

    /// Drops every non-persistent pair from both the world and this
    /// collection. Returns the number of pairs removed.
    pub fn reset(&mut self, world: &mut PhysicsWorld) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|pair| {
            if pair.persistent {
                return true;
            }
            if let Err(err) = world.remove(pair.body) {
                log::warn!("{}", err);
            }
            false
        });
        let removed = before - self.pairs.len();
        log::debug!("Reset removed {} bodies", removed);
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyMeshPair<M>> {
        self.pairs.iter()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &M> {
        self.pairs.iter().map(|pair| &pair.mesh)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use experience::math::Vector3;

    use super::*;

    #[derive(Default)]
    struct RecordedMesh {
        pose: Option<Isometry3>,
    }

    impl MirrorTransform for RecordedMesh {
        fn mirror(&mut self, pose: &Isometry3) {
            self.pose = Some(*pose);
        }
    }

    fn populated_world() -> (PhysicsWorld, BodyMeshPairs<RecordedMesh>) {
        let mut world = PhysicsWorld::default();
        let mut pairs = BodyMeshPairs::new();
        let floor = world.add_floor();
        pairs.track_persistent(floor, RecordedMesh::default());
        let sphere = world.add_sphere(0.3, Vector3::new(0.5, 3.0, -0.5));
        pairs.track(sphere, RecordedMesh::default());
        let cube = world.add_box(Vector3::new(0.2, 0.4, 0.3), Vector3::new(-1.0, 3.0, 1.0));
        pairs.track(cube, RecordedMesh::default());
        let tilted = world.add_box(Vector3::new(0.5, 0.1, 0.5), Vector3::new(0.0, 5.0, 0.0));
        pairs.track(tilted, RecordedMesh::default());
        (world, pairs)
    }

    #[test]
    fn meshes_mirror_bodies_after_every_step() {
        let (mut world, mut pairs) = populated_world();
        for _ in 0..120 {
            world.step();
            pairs.sync(&world);
            for pair in pairs.iter() {
                assert_eq!(pair.mesh().pose, world.body_pose(pair.body()));
            }
        }
        let sphere = pairs.iter().nth(1).unwrap();
        assert!(sphere.mesh().pose.unwrap().translation.vector.y < 3.0);
    }

    #[test]
    fn reset_keeps_only_persistent_pairs() {
        let (mut world, mut pairs) = populated_world();
        world.step();
        pairs.sync(&world);

        assert_eq!(pairs.reset(&mut world), 3);
        assert_eq!(pairs.len(), 1);
        assert_eq!(world.body_count(), 1);
        let floor = pairs.iter().next().unwrap();
        assert!(floor.is_persistent());
        assert!(world.contains(floor.body()));

        assert_eq!(pairs.reset(&mut world), 0);
    }

    #[test]
    fn reset_without_persistent_pairs_empties_everything() {
        let mut world = PhysicsWorld::default();
        let mut pairs = BodyMeshPairs::new();
        for i in 0..5 {
            let body = world.add_sphere(0.2, Vector3::new(i as f32, 2.0, 0.0));
            pairs.track(body, RecordedMesh::default());
        }
        assert_eq!(pairs.reset(&mut world), 5);
        assert!(pairs.is_empty());
        assert_eq!(world.body_count(), 0);
    }
}

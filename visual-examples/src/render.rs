use experience::math::Isometry3;
use rigid_bodies::MirrorTransform;
use three_d::{
    vec3, AmbientLight, Context, CpuMaterial, CpuMesh, DirectionalLight, Gm, Mat4, Mesh,
    PhysicalMaterial, Quat, Srgba,
};

/// Converts a physics pose into a render transform.
pub fn pose_to_mat4(pose: &Isometry3) -> Mat4 {
    let t = pose.translation.vector;
    let q = pose.rotation;
    Mat4::from_translation(vec3(t.x, t.y, t.z)) * Mat4::from(Quat::new(q.w, q.i, q.j, q.k))
}

/// A mesh following a rigid body. `local` is applied before the body pose,
/// typically the scale turning a unit shape into the collider's size.
pub struct BodyMesh {
    pub gm: Gm<Mesh, PhysicalMaterial>,
    local: Mat4,
}

impl BodyMesh {
    pub fn new(context: &Context, mesh: &CpuMesh, material: &CpuMaterial, local: Mat4) -> Self {
        let mut gm = Gm::new(
            Mesh::new(context, mesh),
            PhysicalMaterial::new_opaque(context, material),
        );
        gm.set_transformation(local);
        Self { gm, local }
    }
}

impl MirrorTransform for BodyMesh {
    fn mirror(&mut self, pose: &Isometry3) {
        self.gm.set_transformation(pose_to_mat4(pose) * self.local);
    }
}

pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Lights {
    pub fn new(context: &Context) -> Self {
        Self {
            ambient: AmbientLight::new(context, 0.4, Srgba::WHITE),
            directional: DirectionalLight::new(context, 2.0, Srgba::WHITE, &vec3(-1.0, -1.0, -1.0)),
        }
    }

    pub fn array(&self) -> [&dyn three_d::Light; 2] {
        [&self.ambient, &self.directional]
    }
}

#[cfg(test)]
mod tests {
    use experience::math::{UnitQuaternion, Vector3};
    use three_d::{vec4, InnerSpace};

    use super::*;

    #[test]
    fn pose_rotates_then_translates() {
        let pose = Isometry3::from_parts(
            Vector3::new(1.0, 2.0, 3.0).into(),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2),
        );
        let moved = pose_to_mat4(&pose) * vec4(1.0, 0.0, 0.0, 1.0);
        let expected = pose.transform_point(&experience::math::Point3::new(1.0, 0.0, 0.0));
        let diff = vec3(moved.x - expected.x, moved.y - expected.y, moved.z - expected.z);
        assert!(diff.magnitude() < 1e-5);
        assert!((moved.z - 2.0).abs() < 1e-5);
    }
}

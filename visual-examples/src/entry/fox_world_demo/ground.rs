use three_d::{
    degrees, CpuMaterial, CpuMesh, Gm, Mat4, Mesh, PhysicalMaterial, Srgba, Wrapping,
};

use super::world::WorldContext;

const HALF_SIZE: f32 = 5.0;
const TEXTURE_REPEAT: f32 = 1.5;

/// Flat textured floor through the origin.
pub struct Ground {
    pub gm: Gm<Mesh, PhysicalMaterial>,
}

impl Ground {
    pub fn new(ctx: &WorldContext) -> anyhow::Result<Self> {
        let mut color = ctx.texture("groundColorTexture")?.clone();
        let mut normal = ctx.texture("groundNormalTexture")?.clone();
        for texture in [&mut color, &mut normal] {
            texture.wrap_s = Wrapping::Repeat;
            texture.wrap_t = Wrapping::Repeat;
        }

        let mut mesh = CpuMesh::square();
        if let Some(uvs) = &mut mesh.uvs {
            for uv in uvs.iter_mut() {
                *uv *= TEXTURE_REPEAT;
            }
        }

        let material = PhysicalMaterial::new_opaque(
            ctx.context,
            &CpuMaterial {
                albedo: Srgba::WHITE,
                albedo_texture: Some(color),
                normal_texture: Some(normal),
                roughness: 1.0,
                metallic: 0.0,
                ..Default::default()
            },
        );
        let mut gm = Gm::new(Mesh::new(ctx.context, &mesh), material);
        gm.set_transformation(Mat4::from_angle_x(degrees(-90.0)) * Mat4::from_scale(HALF_SIZE));
        log::debug!("Ground created");
        Ok(Self { gm })
    }
}

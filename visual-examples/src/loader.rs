use std::{future::Future, path::PathBuf};

use experience::{Source, SourceKind, SourceLoader};
use three_d::{CpuModel, CpuTexture};

/// A decoded asset, still on the CPU.
pub enum LoadedAsset {
    Model(CpuModel),
    Texture(CpuTexture),
    /// Faces in the order +x, -x, +y, -y, +z, -z.
    CubeTexture(Box<[CpuTexture; 6]>),
}

impl LoadedAsset {
    pub fn texture(&self) -> Option<&CpuTexture> {
        match self {
            LoadedAsset::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn cube_texture(&self) -> Option<&[CpuTexture; 6]> {
        match self {
            LoadedAsset::CubeTexture(faces) => Some(faces),
            _ => None,
        }
    }

    pub fn model(&self) -> Option<&CpuModel> {
        match self {
            LoadedAsset::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// Reads sources from disk relative to `root`.
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceLoader for AssetLoader {
    type Asset = LoadedAsset;
    type Error = three_d_asset::Error;

    fn load(&self, source: &Source) -> impl Future<Output = Result<LoadedAsset, Self::Error>> {
        let kind = source.kind;
        let paths: Vec<PathBuf> = source.paths().iter().map(|path| self.root.join(path)).collect();
        async move {
            let mut raw = three_d_asset::io::load_async(&paths).await?;
            match kind {
                SourceKind::Model => Ok(LoadedAsset::Model(raw.deserialize(&paths[0])?)),
                SourceKind::Texture => Ok(LoadedAsset::Texture(raw.deserialize(&paths[0])?)),
                SourceKind::CubeTexture => {
                    let mut face = |i: usize| raw.deserialize::<CpuTexture>(&paths[i]);
                    Ok(LoadedAsset::CubeTexture(Box::new([
                        face(0)?,
                        face(1)?,
                        face(2)?,
                        face(3)?,
                        face(4)?,
                        face(5)?,
                    ])))
                }
            }
        }
    }
}

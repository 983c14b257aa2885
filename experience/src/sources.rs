//! Static declarations of the assets a scene needs before it can be built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ResourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "gltf", alias = "model")]
    Model,
    #[serde(rename = "texture")]
    Texture,
    #[serde(rename = "cubeTexture")]
    CubeTexture,
}

impl SourceKind {
    /// Number of files one source of this kind is made of.
    #[inline]
    pub fn path_count(self) -> usize {
        match self {
            SourceKind::Model | SourceKind::Texture => 1,
            SourceKind::CubeTexture => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourcePath {
    Single(String),
    /// Cube faces in the order +x, -x, +y, -y, +z, -z.
    Faces(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub path: SourcePath,
}

impl Source {
    pub fn model(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::Model,
            path: SourcePath::Single(path.into()),
        }
    }

    pub fn texture(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::Texture,
            path: SourcePath::Single(path.into()),
        }
    }

    pub fn cube_texture(name: impl Into<String>, faces: [&str; 6]) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::CubeTexture,
            path: SourcePath::Faces(faces.iter().map(|face| face.to_string()).collect()),
        }
    }

    pub fn paths(&self) -> &[String] {
        match &self.path {
            SourcePath::Single(path) => std::slice::from_ref(path),
            SourcePath::Faces(faces) => faces,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ResourceError> {
        let expected = self.kind.path_count();
        let actual = self.paths().len();
        let shape_matches = match (&self.path, self.kind) {
            (SourcePath::Single(_), SourceKind::CubeTexture) => false,
            (SourcePath::Faces(_), SourceKind::Model | SourceKind::Texture) => false,
            _ => actual == expected,
        };
        if shape_matches {
            Ok(())
        } else {
            Err(ResourceError::PathShape {
                name: self.name.clone(),
                kind: self.kind,
                expected,
                actual,
            })
        }
    }
}

/// Parses a JSON list of sources, e.g.
/// `[{ "name": "fox", "type": "gltf", "path": "models/Fox.gltf" }]`.
pub fn parse_manifest(json: &str) -> Result<Vec<Source>, ResourceError> {
    let sources: Vec<Source> = serde_json::from_str(json)?;
    for source in &sources {
        source.validate()?;
    }
    Ok(sources)
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<Source>, ResourceError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let sources = parse_manifest(&json)?;
    log::info!("Loaded {} sources from {:?}", sources.len(), path);
    Ok(sources)
}

/// Sources of the fox world scene, relative to the asset root.
pub fn fox_world_sources() -> Vec<Source> {
    vec![
        Source::cube_texture(
            "environmentMapTexture",
            [
                "textures/environmentMap/px.jpg",
                "textures/environmentMap/nx.jpg",
                "textures/environmentMap/py.jpg",
                "textures/environmentMap/ny.jpg",
                "textures/environmentMap/pz.jpg",
                "textures/environmentMap/nz.jpg",
            ],
        ),
        Source::texture("groundColorTexture", "textures/dirt/color.jpg"),
        Source::texture("groundNormalTexture", "textures/dirt/normal.jpg"),
        Source::model("foxModel", "models/Fox/glTF/Fox.gltf"),
    ]
}

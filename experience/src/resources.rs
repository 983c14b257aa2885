use std::{
    collections::{HashMap, HashSet},
    fmt,
    future::Future,
};

use futures::{stream::FuturesUnordered, StreamExt};

use crate::{Ready, ReadyGate, ResourceError, Source};

/// Loads the asset described by one [`Source`].
///
/// Implementations dispatch on [`Source::kind`]. Futures are polled on the
/// thread that owns the [`Resources`], so they need not be `Send`.
pub trait SourceLoader {
    type Asset;
    type Error: fmt::Display;

    fn load(&self, source: &Source) -> impl Future<Output = Result<Self::Asset, Self::Error>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading { loaded: usize, to_load: usize },
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub name: String,
    pub message: String,
}

/// Loads a fixed list of sources and opens a ready gate once all of them
/// have loaded.
///
/// A failed source is logged and recorded but never counted, so a single
/// failure keeps the gate shut for the lifetime of the `Resources`.
pub struct Resources<A> {
    sources: Vec<Source>,
    items: HashMap<String, A>,
    to_load: usize,
    loaded: usize,
    failures: Vec<LoadFailure>,
    started: bool,
    gate: ReadyGate,
}

impl<A> Resources<A> {
    pub fn new(sources: Vec<Source>) -> Result<Self, ResourceError> {
        let mut names = HashSet::new();
        for source in &sources {
            source.validate()?;
            if !names.insert(source.name.as_str()) {
                return Err(ResourceError::DuplicateSource(source.name.clone()));
            }
        }
        Ok(Self {
            to_load: sources.len(),
            items: HashMap::with_capacity(sources.len()),
            sources,
            loaded: 0,
            failures: vec![],
            started: false,
            gate: ReadyGate::new(),
        })
    }

    #[inline]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// A future resolving once every source has loaded.
    pub fn ready(&mut self) -> Ready {
        self.gate.wait()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    pub fn state(&self) -> LoadState {
        if self.is_ready() {
            LoadState::Ready
        } else {
            LoadState::Loading {
                loaded: self.loaded,
                to_load: self.to_load,
            }
        }
    }

    pub fn progress(&self) -> f32 {
        if self.to_load == 0 {
            1.0
        } else {
            self.loaded as f32 / self.to_load as f32
        }
    }

    pub fn item(&self, name: &str) -> Option<&A> {
        self.items.get(name)
    }

    pub fn items(&self) -> &HashMap<String, A> {
        &self.items
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Marks loading as started. With no sources declared the gate opens
    /// right away.
    pub fn start_loading(&mut self) -> Result<(), ResourceError> {
        if self.started {
            return Err(ResourceError::AlreadyStarted);
        }
        self.started = true;
        log::debug!("Loading {} sources", self.to_load);
        if self.loaded == self.to_load {
            self.finish();
        }
        Ok(())
    }

    pub fn source_loaded(&mut self, name: &str, asset: A) -> Result<(), ResourceError> {
        self.check_known(name)?;
        if self.items.contains_key(name) {
            return Err(ResourceError::AlreadyLoaded(name.to_string()));
        }
        self.items.insert(name.to_string(), asset);
        self.loaded += 1;
        log::debug!("Loaded `{}` ({}/{})", name, self.loaded, self.to_load);

        if self.loaded == self.to_load {
            self.finish();
        }
        Ok(())
    }

    pub fn source_failed(&mut self, name: &str, error: impl fmt::Display) -> Result<(), ResourceError> {
        self.check_known(name)?;
        log::error!("Failed to load `{}`: {}", name, error);
        self.failures.push(LoadFailure {
            name: name.to_string(),
            message: error.to_string(),
        });
        Ok(())
    }

    /// Starts every load at once and records each completion as it arrives.
    pub async fn load_all<L>(&mut self, loader: &L) -> Result<(), ResourceError>
    where
        L: SourceLoader<Asset = A>,
    {
        self.start_loading()?;
        let mut pending: FuturesUnordered<_> = self
            .sources
            .iter()
            .cloned()
            .map(|source| async move {
                let result = loader.load(&source).await;
                (source, result)
            })
            .collect();

        while let Some((source, result)) = pending.next().await {
            match result {
                Ok(asset) => self.source_loaded(&source.name, asset)?,
                Err(error) => self.source_failed(&source.name, error)?,
            }
        }
        Ok(())
    }

    fn check_known(&self, name: &str) -> Result<(), ResourceError> {
        if self.sources.iter().any(|source| source.name == name) {
            Ok(())
        } else {
            Err(ResourceError::UnknownSource(name.to_string()))
        }
    }

    fn finish(&mut self) {
        if self.gate.open() {
            log::info!("All {} sources loaded", self.to_load);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Asset {
        Texture(String),
        Model(String),
    }

    /// Loads every source instantly, failing the names listed in `broken`.
    struct FakeLoader {
        broken: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl FakeLoader {
        fn new(broken: Vec<&'static str>) -> Self {
            Self {
                broken,
                calls: Cell::new(0),
            }
        }
    }

    impl SourceLoader for FakeLoader {
        type Asset = Asset;
        type Error = String;

        fn load(&self, source: &Source) -> impl Future<Output = Result<Asset, String>> {
            self.calls.set(self.calls.get() + 1);
            let result = if self.broken.contains(&source.name.as_str()) {
                Err(format!("404: {}", source.paths()[0]))
            } else {
                match source.kind {
                    crate::SourceKind::Model => Ok(Asset::Model(source.paths()[0].clone())),
                    _ => Ok(Asset::Texture(source.paths()[0].clone())),
                }
            };
            async move { result }
        }
    }

    fn scenario_sources() -> Vec<Source> {
        vec![Source::texture("a", "a.jpg"), Source::model("b", "b.gltf")]
    }

    #[test]
    fn ready_fires_once_after_both_loads() {
        let mut resources = Resources::new(scenario_sources()).unwrap();
        let mut ready = resources.ready();
        resources.start_loading().unwrap();

        resources
            .source_loaded("a", Asset::Texture("tex".into()))
            .unwrap();
        assert!(!ready.poll_ready());
        assert_eq!(
            resources.state(),
            LoadState::Loading {
                loaded: 1,
                to_load: 2
            }
        );

        resources
            .source_loaded("b", Asset::Model("model".into()))
            .unwrap();
        assert!(ready.poll_ready());
        assert_eq!(resources.state(), LoadState::Ready);

        assert_eq!(resources.items().len(), 2);
        assert_eq!(resources.item("a"), Some(&Asset::Texture("tex".into())));
        assert_eq!(resources.item("b"), Some(&Asset::Model("model".into())));
    }

    #[test]
    fn repeated_completion_is_not_counted_twice() {
        let mut resources = Resources::new(scenario_sources()).unwrap();
        resources.start_loading().unwrap();
        resources
            .source_loaded("a", Asset::Texture("tex".into()))
            .unwrap();
        assert!(matches!(
            resources.source_loaded("a", Asset::Texture("again".into())),
            Err(ResourceError::AlreadyLoaded(_))
        ));
        assert!(!resources.is_ready());
        assert_eq!(resources.item("a"), Some(&Asset::Texture("tex".into())));
    }

    #[test]
    fn unknown_and_duplicate_sources_are_rejected() {
        let mut resources: Resources<Asset> = Resources::new(scenario_sources()).unwrap();
        assert!(matches!(
            resources.source_loaded("c", Asset::Texture("tex".into())),
            Err(ResourceError::UnknownSource(_))
        ));

        let duplicated = vec![Source::texture("a", "a.jpg"), Source::model("a", "a.gltf")];
        assert!(matches!(
            Resources::<Asset>::new(duplicated),
            Err(ResourceError::DuplicateSource(name)) if name == "a"
        ));
    }

    #[test]
    fn load_all_fills_one_entry_per_source() {
        let mut sources = scenario_sources();
        sources.push(Source::cube_texture(
            "sky",
            ["px", "nx", "py", "ny", "pz", "nz"],
        ));
        let mut resources = Resources::new(sources).unwrap();
        let ready = resources.ready();
        let loader = FakeLoader::new(vec![]);

        block_on(resources.load_all(&loader)).unwrap();
        block_on(ready).unwrap();

        assert_eq!(loader.calls.get(), 3);
        assert_eq!(resources.items().len(), 3);
        assert_eq!(resources.item("a"), Some(&Asset::Texture("a.jpg".into())));
        assert_eq!(resources.item("b"), Some(&Asset::Model("b.gltf".into())));
        assert_eq!(resources.item("sky"), Some(&Asset::Texture("px".into())));
        assert!(resources.failures().is_empty());
        assert_eq!(resources.progress(), 1.0);
    }

    #[test]
    fn one_failure_keeps_the_gate_shut() {
        let mut resources = Resources::new(scenario_sources()).unwrap();
        let mut ready = resources.ready();
        let loader = FakeLoader::new(vec!["b"]);

        block_on(resources.load_all(&loader)).unwrap();

        assert!(!ready.poll_ready());
        assert!(!resources.is_ready());
        assert_eq!(resources.items().len(), 1);
        assert_eq!(resources.progress(), 0.5);
        assert_eq!(
            resources.failures(),
            &[LoadFailure {
                name: "b".into(),
                message: "404: b.gltf".into(),
            }]
        );
    }

    #[test]
    fn loading_cannot_start_twice() {
        let mut resources = Resources::new(scenario_sources()).unwrap();
        let loader = FakeLoader::new(vec![]);
        block_on(resources.load_all(&loader)).unwrap();
        assert!(matches!(
            block_on(resources.load_all(&loader)),
            Err(ResourceError::AlreadyStarted)
        ));
        assert_eq!(loader.calls.get(), 2);
    }

    #[test]
    fn no_sources_is_ready_once_started() {
        let mut resources: Resources<Asset> = Resources::new(vec![]).unwrap();
        let mut ready = resources.ready();
        assert!(!ready.poll_ready());
        resources.start_loading().unwrap();
        assert!(ready.poll_ready());
    }
}

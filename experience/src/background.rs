use std::thread;

use futures::{
    channel::mpsc::{self, UnboundedReceiver},
    executor::block_on,
    stream::FuturesUnordered,
    StreamExt,
};

use crate::{ResourceError, Resources, Source, SourceLoader};

/// Outcome of one source, sent from the loading thread.
pub struct Completion<A> {
    pub name: String,
    pub result: Result<A, String>,
}

/// Completions still on their way from a loading thread.
///
/// Drained without blocking by [`Resources::receive`], typically once per
/// frame.
pub struct PendingLoads<A> {
    receiver: UnboundedReceiver<Completion<A>>,
    finished: bool,
}

impl<A> PendingLoads<A> {
    /// True once the loading thread is done and every completion was received.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Runs every load of `sources` on a dedicated thread. Completions arrive in
/// the order the loads finish.
pub fn spawn_loads<L>(loader: L, sources: Vec<Source>) -> Result<PendingLoads<L::Asset>, ResourceError>
where
    L: SourceLoader + Send + 'static,
    L::Asset: Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded();
    thread::Builder::new()
        .name("asset-loader".to_string())
        .spawn(move || {
            block_on(async {
                let loader = &loader;
                let mut pending: FuturesUnordered<_> = sources
                    .iter()
                    .map(|source| async move {
                        let result = loader.load(source).await;
                        (source.name.clone(), result)
                    })
                    .collect();

                while let Some((name, result)) = pending.next().await {
                    let completion = Completion {
                        name,
                        result: result.map_err(|err| err.to_string()),
                    };
                    if sender.unbounded_send(completion).is_err() {
                        log::debug!("Resources dropped, abandoning the remaining loads");
                        return;
                    }
                }
            })
        })?;
    Ok(PendingLoads {
        receiver,
        finished: false,
    })
}

impl<A: Send + 'static> Resources<A> {
    /// Starts loading on a background thread. Feed the returned
    /// [`PendingLoads`] to [`Resources::receive`] from the owning thread.
    pub fn load_in_background<L>(&mut self, loader: L) -> Result<PendingLoads<A>, ResourceError>
    where
        L: SourceLoader<Asset = A> + Send + 'static,
    {
        self.start_loading()?;
        spawn_loads(loader, self.sources().to_vec())
    }
}

impl<A> Resources<A> {
    /// Records every completion received so far without waiting for more.
    /// Returns how many were recorded.
    pub fn receive(&mut self, pending: &mut PendingLoads<A>) -> Result<usize, ResourceError> {
        let mut received = 0;
        while !pending.finished {
            match pending.receiver.try_next() {
                Ok(Some(completion)) => {
                    match completion.result {
                        Ok(asset) => self.source_loaded(&completion.name, asset)?,
                        Err(message) => self.source_failed(&completion.name, message)?,
                    }
                    received += 1;
                }
                Ok(None) => pending.finished = true,
                // nothing new yet
                Err(_) => break,
            }
        }
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, time::Duration};

    use super::*;
    use crate::{LoadState, SourceKind};

    /// Echoes the first path of every source after a short delay.
    struct SlowLoader {
        broken: Vec<String>,
        delay: Duration,
    }

    impl SourceLoader for SlowLoader {
        type Asset = String;
        type Error = String;

        fn load(&self, source: &Source) -> impl Future<Output = Result<String, String>> {
            thread::sleep(self.delay);
            let result = if self.broken.contains(&source.name) {
                Err(format!("cannot read {}", source.paths()[0]))
            } else {
                Ok(source.paths()[0].clone())
            };
            async move { result }
        }
    }

    fn receive_all(resources: &mut Resources<String>, pending: &mut PendingLoads<String>) {
        while !pending.is_finished() {
            resources.receive(pending).unwrap();
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn frames_see_the_loading_state_before_ready() {
        let sources = vec![Source::texture("a", "a.jpg"), Source::model("b", "b.gltf")];
        let mut resources = Resources::new(sources).unwrap();
        let mut ready = resources.ready();
        let mut pending = resources
            .load_in_background(SlowLoader {
                broken: vec![],
                delay: Duration::from_millis(50),
            })
            .unwrap();

        // the first frame runs while the loader thread is still sleeping
        assert_eq!(resources.receive(&mut pending).unwrap(), 0);
        assert!(!ready.poll_ready());
        assert_eq!(
            resources.state(),
            LoadState::Loading {
                loaded: 0,
                to_load: 2
            }
        );

        receive_all(&mut resources, &mut pending);
        assert!(ready.poll_ready());
        assert_eq!(resources.item("a").map(String::as_str), Some("a.jpg"));
        assert_eq!(resources.item("b").map(String::as_str), Some("b.gltf"));
        assert_eq!(resources.receive(&mut pending).unwrap(), 0);
    }

    #[test]
    fn background_failures_keep_the_gate_shut() {
        let sources = vec![
            Source::texture("a", "a.jpg"),
            Source::cube_texture("sky", ["px", "nx", "py", "ny", "pz", "nz"]),
        ];
        assert_eq!(sources[1].kind, SourceKind::CubeTexture);
        let mut resources = Resources::new(sources).unwrap();
        let mut pending = resources
            .load_in_background(SlowLoader {
                broken: vec!["sky".to_string()],
                delay: Duration::ZERO,
            })
            .unwrap();

        receive_all(&mut resources, &mut pending);
        assert!(!resources.is_ready());
        assert_eq!(resources.items().len(), 1);
        assert_eq!(resources.failures().len(), 1);
        assert_eq!(resources.failures()[0].name, "sky");
        assert_eq!(resources.failures()[0].message, "cannot read px");
    }

    #[test]
    fn background_loading_starts_once() {
        let mut resources: Resources<String> = Resources::new(vec![]).unwrap();
        let loader = || SlowLoader {
            broken: vec![],
            delay: Duration::ZERO,
        };
        let mut pending = resources.load_in_background(loader()).unwrap();
        receive_all(&mut resources, &mut pending);
        assert!(resources.is_ready());
        assert!(matches!(
            resources.load_in_background(loader()),
            Err(ResourceError::AlreadyStarted)
        ));
    }
}

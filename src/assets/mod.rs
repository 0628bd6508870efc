//! Model loading.
//!
//! The model is read and parsed on a shared background runtime; the event
//! loop polls a [`ModelLoad`] each frame and receives the parsed
//! [`GltfModel`] exactly once.

pub mod loaders;

pub use loaders::{GLTF_ROOT_NAME, GltfLoader, GltfModel};

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tokio::runtime::Runtime;

use crate::errors::{PianoError, Result};

/// Shared runtime for file reads and decoding off the event-loop thread.
pub(crate) fn asset_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("piano-assets")
        .build()?;
    // A racing initializer may have won; either runtime is fine.
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| PianoError::TaskJoinError("asset runtime unavailable".to_string()))
}

/// Reads `path` without blocking the caller and parses it on the blocking pool.
pub async fn load_model_async(path: impl AsRef<Path>) -> Result<GltfModel> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PianoError::AssetNotFound(format!("{}: {e}", path.display())))?;
    let base_dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    tokio::task::spawn_blocking(move || GltfLoader::parse(&bytes, &base_dir)).await?
}

/// An in-flight model load.
pub struct ModelLoad {
    path: PathBuf,
    rx: flume::Receiver<Result<GltfModel>>,
    finished: bool,
}

impl ModelLoad {
    /// Starts loading `path` in the background.
    pub fn spawn(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (tx, rx) = flume::bounded(1);

        let task_path = path.clone();
        asset_runtime()?.spawn(async move {
            let result = load_model_async(&task_path).await;
            // The receiver may be gone if the app shut down first.
            let _ = tx.send(result);
        });

        log::info!("Loading model {}", path.display());
        Ok(Self {
            path,
            rx,
            finished: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the result has already been handed out.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the load result the first time it is available, `None` before
    /// that and on every call afterwards.
    pub fn poll(&mut self) -> Option<Result<GltfModel>> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(PianoError::TaskJoinError("model loader exited without a result".to_string())))
            }
        }
    }

    /// Blocks until the load completes. Returns `None` if it was already consumed.
    pub fn wait(&mut self) -> Option<Result<GltfModel>> {
        if self.finished {
            return None;
        }
        self.finished = true;
        Some(
            self.rx
                .recv()
                .unwrap_or_else(|_| Err(PianoError::TaskJoinError("model loader exited without a result".to_string()))),
        )
    }
}

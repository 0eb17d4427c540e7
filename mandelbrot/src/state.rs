use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::RenderParameters;

/// The one `RenderParameters` instance, shared by input handling, the
/// overlay panel, the animator thread and the renderer.
#[derive(Clone, Debug, Default)]
pub struct SharedParameters(Arc<Mutex<RenderParameters>>);

impl SharedParameters {
    pub fn new(params: RenderParameters) -> Self {
        Self(Arc::new(Mutex::new(params)))
    }

    /// Runs `f` with the lock held. Keep `f` short, the animator and the
    /// render loop contend on it.
    pub fn update<R>(&self, f: impl FnOnce(&mut RenderParameters) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current state, taken once per frame.
    pub fn snapshot(&self) -> RenderParameters {
        *self.lock()
    }

    // Plain data, so a panic mid-update cannot leave it unusable.
    fn lock(&self) -> MutexGuard<'_, RenderParameters> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

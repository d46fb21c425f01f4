//! The image session: current raster, untouched original, and a modified flag.
//!
//! ```text
//! Empty ──load──▶ Loaded ──apply──▶ Dirty ──apply──▶ Dirty
//!                   ▲                 │
//!                   └──────load───────┘
//! ```
//!
//! Operations are atomic. A transform builds its destination raster off to
//! the side and only a fully formed result replaces `current`; on error the
//! session is exactly as it was. The session is single-writer: `apply` takes
//! `&mut self`, so concurrent operations on one session cannot compile.

use crate::error::{CoreError, Result};
use crate::imaging::{OperationSpec, Raster, RowBandScheduler, pixel_ops};

/// Observable lifecycle state of an [`ImageSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Dirty,
}

#[derive(Debug)]
struct LoadedImage {
    current: Raster,
    original: Raster,
    modified: bool,
}

#[derive(Debug)]
pub struct ImageSession {
    image: Option<LoadedImage>,
    scheduler: RowBandScheduler,
}

impl ImageSession {
    pub fn new(scheduler: RowBandScheduler) -> Self {
        Self {
            image: None,
            scheduler,
        }
    }

    /// Session with its own pool of `workers` threads.
    pub fn with_workers(workers: usize) -> Result<Self> {
        Ok(Self::new(RowBandScheduler::new(workers)?))
    }

    /// Replace whatever was loaded with `raster`; it also becomes the original.
    pub fn load(&mut self, raster: Raster) {
        self.image = Some(LoadedImage {
            original: raster.clone(),
            current: raster,
            modified: false,
        });
    }

    /// Run `op` on the current raster and swap in the result.
    pub fn apply(&mut self, op: &OperationSpec) -> Result<()> {
        let image = self.image.as_mut().ok_or(CoreError::NoImageLoaded)?;
        let next = pixel_ops::apply(&image.current, op, &self.scheduler)?;
        image.current = next;
        image.modified = true;
        Ok(())
    }

    pub fn current(&self) -> Result<&Raster> {
        self.image
            .as_ref()
            .map(|i| &i.current)
            .ok_or(CoreError::NoImageLoaded)
    }

    pub fn original(&self) -> Result<&Raster> {
        self.image
            .as_ref()
            .map(|i| &i.original)
            .ok_or(CoreError::NoImageLoaded)
    }

    /// `false` when empty or when nothing has been applied since the last load.
    pub fn is_modified(&self) -> bool {
        self.image.as_ref().is_some_and(|i| i.modified)
    }

    pub fn state(&self) -> SessionState {
        match &self.image {
            None => SessionState::Empty,
            Some(i) if i.modified => SessionState::Dirty,
            Some(_) => SessionState::Loaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{RotateDirection, Rgba8};
    use crate::test_helpers::*;

    fn session() -> ImageSession {
        ImageSession::with_workers(4).unwrap()
    }

    #[test]
    fn new_session_is_empty() {
        let s = session();
        assert_eq!(s.state(), SessionState::Empty);
        assert!(!s.is_modified());
        assert_eq!(s.current(), Err(CoreError::NoImageLoaded));
        assert_eq!(s.original(), Err(CoreError::NoImageLoaded));
    }

    #[test]
    fn apply_on_empty_fails_and_stays_empty() {
        let mut s = session();
        assert_eq!(
            s.apply(&OperationSpec::Negative),
            Err(CoreError::NoImageLoaded)
        );
        assert_eq!(s.state(), SessionState::Empty);
    }

    #[test]
    fn load_enters_loaded_with_matching_original() {
        let mut s = session();
        s.load(gradient(5, 4));
        assert_eq!(s.state(), SessionState::Loaded);
        assert!(!s.is_modified());
        assert_eq!(s.current().unwrap(), s.original().unwrap());
    }

    #[test]
    fn apply_replaces_current_and_keeps_original() {
        let mut s = session();
        let src = gradient(5, 4);
        s.load(src.clone());
        s.apply(&OperationSpec::Rotate {
            direction: RotateDirection::Right,
        })
        .unwrap();

        assert_eq!(s.state(), SessionState::Dirty);
        assert!(s.is_modified());
        assert_eq!(s.current().unwrap().dimensions(), (4, 5));
        assert_eq!(s.original().unwrap(), &src);
    }

    #[test]
    fn failed_apply_leaves_state_untouched() {
        let mut s = session();
        let thin = gradient(1, 5);
        s.load(thin.clone());

        let err = s.apply(&OperationSpec::EdgeDetect).unwrap_err();
        assert!(matches!(err, CoreError::ImageTooSmall { .. }));
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(s.current().unwrap(), &thin);
    }

    #[test]
    fn failed_apply_after_success_keeps_dirty_result() {
        let mut s = session();
        s.load(solid(3, 3, Rgba8::rgb(255, 0, 0)));
        s.apply(&OperationSpec::Negative).unwrap();
        let after_negative = s.current().unwrap().clone();

        assert!(
            s.apply(&OperationSpec::Resample {
                width: 0,
                height: 2
            })
            .is_err()
        );
        assert!(s.is_modified());
        assert_eq!(s.current().unwrap(), &after_negative);
    }

    #[test]
    fn reload_resets_to_loaded() {
        let mut s = session();
        s.load(gradient(3, 3));
        s.apply(&OperationSpec::Negative).unwrap();
        let next = gradient(7, 2);
        s.load(next.clone());
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(s.original().unwrap(), &next);
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(
            ImageSession::with_workers(0),
            Err(CoreError::InvalidWorkerCount(0))
        ));
    }
}

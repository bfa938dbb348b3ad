// THEORY:
// The `pipeline` module is the top-level engine for hand isolation. The
// `HandIsolator` owns the valid-pixel palette and its readiness flag and runs
// the full synchronous pass: lock the frame's bytes, classify the four
// quadrants in parallel, commit the result back, all against one frame at a
// time.
//
// Lifecycle: Uninitialized -> initialize() -> Ready -> process_frame()* ->
// Ready, with reset() returning to Uninitialized. A pass requested while not
// ready is a silent no-op, not an error; the pipeline may deliver frames
// before anyone has seeded a palette, and those frames simply flow through
// untouched.
//
// Rebuild fencing: `initialize` takes `&mut self` while `process_frame` takes
// `&self`, so a palette rebuild can never overlap an in-flight pass: no
// worker can ever observe a half-built set. Shared use goes through a single
// owning task (see `frame_pipeline`) or an RwLock.

use crate::core_modules::buffer;
use crate::core_modules::classifier;
use crate::core_modules::frame::Frame;
use crate::core_modules::palette::{self, Palette};
use crate::error::IsolationError;

// Re-export the data types callers need alongside the engine.
pub use crate::core_modules::frame::PixelFormat;
pub use crate::core_modules::palette::SAMPLE_WINDOW;

/// Outcome of a single classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The frame was classified and the result committed back.
    Isolated,
    /// No palette has been seeded yet; the frame was left untouched.
    NotReady,
}

/// The hand-isolation engine: the palette sampled from an initialization
/// frame, plus the readiness flag gating classification.
pub struct HandIsolator {
    palette: Palette,
    ready: bool,
}

impl HandIsolator {
    /// A new isolator starts uninitialized; passes are no-ops until
    /// `initialize` succeeds.
    pub fn new() -> Self {
        Self {
            palette: Palette::new(),
            ready: false,
        }
    }

    /// Seeds the palette from the sampling window of an initialization
    /// frame. Readiness is false for the whole scan (the old palette is
    /// discarded first) and flips true only once the new palette is
    /// installed, so no pass can observe a torn set.
    pub fn initialize(&mut self, frame: &Frame) -> Result<(), IsolationError> {
        self.ready = false;
        self.palette = Palette::new();
        self.palette = palette::build_palette(frame)?;
        self.ready = true;
        log::info!("palette seeded with {} distinct colors", self.palette.len());
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Runs one lock -> classify -> commit pass over the frame, blacking out
    /// every pixel whose packed color is not in the palette.
    ///
    /// A failed pass takes the discard path: the lock is released without a
    /// commit and the frame keeps its original pixels.
    pub fn process_frame(&self, frame: &mut Frame) -> Result<PassOutcome, IsolationError> {
        if !self.ready {
            log::debug!("classification requested before palette readiness; skipping");
            return Ok(PassOutcome::NotReady);
        }

        let (lock, mut bytes) = buffer::acquire(frame)?;
        match classifier::classify(
            &mut bytes,
            lock.width(),
            lock.height(),
            lock.depth(),
            &self.palette,
        ) {
            Ok(()) => {
                buffer::release(frame, lock, bytes)?;
                Ok(PassOutcome::Isolated)
            }
            Err(error) => {
                buffer::discard(frame, lock);
                Err(error)
            }
        }
    }

    /// Returns to the uninitialized state: the palette is dropped and passes
    /// become no-ops until the next `initialize`.
    pub fn reset(&mut self) {
        self.ready = false;
        self.palette = Palette::new();
    }
}

impl Default for HandIsolator {
    fn default() -> Self {
        Self::new()
    }
}

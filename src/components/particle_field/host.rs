//! Ports the particle field needs from its host environment.
//!
//! The browser implementations live in [`super::canvas`]; tests substitute
//! step-driven fakes.

use super::theme::Color;
use super::types::{Bounds, FieldError, FrameError, FrameHandle};

/// Something a drawing surface can be overlaid on.
pub trait Container {
	type Surface: Surface + 'static;

	/// Current rendered size in whole pixels.
	fn bounds(&self) -> Bounds;

	/// Create a 2D surface covering the container and mount it.
	fn attach_surface(&self) -> Result<Self::Surface, FieldError>;
}

/// A 2D drawing target owned by one particle field.
pub trait Surface {
	/// Match the backing store to `bounds`. Existing pixels may be lost.
	fn resize(&mut self, bounds: Bounds);

	/// Erase every pixel.
	fn clear(&mut self);

	/// Fill a circle with `color` at the given global alpha.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64);

	/// Unmount from the container. The surface is dropped right after.
	fn detach(&mut self);
}

/// Display-synchronised frame callbacks.
///
/// Implementations must never run `callback` synchronously from inside
/// `request_frame`. A rejected request drops `callback` unrun.
pub trait FrameScheduler {
	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<FrameHandle, FrameError>;

	/// Drop a pending callback. Unknown or already-fired handles are ignored.
	fn cancel_frame(&self, handle: FrameHandle);
}

/// Uniform random numbers.
pub trait RandomSource {
	/// Uniform sample in `[min, max)`.
	fn uniform(&mut self, min: f64, max: f64) -> f64;
}

/// Deterministic [`RandomSource`], used when a style pins a seed.
#[derive(Clone, Debug)]
pub struct SeededRandom(fastrand::Rng);

impl SeededRandom {
	pub fn new(seed: u64) -> Self {
		Self(fastrand::Rng::with_seed(seed))
	}
}

impl RandomSource for SeededRandom {
	fn uniform(&mut self, min: f64, max: f64) -> f64 {
		min + self.0.f64() * (max - min)
	}
}

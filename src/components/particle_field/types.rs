//! Plain data types shared by the particle field and its host ports.

use thiserror::Error;

use super::theme::StyleError;

/// Pixel size of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
	pub width: u32,
	pub height: u32,
}

impl Bounds {
	pub const fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}

	pub fn area(self) -> u64 {
		self.width as u64 * self.height as u64
	}

	pub fn is_empty(self) -> bool {
		self.area() == 0
	}
}

/// Opaque id of a frame requested from a [`FrameScheduler`](super::host::FrameScheduler).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Failures that abort attaching a particle field.
///
/// A missing container is not an error: the field just stays inert.
#[derive(Debug, Error)]
pub enum FieldError {
	/// The host refused to hand out a 2D drawing context.
	#[error("2d drawing context unavailable")]
	ContextUnavailable,

	/// The surface element itself could not be created or mounted.
	#[error("failed to create drawing surface: {0}")]
	SurfaceCreation(String),

	/// The style would let particles leave their documented ranges.
	#[error("invalid particle style: {0}")]
	InvalidStyle(#[from] StyleError),
}

/// The host declined to schedule a frame.
#[derive(Debug, Error)]
#[error("frame request rejected: {0}")]
pub struct FrameError(pub String);

//! Step-driven fakes for the host ports, shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::host::{Container, FrameScheduler, RandomSource, Surface};
use super::theme::Color;
use super::types::{Bounds, FieldError, FrameError, FrameHandle};

/// Replays a fixed sequence, ignoring the requested range.
pub struct ScriptedRandom {
	values: Vec<f64>,
	next: usize,
}

impl ScriptedRandom {
	pub fn new(values: impl Into<Vec<f64>>) -> Self {
		Self {
			values: values.into(),
			next: 0,
		}
	}
}

impl RandomSource for ScriptedRandom {
	fn uniform(&mut self, _min: f64, _max: f64) -> f64 {
		let value = self.values[self.next % self.values.len()];
		self.next += 1;
		value
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: Color,
	pub alpha: f64,
}

/// Pixel-changing calls, in the order they were made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
	Clear,
	Fill,
}

/// Everything a [`RecordingSurface`] was asked to do.
#[derive(Debug, Default)]
pub struct SurfaceLog {
	pub ops: Vec<SurfaceOp>,
	pub clears: usize,
	pub circles: Vec<Circle>,
	pub resizes: Vec<Bounds>,
	pub detached: bool,
}

impl SurfaceLog {
	/// Pixel-changing operations only.
	pub fn mutations(&self) -> usize {
		self.clears + self.circles.len()
	}
}

pub struct RecordingSurface {
	log: Rc<RefCell<SurfaceLog>>,
	mounted: Rc<Cell<usize>>,
}

impl RecordingSurface {
	/// A free-standing surface, not mounted in any container.
	pub fn new() -> (Self, Rc<RefCell<SurfaceLog>>) {
		let log = Rc::new(RefCell::new(SurfaceLog::default()));
		let surface = Self {
			log: log.clone(),
			mounted: Rc::new(Cell::new(1)),
		};
		(surface, log)
	}
}

impl Surface for RecordingSurface {
	fn resize(&mut self, bounds: Bounds) {
		self.log.borrow_mut().resizes.push(bounds);
	}

	fn clear(&mut self) {
		let mut log = self.log.borrow_mut();
		log.clears += 1;
		log.ops.push(SurfaceOp::Clear);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
		let mut log = self.log.borrow_mut();
		log.ops.push(SurfaceOp::Fill);
		log.circles.push(Circle {
			x,
			y,
			radius,
			color,
			alpha,
		});
	}

	fn detach(&mut self) {
		self.log.borrow_mut().detached = true;
		self.mounted.set(self.mounted.get() - 1);
	}
}

/// Container with adjustable bounds that counts mounted surfaces.
pub struct MockContainer {
	bounds: Cell<Bounds>,
	context_available: bool,
	pub log: Rc<RefCell<SurfaceLog>>,
	pub mounted: Rc<Cell<usize>>,
}

impl MockContainer {
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			bounds: Cell::new(Bounds::new(width, height)),
			context_available: true,
			log: Rc::new(RefCell::new(SurfaceLog::default())),
			mounted: Rc::new(Cell::new(0)),
		}
	}

	/// A container whose host cannot produce a 2D context.
	pub fn without_context(width: u32, height: u32) -> Self {
		Self {
			context_available: false,
			..Self::new(width, height)
		}
	}

	pub fn set_bounds(&self, bounds: Bounds) {
		self.bounds.set(bounds);
	}
}

impl Container for MockContainer {
	type Surface = RecordingSurface;

	fn bounds(&self) -> Bounds {
		self.bounds.get()
	}

	fn attach_surface(&self) -> Result<RecordingSurface, FieldError> {
		if !self.context_available {
			return Err(FieldError::ContextUnavailable);
		}
		self.mounted.set(self.mounted.get() + 1);
		Ok(RecordingSurface {
			log: self.log.clone(),
			mounted: self.mounted.clone(),
		})
	}
}

/// Frame clock advanced by hand.
pub struct ManualScheduler {
	queue: RefCell<Vec<(FrameHandle, Box<dyn FnOnce()>)>>,
	next_handle: Cell<i32>,
	honor_cancel: bool,
	rejecting: Cell<bool>,
	pub requested: Cell<usize>,
}

impl ManualScheduler {
	pub fn new() -> Rc<Self> {
		Self::with_cancel(true)
	}

	/// A host that can only flag-check: cancellation is a no-op.
	pub fn ignoring_cancel() -> Rc<Self> {
		Self::with_cancel(false)
	}

	fn with_cancel(honor_cancel: bool) -> Rc<Self> {
		Rc::new(Self {
			queue: RefCell::new(Vec::new()),
			next_handle: Cell::new(1),
			honor_cancel,
			rejecting: Cell::new(false),
			requested: Cell::new(0),
		})
	}

	/// Make subsequent requests fail, as a host without a frame clock would.
	pub fn set_rejecting(&self, rejecting: bool) {
		self.rejecting.set(rejecting);
	}

	pub fn pending(&self) -> usize {
		self.queue.borrow().len()
	}

	/// Run every callback queued before this call. Returns how many ran.
	pub fn advance(&self) -> usize {
		let ready = std::mem::take(&mut *self.queue.borrow_mut());
		let count = ready.len();
		for (_, callback) in ready {
			callback();
		}
		count
	}

	pub fn advance_by(&self, frames: usize) {
		for _ in 0..frames {
			self.advance();
		}
	}
}

impl FrameScheduler for ManualScheduler {
	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<FrameHandle, FrameError> {
		if self.rejecting.get() {
			return Err(FrameError("frame clock unavailable".into()));
		}
		let handle = FrameHandle(self.next_handle.get());
		self.next_handle.set(handle.0 + 1);
		self.requested.set(self.requested.get() + 1);
		self.queue.borrow_mut().push((handle, callback));
		Ok(handle)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		if self.honor_cancel {
			self.queue.borrow_mut().retain(|(queued, _)| *queued != handle);
		}
	}
}

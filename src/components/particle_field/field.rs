//! Particle field lifecycle and frame loop.
//!
//! A [`ParticleField`] owns one drawing surface and the particles painted on
//! it. Once started, every frame runs a full update pass, then a full render
//! pass, then requests the next frame from the injected [`FrameScheduler`].
//! Only one frame request is ever outstanding.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use super::host::{Container, FrameScheduler, RandomSource, Surface};
use super::particle::Particle;
use super::render;
use super::theme::ParticleStyle;
use super::types::{Bounds, FieldError, FrameError, FrameHandle};

/// Mutable state shared between the field handle and its frame callbacks.
struct FieldState<S> {
	style: ParticleStyle,
	bounds: Bounds,
	particles: Vec<Particle>,
	/// `None` while inert (attached without a container) or after destroy.
	surface: Option<S>,
	rng: Box<dyn RandomSource>,
	running: bool,
	pending: Option<FrameHandle>,
	next_id: u64,
}

impl<S: Surface> FieldState<S> {
	/// Throw away the population and build a fresh one sized to `bounds`.
	fn populate(&mut self) {
		let count = self.style.particle_count(self.bounds);
		let mut particles = Vec::with_capacity(count);
		for _ in 0..count {
			particles.push(Particle::new(
				self.next_id,
				self.bounds,
				&self.style,
				self.rng.as_mut(),
			));
			self.next_id += 1;
		}
		self.particles = particles;
	}

	fn step(&mut self) {
		let Some(surface) = self.surface.as_mut() else {
			return;
		};
		for particle in &mut self.particles {
			particle.update(self.bounds, &self.style, self.rng.as_mut());
		}
		render::render(surface, &self.particles, &self.style);
	}
}

/// Decorative particle animation over a container.
///
/// Attaching without a container yields an inert field: every operation is a
/// silent no-op. [`destroy`](Self::destroy) consumes the field, so a torn-down
/// field cannot be restarted.
pub struct ParticleField<S: Surface + 'static> {
	state: Rc<RefCell<FieldState<S>>>,
	scheduler: Rc<dyn FrameScheduler>,
}

impl<S: Surface + 'static> ParticleField<S> {
	/// Mount a surface on `container` and build the initial population.
	///
	/// Fails when `style` is out of range, or when the container exists but
	/// cannot provide a drawing surface. The loop is not started.
	pub fn attach<C>(
		container: Option<&C>,
		scheduler: Rc<dyn FrameScheduler>,
		rng: Box<dyn RandomSource>,
		style: ParticleStyle,
	) -> Result<Self, FieldError>
	where
		C: Container<Surface = S>,
	{
		style.validate()?;

		let (bounds, surface) = match container {
			Some(container) => {
				let bounds = container.bounds();
				let mut surface = container.attach_surface()?;
				surface.resize(bounds);
				debug!(
					"particles: attached {}x{} surface",
					bounds.width, bounds.height
				);
				(bounds, Some(surface))
			}
			None => {
				debug!("particles: no container, staying inert");
				(Bounds::default(), None)
			}
		};

		let mut state = FieldState {
			style,
			bounds,
			particles: Vec::new(),
			surface,
			rng,
			running: false,
			pending: None,
			next_id: 0,
		};
		state.populate();

		Ok(Self {
			state: Rc::new(RefCell::new(state)),
			scheduler,
		})
	}

	/// Rebuild the population for the current bounds.
	pub fn populate(&self) {
		self.state.borrow_mut().populate();
	}

	/// Begin the frame loop. Calling it while running does nothing.
	///
	/// If the host rejects the first frame request the field stays stopped,
	/// so a later `start` can try again.
	pub fn start(&self) {
		let mut state = self.state.borrow_mut();
		if state.running || state.surface.is_none() {
			return;
		}
		match Self::schedule(&self.state, &self.scheduler) {
			Ok(handle) => {
				state.running = true;
				state.pending = Some(handle);
				debug!("particles: loop started");
			}
			Err(err) => warn!("particles: cannot start loop: {err}"),
		}
	}

	/// Run one frame now and reschedule. No-op unless running.
	pub fn tick(&self) {
		Self::run_tick(&self.state, &self.scheduler);
	}

	/// Halt the loop and cancel the outstanding frame, if any.
	pub fn stop(&self) {
		let mut state = self.state.borrow_mut();
		let was_running = std::mem::replace(&mut state.running, false);
		if let Some(handle) = state.pending.take() {
			self.scheduler.cancel_frame(handle);
		}
		if was_running {
			debug!("particles: loop stopped");
		}
	}

	/// Adopt new surface bounds and rebuild the whole population.
	pub fn on_resize(&self, bounds: Bounds) {
		let mut guard = self.state.borrow_mut();
		let state = &mut *guard;
		let Some(surface) = state.surface.as_mut() else {
			return;
		};
		surface.resize(bounds);
		state.bounds = bounds;
		state.populate();
		debug!(
			"particles: resized to {}x{}, {} particles",
			bounds.width,
			bounds.height,
			state.particles.len()
		);
	}

	/// Stop the loop and unmount the surface.
	pub fn destroy(self) {
		self.stop();
		let surface = self.state.borrow_mut().surface.take();
		if let Some(mut surface) = surface {
			surface.detach();
			debug!("particles: surface detached");
		}
	}

	pub fn bounds(&self) -> Bounds {
		self.state.borrow().bounds
	}

	pub fn len(&self) -> usize {
		self.state.borrow().particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_running(&self) -> bool {
		self.state.borrow().running
	}

	/// True when attached without a container.
	pub fn is_inert(&self) -> bool {
		self.state.borrow().surface.is_none()
	}

	/// Snapshot of the current population.
	pub fn particles(&self) -> Vec<Particle> {
		self.state.borrow().particles.clone()
	}

	fn run_tick(state: &Rc<RefCell<FieldState<S>>>, scheduler: &Rc<dyn FrameScheduler>) {
		let mut guard = state.borrow_mut();
		if !guard.running {
			return;
		}
		// A manual tick must not leave a second frame chain behind.
		if let Some(stale) = guard.pending.take() {
			scheduler.cancel_frame(stale);
		}
		guard.step();
		match Self::schedule(state, scheduler) {
			Ok(handle) => guard.pending = Some(handle),
			Err(err) => {
				guard.running = false;
				warn!("particles: loop halted: {err}");
			}
		}
	}

	fn schedule(
		state: &Rc<RefCell<FieldState<S>>>,
		scheduler: &Rc<dyn FrameScheduler>,
	) -> Result<FrameHandle, FrameError> {
		let (state_ref, scheduler_ref) = (Rc::downgrade(state), Rc::downgrade(scheduler));
		scheduler.request_frame(Box::new(move || {
			if let (Some(state), Some(scheduler)) = (state_ref.upgrade(), scheduler_ref.upgrade()) {
				Self::run_tick(&state, &scheduler);
			}
		}))
	}
}

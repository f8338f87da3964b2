//! A single drifting, fading particle.

use super::host::{RandomSource, Surface};
use super::theme::{Color, ParticleStyle};
use super::types::Bounds;

/// A self-propelled point that fades out and respawns.
///
/// Velocity, size, opacity and decay are fixed between resets. When `life`
/// runs out the particle is reset in place, so `id` survives respawns and
/// only changes when the field rebuilds its population.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub id: u64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub opacity: f64,
	/// Remaining visibility in `(0, 1]`.
	pub life: f64,
	pub decay: f64,
}

impl Particle {
	pub fn new(
		id: u64,
		bounds: Bounds,
		style: &ParticleStyle,
		rng: &mut dyn RandomSource,
	) -> Self {
		let mut particle = Self {
			id,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			size: 0.0,
			opacity: 0.0,
			life: 1.0,
			decay: 0.0,
		};
		particle.reset(bounds, style, rng);
		particle
	}

	/// Re-roll every random attribute and restore full life.
	pub fn reset(&mut self, bounds: Bounds, style: &ParticleStyle, rng: &mut dyn RandomSource) {
		let (width, height) = (bounds.width as f64, bounds.height as f64);

		self.x = wrap(rng.uniform(0.0, width), width);
		self.y = wrap(rng.uniform(0.0, height), height);
		self.vx = rng.uniform(-style.speed, style.speed);
		self.vy = rng.uniform(-style.speed, style.speed);
		self.size = rng.uniform(style.size_min, style.size_max);
		self.opacity = rng.uniform(style.opacity_min, style.opacity_max);
		self.life = 1.0;
		self.decay = rng.uniform(style.decay_min, style.decay_max);
	}

	/// Advance one frame: move, wrap around the edges, then age.
	///
	/// Speed is per frame, not per second.
	pub fn update(&mut self, bounds: Bounds, style: &ParticleStyle, rng: &mut dyn RandomSource) {
		self.x = wrap(self.x + self.vx, bounds.width as f64);
		self.y = wrap(self.y + self.vy, bounds.height as f64);

		self.life -= self.decay;
		if self.life <= 0.0 {
			self.reset(bounds, style, rng);
		}
	}

	/// Linear fade: base opacity scaled by remaining life.
	pub fn alpha(&self) -> f64 {
		self.opacity * self.life
	}

	pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, color: Color) {
		surface.fill_circle(self.x, self.y, self.size, color, self.alpha());
	}
}

/// Toroidal wrap into `[0, extent)`. Overshoot carries over to the far edge.
fn wrap(value: f64, extent: f64) -> f64 {
	if extent <= 0.0 {
		return 0.0;
	}
	let wrapped = value.rem_euclid(extent);
	// rem_euclid rounds tiny negatives up to `extent` itself
	if wrapped >= extent { 0.0 } else { wrapped }
}

//! Per-frame drawing pass.

use super::host::Surface;
use super::particle::Particle;
use super::theme::ParticleStyle;

/// Full clear followed by a full redraw. Nothing is diffed between frames.
pub fn render<S: Surface + ?Sized>(surface: &mut S, particles: &[Particle], style: &ParticleStyle) {
	surface.clear();
	for particle in particles {
		particle.draw(surface, style.color);
	}
}

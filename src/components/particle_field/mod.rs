//! Decorative particle backdrop.
//!
//! Draws slowly drifting, fading dots on a canvas overlaid on a container:
//! - [`ParticleField`] owns the canvas and the update/render frame loop
//! - [`Particle`] is one dot with its own velocity and lifespan
//! - host ports ([`Container`], [`Surface`], [`FrameScheduler`],
//!   [`RandomSource`]) keep the simulation independent of the DOM
//!
//! # Example
//!
//! ```ignore
//! use hero_particles::{ParticleBackdrop, ParticleStyle};
//!
//! view! {
//!     <ParticleBackdrop particle_style=ParticleStyle::gold()>
//!         <h1>"Hello"</h1>
//!     </ParticleBackdrop>
//! }
//! ```

pub mod canvas;
mod component;
mod field;
pub mod host;
mod particle;
mod render;
pub mod theme;
mod types;

#[cfg(test)]
mod testing;

pub use component::ParticleBackdrop;
pub use field::ParticleField;
pub use host::{Container, FrameScheduler, RandomSource, SeededRandom, Surface};
pub use particle::Particle;
pub use theme::{Color, ParticleStyle, StyleError};
pub use types::{Bounds, FieldError, FrameError, FrameHandle};

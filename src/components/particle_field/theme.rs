//! Visual configuration for the particle backdrop.
//!
//! Every tunable constant of the simulation lives in [`ParticleStyle`]. The
//! defaults reproduce the site's gold dust look; any field can be overridden
//! from JSON (see [`crate::load_particle_style`]).

use serde::Deserialize;
use thiserror::Error;

use super::types::Bounds;

/// RGB color. Particle alpha is applied separately at draw time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

/// Rejected CSS hex color literal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color {0:?}, expected #rgb or #rrggbb")]
pub struct ColorParseError(pub String);

/// A [`ParticleStyle`] value that would break the particle invariants.
#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
	#[error("{field} must be a finite number, got {value}")]
	NotFinite { field: &'static str, value: f64 },

	#[error("{field} must be at least {min}, got {value}")]
	TooSmall {
		field: &'static str,
		min: f64,
		value: f64,
	},

	#[error("{field} must be at most {max}, got {value}")]
	TooLarge {
		field: &'static str,
		max: f64,
		value: f64,
	},

	#[error("decay_min must be positive, got {0}")]
	NonPositiveDecay(f64),

	#[error("{field}_min ({min}) is greater than {field}_max ({max})")]
	InvertedRange {
		field: &'static str,
		min: f64,
		max: f64,
	},
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parse `#rgb` or `#rrggbb`.
	pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
		let err = || ColorParseError(s.to_string());
		let digits = s.trim().strip_prefix('#').ok_or_else(err)?;
		if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(err());
		}
		let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| err());

		match digits.len() {
			3 => {
				let expand = |i: usize| channel(&digits[i..=i].repeat(2));
				Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
			}
			6 => Ok(Self::rgb(
				channel(&digits[0..2])?,
				channel(&digits[2..4])?,
				channel(&digits[4..6])?,
			)),
			_ => Err(err()),
		}
	}

	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl TryFrom<String> for Color {
	type Error = ColorParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::from_hex(&value)
	}
}

/// Ambient particle configuration.
///
/// Ranges are sampled uniformly each time a particle is reset.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
	/// Fill color; alpha comes from each particle's opacity and life.
	pub color: Color,
	/// Max absolute velocity per axis, in pixels per frame.
	pub speed: f64,
	pub size_min: f64,
	pub size_max: f64,
	pub opacity_min: f64,
	pub opacity_max: f64,
	/// Life lost per frame. Life starts at 1.0.
	pub decay_min: f64,
	pub decay_max: f64,
	/// Canvas area (px²) that buys one particle.
	pub area_per_particle: u64,
	/// Hard cap on the population.
	pub max_particles: usize,
	/// Fixed seed for a reproducible layout. `None` draws from `Math.random()`.
	pub seed: Option<u64>,
}

impl ParticleStyle {
	/// Gold dust over a dark hero.
	pub fn gold() -> Self {
		Self {
			color: Color::rgb(212, 175, 55),
			speed: 0.5,
			size_min: 1.0,
			size_max: 3.0,
			opacity_min: 0.1,
			opacity_max: 0.6,
			decay_min: 0.001,
			decay_max: 0.005,
			area_per_particle: 10_000,
			max_particles: 50,
			seed: None,
		}
	}

	/// Reject ranges that would produce negative radii, alpha outside
	/// `[0, 1]`, or particles whose life never runs out.
	pub fn validate(&self) -> Result<(), StyleError> {
		let fields = [
			("speed", self.speed),
			("size_min", self.size_min),
			("size_max", self.size_max),
			("opacity_min", self.opacity_min),
			("opacity_max", self.opacity_max),
			("decay_min", self.decay_min),
			("decay_max", self.decay_max),
		];
		for (field, value) in fields {
			if !value.is_finite() {
				return Err(StyleError::NotFinite { field, value });
			}
		}

		at_least("speed", self.speed, 0.0)?;
		at_least("size_min", self.size_min, 0.0)?;
		at_least("opacity_min", self.opacity_min, 0.0)?;
		if self.opacity_max > 1.0 {
			return Err(StyleError::TooLarge {
				field: "opacity_max",
				max: 1.0,
				value: self.opacity_max,
			});
		}
		if self.decay_min <= 0.0 {
			return Err(StyleError::NonPositiveDecay(self.decay_min));
		}

		ordered("size", self.size_min, self.size_max)?;
		ordered("opacity", self.opacity_min, self.opacity_max)?;
		ordered("decay", self.decay_min, self.decay_max)
	}

	/// Population size for a surface of the given bounds.
	pub fn particle_count(&self, bounds: Bounds) -> usize {
		let by_area = bounds.area() / self.area_per_particle.max(1);
		by_area.min(self.max_particles as u64) as usize
	}
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), StyleError> {
	if value < min {
		return Err(StyleError::TooSmall { field, min, value });
	}
	Ok(())
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), StyleError> {
	if min > max {
		return Err(StyleError::InvertedRange { field, min, max });
	}
	Ok(())
}

impl Default for ParticleStyle {
	fn default() -> Self {
		Self::gold()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_long_and_short_hex() {
		assert_eq!(Color::from_hex("#d4af37"), Ok(Color::rgb(212, 175, 55)));
		assert_eq!(Color::from_hex("#fff"), Ok(Color::rgb(255, 255, 255)));
		assert_eq!(Color::from_hex(" #0A0b0C "), Ok(Color::rgb(10, 11, 12)));
	}

	#[test]
	fn rejects_malformed_hex() {
		for bad in ["d4af37", "#d4af3", "#ggg", "#", "#d4af37ff", "#+1+2+3"] {
			assert!(Color::from_hex(bad).is_err(), "{bad} should be rejected");
		}
	}

	#[test]
	fn css_output_round_trips_default_gold() {
		assert_eq!(ParticleStyle::default().color.to_css_rgb(), "#d4af37");
	}

	#[test]
	fn count_scales_with_area_and_caps() {
		let style = ParticleStyle::default();
		assert_eq!(style.particle_count(Bounds::new(220, 220)), 4);
		assert_eq!(style.particle_count(Bounds::new(99, 100)), 0);
		assert_eq!(style.particle_count(Bounds::new(100, 100)), 1);
		assert_eq!(style.particle_count(Bounds::new(1000, 1000)), 50);
		assert_eq!(style.particle_count(Bounds::new(0, 0)), 0);
	}

	#[test]
	fn zero_area_per_particle_does_not_divide_by_zero() {
		let style = ParticleStyle {
			area_per_particle: 0,
			..ParticleStyle::default()
		};
		assert_eq!(style.particle_count(Bounds::new(10, 10)), 50);
	}

	#[test]
	fn partial_json_overrides_keep_defaults() {
		let style: ParticleStyle =
			serde_json::from_str(r##"{ "color": "#3b82f6", "max_particles": 20 }"##).unwrap();
		assert_eq!(style.color, Color::rgb(59, 130, 246));
		assert_eq!(style.max_particles, 20);
		assert_eq!(style.speed, 0.5);
		assert_eq!(style.area_per_particle, 10_000);
	}

	#[test]
	fn default_style_is_valid() {
		assert_eq!(ParticleStyle::default().validate(), Ok(()));
	}

	#[test]
	fn negative_decay_is_rejected() {
		let style: ParticleStyle =
			serde_json::from_str(r#"{ "decay_min": -0.01, "decay_max": -0.005 }"#).unwrap();
		assert_eq!(style.validate(), Err(StyleError::NonPositiveDecay(-0.01)));
	}

	#[test]
	fn inverted_ranges_are_rejected() {
		let style = ParticleStyle {
			decay_min: 0.01,
			decay_max: 0.002,
			..ParticleStyle::default()
		};
		assert!(matches!(
			style.validate(),
			Err(StyleError::InvertedRange { field: "decay", .. })
		));

		let style = ParticleStyle {
			size_min: 4.0,
			..ParticleStyle::default()
		};
		assert!(matches!(
			style.validate(),
			Err(StyleError::InvertedRange { field: "size", .. })
		));
	}

	#[test]
	fn out_of_range_values_are_rejected() {
		let cases = [
			ParticleStyle {
				size_min: -1.0,
				size_max: -0.5,
				..ParticleStyle::default()
			},
			ParticleStyle {
				speed: -0.5,
				..ParticleStyle::default()
			},
			ParticleStyle {
				opacity_max: 1.5,
				..ParticleStyle::default()
			},
			ParticleStyle {
				opacity_min: -0.1,
				..ParticleStyle::default()
			},
			ParticleStyle {
				decay_min: 0.0,
				..ParticleStyle::default()
			},
			ParticleStyle {
				speed: f64::NAN,
				..ParticleStyle::default()
			},
			ParticleStyle {
				decay_max: f64::INFINITY,
				..ParticleStyle::default()
			},
		];
		for style in cases {
			assert!(style.validate().is_err(), "{style:?} should be rejected");
		}
	}

	#[test]
	fn seed_is_optional() {
		assert_eq!(ParticleStyle::default().seed, None);
		let style: ParticleStyle = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
		assert_eq!(style.seed, Some(42));
	}

	#[test]
	fn bad_color_fails_the_whole_config() {
		let result = serde_json::from_str::<ParticleStyle>(r#"{ "color": "gold" }"#);
		assert!(result.is_err());
	}
}

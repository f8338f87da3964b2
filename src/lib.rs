//! hero-particles: decorative particle backdrop for a landing page hero.
//!
//! This crate provides a WASM particle canvas that drifts behind the hero
//! content, plus the Leptos components that own its lifecycle.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{
	Bounds, FieldError, ParticleBackdrop, ParticleField, ParticleStyle,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("hero-particles: logging initialized");
}

/// Load style overrides from a script element with id="particles-config".
/// Expected format: JSON object with any subset of [`ParticleStyle`] fields.
pub fn load_particle_style() -> Option<ParticleStyle> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particles-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	parse_particle_style(&json_text)
}

fn parse_particle_style(json_text: &str) -> Option<ParticleStyle> {
	let style = match serde_json::from_str::<ParticleStyle>(json_text) {
		Ok(style) => style,
		Err(e) => {
			warn!("hero-particles: failed to parse particle style: {}", e);
			return None;
		}
	};
	if let Err(e) = style.validate() {
		warn!("hero-particles: ignoring particle style: {}", e);
		return None;
	}
	info!(
		"hero-particles: loaded style, up to {} particles",
		style.max_particles
	);
	Some(style)
}

/// Main application component.
/// Renders the hero section with the particle backdrop behind it.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let particle_style = load_particle_style().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Crafted Interiors" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section id="home" class="hero">
			<ParticleBackdrop particle_style=particle_style>
				<div class="hero-content">
					<h1 class="hero-title">"Crafted Interiors"</h1>
					<p class="hero-subtitle">"Timeless spaces, designed around the way you live."</p>
					<a href="#contact" class="btn btn-primary">"Start your project"</a>
				</div>
			</ParticleBackdrop>
		</section>
	}
}

//! Browser implementations of the host ports.
//!
//! - [`DomContainer`]: overlays a `<canvas>` on an existing element
//! - [`CanvasSurface`]: draws through `CanvasRenderingContext2d`
//! - [`AnimationFrameScheduler`]: `requestAnimationFrame` / `cancelAnimationFrame`
//! - [`JsRandom`]: `Math.random()`

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

use super::host::{Container, FrameScheduler, RandomSource, Surface};
use super::theme::Color;
use super::types::{Bounds, FieldError, FrameError, FrameHandle};

/// Inline style of the overlay canvas: fills the container, stays out of
/// layout and never receives pointer events.
const OVERLAY_STYLE: [(&str, &str); 7] = [
	("position", "absolute"),
	("top", "0"),
	("left", "0"),
	("width", "100%"),
	("height", "100%"),
	("pointer-events", "none"),
	("z-index", "1"),
];

fn js_error(err: JsValue) -> FieldError {
	FieldError::SurfaceCreation(format!("{err:?}"))
}

/// An element the particle canvas is overlaid on.
pub struct DomContainer {
	element: HtmlElement,
}

impl DomContainer {
	pub fn new(element: HtmlElement) -> Self {
		Self { element }
	}
}

impl Container for DomContainer {
	type Surface = CanvasSurface;

	fn bounds(&self) -> Bounds {
		let rect = self.element.get_bounding_client_rect();
		Bounds::new(rect.width().max(0.0) as u32, rect.height().max(0.0) as u32)
	}

	fn attach_surface(&self) -> Result<CanvasSurface, FieldError> {
		let document = self
			.element
			.owner_document()
			.ok_or_else(|| FieldError::SurfaceCreation("container has no document".into()))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(js_error)?
			.dyn_into()
			.map_err(|_| FieldError::SurfaceCreation("created element is not a canvas".into()))?;

		let style = canvas.style();
		for (property, value) in OVERLAY_STYLE {
			style.set_property(property, value).map_err(js_error)?;
		}
		canvas.set_attribute("aria-hidden", "true").map_err(js_error)?;
		self.element.append_child(&canvas).map_err(js_error)?;

		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
		let Some(ctx) = ctx else {
			canvas.remove();
			return Err(FieldError::ContextUnavailable);
		};

		Ok(CanvasSurface {
			canvas,
			ctx,
			bounds: Bounds::default(),
		})
	}
}

/// Overlay canvas plus its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	bounds: Bounds,
}

impl Surface for CanvasSurface {
	fn resize(&mut self, bounds: Bounds) {
		self.canvas.set_width(bounds.width);
		self.canvas.set_height(bounds.height);
		self.bounds = bounds;
	}

	fn clear(&mut self) {
		self.ctx.clear_rect(
			0.0,
			0.0,
			self.bounds.width as f64,
			self.bounds.height as f64,
		);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
		self.ctx.save();
		self.ctx.set_global_alpha(alpha);
		self.ctx.set_fill_style_str(&color.to_css_rgb());
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
		self.ctx.restore();
	}

	fn detach(&mut self) {
		self.canvas.remove();
	}
}

/// The single frame an [`AnimationFrameScheduler`] can have outstanding.
#[derive(Default)]
struct FrameSlot {
	pending: Cell<Option<i32>>,
	callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Frames synchronised with the display refresh.
///
/// One JS closure is created up front and handed to every
/// `requestAnimationFrame` call, so cancelled frames leave nothing behind.
/// A new request supersedes any frame still pending.
pub struct AnimationFrameScheduler {
	window: Window,
	slot: Rc<FrameSlot>,
	on_frame: Closure<dyn FnMut()>,
}

impl AnimationFrameScheduler {
	pub fn new(window: Window) -> Self {
		let slot = Rc::new(FrameSlot::default());
		let frame_slot = slot.clone();
		let on_frame: Closure<dyn FnMut()> = Closure::new(move || {
			frame_slot.pending.set(None);
			// Release the borrow first: the callback usually requests the next frame.
			let callback = frame_slot.callback.borrow_mut().take();
			if let Some(callback) = callback {
				callback();
			}
		});
		Self {
			window,
			slot,
			on_frame,
		}
	}
}

impl FrameScheduler for AnimationFrameScheduler {
	fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<FrameHandle, FrameError> {
		if let Some(previous) = self.slot.pending.take() {
			let _ = self.window.cancel_animation_frame(previous);
		}
		*self.slot.callback.borrow_mut() = Some(callback);
		match self
			.window
			.request_animation_frame(self.on_frame.as_ref().unchecked_ref())
		{
			Ok(id) => {
				self.slot.pending.set(Some(id));
				Ok(FrameHandle(id))
			}
			Err(err) => {
				self.slot.callback.borrow_mut().take();
				Err(FrameError(format!("{err:?}")))
			}
		}
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		if self.slot.pending.get() != Some(handle.0) {
			return;
		}
		self.slot.pending.set(None);
		self.slot.callback.borrow_mut().take();
		let _ = self.window.cancel_animation_frame(handle.0);
	}
}

impl Drop for AnimationFrameScheduler {
	fn drop(&mut self) {
		// The browser must not call into `on_frame` once it is freed.
		if let Some(id) = self.slot.pending.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
	}
}

/// `Math.random()` scaled to the requested range.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
	fn uniform(&mut self, min: f64, max: f64) -> f64 {
		min + js_sys::Math::random() * (max - min)
	}
}

/// Whether the user asked the OS to minimise non-essential motion.
pub fn prefers_reduced_motion() -> bool {
	web_sys::window()
		.and_then(|window| {
			window
				.match_media("(prefers-reduced-motion: reduce)")
				.ok()
				.flatten()
		})
		.is_some_and(|query| query.matches())
}

//! Leptos component owning the hero's particle backdrop.
//!
//! The component renders the container, attaches a [`ParticleField`] once the
//! node is mounted and forwards the window events the field cares about:
//! debounced resizes, page visibility and unload. Nothing is constructed when
//! the user prefers reduced motion. Unmounting the component destroys the
//! field and removes every listener it installed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, EventTarget, HtmlElement, Window};

use super::canvas::{AnimationFrameScheduler, DomContainer, JsRandom, prefers_reduced_motion};
use super::field::ParticleField;
use super::host::{Container, RandomSource, SeededRandom};
use super::theme::ParticleStyle;

/// Quiet period after the last `resize` event before the field is rebuilt.
const RESIZE_DEBOUNCE_MS: i32 = 250;

/// The running field together with the element it measures.
struct BackdropContext<C: Container> {
	field: ParticleField<C::Surface>,
	container: C,
}

type SharedContext = Rc<RefCell<Option<BackdropContext<DomContainer>>>>;

/// Rebuild the field for the container's current size.
fn resize_backdrop<C: Container>(slot: &RefCell<Option<BackdropContext<C>>>) {
	if let Some(ref c) = *slot.borrow() {
		c.field.on_resize(c.container.bounds());
	}
}

/// Destroy the field held in `slot`. Returns false if it was already gone.
fn destroy_backdrop<C: Container>(slot: &RefCell<Option<BackdropContext<C>>>) -> bool {
	let taken = slot.borrow_mut().take();
	match taken {
		Some(c) => {
			c.field.destroy();
			debug!("particles: backdrop destroyed");
			true
		}
		None => false,
	}
}

/// Event listeners installed for one backdrop, kept so they can be removed.
#[derive(Default)]
struct Listeners {
	installed: Vec<(EventTarget, &'static str, Closure<dyn FnMut()>)>,
	/// Debounced resize: the timeout callback and the pending timer id.
	resize: Option<(Window, Closure<dyn FnMut()>, Rc<Cell<Option<i32>>>)>,
}

impl Listeners {
	fn listen(&mut self, target: &EventTarget, event: &'static str, callback: Closure<dyn FnMut()>) {
		match target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
			Ok(()) => self.installed.push((target.clone(), event, callback)),
			Err(err) => warn!("particles: cannot listen for {event}: {err:?}"),
		}
	}

	/// Detach every listener, cancel a pending resize, then free the closures.
	fn remove_all(&mut self) {
		for (target, event, callback) in self.installed.drain(..) {
			let _ = target.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
		}
		if let Some((window, _apply, timer)) = self.resize.take() {
			if let Some(pending) = timer.take() {
				window.clear_timeout_with_handle(pending);
			}
		}
	}
}

/// Container with an animated particle canvas behind its children.
///
/// The container is `position: relative` so the overlay canvas can fill it.
/// A style with a `seed` gets a reproducible layout.
#[component]
pub fn ParticleBackdrop(
	#[prop(optional)] particle_style: Option<ParticleStyle>,
	#[prop(optional)] children: Option<Children>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let listeners = Rc::new(RefCell::new(Listeners::default()));
	let particle_style = particle_style.unwrap_or_default();

	let reduced_motion = prefers_reduced_motion();
	if reduced_motion {
		info!("particles: reduced motion requested, backdrop disabled");
	}

	let owned = StoredValue::new_local((context.clone(), listeners.clone()));
	on_cleanup(move || {
		owned.try_update_value(|(context, listeners)| {
			listeners.borrow_mut().remove_all();
			destroy_backdrop(context);
		});
	});

	Effect::new(move |_| {
		let Some(element) = container_ref.get() else {
			return;
		};
		if reduced_motion || context.borrow().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};

		let rng: Box<dyn RandomSource> = match particle_style.seed {
			Some(seed) => Box::new(SeededRandom::new(seed)),
			None => Box::new(JsRandom),
		};
		let element: HtmlElement = element.into();
		let container = DomContainer::new(element);
		let field = match ParticleField::attach(
			Some(&container),
			Rc::new(AnimationFrameScheduler::new(window.clone())),
			rng,
			particle_style,
		) {
			Ok(field) => field,
			Err(err) => {
				error!("particles: cannot attach backdrop: {err}");
				return;
			}
		};
		field.start();
		info!("particles: backdrop running with {} particles", field.len());
		*context.borrow_mut() = Some(BackdropContext { field, container });

		let mut listeners = listeners.borrow_mut();
		bind_resize(&mut listeners, &window, &context);
		bind_unload(&mut listeners, &window, &context);
		if let Some(document) = window.document() {
			bind_visibility(&mut listeners, &document, &context);
		}
	});

	view! {
		<div
			node_ref=container_ref
			class="particle-backdrop"
			style="position: relative; overflow: hidden;"
		>
			{children.map(|children| children())}
		</div>
	}
}

/// Rebuild the field 250ms after the window stops resizing.
fn bind_resize(listeners: &mut Listeners, window: &Window, context: &SharedContext) {
	let context = context.clone();
	let apply: Closure<dyn FnMut()> = Closure::new(move || resize_backdrop(&context));

	let apply_fn: js_sys::Function = apply.as_ref().unchecked_ref::<js_sys::Function>().clone();
	let timer = Rc::new(Cell::new(None::<i32>));
	let (window_debounce, timer_debounce) = (window.clone(), timer.clone());
	let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
		if let Some(pending) = timer_debounce.take() {
			window_debounce.clear_timeout_with_handle(pending);
		}
		match window_debounce
			.set_timeout_with_callback_and_timeout_and_arguments_0(&apply_fn, RESIZE_DEBOUNCE_MS)
		{
			Ok(id) => timer_debounce.set(Some(id)),
			Err(err) => warn!("particles: cannot debounce resize: {err:?}"),
		}
	});
	listeners.listen(window, "resize", on_resize);
	listeners.resize = Some((window.clone(), apply, timer));
}

/// Pause while the tab is hidden.
fn bind_visibility(listeners: &mut Listeners, document: &Document, context: &SharedContext) {
	let (document_cb, context) = (document.clone(), context.clone());
	let on_change: Closure<dyn FnMut()> = Closure::new(move || {
		if let Some(ref c) = *context.borrow() {
			if document_cb.hidden() {
				c.field.stop();
			} else {
				c.field.start();
			}
		}
	});
	listeners.listen(document, "visibilitychange", on_change);
}

/// Tear the field down with the page. The listener itself stays installed
/// until the component is cleaned up.
fn bind_unload(listeners: &mut Listeners, window: &Window, context: &SharedContext) {
	let context = context.clone();
	let on_unload: Closure<dyn FnMut()> = Closure::new(move || {
		destroy_backdrop(&context);
	});
	listeners.listen(window, "beforeunload", on_unload);
}

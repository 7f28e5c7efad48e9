//! Breath Pacer entry point
//!
//! Web: wires the DOM, Web Audio and LocalStorage to the frame loop.
//! Native: runs a scripted session headlessly, optionally writing the tone
//! to a WAV file.

#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, Window};

    use breath_pacer::audio::WebTone;
    use breath_pacer::input::KeySignal;
    use breath_pacer::persistence::LocalStorageStore;
    use breath_pacer::renderer::CanvasSurface;
    use breath_pacer::{App, BreathSettings, Hud, HudField};

    /// Page state shared by the event handlers and the frame loop
    struct Host {
        app: App<WebTone, LocalStorageStore>,
        surface: CanvasSurface,
        hud: Hud,
        document: Document,
    }

    impl Host {
        fn frame(&mut self) {
            self.app.frame(&mut self.surface);
            self.sync_hud();
        }

        /// Apply queued events to the HUD, touching only changed labels
        fn sync_hud(&mut self) {
            for event in self.app.drain_events() {
                for &field in self.hud.apply(&event) {
                    self.write_field(field);
                }
            }
        }

        fn write_field(&self, field: HudField) {
            let Some(el) = self.document.get_element_by_id(field.element_id()) else {
                return;
            };
            el.set_text_content(Some(&self.hud.text(field)));
            if field == HudField::Sound {
                let _ = el.set_attribute("aria-pressed", self.hud.mute_pressed());
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Breath Pacer starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("cvs")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas #cvs not found");
            return;
        };
        let Some(surface) = CanvasSurface::new(canvas) else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let host = Rc::new(RefCell::new(Host {
            app: App::new(&BreathSettings::default(), LocalStorageStore::new()),
            surface,
            hud: Hud::default(),
            document: document.clone(),
        }));

        // Initial labels from defaults
        {
            let h = host.borrow();
            for field in HudField::ALL {
                h.write_field(field);
            }
        }

        setup_keyboard(&window, host.clone());
        setup_controls(&document, host.clone());
        setup_teardown(&window, host.clone());

        // Stored score arrives after the first frames; until then defaults apply
        {
            let host = host.clone();
            wasm_bindgen_futures::spawn_local(async move {
                host.borrow_mut().app.load_score();
            });
        }

        request_animation_frame(host);

        log::info!("Breath Pacer running!");
    }

    fn setup_keyboard(window: &Window, host: Rc<RefCell<Host>>) {
        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(signal) = KeySignal::from_key(&event.code(), pressed, event.repeat())
                else {
                    // Still swallow auto-repeat so the page does not scroll
                    if event.code() == breath_pacer::input::CONTROL_KEY_CODE {
                        event.prevent_default();
                    }
                    return;
                };
                event.prevent_default();
                let mut h = host.borrow_mut();
                match signal {
                    KeySignal::Press => {
                        h.app.press(WebTone::start);
                    }
                    KeySignal::Release => h.app.release(),
                }
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(document: &Document, host: Rc<RefCell<Host>>) {
        // Pace selector
        if let Some(input) = document
            .get_element_by_id("pace")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            host.borrow_mut().app.set_pace_str(&input.value());

            let host = host.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().app.set_pace_str(&input_clone.value());
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset
        if let Some(btn) = document.get_element_by_id("reset") {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut h = host.borrow_mut();
                h.app.reset();
                h.sync_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mute toggle
        if let Some(btn) = document.get_element_by_id("mute") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut h = host.borrow_mut();
                h.app.toggle_sound();
                h.sync_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(window: &Window, host: Rc<RefCell<Host>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            host.borrow_mut().app.teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(host: Rc<RefCell<Host>>) {
        host.borrow_mut().frame();
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_host::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use clap::Parser;
    use glam::Vec2;

    use breath_pacer::audio::SineVoice;
    use breath_pacer::consts::{FRAME_RATE, SURFACE_SIZE};
    use breath_pacer::persistence::FileStore;
    use breath_pacer::renderer::DisplayList;
    use breath_pacer::{App, Hud, HudField};

    env_logger::init();
    let args = cli::Args::parse();
    log::info!("Breath Pacer (native) starting...");

    let settings = args.load_settings()?;
    // Fail on a bad sample rate before any frame runs
    SineVoice::new(args.sample_rate)?;

    let mut app: App<SineVoice, FileStore> = App::new(&settings, FileStore::new(&args.store));
    app.load_score();
    if args.mute && app.score().sound_enabled {
        app.toggle_sound();
    }

    let mut wav = match &args.wav {
        Some(path) => Some(
            hound::WavWriter::create(path, args.wav_spec())
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => None,
    };

    let mut surface = DisplayList::new(Vec2::splat(SURFACE_SIZE));
    let mut hud = Hud::default();
    let mut buffer = Vec::new();
    let mut wav_error = None;

    let summary = args.script().run(
        &mut app,
        &mut surface,
        || SineVoice::new(args.sample_rate),
        |app| {
            for event in app.drain_events() {
                hud.apply(&event);
            }
            let Some(voice) = app.audio_mut().backend_mut() else {
                return;
            };
            buffer.resize(voice.samples_per_frame(FRAME_RATE), 0.0);
            voice.render(&mut buffer);
            let Some(writer) = wav.as_mut() else {
                return;
            };
            if wav_error.is_some() {
                return;
            }
            for &sample in &buffer {
                if let Err(e) = writer.write_sample(sample) {
                    wav_error = Some(e);
                    break;
                }
            }
        },
    );
    app.teardown();
    for event in app.drain_events() {
        hud.apply(&event);
    }

    if let Some(e) = wav_error {
        return Err(e).context("Failed to write WAV");
    }
    if let Some(writer) = wav {
        writer.finalize().context("Failed to finalize WAV")?;
    }

    log::info!(
        "Ran {} frames: {} breaths, best {}",
        summary.frames,
        summary.breaths,
        summary.best
    );
    for field in HudField::ALL {
        println!("{}", hud.text(field));
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Bindings to the YouTube iframe API and the adapter built on them.
//!
//! The API script is loaded by the page. Players are constructed through the global `YT.Player`
//! looked up at runtime, so a page without the API degrades to cartridges without video.

use std::cell::RefCell;
use std::rc::Rc;

use aurorachrome_core::{
    AdapterKey, AdapterRegistry, BoardGeneration, Cancel, PlaybackAdapter, PlayerOptions, PlayerState,
};
use gloo::timers::callback::Interval;
use gloo::utils::{document, window};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

#[wasm_bindgen]
extern "C" {
    /// A `YT.Player` instance that has signalled ready.
    #[derive(Debug, Clone)]
    pub(crate) type RawPlayer;

    #[wasm_bindgen(method, catch, js_name = seekTo)]
    fn seek_to(this: &RawPlayer, seconds: f64, allow_seek_ahead: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getCurrentTime)]
    fn get_current_time(this: &RawPlayer) -> Result<f64, JsValue>;

    #[wasm_bindgen(method, catch, js_name = playVideo)]
    fn play_video(this: &RawPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = stopVideo)]
    fn stop_video(this: &RawPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = mute)]
    fn mute_video(this: &RawPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getIframe)]
    fn get_iframe(this: &RawPlayer) -> Result<HtmlElement, JsValue>;
}

/// Logs instead of throwing when the player went away under us.
fn quietly<T>(action: &str, result: Result<T, JsValue>) -> Option<T> {
    result
        .map_err(|err| log::debug!("player {} failed: {:?}", action, err))
        .ok()
}

#[derive(Debug, Clone)]
pub(crate) struct YtPlayer(RawPlayer);

impl YtPlayer {
    pub(crate) fn iframe(&self) -> Option<HtmlElement> {
        quietly("getIframe", self.0.get_iframe())
    }
}

impl PlaybackAdapter for YtPlayer {
    fn seek_to(&self, seconds: f64) {
        quietly("seekTo", self.0.seek_to(seconds, true));
    }

    fn current_time(&self) -> f64 {
        quietly("getCurrentTime", self.0.get_current_time()).unwrap_or_default()
    }

    fn play(&self) {
        quietly("playVideo", self.0.play_video());
    }

    fn stop(&self) {
        quietly("stopVideo", self.0.stop_video());
    }

    fn mute(&self) {
        quietly("mute", self.0.mute_video());
    }
}

fn set(target: &Object, key: &str, value: impl Into<JsValue>) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), &value.into()).map(|_| ())
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn player_vars(options: &PlayerOptions) -> Result<Object, JsValue> {
    let vars = Object::new();
    set(&vars, "autoplay", flag(options.autoplay))?;
    set(&vars, "mute", flag(options.mute))?;
    set(&vars, "controls", flag(options.controls))?;
    set(&vars, "playsinline", 1)?;
    set(&vars, "modestbranding", 1)?;
    set(&vars, "rel", 0)?;
    if options.looping {
        set(&vars, "loop", 1)?;
        set(&vars, "playlist", options.video_id.as_str())?;
    }
    if let Some((start, end)) = options.window {
        set(&vars, "start", start)?;
        set(&vars, "end", end)?;
    }
    Ok(vars)
}

fn event_field(event: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(event, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined())
}

/// Builds a player inside `host` and reports its readiness and state changes.
///
/// `on_ready` runs at most once. Callbacks may arrive after the caller moved on, so they must
/// tolerate being stale.
pub(crate) fn spawn_player(
    host: &Element,
    options: &PlayerOptions,
    on_ready: impl FnOnce(YtPlayer) + 'static,
    on_state: impl Fn(PlayerState) + 'static,
) -> Result<(), JsValue> {
    let api = Reflect::get(&window(), &JsValue::from_str("YT"))?;
    if api.is_undefined() {
        return Err(JsValue::from_str("YouTube iframe API is not loaded"));
    }
    let constructor: Function = Reflect::get(&api, &JsValue::from_str("Player"))?.dyn_into()?;

    // The API replaces its mount element with an iframe, so it gets one we own.
    let mount = document().create_element("div")?;
    host.append_child(&mount)?;

    let events = Object::new();
    let ready = Closure::once_into_js(move |event: JsValue| {
        match event_field(&event, "target") {
            Some(target) => on_ready(YtPlayer(target.unchecked_into())),
            None => log::warn!("ready event without a player"),
        }
    });
    set(&events, "onReady", ready)?;
    let state_change = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
        let state = event_field(&event, "data")
            .and_then(|data| data.as_f64())
            .and_then(|code| PlayerState::from_code(code as i32));
        if let Some(state) = state {
            on_state(state);
        }
    });
    // Players outlive any single component render; the callback guards staleness itself.
    set(&events, "onStateChange", state_change.into_js_value())?;

    let config = Object::new();
    set(&config, "videoId", options.video_id.as_str())?;
    set(&config, "playerVars", player_vars(options)?)?;
    set(&config, "events", events)?;
    if let Some((width, height)) = options.size {
        set(&config, "width", width)?;
        set(&config, "height", height)?;
    }

    Reflect::construct(&constructor, &Array::of2(&mount, &config))?;
    log::debug!("spawned player for {}", options.video_id);
    Ok(())
}

/// Removes every player element previously spawned into `host`.
pub(crate) fn clear_host(host: &Element) {
    host.set_inner_html("");
}

/// The mounted cartridge's ready adapters, shared between the host and the cartridge view.
#[derive(Clone, Default)]
pub(crate) struct Stage(Rc<RefCell<AdapterRegistry<YtPlayer>>>);

impl PartialEq for Stage {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Stage {
    pub(crate) fn generation(&self) -> BoardGeneration {
        self.0.borrow().generation()
    }

    pub(crate) fn rebuild(&self) -> BoardGeneration {
        self.0.borrow_mut().rebuild()
    }

    pub(crate) fn on_ready(&self, generation: BoardGeneration, key: AdapterKey, player: YtPlayer) -> bool {
        self.0.borrow_mut().on_ready(generation, key, player)
    }

    pub(crate) fn release(&self, key: AdapterKey) {
        self.0.borrow_mut().release(key);
    }

    pub(crate) fn with_ready(&self, key: AdapterKey, f: impl FnOnce(&YtPlayer)) {
        self.0.borrow().with_ready(key, f)
    }

    pub(crate) fn stop_all(&self) {
        self.0.borrow().stop_all()
    }
}

/// A repeating timer that can be cancelled through a [`TaskSet`](aurorachrome_core::TaskSet).
pub(crate) struct IntervalTask(Interval);

impl IntervalTask {
    pub(crate) fn every(millis: u32, tick: impl FnMut() + 'static) -> Self {
        Self(Interval::new(millis, tick))
    }
}

impl Cancel for IntervalTask {
    fn cancel(self) {
        drop(self.0.cancel());
    }
}

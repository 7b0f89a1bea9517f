use std::cell::RefCell;
use std::rc::Rc;

use gloo_console::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Node};

use crate::demux::{ReadyDemux, ReadyMessage, Token};
use crate::events::PlayerEvent;
use crate::loader::Host;
use crate::Error;

pub const SDK_SCRIPT_ID: &str = "facebook-jssdk";
pub const SDK_URL: &str = "https://connect.facebook.net/en_US/sdk.js#xfbml=1&version=v2.3";
pub const SDK_VERSION: &str = "v2.5";
pub const READY_EVENT: &str = "xfbml.ready";
pub const EMBED_CLASS: &str = "fb-video";
pub const VIDEO_URL_PREFIX: &str = "https://www.facebook.com/facebook/videos/";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = FB, js_name = init)]
    fn fb_init(options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["FB", "Event"], js_name = subscribe)]
    fn event_subscribe(event: &str, callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = ["FB", "Event"], js_name = unsubscribe)]
    fn event_unsubscribe(event: &str, callback: &Closure<dyn FnMut(JsValue)>);

    /// An activated embedded video, as announced by `xfbml.ready`.
    ///
    /// See <https://developers.facebook.com/docs/plugins/embedded-video-player/api>
    #[derive(Debug, Clone)]
    pub type VideoPlayer;

    #[wasm_bindgen(method)]
    pub fn play(this: &VideoPlayer);

    #[wasm_bindgen(method)]
    pub fn pause(this: &VideoPlayer);

    /// Seek to `seconds` from the start.
    #[wasm_bindgen(method)]
    pub fn seek(this: &VideoPlayer, seconds: f64);

    #[wasm_bindgen(method)]
    pub fn mute(this: &VideoPlayer);

    #[wasm_bindgen(method)]
    pub fn unmute(this: &VideoPlayer);

    #[wasm_bindgen(method, js_name = isMuted)]
    pub fn is_muted(this: &VideoPlayer) -> bool;

    /// `volume` is in `0.0..=1.0`.
    #[wasm_bindgen(method, js_name = setVolume)]
    pub fn set_volume(this: &VideoPlayer, volume: f64);

    #[wasm_bindgen(method, js_name = getVolume)]
    pub fn get_volume(this: &VideoPlayer) -> f64;

    #[wasm_bindgen(method, js_name = getCurrentPosition)]
    pub fn get_current_position(this: &VideoPlayer) -> f64;

    #[wasm_bindgen(method, js_name = getDuration)]
    pub fn get_duration(this: &VideoPlayer) -> f64;

    #[wasm_bindgen(method, js_name = subscribe)]
    fn _subscribe(
        this: &VideoPlayer,
        event: &str,
        callback: &Closure<dyn FnMut(JsValue)>,
    ) -> EventHandle;

    /// Release handle returned by `VideoPlayer.subscribe`.
    type EventHandle;

    #[wasm_bindgen(catch, method)]
    fn release(this: &EventHandle, event: &str) -> Result<(), JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions<'a> {
    pub app_id: &'a str,
    pub xfbml: bool,
    pub version: &'a str,
}

/// `FB.init`; safe to call once per player. With `xfbml` set, the SDK also
/// parses any embed markup on the page.
pub fn init(app_id: &str) -> Result<(), Error> {
    let options = serde_wasm_bindgen::to_value(&InitOptions {
        app_id,
        xfbml: true,
        version: SDK_VERSION,
    })?;
    fb_init(&options)?;
    Ok(())
}

/// A live event subscription on a [`VideoPlayer`]. Released on drop.
pub struct Subscription {
    event: PlayerEvent,
    handle: EventHandle,
    listener: Option<Closure<dyn FnMut(JsValue)>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release(self.event.sdk_name()) {
            warn!("failed to release player event", self.event.sdk_name(), e);
            // the player still holds the listener
            if let Some(listener) = self.listener.take() {
                listener.forget();
            }
        }
    }
}

impl VideoPlayer {
    pub fn subscribe(&self, event: PlayerEvent, mut listener: impl FnMut() + 'static) -> Subscription {
        let listener: Closure<dyn FnMut(JsValue)> = Closure::new(move |_: JsValue| listener());
        let handle = self._subscribe(event.sdk_name(), &listener);
        Subscription {
            event,
            handle,
            listener: Some(listener),
        }
    }
}

fn parse_ready_message(raw: &JsValue) -> Option<ReadyMessage<VideoPlayer>> {
    let kind = js_sys::Reflect::get(raw, &"type".into()).ok()?.as_string()?;
    let id = js_sys::Reflect::get(raw, &"id".into())
        .ok()
        .and_then(|id| id.as_string());
    let instance = js_sys::Reflect::get(raw, &"instance".into()).ok()?;
    if instance.is_undefined() || instance.is_null() {
        return None;
    }
    Some(ReadyMessage {
        kind,
        id,
        instance: instance.unchecked_into(),
    })
}

/// The page's single `xfbml.ready` listener and the players waiting on it.
#[derive(Default)]
struct ReadyChannel {
    demux: ReadyDemux<VideoPlayer>,
    listener: Option<Closure<dyn FnMut(JsValue)>>,
}

thread_local! {
    static READY: RefCell<ReadyChannel> = RefCell::new(ReadyChannel::default());
}

fn on_ready_broadcast(raw: JsValue) {
    let Some(msg) = parse_ready_message(&raw) else { return };
    let handlers = READY.with(|ch| ch.borrow().demux.handlers_for(&msg));
    for handler in handlers {
        handler(msg.instance.clone());
    }
}

/// Interest in the ready announcement of one embed. Dropping it unregisters;
/// the SDK-level listener is removed with the last registration.
pub struct ReadyRegistration {
    token: Token,
}

impl ReadyRegistration {
    /// Requires the SDK to be loaded.
    pub fn new(embed_id: Option<String>, handler: impl Fn(VideoPlayer) + 'static) -> Self {
        READY.with(|ch| {
            let mut ch = ch.borrow_mut();
            if ch.listener.is_none() {
                let listener: Closure<dyn FnMut(JsValue)> = Closure::new(on_ready_broadcast);
                event_subscribe(READY_EVENT, &listener);
                ch.listener = Some(listener);
            }
            Self {
                token: ch.demux.register(embed_id, Rc::new(handler)),
            }
        })
    }
}

impl Drop for ReadyRegistration {
    fn drop(&mut self) {
        READY.with(|ch| {
            let mut ch = ch.borrow_mut();
            ch.demux.unregister(self.token);
            if ch.demux.is_empty() {
                if let Some(listener) = ch.listener.take() {
                    event_unsubscribe(READY_EVENT, &listener);
                }
            }
        })
    }
}

/// [`Host`] backed by the current browser page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl Host for BrowserHost {
    type Handle = JsValue;

    fn sdk(&self) -> Option<JsValue> {
        let window = web_sys::window()?;
        let fb = js_sys::Reflect::get(&window, &"FB".into()).ok()?;
        if fb.is_undefined() || fb.is_null() {
            None
        } else {
            Some(fb)
        }
    }

    fn script_present(&self, id: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .is_some()
    }

    fn inject_script(&self, id: &str, src: &str, on_load: Box<dyn FnOnce()>) -> Result<(), Error> {
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;

        let script = document
            .create_element("script")?
            .dyn_into::<HtmlScriptElement>()
            .map_err(JsValue::from)?;
        script.set_id(id);
        script.set_src(src);
        script.set_async(true);

        let onload_callback = Closure::once(move || on_load());
        script.set_onload(Some(onload_callback.as_ref().unchecked_ref()));
        onload_callback.forget();

        let first = document.get_elements_by_tag_name("script").item(0);
        match first.as_ref().and_then(|f| f.parent_node().map(|p| (f, p))) {
            Some((first, parent)) => {
                let first: &Node = first.as_ref();
                parent.insert_before(&script, Some(first))?;
            }
            None => {
                document
                    .body()
                    .ok_or_else(|| Error::Js("document has no body".into()))?
                    .append_child(&script)?;
            }
        }
        Ok(())
    }

    fn set_init_hook(&self, hook: Box<dyn FnOnce()>) -> Result<(), Error> {
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let hook = Closure::once_into_js(move || hook());
        js_sys::Reflect::set(&window, &"fbAsyncInit".into(), &hook)?;
        Ok(())
    }
}

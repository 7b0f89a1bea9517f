use futures::FutureExt;
use gloo_console::{debug, error};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::embed::{self, EmbedConfig};
use crate::events::{EventCallbacks, EventTable, PlayerEvent};
use crate::ext::{self, ReadyRegistration, Subscription, VideoPlayer};
use crate::{loader, Error};

#[derive(Clone, Properties, PartialEq)]
pub struct Props {
    /// Id of the container element; the embed gets `{id}--player`.
    #[prop_or_default]
    pub id: Option<String>,
    #[prop_or_default]
    pub class: Classes,
    pub app_id: String,
    pub video_id: String,
    /// Pixels; `auto` when unset or zero.
    #[prop_or_default]
    pub width: Option<u32>,
    #[prop_or_default]
    pub allow_fullscreen: bool,
    #[prop_or_default]
    pub autoplay: bool,
    #[prop_or_default]
    pub show_text: bool,
    #[prop_or_default]
    pub show_captions: bool,

    #[prop_or_default]
    pub on_ready: Option<Callback<ReadyEvent>>,
    #[prop_or_default]
    pub on_started_playing: Option<Callback<Option<String>>>,
    #[prop_or_default]
    pub on_paused: Option<Callback<Option<String>>>,
    #[prop_or_default]
    pub on_finished_playing: Option<Callback<Option<String>>>,
    #[prop_or_default]
    pub on_started_buffering: Option<Callback<Option<String>>>,
    #[prop_or_default]
    pub on_finished_buffering: Option<Callback<Option<String>>>,
    #[prop_or_default]
    pub on_error: Option<Callback<Option<String>>>,
}

impl Props {
    pub fn embed_config(&self) -> EmbedConfig {
        EmbedConfig {
            player_id: embed::player_id(self.id.as_deref()),
            video_id: self.video_id.clone(),
            width: self.width,
            allow_fullscreen: self.allow_fullscreen,
            autoplay: self.autoplay,
            show_text: self.show_text,
            show_captions: self.show_captions,
        }
    }

    pub fn callbacks(&self) -> EventCallbacks {
        EventCallbacks {
            started_playing: self.on_started_playing.clone(),
            paused: self.on_paused.clone(),
            finished_playing: self.on_finished_playing.clone(),
            started_buffering: self.on_started_buffering.clone(),
            finished_buffering: self.on_finished_buffering.clone(),
            error: self.on_error.clone(),
        }
    }
}

/// Passed to `on_ready` once the SDK has activated the embed.
#[derive(Debug, Clone)]
pub struct ReadyEvent {
    pub id: Option<String>,
    pub player: VideoPlayer,
}

pub enum State {
    /// No page to mount into, or torn down.
    Unmounted,
    LoadingSdk,
    /// SDK available; waiting for the container to be rendered.
    SdkLoaded,
    Mounted {
        video_id: String,
        ready: ReadyRegistration,
    },
    /// `subscriptions` and `player` live and die together.
    Subscribed {
        video_id: String,
        player: VideoPlayer,
        subscriptions: Vec<Subscription>,
        ready: ReadyRegistration,
    },
}

impl State {
    fn video_id(&self) -> Option<&str> {
        match self {
            State::Mounted { video_id, .. } | State::Subscribed { video_id, .. } => {
                Some(video_id.as_str())
            }
            _ => None,
        }
    }
}

pub struct Player {
    container: NodeRef,
    events: EventTable,
    state: State,
}

pub enum Msg {
    SdkLoaded(Result<JsValue, Error>),
    Ready(VideoPlayer),
    Event(PlayerEvent),
}

impl Player {
    /// (Re)builds the embed for the current props, releasing whatever the
    /// previous embed held first.
    fn mount(&mut self, ctx: &Context<Self>) {
        let Some(container) = self.container.cast::<Element>() else {
            self.state = State::SdkLoaded;
            return;
        };

        self.state = State::SdkLoaded;
        match self.build(ctx, &container) {
            Ok(ready) => {
                let video_id = ctx.props().video_id.clone();
                debug!("mounted facebook video", video_id.clone());
                self.state = State::Mounted { video_id, ready };
            }
            Err(e) => error!("failed to mount facebook video", e.to_string()),
        }
    }

    fn build(&self, ctx: &Context<Self>, container: &Element) -> Result<ReadyRegistration, Error> {
        let props = ctx.props();
        let config = props.embed_config();
        config.mount(container)?;

        let link = ctx.link().clone();
        let ready = ReadyRegistration::new(config.player_id, move |player| {
            link.send_message(Msg::Ready(player))
        });

        ext::init(&props.app_id)?;
        Ok(ready)
    }

    fn subscribe(&mut self, ctx: &Context<Self>, player: VideoPlayer) {
        let (video_id, ready) = match std::mem::replace(&mut self.state, State::Unmounted) {
            // a repeated announcement replaces the previous subscriptions
            State::Mounted { video_id, ready } | State::Subscribed { video_id, ready, .. } => {
                (video_id, ready)
            }
            other => {
                self.state = other;
                return;
            }
        };

        let props = ctx.props();
        if let Some(on_ready) = &props.on_ready {
            on_ready.emit(ReadyEvent {
                id: props.id.clone(),
                player: player.clone(),
            });
        }

        let subscriptions = self
            .events
            .events()
            .iter()
            .map(|&event| {
                let link = ctx.link().clone();
                player.subscribe(event, move || link.send_message(Msg::Event(event)))
            })
            .collect();

        self.state = State::Subscribed {
            video_id,
            player,
            subscriptions,
            ready,
        };
    }
}

impl yew::Component for Player {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let state = if web_sys::window().is_some() {
            let cb = ctx.link().callback(Msg::SdkLoaded);
            spawn_local(loader::load_sdk().map(move |res| cb.emit(res)));
            State::LoadingSdk
        } else {
            State::Unmounted
        };

        Self {
            container: NodeRef::default(),
            events: EventTable::new(&ctx.props().callbacks()),
            state,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SdkLoaded(Ok(_)) => {
                if matches!(self.state, State::LoadingSdk) {
                    self.mount(ctx);
                    // container not rendered yet; `rendered` finishes the mount
                    return matches!(self.state, State::SdkLoaded);
                }
            }
            Msg::SdkLoaded(Err(e)) => error!("failed to load the facebook sdk", e.to_string()),
            Msg::Ready(player) => self.subscribe(ctx, player),
            Msg::Event(event) => {
                if matches!(self.state, State::Subscribed { .. }) {
                    let props = ctx.props();
                    props.callbacks().emit(event, props.id.clone());
                }
            }
        }
        false
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        let video_id = &ctx.props().video_id;
        if matches!(self.state.video_id(), Some(current) if current != video_id.as_str()) {
            debug!("facebook video id changed, rebuilding", video_id.clone());
            self.mount(ctx);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        html! {
            <span>
                <div
                    id={props.id.clone()}
                    class={props.class.clone()}
                    ref={self.container.clone()}
                />
            </span>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if matches!(self.state, State::SdkLoaded) {
            self.mount(ctx);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        // drops subscriptions before the ready registration
        self.state = State::Unmounted;
    }
}

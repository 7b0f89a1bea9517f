use fbplayer::{Player, ReadyEvent};
use gloo_console::log;
use yew::prelude::*;

const APP_ID: &str = "1234567890";

#[function_component(App)]
fn app() -> Html {
    let video_id = use_state(|| "10153231379946729".to_string());
    let status = use_state(|| "loading".to_string());

    let on_ready = {
        let status = status.clone();
        Callback::from(move |ev: ReadyEvent| {
            log!("player ready", format!("{:?}", ev.id));
            status.set("ready".to_string());
        })
    };
    let event = |name: &'static str| {
        let status = status.clone();
        Callback::from(move |id: Option<String>| {
            log!("player event", name, format!("{:?}", id));
            status.set(name.to_string());
        })
    };
    let switch_video = {
        let video_id = video_id.clone();
        Callback::from(move |_| video_id.set("10155278547321729".to_string()))
    };

    html! {
        <div>
            <div>{format!("Player status: {}", *status)}</div>
            <button onclick={switch_video}>{"Switch video"}</button>
            <Player
                id="demo"
                app_id={APP_ID}
                video_id={(*video_id).clone()}
                width={560}
                allow_fullscreen=true
                show_captions=true
                on_ready={on_ready}
                on_started_playing={event("started playing")}
                on_paused={event("paused")}
                on_finished_playing={event("finished playing")}
                on_error={event("error")}
            />
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

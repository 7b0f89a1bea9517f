//! A Yew component wrapping Facebook's embedded video player.
//!
//! The SDK is loaded once per page, the `fb-video` markup is built from typed
//! props and every bound playback event is forwarded to a Yew callback.
//!
//! ```ignore
//! html! {
//!     <Player app_id="1234" video_id="10153231379946729" on_paused={on_paused} />
//! }
//! ```

pub mod component;
pub mod demux;
pub mod embed;
mod error;
pub mod events;
pub mod ext;
pub mod loader;

pub use component::{Player, Props, ReadyEvent};
pub use error::Error;
pub use events::PlayerEvent;

use yew::Callback;

/// Playback events emitted by an embedded video player.
///
/// See <https://developers.facebook.com/docs/plugins/embedded-video-player/api#event-reference>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerEvent {
    StartedPlaying,
    Paused,
    FinishedPlaying,
    StartedBuffering,
    FinishedBuffering,
    Error,
}

impl PlayerEvent {
    pub const ALL: [PlayerEvent; 6] = [
        PlayerEvent::StartedPlaying,
        PlayerEvent::Paused,
        PlayerEvent::FinishedPlaying,
        PlayerEvent::StartedBuffering,
        PlayerEvent::FinishedBuffering,
        PlayerEvent::Error,
    ];

    /// Name the SDK uses for `subscribe` / `release`.
    pub fn sdk_name(self) -> &'static str {
        match self {
            PlayerEvent::StartedPlaying => "startedPlaying",
            PlayerEvent::Paused => "paused",
            PlayerEvent::FinishedPlaying => "finishedPlaying",
            PlayerEvent::StartedBuffering => "startedBuffering",
            PlayerEvent::FinishedBuffering => "finishedBuffering",
            PlayerEvent::Error => "error",
        }
    }
}

/// Optional caller callbacks, one per [`PlayerEvent`].
#[derive(Clone, Default, PartialEq)]
pub struct EventCallbacks {
    pub started_playing: Option<Callback<Option<String>>>,
    pub paused: Option<Callback<Option<String>>>,
    pub finished_playing: Option<Callback<Option<String>>>,
    pub started_buffering: Option<Callback<Option<String>>>,
    pub finished_buffering: Option<Callback<Option<String>>>,
    pub error: Option<Callback<Option<String>>>,
}

impl EventCallbacks {
    pub fn get(&self, event: PlayerEvent) -> Option<&Callback<Option<String>>> {
        match event {
            PlayerEvent::StartedPlaying => self.started_playing.as_ref(),
            PlayerEvent::Paused => self.paused.as_ref(),
            PlayerEvent::FinishedPlaying => self.finished_playing.as_ref(),
            PlayerEvent::StartedBuffering => self.started_buffering.as_ref(),
            PlayerEvent::FinishedBuffering => self.finished_buffering.as_ref(),
            PlayerEvent::Error => self.error.as_ref(),
        }
    }

    /// Forwards `event` with the caller-facing id. Returns whether a callback
    /// was bound.
    pub fn emit(&self, event: PlayerEvent, id: Option<String>) -> bool {
        match self.get(event) {
            Some(cb) => {
                cb.emit(id);
                true
            }
            None => false,
        }
    }
}

/// The set of events a player subscribes to, fixed when the component is
/// created. Events without a callback are never subscribed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTable {
    bound: Vec<PlayerEvent>,
}

impl EventTable {
    pub fn new(callbacks: &EventCallbacks) -> Self {
        Self {
            bound: PlayerEvent::ALL
                .into_iter()
                .filter(|ev| callbacks.get(*ev).is_some())
                .collect(),
        }
    }

    pub fn events(&self) -> &[PlayerEvent] {
        &self.bound
    }
}

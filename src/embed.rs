use web_sys::Element;

use crate::ext::{EMBED_CLASS, VIDEO_URL_PREFIX};
use crate::Error;

/// Id of the `fb-video` element inside a player whose container id is
/// `component_id`. Without a component id the embed element has no id.
pub fn player_id(component_id: Option<&str>) -> Option<String> {
    component_id.map(|id| format!("{}--player", id))
}

pub fn video_href(video_id: &str) -> String {
    format!("{}{}", VIDEO_URL_PREFIX, video_id)
}

/// Declarative settings of one embedded video, translated into the SDK's
/// `data-*` attributes by [`EmbedConfig::attributes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedConfig {
    pub player_id: Option<String>,
    pub video_id: String,
    /// Pixels; `None` or `0` render as `auto`.
    pub width: Option<u32>,
    pub allow_fullscreen: bool,
    pub autoplay: bool,
    pub show_text: bool,
    pub show_captions: bool,
}

fn flag(b: bool) -> String {
    b.to_string()
}

impl EmbedConfig {
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("data-href", video_href(&self.video_id)),
            ("data-allowfullscreen", flag(self.allow_fullscreen)),
            ("data-autoplay", flag(self.autoplay)),
            (
                "data-width",
                self.width
                    .filter(|w| *w > 0)
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "auto".to_string()),
            ),
            ("data-show-text", flag(self.show_text)),
            ("data-show-captions", flag(self.show_captions)),
        ]
    }

    /// Replaces whatever `container` holds with a fresh `fb-video` element.
    pub fn mount(&self, container: &Element) -> Result<Element, Error> {
        let document = container.owner_document().ok_or(Error::NoDocument)?;

        container.set_inner_html("");

        let embed = document.create_element("div")?;
        embed.set_class_name(EMBED_CLASS);
        if let Some(id) = &self.player_id {
            embed.set_id(id);
        }
        for (name, value) in self.attributes() {
            embed.set_attribute(name, &value)?;
        }

        container.append_child(&embed)?;
        Ok(embed)
    }
}

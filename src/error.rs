use wasm_bindgen::JsValue;

/// Failures while loading the SDK or building the embed markup.
///
/// `Clone` so a single failed load can be handed to every waiting player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no global `window` exists")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("player container is not rendered")]
    NoContainer,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("failed to serialize sdk options: {0}")]
    Serialize(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(s) => Error::Js(s),
            None => Error::Js(format!("{:?}", value)),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Error::Serialize(e.to_string())
    }
}

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

//! Fan-out of the SDK's `xfbml.ready` broadcast.
//!
//! The SDK announces every parsed widget to every listener. One raw listener
//! feeds a [`ReadyDemux`], which hands each announcement only to the players
//! whose embed id matches.

use std::rc::Rc;

/// Widget type of an embedded video.
pub const VIDEO: &str = "video";

/// One parsed-widget announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyMessage<T> {
    pub kind: String,
    pub id: Option<String>,
    pub instance: T,
}

pub type Handler<T> = Rc<dyn Fn(T)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u64);

struct Entry<T> {
    token: Token,
    key: Option<String>,
    handler: Handler<T>,
}

pub struct ReadyDemux<T> {
    next: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for ReadyDemux<T> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> ReadyDemux<T> {
    /// `key` is the embed id to wait for; `None` accepts any video.
    pub fn register(&mut self, key: Option<String>, handler: Handler<T>) -> Token {
        let token = Token(self.next);
        self.next += 1;
        self.entries.push(Entry {
            token,
            key,
            handler,
        });
        token
    }

    /// Returns false if the token was already gone.
    pub fn unregister(&mut self, token: Token) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handlers interested in `msg`, in registration order.
    ///
    /// Kept separate from invocation so callers can release any borrow of the
    /// demux before running handlers that may register or unregister.
    pub fn handlers_for(&self, msg: &ReadyMessage<T>) -> Vec<Handler<T>> {
        if msg.kind != VIDEO {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| match &e.key {
                Some(key) => msg.id.as_deref() == Some(key.as_str()),
                None => true,
            })
            .map(|e| e.handler.clone())
            .collect()
    }
}

//! One-time loading of the Facebook JS SDK.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture, Shared};
use futures::FutureExt;
use wasm_bindgen::JsValue;

use crate::ext::{BrowserHost, SDK_SCRIPT_ID, SDK_URL};
use crate::Error;

/// The page-side operations the loader needs.
pub trait Host: Clone + 'static {
    type Handle: Clone + 'static;

    /// The SDK global, once it exists.
    fn sdk(&self) -> Option<Self::Handle>;

    fn script_present(&self, id: &str) -> bool;

    /// Adds the SDK `<script>`; `on_load` runs when it finishes loading.
    fn inject_script(&self, id: &str, src: &str, on_load: Box<dyn FnOnce()>) -> Result<(), Error>;

    /// Installs the global hook the SDK calls after initializing itself.
    fn set_init_hook(&self, hook: Box<dyn FnOnce()>) -> Result<(), Error>;
}

type LoadFuture<T> = Shared<LocalBoxFuture<'static, Result<T, Error>>>;

/// Loads the SDK at most once, however many players ask for it.
///
/// A load that never completes (the script failed to fetch) stays pending
/// forever; there is no timeout.
pub struct Loader<H: Host> {
    host: H,
    pending: RefCell<Option<LoadFuture<H::Handle>>>,
}

fn notifier(slot: &Rc<RefCell<Option<oneshot::Sender<()>>>>) -> Box<dyn FnOnce()> {
    let slot = slot.clone();
    Box::new(move || {
        if let Some(tx) = slot.borrow_mut().take() {
            let _ = tx.send(());
        }
    })
}

impl<H: Host> Loader<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            pending: RefCell::new(None),
        }
    }

    pub fn load(&self) -> LocalBoxFuture<'static, Result<H::Handle, Error>> {
        if let Some(sdk) = self.host.sdk() {
            return future::ready(Ok(sdk)).boxed_local();
        }

        let mut pending = self.pending.borrow_mut();
        if let Some(fut) = pending.as_ref() {
            return fut.clone().boxed_local();
        }

        match self.start() {
            Ok(fut) => {
                let fut = fut.shared();
                *pending = Some(fut.clone());
                fut.boxed_local()
            }
            // not cached: the next player retries
            Err(e) => future::ready(Err(e)).boxed_local(),
        }
    }

    fn start(&self) -> Result<LocalBoxFuture<'static, Result<H::Handle, Error>>, Error> {
        let (tx, rx) = oneshot::channel::<()>();
        let slot = Rc::new(RefCell::new(Some(tx)));

        self.host.set_init_hook(notifier(&slot))?;
        if !self.host.script_present(SDK_SCRIPT_ID) {
            self.host
                .inject_script(SDK_SCRIPT_ID, SDK_URL, notifier(&slot))?;
        }

        let host = self.host.clone();
        Ok(async move {
            if rx.await.is_err() {
                future::pending::<()>().await;
            }
            host.sdk()
                .ok_or_else(|| Error::Js("sdk loaded but the `FB` global is missing".into()))
        }
        .boxed_local())
    }
}

thread_local! {
    static SDK_LOADER: Loader<BrowserHost> = Loader::new(BrowserHost);
}

/// Resolves to the page's `FB` global, loading the SDK on first use.
pub fn load_sdk() -> LocalBoxFuture<'static, Result<JsValue, Error>> {
    SDK_LOADER.with(|loader| loader.load())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[derive(Default)]
    struct Page {
        sdk: Option<u32>,
        existing_script: bool,
        fail_injection: bool,
        scripts: Vec<(String, String)>,
        on_loads: Vec<Box<dyn FnOnce()>>,
        hooks: Vec<Box<dyn FnOnce()>>,
    }

    #[derive(Clone, Default)]
    struct FakeHost(Rc<RefCell<Page>>);

    impl FakeHost {
        fn finish_script(&self, sdk: u32) {
            self.0.borrow_mut().sdk = Some(sdk);
            let on_loads: Vec<_> = self.0.borrow_mut().on_loads.drain(..).collect();
            on_loads.into_iter().for_each(|f| f());
        }

        fn run_init_hook(&self, sdk: u32) {
            self.0.borrow_mut().sdk = Some(sdk);
            let hooks: Vec<_> = self.0.borrow_mut().hooks.drain(..).collect();
            hooks.into_iter().for_each(|f| f());
        }

        fn script_count(&self) -> usize {
            self.0.borrow().scripts.len()
        }

        fn hook_count(&self) -> usize {
            self.0.borrow().hooks.len()
        }
    }

    impl Host for FakeHost {
        type Handle = u32;

        fn sdk(&self) -> Option<u32> {
            self.0.borrow().sdk
        }

        fn script_present(&self, id: &str) -> bool {
            let page = self.0.borrow();
            page.existing_script || page.scripts.iter().any(|(i, _)| i == id)
        }

        fn inject_script(&self, id: &str, src: &str, on_load: Box<dyn FnOnce()>) -> Result<(), Error> {
            let mut page = self.0.borrow_mut();
            if page.fail_injection {
                return Err(Error::NoDocument);
            }
            page.scripts.push((id.to_string(), src.to_string()));
            page.on_loads.push(on_load);
            Ok(())
        }

        fn set_init_hook(&self, hook: Box<dyn FnOnce()>) -> Result<(), Error> {
            self.0.borrow_mut().hooks.push(hook);
            Ok(())
        }
    }

    #[test]
    fn present_sdk_resolves_without_side_effects() {
        let host = FakeHost::default();
        host.0.borrow_mut().sdk = Some(1);
        let loader = Loader::new(host.clone());

        assert_eq!(loader.load().now_or_never(), Some(Ok(1)));
        assert_eq!(host.script_count(), 0);
        assert_eq!(host.hook_count(), 0);
    }

    #[test]
    fn concurrent_loads_inject_one_script() {
        let host = FakeHost::default();
        let loader = Loader::new(host.clone());

        let mut first = loader.load();
        let mut second = loader.load();
        assert!((&mut first).now_or_never().is_none());
        assert!((&mut second).now_or_never().is_none());
        assert_eq!(host.script_count(), 1);
        assert_eq!(host.hook_count(), 1);
        assert_eq!(host.0.borrow().scripts[0], (SDK_SCRIPT_ID.to_string(), SDK_URL.to_string()));

        host.finish_script(9);
        assert_eq!(block_on(first), Ok(9));
        assert_eq!(block_on(second), Ok(9));
    }

    #[test]
    fn init_hook_alone_resolves() {
        let host = FakeHost::default();
        let loader = Loader::new(host.clone());

        let load = loader.load();
        host.run_init_hook(4);
        assert_eq!(block_on(load), Ok(4));
    }

    #[test]
    fn whichever_fires_first_wins() {
        let host = FakeHost::default();
        let loader = Loader::new(host.clone());

        let load = loader.load();
        host.run_init_hook(5);
        host.finish_script(5);
        assert_eq!(block_on(load), Ok(5));
    }

    #[test]
    fn existing_script_tag_is_not_duplicated() {
        let host = FakeHost::default();
        host.0.borrow_mut().existing_script = true;
        let loader = Loader::new(host.clone());

        let load = loader.load();
        assert_eq!(host.script_count(), 0);
        assert_eq!(host.hook_count(), 1);

        host.run_init_hook(2);
        assert_eq!(block_on(load), Ok(2));
    }

    #[test]
    fn stalled_script_stays_pending() {
        let host = FakeHost::default();
        let loader = Loader::new(host.clone());

        let mut load = loader.load();
        assert!((&mut load).now_or_never().is_none());
        assert!(loader.load().now_or_never().is_none());
        assert_eq!(host.script_count(), 1);
    }

    #[test]
    fn loaded_sdk_short_circuits_later_loads() {
        let host = FakeHost::default();
        let loader = Loader::new(host.clone());

        let load = loader.load();
        host.finish_script(3);
        assert_eq!(block_on(load), Ok(3));

        assert_eq!(loader.load().now_or_never(), Some(Ok(3)));
        assert_eq!(host.script_count(), 1);
    }

    #[test]
    fn setup_failure_is_retried() {
        let host = FakeHost::default();
        host.0.borrow_mut().fail_injection = true;
        let loader = Loader::new(host.clone());

        assert_eq!(loader.load().now_or_never(), Some(Err(Error::NoDocument)));

        host.0.borrow_mut().fail_injection = false;
        let load = loader.load();
        assert_eq!(host.script_count(), 1);
        host.finish_script(6);
        assert_eq!(block_on(load), Ok(6));
    }
}

//! Scriptable provider for selector and session tests.

use super::{Delegate, LocationEvent, LocationProvider, ProviderKind};
use std::cell::RefCell;
use std::rc::Rc;
use web_time::Instant;

#[derive(Default)]
struct FakeState {
    delegate: Option<Delegate>,
    updating: bool,
    starts: usize,
    stops: usize,
    queued: Vec<LocationEvent>,
}

/// A provider whose output the test controls through a [`FakeHandle`].
pub struct FakeProvider {
    kind: ProviderKind,
    state: Rc<RefCell<FakeState>>,
}

/// Test-side view of a [`FakeProvider`] that stays usable after the
/// provider has been boxed and handed to the selector.
#[derive(Clone)]
pub struct FakeHandle {
    state: Rc<RefCell<FakeState>>,
    kind: ProviderKind,
}

impl FakeProvider {
    pub fn new(kind: ProviderKind) -> (Self, FakeHandle) {
        let state = Rc::new(RefCell::new(FakeState::default()));
        (
            Self {
                kind,
                state: state.clone(),
            },
            FakeHandle { state, kind },
        )
    }
}

impl FakeHandle {
    /// Queues an event for the next poll while updating.
    pub fn queue(&self, event: LocationEvent) {
        self.state.borrow_mut().queued.push(event);
    }

    /// Sends an event through the current delegate right away.
    ///
    /// Returns false if no delegate is registered.
    pub fn emit_now(&self, event: LocationEvent) -> bool {
        match &self.state.borrow().delegate {
            Some(delegate) => {
                delegate.notify(self.kind, event);
                true
            }
            None => false,
        }
    }

    pub fn has_delegate(&self) -> bool {
        self.state.borrow().delegate.is_some()
    }

    pub fn is_updating(&self) -> bool {
        self.state.borrow().updating
    }

    pub fn starts(&self) -> usize {
        self.state.borrow().starts
    }

    pub fn stops(&self) -> usize {
        self.state.borrow().stops
    }
}

impl LocationProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn set_delegate(&mut self, delegate: Option<Delegate>) {
        self.state.borrow_mut().delegate = delegate;
    }

    fn start_updating_location(&mut self) {
        let mut state = self.state.borrow_mut();
        state.updating = true;
        state.starts += 1;
    }

    fn stop_updating_location(&mut self) {
        let mut state = self.state.borrow_mut();
        state.updating = false;
        state.stops += 1;
    }

    fn is_updating(&self) -> bool {
        self.state.borrow().updating
    }

    fn poll(&mut self, _now: Instant) {
        let mut state = self.state.borrow_mut();
        if !state.updating {
            return;
        }
        let queued = std::mem::take(&mut state.queued);
        if let Some(delegate) = &state.delegate {
            for event in queued {
                delegate.notify(self.kind, event);
            }
        }
    }
}

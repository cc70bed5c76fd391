//! Browser geolocation as a position source (WASM only).
//!
//! `watchPosition` callbacks run on the JS event loop; they push into a
//! shared queue that the provider drains on its next poll.

use super::source::{PositionSource, RawSample, SourceEvent};
use super::{AuthorizationStatus, LocationError};
use geo_types::Coord;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_time::Instant;

type SuccessCallback = Closure<dyn FnMut(web_sys::Position)>;
type ErrorCallback = Closure<dyn FnMut(web_sys::PositionError)>;

/// Position source backed by `navigator.geolocation`.
#[derive(Default)]
pub struct BrowserGeolocation {
    pending: Rc<RefCell<Vec<SourceEvent>>>,
    watch_id: Option<i32>,
    /// Kept alive for as long as the watch is registered
    callbacks: Option<(SuccessCallback, ErrorCallback)>,
}

impl BrowserGeolocation {
    pub fn new() -> Self {
        Self::default()
    }

    fn geolocation() -> Result<web_sys::Geolocation, LocationError> {
        let window = web_sys::window()
            .ok_or_else(|| LocationError::Other("no window".to_string()))?;
        window
            .navigator()
            .geolocation()
            .map_err(|e| LocationError::PositionUnavailable(format!("{:?}", e)))
    }

    fn push(&self, event: SourceEvent) {
        self.pending.borrow_mut().push(event);
    }
}

impl PositionSource for BrowserGeolocation {
    fn start(&mut self) {
        if self.watch_id.is_some() {
            return;
        }

        let geolocation = match Self::geolocation() {
            Ok(g) => g,
            Err(e) => {
                log::error!("Geolocation unavailable: {}", e);
                self.push(SourceEvent::Error(e));
                return;
            }
        };

        let pending = self.pending.clone();
        let mut authorized = false;
        let on_position: SuccessCallback = Closure::new(move |position: web_sys::Position| {
            let coords = position.coords();
            let mut queue = pending.borrow_mut();
            if !authorized {
                authorized = true;
                queue.push(SourceEvent::Authorization(AuthorizationStatus::Authorized));
            }
            queue.push(SourceEvent::Sample(RawSample {
                coord: Coord {
                    x: coords.longitude(),
                    y: coords.latitude(),
                },
                heading: coords.heading().filter(|h| !h.is_nan()),
            }));
        });

        let pending = self.pending.clone();
        let on_error: ErrorCallback = Closure::new(move |error: web_sys::PositionError| {
            let mut queue = pending.borrow_mut();
            match error.code() {
                web_sys::PositionError::PERMISSION_DENIED => {
                    queue.push(SourceEvent::Authorization(AuthorizationStatus::Denied));
                    queue.push(SourceEvent::Error(LocationError::PermissionDenied));
                }
                web_sys::PositionError::TIMEOUT => {
                    queue.push(SourceEvent::Error(LocationError::Timeout));
                }
                _ => {
                    queue.push(SourceEvent::Error(LocationError::PositionUnavailable(
                        error.message(),
                    )));
                }
            }
        });

        match geolocation.watch_position_with_error_callback(
            on_position.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
        ) {
            Ok(id) => {
                log::info!("Watching browser geolocation (id {})", id);
                self.watch_id = Some(id);
                self.callbacks = Some((on_position, on_error));
            }
            Err(e) => {
                log::error!("watchPosition failed: {:?}", e);
                self.push(SourceEvent::Error(LocationError::Other(format!("{:?}", e))));
            }
        }
    }

    fn stop(&mut self) {
        if let Some(id) = self.watch_id.take() {
            if let Ok(geolocation) = Self::geolocation() {
                geolocation.clear_watch(id);
            }
            log::info!("Stopped watching browser geolocation (id {})", id);
        }
        self.callbacks = None;
        self.pending.borrow_mut().clear();
    }

    fn poll(&mut self, _now: Instant) -> Vec<SourceEvent> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

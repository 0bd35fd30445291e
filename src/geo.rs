use crate::dom;
use crate::overlay;
use geopulse_core::constants::DEFAULT_ORACLE_ENDPOINT;
use geopulse_core::{
    geo, DayNightOracle, GeoCoords, InteractionState, OracleError, ResolveError,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Day/night oracle reached over `fetch`.
pub struct WebOracle {
    endpoint: String,
}

impl WebOracle {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for WebOracle {
    fn default() -> Self {
        Self::new(DEFAULT_ORACLE_ENDPOINT)
    }
}

impl DayNightOracle for WebOracle {
    async fn is_day(&self, coords: GeoCoords) -> Result<bool, OracleError> {
        let window = web::window().ok_or_else(|| OracleError::Network("no window".into()))?;
        let url = geo::oracle_url(&self.endpoint, coords);
        let reply = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(|e| OracleError::Network(dom::js_error_message(&e)))?;
        let response: web::Response = reply
            .dyn_into()
            .map_err(|_| OracleError::Malformed("fetch did not yield a Response".into()))?;
        if !response.ok() {
            return Err(OracleError::Status(response.status()));
        }
        let text = response
            .text()
            .map_err(|e| OracleError::Malformed(dom::js_error_message(&e)))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| OracleError::Network(dom::js_error_message(&e)))?
            .as_string()
            .ok_or_else(|| OracleError::Malformed("non-text body".into()))?;
        geo::parse_oracle_payload(&body)
    }
}

/// One-shot position request; denial and missing support are both errors.
pub async fn current_position() -> Result<GeoCoords, ResolveError> {
    let window = web::window()
        .ok_or_else(|| ResolveError::LocationUnavailable("no window".into()))?;
    let navigator = window.navigator();
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("geolocation")).unwrap_or(false) {
        return Err(ResolveError::LocationUnavailable("geolocation unsupported".into()));
    }
    let geolocation = navigator
        .geolocation()
        .map_err(|e| ResolveError::LocationUnavailable(dom::js_error_message(&e)))?;

    let request = js_sys::Promise::new(&mut |resolve, reject| {
        if let Err(e) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
        {
            _ = reject.call1(&JsValue::NULL, &e);
        }
    });
    let position: web::GeolocationPosition = JsFuture::from(request)
        .await
        .map_err(|e| ResolveError::LocationUnavailable(dom::js_error_message(&e)))?
        .unchecked_into();
    let c = position.coords();
    Ok(GeoCoords::new(c.latitude(), c.longitude()))
}

/// Locate, resolve and publish into the shared state. Runs once per session.
pub async fn resolve_and_publish(state: Rc<RefCell<InteractionState>>) {
    let position = current_position().await;
    if position.is_err() {
        if let Some(document) = dom::window_document() {
            overlay::show_notice(&document, "Location unavailable; using defaults.");
        }
    }
    let utc_hour = js_sys::Date::new_0().get_utc_hours();
    let resolution = geo::resolve(position, &WebOracle::default(), utc_hour).await;
    log::info!(
        "[geo] Geo → Mode:{} Sky:{:?} BPM:{} Lat:{:.2} Lon:{:.2} via {:?}",
        resolution.mode(),
        resolution.day,
        resolution.bpm,
        resolution.coords.lat,
        resolution.coords.lon,
        resolution.source
    );
    state.borrow_mut().apply_resolution(&resolution);
}

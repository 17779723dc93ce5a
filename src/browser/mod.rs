/// Browser glue: active tab, extension storage and `fetch`, via bridge.js
use std::rc::Rc;

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::client::{CredentialClient, HttpRequest, HttpResponse, Transport};
use crate::config::{ClientConfig, ClientSettings, SETTINGS_STORAGE_KEY};
use crate::error::ClientError;
use crate::flows::ActiveTabSource;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn activeTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn httpRequest(method: &str, url: &str, headers: JsValue, body: Option<String>) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyText(text: &str) -> Result<JsValue, JsValue>;
}

#[derive(Deserialize)]
struct BridgeResponse {
    status: u16,
    body: String,
}

/// `fetch`-backed transport
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let headers = serde_wasm_bindgen::to_value(&request.headers)
            .map_err(|e| ClientError::Transport(format!("failed to encode headers: {:?}", e)))?;

        let response_js = httpRequest(request.method.as_str(), request.url.as_str(), headers, request.body)
            .await
            .map_err(|e| ClientError::Transport(format!("{:?}", e)))?;

        let response: BridgeResponse = serde_wasm_bindgen::from_value(response_js)
            .map_err(|e| ClientError::Protocol(format!("unexpected bridge response: {:?}", e)))?;

        Ok(HttpResponse {
            status: response.status,
            body: response.body,
        })
    }
}

/// Active tab of the current window, through `chrome.tabs`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTabs;

#[async_trait(?Send)]
impl ActiveTabSource for BrowserTabs {
    async fn active_tab_url(&self) -> Option<String> {
        match activeTabUrl().await {
            Ok(url) => url.as_string(),
            Err(e) => {
                warn!("Tab query failed: {:?}", e);
                None
            }
        }
    }
}

/// Put `text` on the system clipboard
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    copyText(text)
        .await
        .map(|_| ())
        .map_err(|e| format!("Clipboard write failed: {:?}", e))
}

/// Settings saved by the options page, or defaults when none are stored
pub async fn load_settings() -> Result<ClientSettings, String> {
    let settings_js = getStorage(SETTINGS_STORAGE_KEY)
        .await
        .map_err(|e| format!("Failed to read settings: {:?}", e))?;

    if settings_js.is_null() || settings_js.is_undefined() {
        return Ok(ClientSettings::default());
    }

    serde_wasm_bindgen::from_value(settings_js).map_err(|e| format!("Failed to parse settings: {:?}", e))
}

/// Build a store client from the saved settings
pub async fn connect() -> Result<CredentialClient, String> {
    let settings = load_settings().await?;
    let config = ClientConfig::from_settings(&settings).map_err(|e| e.to_string())?;
    Ok(CredentialClient::new(config, Rc::new(BrowserTransport)))
}

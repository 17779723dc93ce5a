/// GPass companion - credential lookup for the browser popup and web table
/// Built with Rust + WASM + Yew

pub mod cache;
pub mod client;
pub mod config;
pub mod credential;
pub mod domain;
pub mod error;
pub mod flows;
pub mod operations;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod ui;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    // Set up panic hook for better error messages in the browser console
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
    }

    // Re-export the key normalizer for JavaScript access
    #[wasm_bindgen]
    pub fn lookup_key(url: &str) -> String {
        crate::domain::normalize_url(url).into_inner()
    }

    // Start the Yew app for the extension popup
    #[wasm_bindgen]
    pub fn start_popup() {
        yew::Renderer::<crate::ui::popup::App>::new().render();
    }

    // Start the Yew app for the credential table
    #[wasm_bindgen]
    pub fn start_vault() {
        yew::Renderer::<crate::ui::vault::Vault>::new().render();
    }
}

//! HTTP fetching and PNG decoding.
//!
//! WASM builds go through the browser's `fetch`; native builds use a shared
//! blocking `reqwest` client on worker threads. Either way the caller gets a
//! callback on completion and the egui context is asked to repaint.

use eframe::egui;

/// Errors that can occur while loading remote imagery or feeds.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-success status.
    Status(u16),
    /// The body could not be read or decoded.
    Decode(String),
    /// The platform cannot issue the request.
    Unavailable(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Status(code) => write!(f, "HTTP status {}", code),
            FetchError::Decode(msg) => write!(f, "Decode failed: {}", msg),
            FetchError::Unavailable(msg) => write!(f, "Fetch unavailable: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Fetches a URL and returns the response body.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let window =
        web_sys::window().ok_or_else(|| FetchError::Unavailable("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;

    let response: Response = response_value
        .dyn_into()
        .map_err(|_| FetchError::Decode("response is not a Response".to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let buffer_promise = response
        .array_buffer()
        .map_err(|e| FetchError::Decode(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer_promise)
        .await
        .map_err(|e| FetchError::Decode(format!("{:?}", e)))?;

    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(not(target_arch = "wasm32"))]
fn client(user_agent: &str) -> Result<&'static reqwest::blocking::Client, FetchError> {
    use std::sync::OnceLock;

    static CLIENT: OnceLock<reqwest::blocking::Client> = OnceLock::new();

    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::blocking::Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(std::time::Duration::from_secs(20))
        .build()
        .map_err(|e| FetchError::Unavailable(e.to_string()))?;
    Ok(CLIENT.get_or_init(|| client))
}

/// Fetches a URL and returns the response body.
#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_bytes(url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError> {
    let response = client(user_agent)?
        .get(url)
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// Spawns a fetch and hands the result to `on_done` off the UI thread.
///
/// The user agent only applies to native builds; browsers set their own.
#[cfg(target_arch = "wasm32")]
pub fn spawn_fetch<F>(ctx: egui::Context, url: String, _user_agent: String, on_done: F)
where
    F: FnOnce(Result<Vec<u8>, FetchError>) + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_bytes(&url).await;
        on_done(result);
        ctx.request_repaint();
    });
}

/// Spawns a fetch and hands the result to `on_done` off the UI thread.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_fetch<F>(ctx: egui::Context, url: String, user_agent: String, on_done: F)
where
    F: FnOnce(Result<Vec<u8>, FetchError>) + Send + 'static,
{
    std::thread::spawn(move || {
        let result = fetch_bytes(&url, &user_agent);
        on_done(result);
        ctx.request_repaint();
    });
}

/// Decodes PNG bytes into an egui image.
pub fn decode_png(bytes: &[u8]) -> Result<egui::ColorImage, FetchError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| FetchError::Decode(e.to_string()))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_flat_samples().as_slice()))
}

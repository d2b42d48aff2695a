//! Startup overrides from the page URL.
//!
//! Reads `site`, `product`, `provider` and `speed` from the query string so
//! a link can open straight onto a radar. The URL is never written back.

use super::playback::AnimationSpeed;
use crate::nexrad::NationalProvider;

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub site: Option<String>,
    pub product: Option<String>,
    pub provider: Option<NationalProvider>,
    pub speed: Option<AnimationSpeed>,
}

/// Parses a query string with or without the leading `?`.
///
/// Unknown keys and unparseable values are ignored.
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }
        match key {
            "site" => params.site = Some(value.to_string()),
            "product" => params.product = Some(value.to_string()),
            "provider" => params.provider = NationalProvider::from_query(value),
            "speed" => params.speed = AnimationSpeed::from_query(value),
            _ => {}
        }
    }

    params
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    match window.location().search() {
        Ok(search) => parse_query(&search),
        Err(_) => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query("?site=KTLX&product=N0U&provider=mesonet&speed=fast&x=1");
        assert_eq!(
            params,
            UrlParams {
                site: Some("KTLX".to_string()),
                product: Some("N0U".to_string()),
                provider: Some(NationalProvider::Mesonet),
                speed: Some(AnimationSpeed::Fast),
            }
        );
    }

    #[test]
    fn test_parse_query_ignores_junk() {
        assert_eq!(parse_query(""), UrlParams::default());
        assert_eq!(parse_query("?site=&speed=warp&&"), UrlParams::default());
    }
}

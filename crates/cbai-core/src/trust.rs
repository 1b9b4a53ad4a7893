//! Provider trust classification: does a run send text off the machine?

use url::{Host, Url};

/// Classify a provider as cloud (remote) or local.
///
/// `openai` and `anthropic` are always cloud; `ollama` is always local.
/// Any other kind is judged by its endpoint: a URL whose host is a
/// loopback address counts as local, everything else — including an
/// unparseable or missing endpoint — counts as cloud. Unknown
/// destinations are assumed remote so safe mode fails closed.
#[must_use]
pub fn is_cloud_provider(kind: &str, endpoint: Option<&str>) -> bool {
    match kind {
        "openai" | "anthropic" => true,
        "ollama" => false,
        _ => endpoint.is_none_or(|endpoint| !is_loopback_endpoint(endpoint)),
    }
}

fn is_loopback_endpoint(endpoint: &str) -> bool {
    let Ok(url) = Url::parse(endpoint) else {
        return false;
    };
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip == std::net::Ipv4Addr::LOCALHOST,
        Some(Host::Ipv6(ip)) => ip == std::net::Ipv6Addr::LOCALHOST,
        None => false,
    }
}

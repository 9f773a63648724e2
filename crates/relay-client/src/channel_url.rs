//! Channel URL derivation.

use url::Url;

use crate::TransportError;

/// Fixed path of the websocket endpoint.
pub const CHANNEL_PATH: &str = "/ws";

/// Derive the websocket URL from a server base address.
///
/// `http` becomes `ws` and `https` becomes `wss`; websocket schemes pass
/// through. Any path, query, or fragment on the base is replaced by
/// [`CHANNEL_PATH`] and the percent-encoded `token` query parameter, which is
/// how the credential rides on every (re)connect handshake.
///
/// # Errors
///
/// [`TransportError::InvalidUrl`] if the base does not parse or uses another
/// scheme.
pub fn channel_url(base: &str, token: &str) -> Result<Url, TransportError> {
    let mut url =
        Url::parse(base.trim()).map_err(|e| TransportError::InvalidUrl(format!("{base}: {e}")))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(TransportError::InvalidUrl(format!("unsupported scheme {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|()| TransportError::InvalidUrl(format!("cannot use scheme {scheme}")))?;

    url.set_path(CHANNEL_PATH);
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut().append_pair("token", token);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_becomes_ws() {
        let url = channel_url("http://localhost:3002", "changeme").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:3002/ws?token=changeme");
    }

    #[test]
    fn https_becomes_wss_and_drops_path() {
        let url = channel_url("https://ide.example.com/api/?x=1#top", "t").unwrap();
        assert_eq!(url.as_str(), "wss://ide.example.com/ws?token=t");
    }

    #[test]
    fn token_is_percent_encoded() {
        let url = channel_url("http://h", "a+b/c&d").unwrap();
        assert_eq!(url.query(), Some("token=a%2Bb%2Fc%26d"));
    }

    #[test]
    fn websocket_schemes_pass_through() {
        assert_eq!(channel_url("wss://h:9", "t").unwrap().scheme(), "wss");
        assert_eq!(channel_url("ws://h:9", "t").unwrap().scheme(), "ws");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(channel_url("ftp://h", "t"), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(channel_url("localhost:3002", "t"), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(channel_url("", "t"), Err(TransportError::InvalidUrl(_))));
    }
}

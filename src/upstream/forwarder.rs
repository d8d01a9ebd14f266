//! Outbound request construction and execution.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, Method};
use url::{ParseError, Url};

use crate::config::HeaderPolicy;
use crate::error::ProxyError;
use crate::upstream::transport::{OutboundRequest, UpstreamResponse, UpstreamTransport};

/// Hop-by-hop headers dropped under [`HeaderPolicy::StripHopByHop`].
const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::HOST,
];

/// Replays inbound requests against their destination.
#[derive(Clone)]
pub struct RequestForwarder {
    transport: Arc<dyn UpstreamTransport>,
    policy: HeaderPolicy,
}

impl RequestForwarder {
    pub fn new(transport: Arc<dyn UpstreamTransport>, policy: HeaderPolicy) -> Self {
        Self { transport, policy }
    }

    /// Send `method` to `destination` with `headers` and `body`, returning the
    /// buffered upstream response.
    pub async fn forward(
        &self,
        method: Method,
        destination: &str,
        headers: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<UpstreamResponse, ProxyError> {
        let request = self.build(method, destination, headers, body)?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "Forwarding request"
        );

        self.transport.execute(request).await
    }

    fn build(
        &self,
        method: Method,
        destination: &str,
        headers: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<OutboundRequest, ProxyError> {
        let url = Url::parse(destination).map_err(|e| match e {
            // A relative reference is a valid URL with no scheme to send it with.
            ParseError::RelativeUrlWithoutBase => {
                ProxyError::RequestFailed(format!("{}: unsupported protocol scheme", destination))
            }
            e => ProxyError::OutboundConstruction(format!("{}: {}", destination, e)),
        })?;

        Ok(OutboundRequest {
            method,
            url,
            headers: outbound_headers(headers, self.policy),
            body,
        })
    }
}

/// Copy inbound headers for the outbound request according to `policy`.
///
/// Body framing headers are always dropped; the client recomputes them from
/// the outbound body.
pub fn outbound_headers(inbound: &HeaderMap, policy: HeaderPolicy) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);

    if policy == HeaderPolicy::StripHopByHop {
        let named: Vec<HeaderName> = inbound
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
            .collect();

        for name in HOP_BY_HOP.iter().chain(named.iter()) {
            headers.remove(name);
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<OutboundRequest>>,
    }

    impl UpstreamTransport for Recorder {
        fn execute(&self, request: OutboundRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
            self.seen.lock().unwrap().push(request);
            Box::pin(async {
                Ok(UpstreamResponse {
                    status: StatusCode::ACCEPTED,
                    content_type: None,
                    body: Bytes::from_static(b"ok"),
                })
            })
        }
    }

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("proxy.local"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace"));
        headers.insert("x-trace", HeaderValue::from_static("1"));
        headers.append("x-multi", HeaderValue::from_static("a"));
        headers.append("x-multi", HeaderValue::from_static("b"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        headers
    }

    #[test]
    fn test_verbatim_keeps_everything_but_framing() {
        let headers = outbound_headers(&inbound(), HeaderPolicy::Verbatim);
        assert_eq!(headers.get(header::HOST).unwrap(), "proxy.local");
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer t");
        assert_eq!(headers.get("x-trace").unwrap(), "1");
        assert_eq!(headers.get_all("x-multi").iter().count(), 2);
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_strip_hop_by_hop() {
        let headers = outbound_headers(&inbound(), HeaderPolicy::StripHopByHop);
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get("x-trace").is_none());
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer t");
        assert_eq!(headers.get_all("x-multi").iter().count(), 2);
    }

    #[tokio::test]
    async fn test_forward_builds_request() {
        let recorder = Arc::new(Recorder::default());
        let forwarder = RequestForwarder::new(recorder.clone(), HeaderPolicy::Verbatim);

        let response = forwarder
            .forward(
                Method::POST,
                "http://example.test/ok?x=1",
                &inbound(),
                Some(Bytes::from_static(b"a=1")),
            )
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::ACCEPTED);

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].url.as_str(), "http://example.test/ok?x=1");
        assert_eq!(seen[0].body.as_deref(), Some(&b"a=1"[..]));
        assert_eq!(seen[0].headers.get(header::HOST).unwrap(), "proxy.local");
    }

    #[tokio::test]
    async fn test_unparseable_destination_is_construction_error() {
        let recorder = Arc::new(Recorder::default());
        let forwarder = RequestForwarder::new(recorder.clone(), HeaderPolicy::Verbatim);

        let err = forwarder
            .forward(Method::GET, "http://[broken", &HeaderMap::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::OutboundConstruction(_)));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schemeless_destination_is_request_failure() {
        let recorder = Arc::new(Recorder::default());
        let forwarder = RequestForwarder::new(recorder.clone(), HeaderPolicy::Verbatim);

        for destination in ["example.test/ok", "?a=1", "/relative/path"] {
            let err = forwarder
                .forward(Method::GET, destination, &HeaderMap::new(), None)
                .await
                .unwrap_err();
            assert!(matches!(err, ProxyError::RequestFailed(_)), "{destination}");
        }
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}

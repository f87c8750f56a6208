use poem::http::header;
use poem::http::HeaderValue;
use poem::Endpoint;
use poem::IntoResponse;
use poem::Middleware;
use poem::Request;
use poem::Response;
use poem::Result;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Adds fixed, permissive CORS headers to every response, including errors
/// raised by inner endpoints. Status and body are never changed.
///
/// Unlike `poem::middleware::Cors` this does not look at the `Origin` header
/// and does not answer preflight requests itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct CorsHeaders;

impl<E: Endpoint> Middleware<E> for CorsHeaders {
    type Output = CorsHeadersEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        CorsHeadersEndpoint { inner: ep }
    }
}

pub struct CorsHeadersEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for CorsHeadersEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let mut resp = match self.inner.call(req).await {
            Ok(resp) => resp.into_response(),
            Err(err) => err.into_response(),
        };

        let headers = resp.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );

        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use poem::get;
    use poem::handler;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem::test::TestResponse;
    use poem::EndpointExt;
    use poem::Route;

    use super::*;

    #[handler]
    fn hello() -> &'static str {
        "hello"
    }

    #[handler]
    fn teapot() -> Result<&'static str> {
        Err(poem::Error::from_string(
            "short and stout",
            StatusCode::IM_A_TEAPOT,
        ))
    }

    fn assert_cors(resp: &TestResponse) {
        resp.assert_header("access-control-allow-origin", "*");
        resp.assert_header("access-control-allow-methods", "GET, POST, OPTIONS");
        resp.assert_header("access-control-allow-headers", "Content-Type");
    }

    fn test_app() -> impl Endpoint {
        Route::new()
            .at("/hello", get(hello))
            .at("/teapot", get(teapot))
            .with(CorsHeaders)
    }

    #[tokio::test]
    async fn test_headers_on_success() {
        let client = TestClient::new(test_app());

        let resp = client.get("/hello").send().await;
        resp.assert_status_is_ok();
        assert_cors(&resp);
        resp.assert_text("hello").await;
    }

    #[tokio::test]
    async fn test_headers_on_unmatched_route() {
        let client = TestClient::new(test_app());

        let resp = client.get("/missing").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_headers_keep_error_status_and_body() {
        let client = TestClient::new(test_app());

        let resp = client.get("/teapot").send().await;
        resp.assert_status(StatusCode::IM_A_TEAPOT);
        assert_cors(&resp);
        resp.assert_text("short and stout").await;
    }

    #[tokio::test]
    async fn test_options_is_not_answered_as_preflight() {
        let client = TestClient::new(test_app());

        let resp = client
            .options("/hello")
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await;
        resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&resp);
    }
}

//! HTTP helper - Shared client sessions for extensions

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};

use crate::application::errors::HttpError;

/// Total request timeout of the plain session
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

struct AuthSession {
    client: Client,
    login: String,
    password: String,
}

/// Plain and basic-auth HTTP sessions.
///
/// Proxy settings from the environment are not used. Every helper fails on
/// a non-success status.
pub struct HttpClient {
    session: Client,
    auth_session: Option<AuthSession>,
}

impl HttpClient {
    /// Create the plain session with a total timeout
    pub fn create_session(timeout_secs: u64) -> Result<Self, HttpError> {
        let session = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            session,
            auth_session: None,
        })
    }

    /// Add a session sending basic-auth credentials with every request
    pub fn create_auth_session(
        mut self,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, HttpError> {
        let client = Client::builder().no_proxy().build()?;
        self.auth_session = Some(AuthSession {
            client,
            login: login.into(),
            password: password.into(),
        });
        Ok(self)
    }

    pub fn has_auth_session(&self) -> bool {
        self.auth_session.is_some()
    }

    /// Start an authenticated GET request
    pub fn auth_get(&self, url: &str) -> Result<RequestBuilder, HttpError> {
        let auth = self.auth_session.as_ref().ok_or(HttpError::NoAuthSession)?;
        Ok(auth
            .client
            .get(url)
            .basic_auth(&auth.login, Some(&auth.password)))
    }

    /// Raw body of `url`
    pub async fn get_content(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<Vec<u8>, HttpError> {
        let response = self
            .session
            .get(url)
            .headers(build_headers(headers)?)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Body of `url` decoded as JSON
    pub async fn get_json(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<serde_json::Value, HttpError> {
        let response = self
            .session
            .get(url)
            .headers(build_headers(headers)?)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Final URL after following redirects
    pub async fn resolve_redirect(&self, url: &str) -> Result<String, HttpError> {
        let response = self.session.get(url).send().await?.error_for_status()?;
        Ok(response.url().to_string())
    }
}

fn build_headers(headers: Option<&HashMap<String, String>>) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.into_iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| HttpError::InvalidHeader(name.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn response(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status,
            body.len(),
            extra_headers,
            body
        )
    }

    /// Serve every connection with `route(request_path, raw_request)`
    async fn serve(route: fn(&str, &str) -> String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let request = String::from_utf8_lossy(&buf).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let _ = socket.write_all(route(&path, &request).as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn routes(path: &str, request: &str) -> String {
        match path {
            "/json" => response("200 OK", "Content-Type: application/json\r\n", r#"{"ok":true}"#),
            "/raw" => response("200 OK", "", "raw bytes"),
            "/start" => response("302 Found", "Location: /final\r\n", ""),
            "/final" => response("200 OK", "", "done"),
            "/echo-header" => {
                let found = request.to_lowercase().contains("x-trace: abc");
                response("200 OK", "", if found { "yes" } else { "no" })
            }
            "/private" => {
                // "user:pass"
                if request.to_lowercase().contains("authorization: basic dxnlcjpwyxnz") {
                    response("200 OK", "", "welcome")
                } else {
                    response("401 Unauthorized", "", "")
                }
            }
            _ => response("404 Not Found", "", ""),
        }
    }

    #[tokio::test]
    async fn test_get_json_and_content() {
        let base = serve(routes).await;
        let http = HttpClient::create_session(DEFAULT_TIMEOUT_SECS).unwrap();

        let json = http.get_json(&format!("{}/json", base), None).await.unwrap();
        assert_eq!(json["ok"], serde_json::Value::Bool(true));

        let raw = http.get_content(&format!("{}/raw", base), None).await.unwrap();
        assert_eq!(raw, b"raw bytes");
    }

    #[tokio::test]
    async fn test_headers_are_sent() {
        let base = serve(routes).await;
        let http = HttpClient::create_session(DEFAULT_TIMEOUT_SECS).unwrap();
        let headers = HashMap::from([("X-Trace".to_string(), "abc".to_string())]);

        let body = http
            .get_content(&format!("{}/echo-header", base), Some(&headers))
            .await
            .unwrap();
        assert_eq!(body, b"yes");
    }

    #[tokio::test]
    async fn test_error_status_fails() {
        let base = serve(routes).await;
        let http = HttpClient::create_session(DEFAULT_TIMEOUT_SECS).unwrap();

        let err = http.get_content(&format!("{}/missing", base), None).await.unwrap_err();
        assert!(matches!(err, HttpError::Request(_)));
    }

    #[tokio::test]
    async fn test_resolve_redirect() {
        let base = serve(routes).await;
        let http = HttpClient::create_session(DEFAULT_TIMEOUT_SECS).unwrap();

        let url = http.resolve_redirect(&format!("{}/start", base)).await.unwrap();
        assert_eq!(url, format!("{}/final", base));
    }

    #[tokio::test]
    async fn test_auth_session() {
        let base = serve(routes).await;
        let http = HttpClient::create_session(DEFAULT_TIMEOUT_SECS).unwrap();
        assert!(matches!(
            http.auth_get(&base),
            Err(HttpError::NoAuthSession)
        ));

        let http = http.create_auth_session("user", "pass").unwrap();
        let response = http
            .auth_get(&format!("{}/private", base))
            .unwrap()
            .send()
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "welcome");
    }

    #[test]
    fn test_invalid_header_name() {
        let headers = HashMap::from([("bad header".to_string(), "x".to_string())]);
        assert!(matches!(
            build_headers(Some(&headers)),
            Err(HttpError::InvalidHeader(_))
        ));
    }
}

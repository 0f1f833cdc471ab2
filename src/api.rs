use crate::config::AppConfig;
use crate::model::{MealsResponse, Recipe};
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The four lookups the controller needs from the recipe service.
///
/// "No results" is never an error: searches return an empty list and
/// `lookup_by_id` returns `None`.
pub trait RecipeApi {
    async fn search_by_name(&self, term: &str) -> Result<Vec<Recipe>, ApiError>;
    async fn search_by_first_letter(&self, letter: &str) -> Result<Vec<Recipe>, ApiError>;
    async fn lookup_by_id(&self, id: &str) -> Result<Option<Recipe>, ApiError>;
    async fn filter_by_category(&self, category: &str) -> Result<Vec<Recipe>, ApiError>;
}

/// HTTP client for TheMealDB.
pub struct MealDbClient {
    http: reqwest::Client,
    base: Url,
}

impl MealDbClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http(&config.api_base, http)
    }

    pub fn with_http(api_base: &str, http: reqwest::Client) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless the base ends in '/'
        let mut raw = api_base.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| ApiError::InvalidBaseUrl {
            url: api_base.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { http, base })
    }

    /// Build `<base><path>?<key>=<value>` with the value form-encoded.
    pub fn endpoint(&self, path: &str, key: &str, value: &str) -> Result<Url, ApiError> {
        let mut url = self.base.join(path).map_err(|e| ApiError::InvalidBaseUrl {
            url: self.base.to_string(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<MealsResponse, ApiError> {
        debug!(%url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: url.path().to_string(),
            });
        }
        Ok(response.json::<MealsResponse>().await?)
    }
}

impl RecipeApi for MealDbClient {
    async fn search_by_name(&self, term: &str) -> Result<Vec<Recipe>, ApiError> {
        let url = self.endpoint("search.php", "s", term)?;
        Ok(self.fetch(url).await?.into_records())
    }

    async fn search_by_first_letter(&self, letter: &str) -> Result<Vec<Recipe>, ApiError> {
        let url = self.endpoint("search.php", "f", letter)?;
        Ok(self.fetch(url).await?.into_records())
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<Recipe>, ApiError> {
        let url = self.endpoint("lookup.php", "i", id)?;
        Ok(self.fetch(url).await?.into_records().into_iter().next())
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<Recipe>, ApiError> {
        let url = self.endpoint("filter.php", "c", category)?;
        Ok(self.fetch(url).await?.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(base: &str) -> MealDbClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        MealDbClient::with_http(base, http).unwrap()
    }

    /// Serve exactly one canned HTTP response, returning the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api/json/v1/1/", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (base, handle)
    }

    #[test]
    fn test_endpoint_shapes() {
        let api = client("https://www.themealdb.com/api/json/v1/1/");
        assert_eq!(
            api.endpoint("search.php", "s", "chicken curry").unwrap().as_str(),
            "https://www.themealdb.com/api/json/v1/1/search.php?s=chicken+curry"
        );
        assert_eq!(
            api.endpoint("search.php", "f", "x").unwrap().as_str(),
            "https://www.themealdb.com/api/json/v1/1/search.php?f=x"
        );
        assert_eq!(
            api.endpoint("lookup.php", "i", "52772").unwrap().as_str(),
            "https://www.themealdb.com/api/json/v1/1/lookup.php?i=52772"
        );
        assert_eq!(
            api.endpoint("filter.php", "c", "Seafood").unwrap().as_str(),
            "https://www.themealdb.com/api/json/v1/1/filter.php?c=Seafood"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let api = client("https://www.themealdb.com/api/json/v1/1");
        assert_eq!(
            api.endpoint("lookup.php", "i", "1").unwrap().as_str(),
            "https://www.themealdb.com/api/json/v1/1/lookup.php?i=1"
        );
    }

    #[test]
    fn test_query_value_is_encoded() {
        let api = client("https://example.test/");
        let url = api.endpoint("search.php", "s", "mac & cheese?").unwrap();
        assert_eq!(url.query(), Some("s=mac+%26+cheese%3F"));
    }

    #[test]
    fn test_invalid_base() {
        let http = reqwest::Client::new();
        assert!(matches!(
            MealDbClient::with_http("not a url", http),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_search_returns_records() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"meals":[{"idMeal":"1","strMeal":"Arrabiata"},{"idMeal":"2","strMeal":"Bolognese"}]}"#,
        )
        .await;
        let records = client(&base).search_by_name("pasta").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name(), Some("Bolognese"));
        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/json/v1/1/search.php?s=pasta "));
    }

    #[tokio::test]
    async fn test_null_meals_is_empty_not_error() {
        let (base, server) = serve_once("200 OK", r#"{"meals":null}"#).await;
        let records = client(&base).search_by_first_letter("x").await.unwrap();
        assert!(records.is_empty());
        assert!(server.await.unwrap().contains("search.php?f=x"));
    }

    #[tokio::test]
    async fn test_lookup_unknown_id_is_none() {
        let (base, _server) = serve_once("200 OK", r#"{"meals":null}"#).await;
        assert!(client(&base).lookup_by_id("0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (base, _server) = serve_once("500 Internal Server Error", "oops").await;
        let err = client(&base).filter_by_category("Beef").await.unwrap_err();
        match err {
            ApiError::Status { status, endpoint } => {
                assert_eq!(status, 500);
                assert!(endpoint.ends_with("filter.php"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);
        let err = client(&base).search_by_name("soup").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}

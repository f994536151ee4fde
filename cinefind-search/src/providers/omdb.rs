//! OMDb provider for production use.

use async_trait::async_trait;
use cinefind_core::config::ApiConfig;
use cinefind_core::{MovieRecord, UNKNOWN};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MovieApi;
use crate::errors::MovieSearchError;
use crate::types::{SearchPage, SearchSummary};

/// Error text OMDb uses for an ordinary empty search.
const NOT_FOUND: &str = "Movie not found!";

/// OMDb-backed movie database.
///
/// Search uses the `s`/`page` parameters, detail uses `i`. The API key is
/// attached to every request when configured.
#[derive(Debug, Clone)]
pub struct OmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Response from the OMDb search endpoint.
#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

/// Response from the OMDb detail endpoint.
#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Rated")]
    rated: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Writer")]
    writer: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbProvider {
    /// Creates a provider from API configuration.
    ///
    /// # Errors
    ///
    /// - `MovieSearchError::Network` - If the HTTP client could not be built
    pub fn new(config: &ApiConfig) -> Result<Self, MovieSearchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| MovieSearchError::Network {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn search_url(&self, query: &str, page: u32) -> String {
        self.with_key(format!(
            "{}?s={}&page={page}",
            self.base_url,
            urlencoding::encode(query)
        ))
    }

    fn detail_url(&self, imdb_id: &str) -> String {
        self.with_key(format!(
            "{}?i={}&plot=short",
            self.base_url,
            urlencoding::encode(imdb_id)
        ))
    }

    fn with_key(&self, mut url: String) -> String {
        if let Some(ref api_key) = self.api_key {
            url.push_str(&format!("&apikey={}", urlencoding::encode(api_key)));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MovieSearchError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| MovieSearchError::Network {
                    reason: format!("HTTP request failed: {e}"),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MovieSearchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| MovieSearchError::Network {
                reason: format!("Reading body failed: {e}"),
            })?;

        serde_json::from_str(&body).map_err(|e| MovieSearchError::Parse {
            reason: format!("JSON parsing failed: {e}"),
        })
    }

    fn parse_search_response(response: OmdbSearchResponse) -> Result<SearchPage, MovieSearchError> {
        if response.response.as_deref() != Some("True") {
            return match response.error {
                Some(error) if error == NOT_FOUND => Ok(SearchPage::empty()),
                Some(error) => Err(MovieSearchError::Provider { reason: error }),
                None => Err(MovieSearchError::Parse {
                    reason: "missing Response flag".to_string(),
                }),
            };
        }

        let summaries = response
            .search
            .into_iter()
            .filter_map(|item| {
                let imdb_id = item.imdb_id.filter(|id| !id.trim().is_empty())?;
                Some(SearchSummary {
                    imdb_id,
                    title: item.title.unwrap_or_default(),
                    year: item.year.unwrap_or_default(),
                })
            })
            .collect();

        let total_results = response
            .total_results
            .and_then(|total| total.trim().parse().ok())
            .unwrap_or(0);

        Ok(SearchPage {
            summaries,
            total_results,
        })
    }

    fn parse_detail_response(
        requested_id: &str,
        detail: OmdbDetailResponse,
    ) -> Result<MovieRecord, MovieSearchError> {
        if detail.response.as_deref() == Some("False") {
            return Err(MovieSearchError::Provider {
                reason: detail
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        let or_unknown = |field: Option<String>| field.unwrap_or_else(|| UNKNOWN.to_string());

        Ok(MovieRecord {
            imdb_id: detail
                .imdb_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| requested_id.to_string()),
            // Mandatory fields fall back to empty, never to the sentinel
            title: detail.title.unwrap_or_default(),
            year: detail.year.unwrap_or_default(),
            rated: or_unknown(detail.rated),
            released: or_unknown(detail.released),
            runtime: or_unknown(detail.runtime),
            genre: or_unknown(detail.genre),
            director: or_unknown(detail.director),
            writer: or_unknown(detail.writer),
            actors: or_unknown(detail.actors),
            plot: or_unknown(detail.plot),
            poster: or_unknown(detail.poster),
            imdb_rating: or_unknown(detail.imdb_rating),
            media_type: or_unknown(detail.media_type),
        })
    }
}

#[async_trait]
impl MovieApi for OmdbProvider {
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError> {
        tracing::debug!("OMDb search '{}' page {}", query, page);
        let response: OmdbSearchResponse = self.get_json(&self.search_url(query, page)).await?;
        Self::parse_search_response(response)
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieRecord, MovieSearchError> {
        tracing::debug!("OMDb detail {}", imdb_id);
        let response: OmdbDetailResponse = self.get_json(&self.detail_url(imdb_id)).await?;
        Self::parse_detail_response(imdb_id, response)
    }
}

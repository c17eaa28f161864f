//! LINE TV content API.
//!
//! All endpoints live under `/line-tv/v1` and identify the caller with the
//! `X-LINE-ChannelId` header instead of an access token. Responses share the
//! `{ "body": ... }` envelope modelled by [`TvResponse`].

use async_trait::async_trait;
use reqwest::RequestBuilder;

use crate::{
    line::{ApiError, LineClient},
    types::{CategoryHome, CategoryList, ModuleList, Received, Spotlight, TvResponse},
};

const TV_PATH: &str = "/line-tv/v1";
const CHANNEL_ID_HEADER: &str = "X-LINE-ChannelId";

/// A LINE TV response as decoded and as received.
pub type TvReceived<T> = Received<TvResponse<T>>;

/// LINE TV content API.
///
/// Every method resolves to `None` when the API answers with an empty or
/// `null` body; callers treat that as "not found".
#[async_trait]
pub trait TvApi: Send + Sync {
    async fn list_categories(
        &self,
        channel_id: &str,
        country: &str,
    ) -> Result<Option<TvReceived<CategoryList>>, ApiError>;

    async fn get_category_home(
        &self,
        channel_id: &str,
        country: &str,
        category_code: &str,
        page: u32,
        count_per_page: u32,
    ) -> Result<Option<TvReceived<CategoryHome>>, ApiError>;

    async fn list_modules(
        &self,
        channel_id: &str,
        country: &str,
        page: u32,
        count_per_page: u32,
    ) -> Result<Option<TvReceived<ModuleList>>, ApiError>;

    async fn get_spotlight(
        &self,
        channel_id: &str,
        country: &str,
    ) -> Result<Option<TvReceived<Spotlight>>, ApiError>;
}

impl LineClient {
    fn tv(&self, path: &str, channel_id: &str) -> RequestBuilder {
        self.http
            .get(self.url(&format!("{}{}", TV_PATH, path)))
            .header(CHANNEL_ID_HEADER, channel_id)
    }
}

#[async_trait]
impl TvApi for LineClient {
    /// Fetches the category tabs of a country.
    ///
    /// # Arguments
    ///
    /// * `channel_id` - Channel sent in the `X-LINE-ChannelId` header
    /// * `country` - Lowercase ISO 3166-2 code, e.g. `th`
    ///
    /// # Returns
    ///
    /// The `tabs` of `GET /line-tv/v1/category/list`, or `None` on an empty
    /// body.
    async fn list_categories(
        &self,
        channel_id: &str,
        country: &str,
    ) -> Result<Option<TvReceived<CategoryList>>, ApiError> {
        let request = self
            .tv("/category/list", channel_id)
            .query(&[("country", country)]);
        self.fetch_optional(request, "Fetching categories...").await
    }

    /// Fetches one page of a category's home data.
    ///
    /// # Arguments
    ///
    /// * `channel_id` - Channel sent in the `X-LINE-ChannelId` header
    /// * `country` - Lowercase ISO 3166-2 code
    /// * `category_code` - Code of a tab returned by [`TvApi::list_categories`]
    /// * `page` - 1-based page index
    /// * `count_per_page` - Number of channels per page
    ///
    /// # Returns
    ///
    /// The represent clip, the channels of the page and the `hasMore` flag that
    /// drives the interactive listing.
    async fn get_category_home(
        &self,
        channel_id: &str,
        country: &str,
        category_code: &str,
        page: u32,
        count_per_page: u32,
    ) -> Result<Option<TvReceived<CategoryHome>>, ApiError> {
        let request = self.tv("/category/home", channel_id).query(&[
            ("country", country.to_string()),
            ("categoryCode", category_code.to_string()),
            ("page", page.to_string()),
            ("countPerPage", count_per_page.to_string()),
        ]);
        self.fetch_optional(request, &format!("Fetching page {}...", page))
            .await
    }

    /// Fetches one page of the content modules of a country.
    ///
    /// Query parameters follow [`TvApi::get_category_home`] without the
    /// category code. Each module carries its template type and clips.
    async fn list_modules(
        &self,
        channel_id: &str,
        country: &str,
        page: u32,
        count_per_page: u32,
    ) -> Result<Option<TvReceived<ModuleList>>, ApiError> {
        let request = self.tv("/modules", channel_id).query(&[
            ("country", country.to_string()),
            ("page", page.to_string()),
            ("countPerPage", count_per_page.to_string()),
        ]);
        self.fetch_optional(request, &format!("Fetching page {}...", page))
            .await
    }

    /// Fetches the spotlight clips of a country in a single response.
    async fn get_spotlight(
        &self,
        channel_id: &str,
        country: &str,
    ) -> Result<Option<TvReceived<Spotlight>>, ApiError> {
        let request = self.tv("/spotlight", channel_id).query(&[("country", country)]);
        self.fetch_optional(request, "Fetching spotlight...").await
    }
}

//! LINE Things API.
//!
//! Trial products, the devices linked to them and their automatic
//! communication scenario sets. Every call carries the channel access token as
//! a bearer token. IDs are appended to the path as encoded segments.

use async_trait::async_trait;
use reqwest::{
    RequestBuilder,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde_json::Value;

use crate::{
    line::{ApiError, LineClient},
    types::{AddTrialProductRequest, Device, DeviceProduct, Received, ScenarioSet, TrialProduct},
};

const THINGS_PATH: &str = "/things/v1";

/// LINE Things API, authenticated with the channel access token.
#[async_trait]
pub trait ThingsApi: Send + Sync {
    /// Trial products of the channel. An empty body is an empty list.
    async fn list_trial_products(&self) -> Result<Received<Vec<TrialProduct>>, ApiError>;

    async fn add_trial_product(&self, name: &str) -> Result<Received<TrialProduct>, ApiError>;

    async fn remove_trial_product(&self, product_id: &str) -> Result<(), ApiError>;

    async fn get_device(
        &self,
        product_id: &str,
        device_id: &str,
    ) -> Result<Received<Device>, ApiError>;

    /// Devices a LINE user has linked to a product.
    async fn get_devices_by_user(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<Received<Vec<Device>>, ApiError>;

    /// Product ID and PSDI of a device.
    async fn get_product_by_device(
        &self,
        device_id: &str,
    ) -> Result<Received<DeviceProduct>, ApiError>;

    /// Uploads `document` unchanged as the product's scenario set.
    async fn register_scenario_set(
        &self,
        product_id: &str,
        document: &Value,
    ) -> Result<(), ApiError>;

    /// `None` when the product has no scenario set registered.
    async fn get_scenario_set(
        &self,
        product_id: &str,
    ) -> Result<Option<Received<ScenarioSet>>, ApiError>;

    async fn remove_scenario_set(&self, product_id: &str) -> Result<(), ApiError>;
}

impl LineClient {
    fn things(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }
}

fn or_empty<T>(list: Option<Received<Vec<T>>>) -> Received<Vec<T>> {
    list.unwrap_or_else(|| Received {
        data: Vec::new(),
        raw: Value::Array(Vec::new()),
    })
}

#[async_trait]
impl ThingsApi for LineClient {
    /// Lists the trial products of the channel.
    ///
    /// `GET /things/v1/trial/products`. The API answers with a bare JSON array;
    /// an empty body is treated as no products.
    async fn list_trial_products(&self) -> Result<Received<Vec<TrialProduct>>, ApiError> {
        let url = self.endpoint(THINGS_PATH, &["trial", "products"])?;
        let request = self.things(self.http.get(url));
        let products = self
            .fetch_optional(request, "Fetching trial products...")
            .await?;
        Ok(or_empty(products))
    }

    /// Creates a trial product.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name of the product
    ///
    /// # Returns
    ///
    /// The created product, with the ID, type and UUIDs assigned by the API.
    async fn add_trial_product(&self, name: &str) -> Result<Received<TrialProduct>, ApiError> {
        let body = AddTrialProductRequest {
            name: name.to_string(),
        };
        let url = self.endpoint(THINGS_PATH, &["trial", "products"])?;
        let request = self.things(self.http.post(url)).json(&body);
        self.fetch_json(request, "Creating trial product...").await
    }

    /// Deletes a trial product. The API answers with an empty body.
    async fn remove_trial_product(&self, product_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(THINGS_PATH, &["trial", "products", product_id])?;
        let request = self.things(self.http.delete(url));
        self.fetch_empty(request, "Removing trial product...").await
    }

    /// Fetches one device of a product.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Trial product the device belongs to
    /// * `device_id` - Device ID as typed by the user
    ///
    /// # Errors
    ///
    /// An unknown device comes back as [`ApiError::Status`] with `404`.
    async fn get_device(
        &self,
        product_id: &str,
        device_id: &str,
    ) -> Result<Received<Device>, ApiError> {
        let url = self.endpoint(
            THINGS_PATH,
            &["products", product_id, "devices", device_id],
        )?;
        let request = self.things(self.http.get(url));
        self.fetch_json(request, "Fetching device...").await
    }

    /// Fetches the devices a LINE user linked to a product.
    ///
    /// `GET /things/v1/products/{productId}/users/{userId}/links`. An empty body
    /// is treated as no devices.
    async fn get_devices_by_user(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<Received<Vec<Device>>, ApiError> {
        let url = self.endpoint(
            THINGS_PATH,
            &["products", product_id, "users", user_id, "links"],
        )?;
        let request = self.things(self.http.get(url));
        let devices = self.fetch_optional(request, "Fetching devices...").await?;
        Ok(or_empty(devices))
    }

    /// Resolves the product and PSDI of a device from its device ID alone.
    async fn get_product_by_device(
        &self,
        device_id: &str,
    ) -> Result<Received<DeviceProduct>, ApiError> {
        let url = self.endpoint(THINGS_PATH, &["devices", device_id])?;
        let request = self.things(self.http.get(url));
        self.fetch_json(request, "Fetching product...").await
    }

    /// Registers a scenario set, replacing any existing one.
    ///
    /// # Arguments
    ///
    /// * `product_id` - Trial product to register the set to
    /// * `document` - Scenario set JSON, sent as given
    async fn register_scenario_set(
        &self,
        product_id: &str,
        document: &Value,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(THINGS_PATH, &["products", product_id, "scenario-set"])?;
        let request = self.things(self.http.put(url)).json(document);
        self.fetch_empty(request, "Registering scenario set...")
            .await
    }

    /// Fetches the registered scenario set of a product.
    ///
    /// # Returns
    ///
    /// `None` when the API answers `404` or with an empty body, meaning no set
    /// is registered. Any other failure is an error.
    async fn get_scenario_set(
        &self,
        product_id: &str,
    ) -> Result<Option<Received<ScenarioSet>>, ApiError> {
        let url = self.endpoint(THINGS_PATH, &["products", product_id, "scenario-set"])?;
        let request = self.things(self.http.get(url));
        match self
            .fetch_optional(request, "Fetching scenario set...")
            .await
        {
            Err(ApiError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => {
                Ok(None)
            }
            other => other,
        }
    }

    /// Deletes the scenario set of a product.
    async fn remove_scenario_set(&self, product_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(THINGS_PATH, &["products", product_id, "scenario-set"])?;
        let request = self.things(self.http.delete(url));
        self.fetch_empty(request, "Removing scenario set...").await
    }
}

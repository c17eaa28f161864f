#![allow(dead_code)]

use std::{collections::VecDeque, path::PathBuf, sync::Mutex};

use async_trait::async_trait;
use linecli::{
    config::Config,
    line::{ApiError, OAuthApi, ThingsApi, TvApi, tv::TvReceived},
    prompt::{Prompter, Validation},
    render::Renderer,
    types::{
        CategoryHome, CategoryList, Device, DeviceProduct, IssueTokenResponse, ModuleList,
        Received, Row, ScenarioSet, Spotlight, TrialProduct, VerifyTokenResponse,
    },
};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub const CHANNEL_ID: &str = "1234567890";

// Helper function to build a config from key/value pairs
pub fn config(pairs: &[(&str, &str)]) -> Config {
    Config::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}

pub fn tv_config() -> Config {
    config(&[("LINE_CHANNEL_ID", CHANNEL_ID)])
}

pub fn things_config() -> Config {
    config(&[("LINE_CHANNEL_ACCESS_TOKEN", "token-abc")])
}

pub fn api_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: r#"{"message":"boom"}"#.to_string(),
    }
}

/// A typed value as if the API had sent exactly its serialized form.
pub fn received<T: Serialize>(data: T) -> Received<T> {
    let raw = serde_json::to_value(&data).unwrap();
    Received { data, raw }
}

/// A wire body decoded the way the client decodes it.
pub fn received_json<T: DeserializeOwned>(raw: Value) -> Received<T> {
    Received::from_value(raw).unwrap()
}

/// A path under the system temp directory unique to this process and `name`.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("linecli-test-{}-{}", std::process::id(), name))
}

// ---- prompter ----

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    Number(u32),
    Select(usize),
    Confirm(bool),
    Cancel,
}

/// Prompter answering from a script. Running out of answers behaves like end
/// of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub questions: Vec<String>,
    pub rejections: Vec<String>,
    pub choices: Vec<Vec<String>>,
}

impl Answer {
    pub fn text(text: &str) -> Self {
        Answer::Text(text.to_string())
    }
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn asked(&self, question: &str) -> bool {
        self.questions.iter().any(|q| q == question)
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, question: &str, validate: &dyn Fn(&str) -> Validation) -> Option<String> {
        loop {
            self.questions.push(question.to_string());
            match self.answers.pop_front() {
                Some(Answer::Text(text)) => match validate(&text) {
                    Ok(()) => return Some(text),
                    Err(message) => self.rejections.push(message.to_string()),
                },
                Some(Answer::Cancel) | None => return None,
                Some(other) => panic!("unexpected answer {:?} to {:?}", other, question),
            }
        }
    }

    fn number(&mut self, question: &str, validate: &dyn Fn(u32) -> Validation) -> Option<u32> {
        loop {
            self.questions.push(question.to_string());
            match self.answers.pop_front() {
                Some(Answer::Number(number)) => match validate(number) {
                    Ok(()) => return Some(number),
                    Err(message) => self.rejections.push(message.to_string()),
                },
                Some(Answer::Cancel) | None => return None,
                Some(other) => panic!("unexpected answer {:?} to {:?}", other, question),
            }
        }
    }

    fn select(&mut self, question: &str, choices: &[String]) -> Option<usize> {
        self.questions.push(question.to_string());
        self.choices.push(choices.to_vec());
        match self.answers.pop_front() {
            Some(Answer::Select(index)) => {
                assert!(index < choices.len(), "no choice {} in {:?}", index, choices);
                Some(index)
            }
            Some(Answer::Cancel) | None => None,
            Some(other) => panic!("unexpected answer {:?} to {:?}", other, question),
        }
    }

    fn confirm(&mut self, question: &str) -> Option<bool> {
        self.questions.push(question.to_string());
        match self.answers.pop_front() {
            Some(Answer::Confirm(yes)) => Some(yes),
            Some(Answer::Cancel) | None => None,
            Some(other) => panic!("unexpected answer {:?} to {:?}", other, question),
        }
    }
}

// ---- renderer ----

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Table(Vec<Row>),
    Text(String),
    Json(serde_json::Value),
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<Event>,
}

impl RecordingRenderer {
    pub fn tables(&self) -> Vec<&Vec<Row>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Table(rows) => Some(rows),
                _ => None,
            })
            .collect()
    }

    pub fn jsons(&self) -> Vec<&serde_json::Value> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Json(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.messages(|e| match e {
            Event::Text(m) => Some(m),
            _ => None,
        })
    }

    pub fn infos(&self) -> Vec<&str> {
        self.messages(|e| match e {
            Event::Info(m) => Some(m),
            _ => None,
        })
    }

    pub fn successes(&self) -> Vec<&str> {
        self.messages(|e| match e {
            Event::Success(m) => Some(m),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(|e| match e {
            Event::Warning(m) => Some(m),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages(|e| match e {
            Event::Error(m) => Some(m),
            _ => None,
        })
    }

    fn messages<'a>(&'a self, pick: impl Fn(&'a Event) -> Option<&'a String>) -> Vec<&'a str> {
        self.events
            .iter()
            .filter_map(pick)
            .map(String::as_str)
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn table(&mut self, rows: &[Row]) {
        self.events.push(Event::Table(rows.to_vec()));
    }

    fn text(&mut self, line: &str) {
        self.events.push(Event::Text(line.to_string()));
    }

    fn json(&mut self, value: &serde_json::Value) {
        self.events.push(Event::Json(value.clone()));
    }

    fn info(&mut self, message: &str) {
        self.events.push(Event::Info(message.to_string()));
    }

    fn success(&mut self, message: &str) {
        self.events.push(Event::Success(message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.events.push(Event::Warning(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.events.push(Event::Error(message.to_string()));
    }
}

// ---- LINE TV ----

pub type TvReply<T> = Result<Option<TvReceived<T>>, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TvCall {
    ListCategories {
        channel_id: String,
        country: String,
    },
    CategoryHome {
        channel_id: String,
        country: String,
        category_code: String,
        page: u32,
        count_per_page: u32,
    },
    ListModules {
        country: String,
        page: u32,
        count_per_page: u32,
    },
    Spotlight {
        country: String,
    },
}

/// Serves queued replies in order; an exhausted queue answers with an empty
/// body.
#[derive(Default)]
pub struct FakeTv {
    pub categories: Mutex<VecDeque<TvReply<CategoryList>>>,
    pub homes: Mutex<VecDeque<TvReply<CategoryHome>>>,
    pub modules: Mutex<VecDeque<TvReply<ModuleList>>>,
    pub spotlights: Mutex<VecDeque<TvReply<Spotlight>>>,
    pub calls: Mutex<Vec<TvCall>>,
}

impl FakeTv {
    pub fn calls(&self) -> Vec<TvCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TvCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<TvReply<T>>>) -> TvReply<T> {
    queue.lock().unwrap().pop_front().unwrap_or(Ok(None))
}

#[async_trait]
impl TvApi for FakeTv {
    async fn list_categories(
        &self,
        channel_id: &str,
        country: &str,
    ) -> TvReply<CategoryList> {
        self.record(TvCall::ListCategories {
            channel_id: channel_id.to_string(),
            country: country.to_string(),
        });
        next(&self.categories)
    }

    async fn get_category_home(
        &self,
        channel_id: &str,
        country: &str,
        category_code: &str,
        page: u32,
        count_per_page: u32,
    ) -> TvReply<CategoryHome> {
        self.record(TvCall::CategoryHome {
            channel_id: channel_id.to_string(),
            country: country.to_string(),
            category_code: category_code.to_string(),
            page,
            count_per_page,
        });
        next(&self.homes)
    }

    async fn list_modules(
        &self,
        _channel_id: &str,
        country: &str,
        page: u32,
        count_per_page: u32,
    ) -> TvReply<ModuleList> {
        self.record(TvCall::ListModules {
            country: country.to_string(),
            page,
            count_per_page,
        });
        next(&self.modules)
    }

    async fn get_spotlight(
        &self,
        _channel_id: &str,
        country: &str,
    ) -> TvReply<Spotlight> {
        self.record(TvCall::Spotlight {
            country: country.to_string(),
        });
        next(&self.spotlights)
    }
}

// ---- LINE Things ----

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingsCall {
    ListTrial,
    AddTrial(String),
    RemoveTrial(String),
    GetDevice(String, String),
    GetDevices(String, String),
    GetProduct(String),
    RegisterScenarioSet(String, Value),
    GetScenarioSet(String),
    RemoveScenarioSet(String),
}

/// Fixed in-memory LINE Things backend.
///
/// With `fail` set every call except the product listing errors;
/// `fail_listing` makes the listing fail too. `products_body` replaces the
/// listing with a wire body.
#[derive(Default)]
pub struct FakeThings {
    pub products: Vec<TrialProduct>,
    pub products_body: Option<Value>,
    pub devices: Vec<Device>,
    pub scenario_set: Option<ScenarioSet>,
    pub fail: bool,
    pub fail_listing: bool,
    pub calls: Mutex<Vec<ThingsCall>>,
}

impl FakeThings {
    pub fn with_products(products: Vec<TrialProduct>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ThingsCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ThingsCall) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail { Err(api_error()) } else { Ok(()) }
    }
}

pub fn trial_product(id: &str, name: &str) -> TrialProduct {
    TrialProduct {
        id: id.to_string(),
        name: name.to_string(),
        kind: Some("BLE".to_string()),
        channel_id: Some(1234567890),
        service_uuid: Some("0b4e7e39-5cfe-4d6c-9d2d-8f04e5a7c0a1".to_string()),
        psdi_service_uuid: None,
        psdi_characteristic_uuid: None,
    }
}

pub fn device(id: &str, product_id: &str, user_id: &str) -> Device {
    Device {
        id: id.to_string(),
        product_id: Some(product_id.to_string()),
        user_id: Some(user_id.to_string()),
        device_id: Some(id.to_string()),
        psdi: None,
    }
}

#[async_trait]
impl ThingsApi for FakeThings {
    async fn list_trial_products(&self) -> Result<Received<Vec<TrialProduct>>, ApiError> {
        self.calls.lock().unwrap().push(ThingsCall::ListTrial);
        if self.fail_listing {
            return Err(api_error());
        }
        Ok(match &self.products_body {
            Some(body) => received_json(body.clone()),
            None => received(self.products.clone()),
        })
    }

    async fn add_trial_product(&self, name: &str) -> Result<Received<TrialProduct>, ApiError> {
        self.record(ThingsCall::AddTrial(name.to_string()))?;
        Ok(received(trial_product("new-product", name)))
    }

    async fn remove_trial_product(&self, product_id: &str) -> Result<(), ApiError> {
        self.record(ThingsCall::RemoveTrial(product_id.to_string()))
    }

    async fn get_device(
        &self,
        product_id: &str,
        device_id: &str,
    ) -> Result<Received<Device>, ApiError> {
        self.record(ThingsCall::GetDevice(
            product_id.to_string(),
            device_id.to_string(),
        ))?;
        self.devices
            .iter()
            .find(|d| d.id == device_id)
            .cloned()
            .map(received)
            .ok_or(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })
    }

    async fn get_devices_by_user(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<Received<Vec<Device>>, ApiError> {
        self.record(ThingsCall::GetDevices(
            product_id.to_string(),
            user_id.to_string(),
        ))?;
        Ok(received(
            self.devices
                .iter()
                .filter(|d| d.user_id.as_deref() == Some(user_id))
                .cloned()
                .collect(),
        ))
    }

    async fn get_product_by_device(
        &self,
        device_id: &str,
    ) -> Result<Received<DeviceProduct>, ApiError> {
        self.record(ThingsCall::GetProduct(device_id.to_string()))?;
        Ok(received(DeviceProduct {
            product_id: "product-1".to_string(),
            device_id: Some(device_id.to_string()),
            psdi: None,
        }))
    }

    async fn register_scenario_set(
        &self,
        product_id: &str,
        document: &Value,
    ) -> Result<(), ApiError> {
        self.record(ThingsCall::RegisterScenarioSet(
            product_id.to_string(),
            document.clone(),
        ))
    }

    async fn get_scenario_set(
        &self,
        product_id: &str,
    ) -> Result<Option<Received<ScenarioSet>>, ApiError> {
        self.record(ThingsCall::GetScenarioSet(product_id.to_string()))?;
        Ok(self.scenario_set.clone().map(received))
    }

    async fn remove_scenario_set(&self, product_id: &str) -> Result<(), ApiError> {
        self.record(ThingsCall::RemoveScenarioSet(product_id.to_string()))
    }
}

// ---- OAuth ----

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthCall {
    Issue(String, String),
    Revoke(String),
    Verify(String),
}

#[derive(Default)]
pub struct FakeOAuth {
    pub fail: bool,
    pub calls: Mutex<Vec<OAuthCall>>,
}

impl FakeOAuth {
    pub fn calls(&self) -> Vec<OAuthCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: OAuthCall) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail { Err(api_error()) } else { Ok(()) }
    }
}

#[async_trait]
impl OAuthApi for FakeOAuth {
    async fn issue_token(
        &self,
        channel_id: &str,
        channel_secret: &str,
    ) -> Result<Received<IssueTokenResponse>, ApiError> {
        self.record(OAuthCall::Issue(
            channel_id.to_string(),
            channel_secret.to_string(),
        ))?;
        Ok(received(IssueTokenResponse {
            access_token: "issued-token".to_string(),
            expires_in: 2_592_000,
            token_type: "Bearer".to_string(),
        }))
    }

    async fn revoke_token(&self, access_token: &str) -> Result<(), ApiError> {
        self.record(OAuthCall::Revoke(access_token.to_string()))
    }

    async fn verify_token(
        &self,
        access_token: &str,
    ) -> Result<Received<VerifyTokenResponse>, ApiError> {
        self.record(OAuthCall::Verify(access_token.to_string()))?;
        Ok(received(VerifyTokenResponse {
            client_id: CHANNEL_ID.to_string(),
            expires_in: 3_600,
            scope: Some("P".to_string()),
        }))
    }
}

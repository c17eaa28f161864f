//! # CLI Module
//!
//! One async function per subcommand. Every operation follows the same contract:
//!
//! 1. **Config check**: required credentials are validated before any prompt or
//!    network call; a missing one is reported as a warning and the operation
//!    returns `false`.
//! 2. **Filter selection**: one prompt per required filter, in a fixed order.
//!    Closed sets (categories, trial products) are fetched before the prompt.
//! 3. **Request / render**: a single call for lookups, or the shared
//!    [`pagination`] loop for server-paged lists.
//!
//! Operations return `true` when they ran to completion (including "nothing
//! found" and user cancellation) and `false` when they were aborted by a
//! configuration or API error. Errors are logged here and never propagated.
//!
//! Collaborators are passed in explicitly: the request traits from
//! [`crate::line`], and a [`Console`] bundling the prompter and renderer.
//!
//! ## Namespaces
//!
//! - `line`: [`init`], [`token`]
//! - `things`: [`list_trial`], [`add_trial`], [`remove_trial`], [`get_device`],
//!   [`get_devices`], [`get_product`], [`register_scenario_set`],
//!   [`get_scenario_set`], [`remove_scenario_set`]
//! - `linetv`: [`list_modules`], [`get_spotlight`], [`list_category`],
//!   [`get_category`]

mod channel;
mod linetv;
pub mod pagination;
mod things;

pub use channel::TokenAction;
pub use channel::init;
pub use channel::token;
pub use linetv::get_category;
pub use linetv::get_spotlight;
pub use linetv::list_category;
pub use linetv::list_modules;
pub use things::add_trial;
pub use things::get_device;
pub use things::get_devices;
pub use things::get_product;
pub use things::get_scenario_set;
pub use things::list_trial;
pub use things::register_scenario_set;
pub use things::remove_scenario_set;
pub use things::remove_trial;

use crate::{
    config::{Config, ConfigError, Credential},
    prompt::Prompter,
    render::{Format, Renderer},
    types::Row,
    utils,
};

pub const COUNTRY_QUESTION: &str = "Country code (ISO 3166-2)";

/// Interactive input and output of one operation run.
pub struct Console<'a> {
    pub prompter: &'a mut dyn Prompter,
    pub renderer: &'a mut dyn Renderer,
}

impl<'a> Console<'a> {
    pub fn new(prompter: &'a mut dyn Prompter, renderer: &'a mut dyn Renderer) -> Self {
        Self { prompter, renderer }
    }

    fn cancelled(&mut self) -> bool {
        self.renderer.info("Cancelled");
        true
    }
}

/// `--format` and `--page` of list and lookup operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub format: Format,
    pub page: Option<u32>,
}

/// Warns about the first missing credential. Returns `false` if one is missing.
pub fn validate_config(config: &Config, required: &[Credential], renderer: &mut dyn Renderer) -> bool {
    match config.validate(required) {
        Ok(()) => true,
        Err(ConfigError::Missing(credential)) => {
            renderer.warning(&ConfigError::Missing(credential).to_string());
            renderer.info(&credential.hint());
            false
        }
    }
}

fn ask_country(console: &mut Console<'_>) -> Option<String> {
    console
        .prompter
        .text(COUNTRY_QUESTION, &utils::validate_country_code)
        .map(|code| code.to_lowercase())
}

/// Renders a whole list as a table, honouring `--page` as a display slice.
///
/// Returns `false` when the requested page is past the end of the list.
fn render_rows(rows: &[Row], page: Option<u32>, renderer: &mut dyn Renderer) -> bool {
    match utils::page_slice(rows, page, utils::DISPLAY_PAGE_SIZE) {
        Some(slice) => {
            renderer.table(slice);
            true
        }
        None => {
            warn_out_of_range(page, rows.len(), renderer);
            false
        }
    }
}

fn warn_out_of_range(page: Option<u32>, len: usize, renderer: &mut dyn Renderer) {
    renderer.warning(&format!(
        "Page {} is out of range ({} items)",
        page.unwrap_or_default(),
        len
    ));
}

use std::ops::ControlFlow;

use serde_json::Value;

use crate::{
    cli::{Console, ListOptions, render_rows, validate_config, warn_out_of_range},
    config::{Config, Credential},
    line::ThingsApi,
    render::{Format, Renderer, render_json},
    types::{Device, DeviceProduct, Row, ScenarioSet, TrialProduct},
    utils,
};

pub const PRODUCT_QUESTION: &str = "Select a trial product";
pub const TRIAL_NOT_FOUND: &str = "Trial product not found";

const REQUIRED: &[Credential] = &[Credential::AccessToken];

pub async fn list_trial(
    options: ListOptions,
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let products = match api.list_trial_products().await {
        Ok(products) => products,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    if products.data.is_empty() {
        console.renderer.info(TRIAL_NOT_FOUND);
        return true;
    }

    match options.format {
        Format::Json => render_json_page(&products.raw, options.page, console.renderer),
        Format::Table => {
            let rows: Vec<Row> = products.data.iter().map(trial_row).collect();
            render_rows(&rows, options.page, console.renderer);
        }
    }
    true
}

pub async fn add_trial(
    options: ListOptions,
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let Some(name) = console
        .prompter
        .text("Product name", &utils::validate_required)
    else {
        return console.cancelled();
    };

    match api.add_trial_product(&name).await {
        Ok(product) => {
            show_one(options.format, &product.raw, trial_row(&product.data), console);
            console
                .renderer
                .success(&format!("Trial product {} created", product.data.name));
            true
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            false
        }
    }
}

pub async fn remove_trial(config: &Config, api: &dyn ThingsApi, console: &mut Console<'_>) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let product = match select_trial_product(api, console).await {
        ControlFlow::Continue(product) => product,
        ControlFlow::Break(result) => return result,
    };

    let question = format!("Remove trial product {} ({})?", product.name, product.id);
    if console.prompter.confirm(&question) != Some(true) {
        return console.cancelled();
    }

    match api.remove_trial_product(&product.id).await {
        Ok(()) => {
            console
                .renderer
                .success(&format!("Trial product {} removed", product.name));
            true
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            false
        }
    }
}

pub async fn get_device(
    options: ListOptions,
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let product = match select_trial_product(api, console).await {
        ControlFlow::Continue(product) => product,
        ControlFlow::Break(result) => return result,
    };

    let Some(device_id) = console
        .prompter
        .text("Device ID", &utils::validate_required)
    else {
        return console.cancelled();
    };

    match api.get_device(&product.id, &device_id).await {
        Ok(device) => {
            show_one(options.format, &device.raw, device_row(&device.data), console);
            true
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            false
        }
    }
}

pub async fn get_devices(
    options: ListOptions,
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let product = match select_trial_product(api, console).await {
        ControlFlow::Continue(product) => product,
        ControlFlow::Break(result) => return result,
    };

    let Some(user_id) = console
        .prompter
        .text("User ID", &utils::validate_required)
    else {
        return console.cancelled();
    };

    let devices = match api.get_devices_by_user(&product.id, &user_id).await {
        Ok(devices) => devices,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    if devices.data.is_empty() {
        console.renderer.info("Device not found");
        return true;
    }

    match options.format {
        Format::Json => render_json_page(&devices.raw, options.page, console.renderer),
        Format::Table => {
            let rows: Vec<Row> = devices.data.iter().map(device_row).collect();
            render_rows(&rows, options.page, console.renderer);
        }
    }
    true
}

pub async fn get_product(
    options: ListOptions,
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let Some(device_id) = console
        .prompter
        .text("Device ID", &utils::validate_required)
    else {
        return console.cancelled();
    };

    match api.get_product_by_device(&device_id).await {
        Ok(product) => {
            show_one(
                options.format,
                &product.raw,
                device_product_row(&product.data),
                console,
            );
            true
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            false
        }
    }
}

pub async fn register_scenario_set(
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let product = match select_trial_product(api, console).await {
        ControlFlow::Continue(product) => product,
        ControlFlow::Break(result) => return result,
    };

    let Some(path) = console
        .prompter
        .text("Scenario set JSON file", &utils::validate_required)
    else {
        return console.cancelled();
    };

    let content = match async_fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) => {
            console
                .renderer
                .error(&format!("Cannot read {}: {}", path, e));
            return false;
        }
    };

    // the file is uploaded as written; the typed view only validates it
    let parsed = serde_json::from_str::<Value>(&content).and_then(|document| {
        let scenario_set: ScenarioSet = serde_json::from_value(document.clone())?;
        Ok((document, scenario_set))
    });
    let (document, scenario_set) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            console
                .renderer
                .error(&format!("Invalid scenario set in {}: {}", path, e));
            return false;
        }
    };

    match api.register_scenario_set(&product.id, &document).await {
        Ok(()) => {
            console.renderer.success(&format!(
                "Scenario set with {} scenario(s) registered to {}",
                scenario_set.scenarios.len(),
                product.name
            ));
            true
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            false
        }
    }
}

pub async fn get_scenario_set(
    options: ListOptions,
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let product = match select_trial_product(api, console).await {
        ControlFlow::Continue(product) => product,
        ControlFlow::Break(result) => return result,
    };

    let received = match api.get_scenario_set(&product.id).await {
        Ok(Some(received)) => received,
        Ok(None) => {
            console.renderer.info("Scenario set not found");
            return true;
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    let scenario_set = &received.data;
    match options.format {
        Format::Json => console.renderer.json(&received.raw),
        Format::Table => {
            console.renderer.table(&[Row::new()
                .cell("Auto Close", utils::cell(scenario_set.auto_close))
                .cell(
                    "Suppression Interval",
                    utils::cell(scenario_set.suppression_interval),
                )
                .cell("Scenarios", scenario_set.scenarios.len().to_string())]);

            let rows: Vec<Row> = scenario_set
                .scenarios
                .iter()
                .map(|scenario| {
                    Row::new()
                        .cell("ID", utils::cell(scenario.id.as_deref()))
                        .cell("Trigger", &scenario.trigger.kind)
                        .cell("Actions", scenario.actions.len().to_string())
                })
                .collect();
            console.renderer.table(&rows);
        }
    }
    true
}

pub async fn remove_scenario_set(
    config: &Config,
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let product = match select_trial_product(api, console).await {
        ControlFlow::Continue(product) => product,
        ControlFlow::Break(result) => return result,
    };

    let question = format!("Remove scenario set of {}?", product.name);
    if console.prompter.confirm(&question) != Some(true) {
        return console.cancelled();
    }

    match api.remove_scenario_set(&product.id).await {
        Ok(()) => {
            console
                .renderer
                .success(&format!("Scenario set of {} removed", product.name));
            true
        }
        Err(e) => {
            console.renderer.error(&e.to_string());
            false
        }
    }
}

/// Fetches the trial products and lets the user pick one.
///
/// Breaks with `false` when the lookup fails or comes back empty, and with the
/// cancellation result when the prompt is cancelled.
async fn select_trial_product(
    api: &dyn ThingsApi,
    console: &mut Console<'_>,
) -> ControlFlow<bool, TrialProduct> {
    let products = match api.list_trial_products().await {
        Ok(products) => products.data,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return ControlFlow::Break(false);
        }
    };

    if products.is_empty() {
        console.renderer.warning(TRIAL_NOT_FOUND);
        return ControlFlow::Break(false);
    }

    let choices: Vec<String> = products
        .iter()
        .map(|p| format!("{} ({})", p.name, p.id))
        .collect();

    match console
        .prompter
        .select(PRODUCT_QUESTION, &choices)
        .and_then(|index| products.into_iter().nth(index))
    {
        Some(product) => ControlFlow::Continue(product),
        None => ControlFlow::Break(console.cancelled()),
    }
}

fn show_one(format: Format, raw: &Value, row: Row, console: &mut Console<'_>) {
    match format {
        Format::Json => console.renderer.json(raw),
        Format::Table => console.renderer.table(&[row]),
    }
}

/// Prints the `--page` slice of a list received as a JSON array.
fn render_json_page(raw: &Value, page: Option<u32>, renderer: &mut dyn Renderer) {
    let items = raw.as_array().map(Vec::as_slice).unwrap_or_default();
    match utils::page_slice(items, page, utils::DISPLAY_PAGE_SIZE) {
        Some(slice) => render_json(renderer, slice),
        None => warn_out_of_range(page, items.len(), renderer),
    }
}

fn trial_row(product: &TrialProduct) -> Row {
    Row::new()
        .cell("ID", &product.id)
        .cell("Name", &product.name)
        .cell("Type", utils::cell(product.kind.as_deref()))
        .cell("Channel ID", utils::cell(product.channel_id))
        .cell("Service UUID", utils::cell(product.service_uuid.as_deref()))
        .cell(
            "PSDI Service UUID",
            utils::cell(product.psdi_service_uuid.as_deref()),
        )
        .cell(
            "PSDI Characteristic UUID",
            utils::cell(product.psdi_characteristic_uuid.as_deref()),
        )
}

fn device_row(device: &Device) -> Row {
    Row::new()
        .cell("ID", &device.id)
        .cell("Product ID", utils::cell(device.product_id.as_deref()))
        .cell("User ID", utils::cell(device.user_id.as_deref()))
        .cell("Device ID", utils::cell(device.device_id.as_deref()))
        .cell("PSDI", utils::cell(device.psdi.as_deref()))
}

fn device_product_row(product: &DeviceProduct) -> Row {
    Row::new()
        .cell("Product ID", &product.product_id)
        .cell("Device ID", utils::cell(product.device_id.as_deref()))
        .cell("PSDI", utils::cell(product.psdi.as_deref()))
}

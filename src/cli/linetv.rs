use async_trait::async_trait;

use crate::{
    cli::{
        Console, ListOptions, ask_country,
        pagination::{self, Fetched, Page, PageRequest, PageSource},
        render_rows, validate_config,
    },
    config::{Config, Credential},
    line::{ApiError, TvApi},
    render::{Format, Renderer},
    types::{Category, CategoryHome, Clip, ModuleList, Received, Row},
    utils,
};

pub const CATEGORY_QUESTION: &str = "Select a category";
pub const CATEGORY_LIST_NOT_FOUND: &str = "Category list not found";
pub const NO_CATEGORY: &str = "No category";
pub const CATEGORY_HOME_NOT_FOUND: &str = "Category home data not found";
pub const MODULE_NOT_FOUND: &str = "Module not found";
pub const SPOTLIGHT_NOT_FOUND: &str = "Spotlight not found";

const REQUIRED: &[Credential] = &[Credential::ChannelId];

/// Filters of the category home listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub country: String,
    pub category_code: String,
}

/// Category home pages: the category's represent clip and its channels.
pub struct CategoryHomeSource<'a> {
    pub api: &'a dyn TvApi,
    pub channel_id: &'a str,
}

#[async_trait]
impl PageSource for CategoryHomeSource<'_> {
    type Filter = CategoryFilter;
    type Content = CategoryHome;

    async fn fetch(
        &self,
        request: &PageRequest<'_, CategoryFilter>,
    ) -> Result<Fetched<CategoryHome>, ApiError> {
        let response = self
            .api
            .get_category_home(
                self.channel_id,
                &request.filter.country,
                &request.filter.category_code,
                request.page_index,
                request.page_size,
            )
            .await?;

        let Some(Received { data, raw }) = response else {
            return Ok(Fetched::NotFound);
        };
        let Some(body) = data.body else {
            return Ok(Fetched::NotFound);
        };

        let has_channels = body.channels.as_ref().is_some_and(|c| !c.is_empty());
        if !has_channels && body.represent_clip.is_none() {
            return Ok(Fetched::NotFound);
        }

        Ok(Fetched::Page(Page {
            has_more: body.has_more.unwrap_or(false),
            content: body,
            raw,
        }))
    }

    fn render(&self, content: &CategoryHome, renderer: &mut dyn Renderer) {
        if let Some(clip) = &content.represent_clip {
            renderer.table(&represent_clip_rows(clip));
        }

        let rows: Vec<Row> = content
            .channels
            .iter()
            .flatten()
            .map(|channel| {
                Row::new()
                    .cell("Channel ID", &channel.channel_id)
                    .cell("Channel Name", utils::cell(channel.channel_name.as_deref()))
                    .cell("Badge", utils::cell(channel.badge_type.as_deref()))
                    .cell("URL", utils::cell(channel.service_url.as_deref()))
            })
            .collect();
        renderer.table(&rows);
    }

    fn not_found(&self) -> &'static str {
        CATEGORY_HOME_NOT_FOUND
    }
}

/// Module pages of a country.
pub struct ModuleSource<'a> {
    pub api: &'a dyn TvApi,
    pub channel_id: &'a str,
}

#[async_trait]
impl PageSource for ModuleSource<'_> {
    /// Country code.
    type Filter = String;
    type Content = ModuleList;

    async fn fetch(
        &self,
        request: &PageRequest<'_, String>,
    ) -> Result<Fetched<ModuleList>, ApiError> {
        let response = self
            .api
            .list_modules(
                self.channel_id,
                request.filter,
                request.page_index,
                request.page_size,
            )
            .await?;

        let Some(Received { data, raw }) = response else {
            return Ok(Fetched::NotFound);
        };
        let Some(body) = data.body else {
            return Ok(Fetched::NotFound);
        };
        if body.modules.as_ref().is_none_or(|m| m.is_empty()) {
            return Ok(Fetched::NotFound);
        }

        Ok(Fetched::Page(Page {
            has_more: body.has_more.unwrap_or(false),
            content: body,
            raw,
        }))
    }

    fn render(&self, content: &ModuleList, renderer: &mut dyn Renderer) {
        let rows: Vec<Row> = content
            .modules
            .iter()
            .flatten()
            .map(|module| {
                Row::new()
                    .cell("Module ID", utils::cell(module.module_id.as_deref()))
                    .cell("Name", utils::cell(module.module_name.as_deref()))
                    .cell("Template", utils::cell(module.template_type.as_deref()))
                    .cell(
                        "Clips",
                        module.clips.as_ref().map_or(0, Vec::len).to_string(),
                    )
            })
            .collect();
        renderer.table(&rows);
    }

    fn not_found(&self) -> &'static str {
        MODULE_NOT_FOUND
    }
}

/// Browses the home data of one category, page by page.
pub async fn get_category(
    options: ListOptions,
    config: &Config,
    api: &dyn TvApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let Some(country) = ask_country(console) else {
        return console.cancelled();
    };

    let Some(categories) = fetch_categories(api, config.channel_id(), &country, console).await
    else {
        return false;
    };

    let choices: Vec<String> = categories
        .iter()
        .map(|c| format!("{} ({})", c.category_name, c.category_code))
        .collect();
    let Some(category) = console
        .prompter
        .select(CATEGORY_QUESTION, &choices)
        .and_then(|index| categories.into_iter().nth(index))
    else {
        return console.cancelled();
    };

    let Some(page_size) = pagination::ask_page_size(console) else {
        return console.cancelled();
    };

    let filter = CategoryFilter {
        country,
        category_code: category.category_code,
    };
    let source = CategoryHomeSource {
        api,
        channel_id: config.channel_id(),
    };
    pagination::paginate(&source, &filter, page_size, options.format, console).await
}

/// Lists the content modules of a country, page by page.
pub async fn list_modules(
    options: ListOptions,
    config: &Config,
    api: &dyn TvApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let Some(country) = ask_country(console) else {
        return console.cancelled();
    };
    let Some(page_size) = pagination::ask_page_size(console) else {
        return console.cancelled();
    };

    let source = ModuleSource {
        api,
        channel_id: config.channel_id(),
    };
    pagination::paginate(&source, &country, page_size, options.format, console).await
}

pub async fn list_category(
    options: ListOptions,
    config: &Config,
    api: &dyn TvApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let Some(country) = ask_country(console) else {
        return console.cancelled();
    };

    let response = match api.list_categories(config.channel_id(), &country).await {
        Ok(response) => response,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    let Some(response) = response.filter(|r| r.data.body.is_some()) else {
        console.renderer.warning(CATEGORY_LIST_NOT_FOUND);
        return true;
    };

    if options.format == Format::Json {
        console.renderer.json(&response.raw);
        return true;
    }

    let categories = response
        .data
        .body
        .and_then(|body| body.tabs)
        .filter(|tabs| !tabs.is_empty());
    let Some(categories) = categories else {
        console.renderer.warning(NO_CATEGORY);
        return true;
    };

    let rows: Vec<Row> = categories
        .iter()
        .map(|category| {
            Row::new()
                .cell("Code", &category.category_code)
                .cell("Name", &category.category_name)
                .cell(
                    "English Name",
                    utils::cell(category.category_en_name.as_deref()),
                )
                .cell("URL", utils::cell(category.service_url.as_deref()))
        })
        .collect();
    render_rows(&rows, options.page, console.renderer);
    true
}

pub async fn get_spotlight(
    options: ListOptions,
    config: &Config,
    api: &dyn TvApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, REQUIRED, console.renderer) {
        return false;
    }

    let Some(country) = ask_country(console) else {
        return console.cancelled();
    };

    let response = match api.get_spotlight(config.channel_id(), &country).await {
        Ok(response) => response,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    let clips = response
        .as_ref()
        .and_then(|r| r.data.body.as_ref())
        .and_then(|body| body.clips.as_ref())
        .filter(|clips| !clips.is_empty());
    let (Some(response), Some(clips)) = (&response, clips) else {
        console.renderer.warning(SPOTLIGHT_NOT_FOUND);
        return true;
    };

    if options.format == Format::Json {
        console.renderer.json(&response.raw);
        return true;
    }

    let rows: Vec<Row> = clips.iter().map(clip_row).collect();
    render_rows(&rows, options.page, console.renderer);
    true
}

/// Fetches the categories of a country to choose from.
///
/// `None` when the request failed or nothing came back; the reason was already
/// reported.
async fn fetch_categories(
    api: &dyn TvApi,
    channel_id: &str,
    country: &str,
    console: &mut Console<'_>,
) -> Option<Vec<Category>> {
    let response = match api.list_categories(channel_id, country).await {
        Ok(response) => response,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return None;
        }
    };

    let Some(body) = response.and_then(|r| r.data.body) else {
        console.renderer.warning(CATEGORY_LIST_NOT_FOUND);
        return None;
    };

    let tabs = body.tabs.filter(|tabs| !tabs.is_empty());
    if tabs.is_none() {
        console.renderer.warning(NO_CATEGORY);
    }
    tabs
}

fn represent_clip_rows(clip: &Clip) -> Vec<Row> {
    [
        ("Represent Clip No.", utils::cell(clip.clip_no)),
        (
            "Represent Clip Title",
            utils::cell(clip.clip_title.as_deref()),
        ),
        ("Represent Clip URL", utils::cell(clip.service_url.as_deref())),
        ("Play Count", utils::cell(clip.play_count)),
        ("Likeit Count", utils::cell(clip.likeit_point)),
    ]
    .into_iter()
    .map(|(field, value)| Row::new().cell("Field", field).cell("Value", value))
    .collect()
}

fn clip_row(clip: &Clip) -> Row {
    Row::new()
        .cell("Clip No.", utils::cell(clip.clip_no))
        .cell("Title", utils::cell(clip.clip_title.as_deref()))
        .cell("Play Time", utils::cell(clip.display_play_time.as_deref()))
        .cell("Play Count", utils::cell(clip.play_count))
        .cell("Likeit Count", utils::cell(clip.likeit_point))
        .cell("URL", utils::cell(clip.service_url.as_deref()))
}

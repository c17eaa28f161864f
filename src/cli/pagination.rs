//! Interactive page-by-page listing shared by every server-paged operation.
//!
//! An operation resolves its filters first, asks for a page size with
//! [`ask_page_size`] and then hands a [`PageSource`] to [`paginate`], which
//! owns the loop:
//!
//! ```text
//! FETCH -> RENDER -> (has more? CONTINUE_PROMPT -> FETCH | TERMINATE)
//! ```
//!
//! - a failed fetch is logged and ends the loop with `false`
//! - a missing or empty result prints the source's "not found" message once and
//!   ends with `true`
//! - declining or cancelling the continue prompt ends with `true`

use async_trait::async_trait;

use crate::{
    cli::Console,
    line::ApiError,
    render::{Format, Renderer},
    utils,
};

pub const PAGE_SIZE_QUESTION: &str = "Count per page";
pub const NEXT_PAGE_QUESTION: &str = "Display next page?";

/// One fetch of the loop. `page_index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a, F> {
    pub filter: &'a F,
    pub page_index: u32,
    pub page_size: u32,
}

/// A page that has something to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: T,
    pub has_more: bool,
    /// Response as received, printed verbatim with `--format json`.
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Page(Page<T>),
    NotFound,
}

/// A list API that can be walked page by page.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Filter: Send + Sync;
    type Content: Send;

    async fn fetch(
        &self,
        request: &PageRequest<'_, Self::Filter>,
    ) -> Result<Fetched<Self::Content>, ApiError>;

    /// Table rendering of one page.
    fn render(&self, content: &Self::Content, renderer: &mut dyn Renderer);

    /// Message shown when the API has nothing for the filter.
    fn not_found(&self) -> &'static str;
}

/// Asks for the number of items per page. Zero is rejected at the prompt.
pub fn ask_page_size(console: &mut Console<'_>) -> Option<u32> {
    console
        .prompter
        .number(PAGE_SIZE_QUESTION, &utils::validate_non_zero)
}

/// Runs the fetch loop from page 1 until the user stops or the source runs dry.
pub async fn paginate<S>(
    source: &S,
    filter: &S::Filter,
    page_size: u32,
    format: Format,
    console: &mut Console<'_>,
) -> bool
where
    S: PageSource + ?Sized,
{
    let mut page_index = 1;

    loop {
        let request = PageRequest {
            filter,
            page_index,
            page_size,
        };

        let page = match source.fetch(&request).await {
            Ok(Fetched::Page(page)) => page,
            Ok(Fetched::NotFound) => {
                console.renderer.warning(source.not_found());
                return true;
            }
            Err(e) => {
                console.renderer.error(&e.to_string());
                return false;
            }
        };

        match format {
            Format::Json => console.renderer.json(&page.raw),
            Format::Table => source.render(&page.content, console.renderer),
        }

        if !page.has_more {
            return true;
        }

        match console.prompter.confirm(NEXT_PAGE_QUESTION) {
            Some(true) => page_index += 1,
            _ => return true,
        }
    }
}

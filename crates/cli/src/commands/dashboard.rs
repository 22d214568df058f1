use docflow_client::{ApiClient, ClientError, DocumentResource, ListQuery};
use docflow_core::dashboard::{DashboardState, DashboardView, Search, SearchField, Tab};
use docflow_core::domain::document::{DocumentKind, DocumentSummary, ResourceDescriptor};

use crate::commands::{build_runtime, invalid_argument, load_config, CommandResult};

const COMMAND: &str = "dashboard";

#[derive(Debug, Clone, Default)]
pub struct DashboardArgs {
    pub kind: String,
    pub tab: Option<String>,
    pub page: Option<usize>,
    pub search: Option<String>,
    pub field: Option<String>,
}

/// The dashboard state these arguments describe, before any data is loaded.
fn requested_state(args: &DashboardArgs, page_size: usize) -> Result<(DashboardState, usize), String> {
    let tab: Tab = match args.tab.as_deref() {
        Some(raw) => raw.parse().map_err(|error| format!("{error}"))?,
        None => Tab::All,
    };
    let field: SearchField = match args.field.as_deref() {
        Some(raw) => raw.parse().map_err(|error| format!("{error}"))?,
        None => SearchField::Any,
    };
    let search = args.search.as_deref().and_then(|term| Search::new(term, field));

    let state = DashboardState::new(page_size).switch_tab(tab).search(search);
    Ok((state, args.page.unwrap_or(1)))
}

/// Loads the whole collection in one unpaged list call, then applies the tab,
/// search and page to it locally. Counts and page totals therefore cover every
/// stored document; collections too large for a single response are out of scope.
pub async fn load_view(
    documents: &DocumentResource,
    state: DashboardState,
    page: usize,
) -> Result<(DashboardState, DashboardView<DocumentSummary>), ClientError> {
    let items = documents.list_summaries(&ListQuery::default()).await?;
    let state = state.change_page(&items, page);
    let view = state.view(&items);
    Ok((state, view))
}

pub fn run(args: DashboardArgs) -> CommandResult {
    let kind: DocumentKind = match args.kind.parse() {
        Ok(kind) => kind,
        Err(error) => return invalid_argument(COMMAND, format!("{error}")),
    };
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let (state, page) = match requested_state(&args, config.dashboard.page_size) {
        Ok(requested) => requested,
        Err(message) => return invalid_argument(COMMAND, message),
    };
    let runtime = match build_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let client = match ApiClient::from_config(&config.api) {
        Ok(client) => client,
        Err(error) => return CommandResult::client_failure(COMMAND, &error),
    };

    let documents = DocumentResource::new(client, ResourceDescriptor::for_kind(kind));
    match runtime.block_on(load_view(&documents, state, page)) {
        Ok((state, view)) => {
            let message = format!(
                "{kind} {}: showing {}-{} of {} (page {}/{})",
                state.tab,
                view.window.start_item,
                view.window.end_item,
                view.window.total_items,
                view.window.current_page,
                view.window.total_pages.max(1)
            );
            CommandResult::success_with(COMMAND, message, &view)
        }
        Err(error) => CommandResult::client_failure(COMMAND, &error),
    }
}

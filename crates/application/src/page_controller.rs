use std::future::Future;
use std::sync::Arc;

use hvacdesk_core::{AppError, AppResult, RecordId};
use hvacdesk_domain::{
    Column, DEFAULT_PAGE_SIZE, FilterSpec, FilterValue, FilterValues, PageResult, Resource,
    RowAction,
};
use tracing::{debug, info, warn};

use crate::list_view::{DEFAULT_EMPTY_MESSAGE, ListRender, ListViewProps, render_list};
use crate::{CollectionGateway, ConfirmationPrompt, FilterStateManager, RecordForm, RemoteListFetcher};

/// Displayed state of one list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    /// Rows of the current page.
    pub rows: Vec<T>,
    /// Records across all pages.
    pub total_count: usize,
    /// Page count, at least one.
    pub total_pages: u32,
    /// Page size of the last successful fetch.
    pub page_size: usize,
    /// Whether the latest fetch is in flight.
    pub loading: bool,
    /// Message of the latest failed fetch.
    pub error: Option<String>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
            total_pages: 1,
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            error: None,
        }
    }
}

/// Identifies one list fetch; only the latest ticket may update the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    page: u32,
    filters: FilterValues,
}

impl FetchTicket {
    /// Returns the requested page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// One resource screen: filters, paging, the list and its record form.
pub struct PageController<R: Resource> {
    gateway: Arc<dyn CollectionGateway>,
    confirmation: Arc<dyn ConfirmationPrompt>,
    fetcher: RemoteListFetcher<R>,
    filters: FilterStateManager,
    form: RecordForm<R>,
    columns: Vec<Column<R::Record>>,
    actions: Vec<RowAction>,
    current_page: u32,
    generation: u64,
    state: PageState<R::Record>,
}

impl<R: Resource> PageController<R> {
    /// Creates a controller with an explicit filter spec.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn CollectionGateway>,
        confirmation: Arc<dyn ConfirmationPrompt>,
        filter_spec: FilterSpec,
        page_size: Option<usize>,
    ) -> Self {
        Self {
            fetcher: RemoteListFetcher::new(Arc::clone(&gateway), page_size),
            gateway,
            confirmation,
            filters: FilterStateManager::new(filter_spec, FilterValues::new()),
            form: RecordForm::new(),
            columns: R::columns(),
            actions: R::row_actions(),
            current_page: 1,
            generation: 0,
            state: PageState::default(),
        }
    }

    /// Creates a controller with the resource's own filter spec.
    pub fn for_resource(
        gateway: Arc<dyn CollectionGateway>,
        confirmation: Arc<dyn ConfirmationPrompt>,
        page_size: Option<usize>,
    ) -> AppResult<Self> {
        Ok(Self::new(gateway, confirmation, R::filter_spec()?, page_size))
    }

    /// Returns the displayed state.
    #[must_use]
    pub fn state(&self) -> &PageState<R::Record> {
        &self.state
    }

    /// Returns the page shown by the last successful fetch.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the committed filters.
    #[must_use]
    pub fn committed_filters(&self) -> &FilterValues {
        self.filters.committed()
    }

    /// Returns the filter panel state.
    #[must_use]
    pub fn filter_panel(&self) -> &FilterStateManager {
        &self.filters
    }

    /// Returns the filter panel state for draft edits.
    pub fn filter_panel_mut(&mut self) -> &mut FilterStateManager {
        &mut self.filters
    }

    /// Returns the record form.
    #[must_use]
    pub fn form(&self) -> &RecordForm<R> {
        &self.form
    }

    /// Returns the record form for field edits.
    pub fn form_mut(&mut self) -> &mut RecordForm<R> {
        &mut self.form
    }

    /// Marks the screen loading and returns a ticket superseding earlier ones.
    pub fn begin_fetch(&mut self, page: u32) -> FetchTicket {
        self.generation += 1;
        self.state.loading = true;
        FetchTicket {
            generation: self.generation,
            page: page.max(1),
            filters: self.filters.committed().clone(),
        }
    }

    /// Returns a detached fetch for `ticket` that borrows nothing from the controller.
    pub fn fetch_future(
        &self,
        ticket: &FetchTicket,
    ) -> impl Future<Output = AppResult<PageResult<R::Record>>> + Send + use<R> {
        let fetcher = self.fetcher.clone();
        let page = ticket.page;
        let filters = ticket.filters.clone();
        async move { fetcher.fetch_page(page, &filters).await }
    }

    /// Applies a fetch result when `ticket` is the latest one.
    ///
    /// A failure clears the rows and shows the error. Returns whether the
    /// result was applied.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: AppResult<PageResult<R::Record>>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                resource = R::NAME,
                page = ticket.page,
                "ignoring superseded page fetch"
            );
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(page) => {
                self.current_page = page.page();
                self.state.total_count = page.total_count();
                self.state.total_pages = page.total_pages();
                self.state.page_size = page.page_size();
                self.state.rows = page.into_items();
                self.state.error = None;
            }
            Err(error) => {
                warn!(resource = R::NAME, page = ticket.page, error = %error, "page fetch failed");
                self.state.rows.clear();
                self.state.total_count = 0;
                self.state.total_pages = 1;
                self.state.error = Some(error.user_message());
            }
        }
        true
    }

    /// Fetches `page` with the committed filters and shows the result.
    pub async fn load_page(&mut self, page: u32) {
        let ticket = self.begin_fetch(page);
        let result = self.fetch_future(&ticket).await;
        self.complete_fetch(&ticket, result);
    }

    /// Loads the first page.
    pub async fn load(&mut self) {
        self.load_page(1).await;
    }

    /// Reloads the current page.
    pub async fn refresh(&mut self) {
        self.load_page(self.current_page).await;
    }

    /// Navigates to `page`, clamped into `[1, total_pages]`.
    pub async fn go_to_page(&mut self, page: u32) {
        let page = page.clamp(1, self.state.total_pages.max(1));
        self.load_page(page).await;
    }

    /// Sets draft values and applies them; returns whether a fetch happened.
    pub async fn apply_filters(&mut self, values: FilterValues) -> AppResult<bool> {
        for (key, value) in values.iter() {
            self.filters.set_draft_value(key, value.clone())?;
        }
        Ok(self.apply_panel().await)
    }

    /// Sets one draft value of the filter panel.
    pub fn set_filter_draft(&mut self, key: &str, value: FilterValue) -> AppResult<()> {
        self.filters.set_draft_value(key, value)
    }

    /// Commits the filter draft and fetches page 1 when it changed.
    pub async fn apply_panel(&mut self) -> bool {
        if self.filters.apply().is_none() {
            return false;
        }

        self.current_page = 1;
        self.load_page(1).await;
        true
    }

    /// Clears the filters and fetches page 1.
    pub async fn reset_panel(&mut self) {
        self.filters.reset();
        self.current_page = 1;
        self.load_page(1).await;
    }

    /// Opens the form to add a record.
    pub fn open_add(&mut self) {
        self.form.open_create();
    }

    /// Opens the form to add a record with prefilled values.
    pub fn open_add_with(&mut self, draft: R::Draft) {
        self.form.open_create_with(draft);
    }

    /// Opens the form bound to `record`.
    pub fn open_edit(&mut self, record: R::Record) {
        self.form.open_edit(record);
    }

    /// Opens the form bound to the record with `id`, fetching it when it is
    /// not on the current page.
    pub async fn open_edit_by_id(&mut self, id: RecordId) -> AppResult<()> {
        let on_page = self
            .state
            .rows
            .iter()
            .find(|row| R::record_id(row) == Some(id))
            .cloned();
        let record = match on_page {
            Some(record) => record,
            None => self.fetcher.fetch_record(id).await?,
        };
        self.form.open_edit(record);
        Ok(())
    }

    /// Closes the form.
    pub fn close_form(&mut self) {
        self.form.close();
    }

    /// Submits the form and refreshes the current page on success.
    pub async fn submit_form(&mut self) -> AppResult<Option<R::Record>> {
        let saved = self.form.submit(self.gateway.as_ref()).await?;
        self.refresh().await;
        Ok(saved)
    }

    /// Deletes the record with `id` after confirmation.
    ///
    /// Returns `false` without any request when the user cancels. After a
    /// delete the current page is reloaded; an emptied page other than the
    /// first steps back one page.
    pub async fn delete(&mut self, id: RecordId) -> AppResult<bool> {
        let message = format!("Are you sure you want to delete this {}?", R::NAME);
        if !self.confirmation.confirm(&message).await? {
            return Ok(false);
        }

        self.gateway.delete(&R::record_path(id)).await?;
        info!(resource = R::NAME, id, "record deleted");

        self.refresh().await;
        if self.state.rows.is_empty() && self.current_page > 1 {
            self.load_page(self.current_page - 1).await;
        }
        Ok(true)
    }

    /// Returns the list view inputs for the displayed state.
    #[must_use]
    pub fn view(&self) -> ListViewProps<'_, R::Record> {
        ListViewProps {
            columns: &self.columns,
            rows: &self.state.rows,
            loading: self.state.loading,
            error: self.state.error.as_deref(),
            page: self.current_page,
            total_pages: self.state.total_pages,
            page_size: self.state.page_size,
            total_count: self.state.total_count,
            actions: &self.actions,
            empty_message: DEFAULT_EMPTY_MESSAGE,
        }
    }

    /// Renders the list area.
    #[must_use]
    pub fn render(&self) -> ListRender {
        render_list::<R>(&self.view())
    }

    /// Returns the row with `id` on the current page.
    pub fn row(&self, id: RecordId) -> AppResult<&R::Record> {
        self.state
            .rows
            .iter()
            .find(|row| R::record_id(row) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("{} {id} is not on this page", R::NAME)))
    }
}

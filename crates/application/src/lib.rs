//! Application services and ports.
//!
//! Holds the reusable list screen pattern: filter panel state, remote
//! page fetching, list rendering, the create/edit form and the page
//! controller composing them, plus session and lookup services.

#![forbid(unsafe_code)]

mod collection_ports;
mod customer_lookup;
mod filter_state;
mod list_fetcher;
mod list_view;
mod options;
mod page_controller;
mod record_form;
mod search_input;
mod session;
mod session_ports;

#[cfg(test)]
mod test_support;

pub use collection_ports::{CollectionGateway, ConfirmationPrompt};
pub use customer_lookup::{
    CUSTOMER_LOOKUP_DEBOUNCE, CustomerLookup, LookupState, find_customer_by_phone,
};
pub use filter_state::FilterStateManager;
pub use list_fetcher::{RemoteListFetcher, page_query, parse_collection_page};
pub use list_view::{
    DEFAULT_EMPTY_MESSAGE, EmptyPlaceholder, ListRender, ListViewProps, PaginationControls,
    RowKey, RowRender, TableRender, render_list, summary_line,
};
pub use options::LookupOptionsService;
pub use page_controller::{FetchTicket, PageController, PageState};
pub use record_form::{FormPhase, RecordForm};
pub use search_input::{SEARCH_DEBOUNCE, SearchInput};
pub use session::{SessionContext, SessionService};
pub use session_ports::{AuthGateway, CredentialStore};

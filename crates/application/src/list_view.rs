use hvacdesk_core::RecordId;
use hvacdesk_domain::{CellContext, Column, Resource, RowAction};
use serde_json::Value;

/// Placeholder shown when a page has no rows.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No records";

/// Inputs of the list table.
#[derive(Debug)]
pub struct ListViewProps<'a, T> {
    /// Column descriptors.
    pub columns: &'a [Column<T>],
    /// Rows of the current page.
    pub rows: &'a [T],
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Message of the last failed fetch.
    pub error: Option<&'a str>,
    /// One-based current page.
    pub page: u32,
    /// Page count, at least one.
    pub total_pages: u32,
    /// Page size used for serial numbers.
    pub page_size: usize,
    /// Records across all pages.
    pub total_count: usize,
    /// Per-row actions; empty hides the actions column.
    pub actions: &'a [RowAction],
    /// Placeholder for an empty page.
    pub empty_message: &'a str,
}

/// Stable identity of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    /// Record id.
    Id(RecordId),
    /// Row index, for records without an id.
    Index(usize),
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRender {
    /// Row identity.
    pub key: RowKey,
    /// Cell texts in column order.
    pub cells: Vec<String>,
    /// Actions offered for the row.
    pub actions: Vec<RowAction>,
}

/// Placeholder row spanning the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPlaceholder {
    /// Text shown.
    pub message: String,
    /// Number of columns spanned, including the actions column.
    pub colspan: usize,
}

/// Previous/next pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    page: u32,
    total_pages: u32,
}

impl PaginationControls {
    /// Creates controls for `page` of `total_pages`; both are at least one.
    #[must_use]
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self {
            page: page.max(1),
            total_pages: total_pages.max(1),
        }
    }

    /// Returns the current page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page count.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns whether "Prev" is enabled.
    #[must_use]
    pub fn previous_enabled(&self) -> bool {
        self.page != 1
    }

    /// Returns whether "Next" is enabled.
    #[must_use]
    pub fn next_enabled(&self) -> bool {
        self.page != self.total_pages
    }

    /// Clamps a requested page into `[1, total_pages]`.
    #[must_use]
    pub fn clamp(&self, requested: u32) -> u32 {
        requested.clamp(1, self.total_pages)
    }

    /// Returns the page "Prev" navigates to.
    #[must_use]
    pub fn previous(&self) -> u32 {
        self.clamp(self.page.saturating_sub(1))
    }

    /// Returns the page "Next" navigates to.
    #[must_use]
    pub fn next(&self) -> u32 {
        self.clamp(self.page.saturating_add(1))
    }

    /// Returns `Page {page} of {total_pages}`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

/// Rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRender {
    /// Column headers, with `Actions` last when actions are present.
    pub headers: Vec<String>,
    /// Rendered rows.
    pub rows: Vec<RowRender>,
    /// Placeholder when there are no rows.
    pub placeholder: Option<EmptyPlaceholder>,
    /// Pagination state.
    pub pagination: PaginationControls,
    /// `{total} total • {shown} shown`.
    pub summary: String,
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRender {
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed.
    Error(String),
    /// Rows are available.
    Table(TableRender),
}

/// Renders the list area of resource `R`.
///
/// Loading wins over an error, and an error wins over the table.
#[must_use]
pub fn render_list<R: Resource>(props: &ListViewProps<'_, R::Record>) -> ListRender {
    if props.loading {
        return ListRender::Loading;
    }
    if let Some(error) = props.error {
        return ListRender::Error(format!("Error: {error}"));
    }

    let mut headers: Vec<String> = props
        .columns
        .iter()
        .map(|column| column.label().to_owned())
        .collect();
    if !props.actions.is_empty() {
        headers.push("Actions".to_owned());
    }

    let rows: Vec<RowRender> = props
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let row_json = serde_json::to_value(row).unwrap_or(Value::Null);
            let context = CellContext {
                index,
                page: props.page,
                page_size: props.page_size,
            };
            RowRender {
                key: R::record_id(row).map_or(RowKey::Index(index), RowKey::Id),
                cells: props
                    .columns
                    .iter()
                    .map(|column| column.cell(row, &row_json, context))
                    .collect(),
                actions: props.actions.to_vec(),
            }
        })
        .collect();

    let placeholder = rows.is_empty().then(|| EmptyPlaceholder {
        message: props.empty_message.to_owned(),
        colspan: props.columns.len() + usize::from(!props.actions.is_empty()),
    });

    ListRender::Table(TableRender {
        headers,
        summary: format!("{} total • {} shown", props.total_count, rows.len()),
        rows,
        placeholder,
        pagination: PaginationControls::new(props.page, props.total_pages),
    })
}

/// Returns the summary line above the table.
#[must_use]
pub fn summary_line(loading: bool, total_count: usize, shown: usize) -> String {
    if loading {
        "Loading…".to_owned()
    } else {
        format!("{total_count} total • {shown} shown")
    }
}

#[cfg(test)]
mod tests {
    use hvacdesk_domain::{Role, RoleResource};

    use super::*;

    fn props<'a>(
        columns: &'a [Column<Role>],
        rows: &'a [Role],
        actions: &'a [RowAction],
    ) -> ListViewProps<'a, Role> {
        ListViewProps {
            columns,
            rows,
            loading: false,
            error: None,
            page: 2,
            total_pages: 3,
            page_size: 10,
            total_count: 23,
            actions,
            empty_message: DEFAULT_EMPTY_MESSAGE,
        }
    }

    #[test]
    fn loading_takes_precedence_over_error() {
        let columns = RoleResource::columns();
        let mut view = props(&columns, &[], &[]);
        view.loading = true;
        view.error = Some("boom");

        assert_eq!(render_list::<RoleResource>(&view), ListRender::Loading);

        view.loading = false;
        assert_eq!(
            render_list::<RoleResource>(&view),
            ListRender::Error("Error: boom".to_owned())
        );
    }

    #[test]
    fn rows_get_serials_keys_and_actions_header() {
        let columns = RoleResource::columns();
        let rows = vec![
            Role {
                id: Some(11),
                name: "sales".to_owned(),
            },
            Role {
                id: None,
                name: "draft".to_owned(),
            },
        ];
        let actions = [RowAction::Edit, RowAction::Delete];

        let ListRender::Table(table) = render_list::<RoleResource>(&props(&columns, &rows, &actions))
        else {
            unreachable!()
        };

        assert_eq!(table.headers, vec!["Sr.No", "Name", "Actions"]);
        assert_eq!(table.rows[0].key, RowKey::Id(11));
        assert_eq!(table.rows[1].key, RowKey::Index(1));
        assert_eq!(table.rows[0].cells, vec!["11", "sales"]);
        assert_eq!(table.rows[1].cells, vec!["12", "draft"]);
        assert!(table.placeholder.is_none());
        assert_eq!(table.summary, "23 total • 2 shown");
    }

    #[test]
    fn empty_page_placeholder_spans_actions_column() {
        let columns = RoleResource::columns();
        let actions = [RowAction::Edit];

        let ListRender::Table(table) = render_list::<RoleResource>(&props(&columns, &[], &actions))
        else {
            unreachable!()
        };

        assert_eq!(
            table.placeholder,
            Some(EmptyPlaceholder {
                message: "No records".to_owned(),
                colspan: 3,
            })
        );
    }

    #[test]
    fn pagination_disables_edges_and_clamps() {
        let first = PaginationControls::new(1, 3);
        assert!(!first.previous_enabled());
        assert!(first.next_enabled());
        assert_eq!(first.previous(), 1);

        let last = PaginationControls::new(3, 3);
        assert!(!last.next_enabled());
        assert_eq!(last.next(), 3);
        assert_eq!(last.clamp(0), 1);
        assert_eq!(last.clamp(9), 3);
        assert_eq!(last.label(), "Page 3 of 3");

        let only = PaginationControls::new(1, 0);
        assert!(!only.previous_enabled());
        assert!(!only.next_enabled());
    }

    #[test]
    fn summary_line_reports_loading() {
        assert_eq!(summary_line(true, 23, 10), "Loading…");
        assert_eq!(summary_line(false, 23, 10), "23 total • 10 shown");
    }
}

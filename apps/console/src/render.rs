use hvacdesk_application::{ListRender, RowRender, TableRender};
use hvacdesk_domain::{Lead, LeadFollowUp};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Prints the list area of one page.
pub fn print_list(render: &ListRender) {
    match render {
        ListRender::Loading => println!("Loading…"),
        ListRender::Error(message) => eprintln!("{message}"),
        ListRender::Table(table) => print_table(table),
    }
}

fn print_table(render: &TableRender) {
    println!("{}", render.summary);

    if let Some(placeholder) = &render.placeholder {
        println!("{}", placeholder.message);
    } else {
        println!("{}", list_table(render));
    }

    let pagination = &render.pagination;
    let mut footer = pagination.label();
    if pagination.previous_enabled() {
        footer.push_str(&format!("  (--page {} for previous)", pagination.previous()));
    }
    if pagination.next_enabled() {
        footer.push_str(&format!("  (--page {} for next)", pagination.next()));
    }
    println!("{footer}");
}

fn list_table(render: &TableRender) -> Table {
    let mut builder = Builder::default();
    builder.push_record(render.headers.iter().cloned());
    for row in &render.rows {
        builder.push_record(row_cells(row, render.headers.len()));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

fn row_cells(row: &RowRender, width: usize) -> Vec<String> {
    let mut cells = row.cells.clone();
    if cells.len() < width {
        let actions: Vec<&str> = row.actions.iter().map(|action| action.label()).collect();
        cells.push(actions.join(" / "));
    }
    cells
}

#[derive(Tabled)]
struct FollowUpRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Remarks")]
    remarks: String,
}

impl From<&LeadFollowUp> for FollowUpRow {
    fn from(followup: &LeadFollowUp) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_owned());
        Self {
            date: text(&followup.followup_date),
            next: text(&followup.next_followup_date),
            status: text(&followup.status),
            remarks: text(&followup.remarks),
        }
    }
}

/// Prints a lead detail view followed by its follow-up history.
pub fn print_lead(lead: &Lead) {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_owned());
    let assignee = lead
        .assign_to_details
        .as_ref()
        .and_then(|staff| staff.full_name.clone())
        .unwrap_or_else(|| "-".to_owned());

    let mut builder = Builder::default();
    for (label, value) in [
        ("Date", text(&lead.date)),
        ("Customer", text(&lead.customer_name)),
        ("Contact", text(&lead.customer_contact)),
        ("Email", text(&lead.customer_email)),
        ("Project", text(&lead.project_name)),
        ("Address", text(&lead.project_address)),
        ("Application", text(&lead.hvac_application)),
        ("Capacity", text(&lead.capacity_required)),
        ("Source", text(&lead.lead_source)),
        ("Status", text(&lead.status)),
        ("Assigned to", assignee),
        ("Next follow-up", text(&lead.followup_date)),
        ("Requirements", text(&lead.requirements_details)),
        ("Remarks", text(&lead.remarks)),
    ] {
        builder.push_record([label.to_owned(), value]);
    }
    let mut details = builder.build();
    details.with(Style::rounded());
    println!("{details}");

    if lead.followups.is_empty() {
        println!("\nNo follow-ups recorded.");
        return;
    }

    let rows: Vec<FollowUpRow> = lead.followups.iter().map(FollowUpRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}");
    println!("{} follow-up(s)", lead.followups.len());
}

#[cfg(test)]
mod tests {
    use hvacdesk_application::{RowKey, RowRender};
    use hvacdesk_domain::RowAction;

    use super::row_cells;

    #[test]
    fn actions_fill_the_trailing_column() {
        let row = RowRender {
            key: RowKey::Id(4),
            cells: vec!["1".to_owned(), "sales".to_owned()],
            actions: vec![RowAction::Edit, RowAction::Delete],
        };

        assert_eq!(row_cells(&row, 3), vec!["1", "sales", "Edit / Delete"]);
        assert_eq!(row_cells(&row, 2), vec!["1", "sales"]);
    }
}

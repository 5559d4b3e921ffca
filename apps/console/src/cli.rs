use clap::{Parser, Subcommand, ValueEnum};
use hvacdesk_core::RecordId;

#[derive(Parser)]
#[command(name = "hvacdesk")]
#[command(about = "HVAC CRM console for leads, customers, staff and roles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the access token
    Login {
        /// Email address or mobile number
        email_or_mobile: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Show the signed-in user's role
    Whoami,

    /// List one page of a collection
    #[command(visible_alias = "ls")]
    List {
        /// Collection to list
        resource: ResourceKind,

        /// Page number, clamped to the available pages
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Filter as key=value; multi-select values are comma separated and
        /// date ranges are written from..to
        #[arg(short, long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },

    /// Show one lead with its follow-up history
    ShowLead {
        /// Lead id
        id: RecordId,
    },

    /// Create a record from field values
    Create {
        /// Collection to add to
        resource: ResourceKind,

        /// Form field as key=value
        #[arg(short, long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Edit a record; unspecified fields keep their current values
    Edit {
        /// Collection holding the record
        resource: ResourceKind,

        /// Record id
        id: RecordId,

        /// Form field as key=value
        #[arg(short, long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Delete a record after confirmation
    Delete {
        /// Collection holding the record
        resource: ResourceKind,

        /// Record id
        id: RecordId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Find an existing customer by phone number
    LookupCustomer {
        /// Phone number to search for
        phone: String,
    },
}

/// CRM collections reachable from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Leads,
    Customers,
    Staff,
    Roles,
    FollowUps,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands, ResourceKind, parse_key_value};

    #[test]
    fn key_value_keeps_everything_after_the_first_equals() {
        assert_eq!(
            parse_key_value("remarks=a=b"),
            Ok(("remarks".to_owned(), "a=b".to_owned()))
        );
        assert_eq!(
            parse_key_value(" city =Pune"),
            Ok(("city".to_owned(), "Pune".to_owned()))
        );
        assert!(parse_key_value("city").is_err());
        assert!(parse_key_value("=Pune").is_err());
    }

    #[test]
    fn list_command_collects_filters() {
        let cli = Cli::try_parse_from([
            "hvacdesk",
            "list",
            "follow-ups",
            "--page",
            "2",
            "--search",
            "ravi",
            "--filter",
            "status=open,in_process",
        ])
        .unwrap_or_else(|_| unreachable!());

        let Commands::List {
            resource,
            page,
            search,
            filters,
        } = cli.command
        else {
            unreachable!()
        };
        assert_eq!(resource, ResourceKind::FollowUps);
        assert_eq!(page, 2);
        assert_eq!(search.as_deref(), Some("ravi"));
        assert_eq!(
            filters,
            vec![("status".to_owned(), "open,in_process".to_owned())]
        );
    }

    #[test]
    fn delete_requires_an_id() {
        assert!(Cli::try_parse_from(["hvacdesk", "delete", "roles"]).is_err());

        let cli = Cli::try_parse_from(["hvacdesk", "delete", "roles", "12", "--yes"])
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            cli.command,
            Commands::Delete {
                resource: ResourceKind::Roles,
                id: 12,
                yes: true
            }
        ));
    }
}

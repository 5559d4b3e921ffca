use std::process::ExitCode;
use std::sync::Arc;

use hvacdesk_application::{
    CollectionGateway, ConfirmationPrompt, LookupOptionsService, PageController, RecordForm,
    RemoteListFetcher, SessionService, find_customer_by_phone,
};
use hvacdesk_core::{AppError, AppResult, RecordId};
use hvacdesk_domain::{
    CustomerResource, FilterKind, FilterSpec, FilterValue, FilterValues, FollowUpResource,
    LeadResource, Resource, RoleResource, StaffResource,
};
use tracing::info;

use crate::cli::{Commands, ResourceKind};
use crate::prompt::{AssumeYes, StdinConfirmationPrompt, read_line};
use crate::render::{print_lead, print_list};

/// Arguments of one `list` invocation.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub page: u32,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
}

/// Runs console commands against the CRM API.
pub struct Console {
    gateway: Arc<dyn CollectionGateway>,
    session: SessionService,
    options: LookupOptionsService,
    page_size: Option<usize>,
}

impl Console {
    pub fn new(
        gateway: Arc<dyn CollectionGateway>,
        session: SessionService,
        page_size: Option<usize>,
    ) -> Self {
        Self {
            options: LookupOptionsService::new(Arc::clone(&gateway)),
            gateway,
            session,
            page_size,
        }
    }

    pub async fn run(&self, command: Commands) -> AppResult<ExitCode> {
        match command {
            Commands::Login {
                email_or_mobile,
                password,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => read_line("Password: ").await?,
                };
                self.session.login(&email_or_mobile, &password).await?;
                println!("Signed in.");
            }
            Commands::Logout => {
                self.session.logout().await?;
                println!("Signed out.");
            }
            Commands::Whoami => {
                self.require_session()?;
                match self.session.current_role().await? {
                    Some(role) => println!("Signed in as {role}."),
                    None => println!("Signed in without a role."),
                }
            }
            Commands::List {
                resource,
                page,
                search,
                filters,
            } => {
                self.require_session()?;
                let request = ListRequest {
                    page,
                    search,
                    filters,
                };
                return self.list(resource, &request).await;
            }
            Commands::ShowLead { id } => {
                self.require_session()?;
                let lead = RemoteListFetcher::<LeadResource>::new(
                    Arc::clone(&self.gateway),
                    self.page_size,
                )
                .fetch_record(id)
                .await?;
                print_lead(&lead);
            }
            Commands::Create { resource, fields } => {
                self.require_session()?;
                self.create(resource, &fields).await?;
            }
            Commands::Edit {
                resource,
                id,
                fields,
            } => {
                self.require_session()?;
                self.edit(resource, id, &fields).await?;
            }
            Commands::Delete { resource, id, yes } => {
                self.require_session()?;
                self.delete(resource, id, yes).await?;
            }
            Commands::LookupCustomer { phone } => {
                self.require_session()?;
                self.lookup_customer(&phone).await?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    fn require_session(&self) -> AppResult<()> {
        if self.session.context().is_authenticated() {
            return Ok(());
        }
        Err(AppError::Unauthorized(
            "not signed in; run `hvacdesk login` first".to_owned(),
        ))
    }

    async fn list(&self, resource: ResourceKind, request: &ListRequest) -> AppResult<ExitCode> {
        match resource {
            ResourceKind::Leads => {
                self.list_page::<LeadResource>(LeadResource::filter_spec()?, request)
                    .await
            }
            ResourceKind::Customers => {
                self.list_page::<CustomerResource>(CustomerResource::filter_spec()?, request)
                    .await
            }
            ResourceKind::Staff => {
                let spec = self.options.staff_filter_spec().await?;
                self.list_page::<StaffResource>(spec, request).await
            }
            ResourceKind::Roles => {
                self.list_page::<RoleResource>(RoleResource::filter_spec()?, request)
                    .await
            }
            ResourceKind::FollowUps => {
                self.list_page::<FollowUpResource>(FollowUpResource::filter_spec()?, request)
                    .await
            }
        }
    }

    /// Fetches and prints one page of `R`.
    pub async fn list_page<R: Resource>(
        &self,
        spec: FilterSpec,
        request: &ListRequest,
    ) -> AppResult<ExitCode> {
        let values = filter_values(&spec, request.search.as_deref(), &request.filters)?;
        let mut controller = PageController::<R>::new(
            Arc::clone(&self.gateway),
            Arc::new(StdinConfirmationPrompt),
            spec,
            self.page_size,
        );

        if !controller.apply_filters(values).await? {
            controller.load().await;
        }
        if request.page > 1 && controller.state().error.is_none() {
            controller.go_to_page(request.page).await;
        }

        print_list(&controller.render());
        if controller.state().error.is_some() {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn create(&self, resource: ResourceKind, fields: &[(String, String)]) -> AppResult<()> {
        match resource {
            ResourceKind::Leads => self.create_lead(fields).await,
            ResourceKind::Customers => self.create_record::<CustomerResource>(fields).await,
            ResourceKind::Staff => self.create_record::<StaffResource>(fields).await,
            ResourceKind::Roles => self.create_record::<RoleResource>(fields).await,
            ResourceKind::FollowUps => self.create_record::<FollowUpResource>(fields).await,
        }
    }

    async fn create_record<R: Resource>(&self, fields: &[(String, String)]) -> AppResult<()> {
        let mut form = RecordForm::<R>::new();
        form.open_create();
        fill_form(&mut form, fields)?;
        self.save(form).await
    }

    /// Creates a lead, linking the customer whose phone matches the contact
    /// number unless a customer id was given.
    pub async fn create_lead(&self, fields: &[(String, String)]) -> AppResult<()> {
        let mut form = RecordForm::<LeadResource>::new();
        form.open_create();
        fill_form(&mut form, fields)?;

        if form.draft().customer.is_none() {
            let contact = form.draft().contact_number.clone();
            match find_customer_by_phone(self.gateway.as_ref(), &contact).await? {
                Some(customer) => {
                    info!(customer = ?customer.id, "linked existing customer");
                    form.draft_mut().customer = customer.id;
                }
                None if !contact.trim().is_empty() => {
                    println!("No customer matches {contact}; saving the lead without one.");
                }
                None => {}
            }
        }

        self.save(form).await
    }

    async fn edit(
        &self,
        resource: ResourceKind,
        id: RecordId,
        fields: &[(String, String)],
    ) -> AppResult<()> {
        match resource {
            ResourceKind::Leads => self.edit_record::<LeadResource>(id, fields).await,
            ResourceKind::Customers => self.edit_record::<CustomerResource>(id, fields).await,
            ResourceKind::Staff => self.edit_record::<StaffResource>(id, fields).await,
            ResourceKind::Roles => self.edit_record::<RoleResource>(id, fields).await,
            ResourceKind::FollowUps => self.edit_record::<FollowUpResource>(id, fields).await,
        }
    }

    /// Loads record `id` into an edit form, applies `fields` and saves it.
    pub async fn edit_record<R: Resource>(
        &self,
        id: RecordId,
        fields: &[(String, String)],
    ) -> AppResult<()> {
        let record = RemoteListFetcher::<R>::new(Arc::clone(&self.gateway), self.page_size)
            .fetch_record(id)
            .await?;
        let mut form = RecordForm::<R>::new();
        form.open_edit(record);
        fill_form(&mut form, fields)?;
        self.save(form).await
    }

    async fn save<R: Resource>(&self, mut form: RecordForm<R>) -> AppResult<()> {
        let title = form.title();
        match form.submit(self.gateway.as_ref()).await? {
            Some(record) => {
                let body = serde_json::to_string_pretty(&record).map_err(|error| {
                    AppError::Internal(format!("failed to format saved record: {error}"))
                })?;
                println!("{title}: saved\n{body}");
            }
            None => println!("{title}: saved"),
        }
        Ok(())
    }

    async fn delete(&self, resource: ResourceKind, id: RecordId, yes: bool) -> AppResult<()> {
        let confirmation: Arc<dyn ConfirmationPrompt> = if yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(StdinConfirmationPrompt)
        };

        match resource {
            ResourceKind::Leads => self.delete_record::<LeadResource>(id, confirmation).await,
            ResourceKind::Customers => {
                self.delete_record::<CustomerResource>(id, confirmation)
                    .await
            }
            ResourceKind::Staff => self.delete_record::<StaffResource>(id, confirmation).await,
            ResourceKind::Roles => self.delete_record::<RoleResource>(id, confirmation).await,
            ResourceKind::FollowUps => {
                self.delete_record::<FollowUpResource>(id, confirmation)
                    .await
            }
        }
    }

    /// Deletes record `id` of `R` after `confirmation` accepts.
    pub async fn delete_record<R: Resource>(
        &self,
        id: RecordId,
        confirmation: Arc<dyn ConfirmationPrompt>,
    ) -> AppResult<()> {
        let mut controller =
            PageController::<R>::for_resource(Arc::clone(&self.gateway), confirmation, self.page_size)?;
        if controller.delete(id).await? {
            println!("Deleted {} {id}.", R::NAME);
        } else {
            println!("Cancelled.");
        }
        Ok(())
    }

    async fn lookup_customer(&self, phone: &str) -> AppResult<()> {
        match find_customer_by_phone(self.gateway.as_ref(), phone).await? {
            Some(customer) => {
                let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_owned());
                println!(
                    "Customer {}: {} ({}, {}, {})",
                    customer.id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
                    text(&customer.name),
                    text(&customer.contact_number),
                    text(&customer.email),
                    text(&customer.city),
                );
            }
            None => println!("No customer found for {}.", phone.trim()),
        }
        Ok(())
    }
}

fn fill_form<R: Resource>(form: &mut RecordForm<R>, fields: &[(String, String)]) -> AppResult<()> {
    for (name, value) in fields {
        form.set_field(name, value)?;
    }
    Ok(())
}

/// Builds committed filter values from `--search` and `--filter` arguments.
fn filter_values(
    spec: &FilterSpec,
    search: Option<&str>,
    pairs: &[(String, String)],
) -> AppResult<FilterValues> {
    let mut values = FilterValues::new();

    if let Some(search) = search {
        let field = spec
            .fields()
            .iter()
            .find(|field| field.kind() == FilterKind::Search)
            .ok_or_else(|| AppError::Validation("this list has no search box".to_owned()))?;
        values.set(field.key(), FilterValue::from(search));
    }

    for (key, raw) in pairs {
        let field = spec.field(key).ok_or_else(|| {
            let known: Vec<&str> = spec.fields().iter().map(|field| field.key()).collect();
            AppError::Validation(format!(
                "unknown filter '{key}'; expected one of: {}",
                known.join(", ")
            ))
        })?;
        values.set(key.clone(), parse_filter_value(field.kind(), raw));
    }

    Ok(values)
}

/// Reads a `--filter` value: `a,b` for multi-select, `from..to` for dates.
fn parse_filter_value(kind: FilterKind, raw: &str) -> FilterValue {
    match kind {
        FilterKind::MultiSelect => FilterValue::Set(
            raw.split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        FilterKind::DateRange => {
            let (from, to) = raw.split_once("..").unwrap_or((raw, ""));
            FilterValue::DateRange {
                from: from.trim().to_owned(),
                to: to.trim().to_owned(),
            }
        }
        FilterKind::Search | FilterKind::SingleSelect | FilterKind::Text => {
            FilterValue::Text(raw.to_owned())
        }
    }
}

#[cfg(test)]
mod tests;

//! CRM records, list descriptors and form rules.

#![forbid(unsafe_code)]

mod column;
mod customer;
mod filter;
mod follow_up;
mod lead;
mod page;
mod resource;
mod role;
mod staff;

pub use column::{CellContext, Column, ColumnKind, RowAction};
pub use customer::{Customer, CustomerDraft, CustomerResource};
pub use filter::{FilterField, FilterKind, FilterOption, FilterSpec, FilterValue, FilterValues};
pub use follow_up::{FaqAnswer, FollowUpDraft, FollowUpResource, LeadFaq, LeadFollowUp};
pub use lead::{Lead, LeadDraft, LeadResource, LeadSource, LeadStatus, StaffSummary};
pub use page::{DEFAULT_PAGE_SIZE, PageResult, total_pages};
pub use resource::{FormDraft, FormMode, Resource, UpdateMethod};
pub use role::{Role, RoleDraft, RoleResource};
pub use staff::{STAFF_PASSWORD_MIN_LENGTH, StaffDraft, StaffMember, StaffResource};

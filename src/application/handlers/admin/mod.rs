//! Admin handlers.
//!
//! Every query and command carries the caller's `Principal` and checks the
//! admin gate before touching storage.
//!
//! ## Queries
//! - Member listing and detail with balances
//! - CSV export
//! - Identity document download
//!
//! ## Commands
//! - Granting initial shares
//! - Accepting a member after compliance review

mod accept_member;
mod export_members_csv;
mod get_document;
mod get_member;
mod grant_initial_shares;
mod list_members;

// Queries
pub use export_members_csv::{ExportMembersCsvHandler, ExportMembersCsvQuery, MembersCsv};
pub use get_document::{GetDocumentHandler, GetDocumentQuery};
pub use get_member::{GetMemberHandler, GetMemberQuery};
pub use list_members::{ListMembersHandler, ListMembersQuery};

// Commands
pub use accept_member::{AcceptMemberCommand, AcceptMemberHandler};
pub use grant_initial_shares::{GrantInitialSharesCommand, GrantInitialSharesHandler};

use crate::domain::account::AccountError;
use crate::domain::foundation::{AccountId, DomainError};

fn id_unknown(account_id: AccountId) -> DomainError {
    AccountError::IdUnknown(account_id).into()
}

//! ExportMembersCsvHandler - Query handler for the member CSV export.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Principal, Timestamp};
use crate::ports::{LedgerReader, MemberBalance};

/// Column names, in output order.
pub const CSV_HEADER: [&str; 14] = [
    "id",
    "confirmed",
    "accepted",
    "email",
    "phone_number",
    "first_name",
    "last_name",
    "address",
    "postal_code",
    "city",
    "country",
    "category",
    "reason",
    "shares",
];

#[derive(Debug, Clone)]
pub struct ExportMembersCsvQuery {
    pub principal: Principal,
}

/// A rendered export and the file name to serve it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersCsv {
    pub filename: String,
    pub content: String,
}

/// Exports every member, ordered by email, with the same balances as the
/// admin listing.
pub struct ExportMembersCsvHandler {
    ledger: Arc<dyn LedgerReader>,
}

impl ExportMembersCsvHandler {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: ExportMembersCsvQuery) -> Result<MembersCsv, DomainError> {
        query.principal.require_admin()?;
        let members = self.ledger.members().await?;

        Ok(MembersCsv {
            filename: format!("{}.csv", Timestamp::now().to_file_stamp()),
            content: render_csv(&members),
        })
    }
}

fn render_csv(members: &[MemberBalance]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));
    for member in members {
        push_record(&mut out, member_record(member).into_iter());
    }
    out
}

fn member_record(member: &MemberBalance) -> [String; 14] {
    let account = &member.account;
    let profile = &account.profile;
    [
        account.id.to_string(),
        account.is_confirmed().to_string(),
        account.accepted.to_string(),
        account.email.clone(),
        profile.phone_number.clone(),
        profile.first_name.clone(),
        profile.last_name.clone(),
        profile.address.clone(),
        profile.postal_code.clone(),
        profile.city.clone(),
        profile.country.clone(),
        profile.category.as_str().to_string(),
        profile.reason.clone().unwrap_or_default(),
        member.balance.total().to_string(),
    ]
}

fn push_record(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote_field(&field));
    }
    out.push('\n');
}

/// RFC 4180 quoting: fields holding a comma, quote or line break are
/// wrapped in quotes with inner quotes doubled.
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

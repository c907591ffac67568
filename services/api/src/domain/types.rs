use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// The `users` row consulted when authenticating a bearer token.
///
/// `role` and `status` are kept as stored; the authentication use case
/// decides what is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub status: String,
    pub company_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
}

/// Single equality predicate applied to a list, e.g. `status = 'new'`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
    pub column: &'static str,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_leads: u64,
    pub total_contacts: u64,
    pub total_deals: u64,
    pub total_invoices: u64,
}

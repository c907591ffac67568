//! Per-entity descriptors driving the generic tenant-scoped CRUD.
//!
//! Every business table is served by the same repository/handler pair; what
//! differs between them (table name, tenant column, delete policy, which
//! columns may be filtered, who may write) lives here.

use crate::user::UserRole;

/// Value written into the flag column on soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Text(&'static str),
}

/// How `DELETE /{entity}/{id}` removes a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Row is removed.
    Hard,
    /// Row stays; `column` is set to `value`.
    Soft {
        column: &'static str,
        value: FlagValue,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Route segment, e.g. `purchase-orders`.
    pub name: &'static str,
    pub table: &'static str,
    /// Singular human label used in confirmation messages.
    pub label: &'static str,
    pub tenant_column: &'static str,
    pub order_column: &'static str,
    pub delete_policy: DeletePolicy,
    /// Columns accepted as the single equality filter on list, in priority order.
    pub filter_columns: &'static [&'static str],
    /// Column stamped with the caller's user id on create.
    pub owner_column: Option<&'static str>,
    /// Stamp the caller's branch id on create when the payload has none.
    pub branch_scoped: bool,
    /// Minimum role for create/update/delete. `None` means any authenticated caller.
    pub write_role: Option<UserRole>,
}

impl EntityDescriptor {
    const fn new(name: &'static str, table: &'static str, label: &'static str) -> Self {
        Self {
            name,
            table,
            label,
            tenant_column: "company_id",
            order_column: "created_at",
            delete_policy: DeletePolicy::Hard,
            filter_columns: &[],
            owner_column: None,
            branch_scoped: false,
            write_role: None,
        }
    }

    const fn filters(mut self, columns: &'static [&'static str]) -> Self {
        self.filter_columns = columns;
        self
    }

    const fn owned_by(mut self, column: &'static str) -> Self {
        self.owner_column = Some(column);
        self
    }

    const fn branch_scoped(mut self) -> Self {
        self.branch_scoped = true;
        self
    }

    const fn soft_delete(mut self, column: &'static str, value: FlagValue) -> Self {
        self.delete_policy = DeletePolicy::Soft { column, value };
        self
    }

    const fn writable_by(mut self, role: UserRole) -> Self {
        self.write_role = Some(role);
        self
    }

    /// Fixed confirmation returned by delete.
    pub fn delete_message(&self) -> String {
        format!("{} deleted successfully", self.label)
    }

    /// Whether `role` may create, update or delete rows of this entity.
    pub fn can_write(&self, role: UserRole) -> bool {
        self.write_role.is_none_or(|min| role >= min)
    }
}

pub const LEADS: EntityDescriptor = EntityDescriptor::new("leads", "leads", "Lead")
    .filters(&["status", "source"])
    .owned_by("created_by")
    .branch_scoped();

pub const CONTACTS: EntityDescriptor = EntityDescriptor::new("contacts", "contacts", "Contact")
    .filters(&["account_id", "status"])
    .branch_scoped();

pub const DEALS: EntityDescriptor = EntityDescriptor::new("deals", "deals", "Deal")
    .filters(&["stage", "status"])
    .owned_by("created_by")
    .branch_scoped();

pub const INVOICES: EntityDescriptor =
    EntityDescriptor::new("invoices", "invoices", "Invoice").filters(&["status"]);

pub const CAMPAIGNS: EntityDescriptor =
    EntityDescriptor::new("campaigns", "campaigns", "Campaign").filters(&["status", "channel"]);

pub const USERS: EntityDescriptor = EntityDescriptor::new("users", "users", "User")
    .filters(&["role", "status"])
    .soft_delete("status", FlagValue::Text("inactive"))
    .branch_scoped()
    .writable_by(UserRole::Admin);

pub const PAYMENTS: EntityDescriptor =
    EntityDescriptor::new("payments", "payments", "Payment").filters(&["status"]);

pub const WORKFLOWS: EntityDescriptor = EntityDescriptor::new("workflows", "workflows", "Workflow")
    .filters(&["is_active", "trigger_type"])
    .owned_by("created_by");

pub static ENTITIES: &[EntityDescriptor] = &[
    EntityDescriptor::new("accounts", "accounts", "Account")
        .filters(&["status", "industry"])
        .owned_by("created_by"),
    LEADS,
    CONTACTS,
    DEALS,
    INVOICES,
    CAMPAIGNS,
    EntityDescriptor::new("branches", "branches", "Branch")
        .filters(&["is_active"])
        .soft_delete("is_active", FlagValue::Bool(false))
        .writable_by(UserRole::Admin),
    USERS,
    EntityDescriptor::new("products", "products", "Product").filters(&["category", "status"]),
    EntityDescriptor::new("quotes", "quotes", "Quote")
        .filters(&["status"])
        .owned_by("created_by"),
    EntityDescriptor::new("orders", "orders", "Order")
        .filters(&["status"])
        .owned_by("created_by"),
    EntityDescriptor::new("tasks", "tasks", "Task")
        .filters(&["status", "priority"])
        .owned_by("created_by"),
    EntityDescriptor::new("activities", "activities", "Activity")
        .filters(&["type"])
        .owned_by("created_by"),
    EntityDescriptor::new("notes", "notes", "Note").owned_by("created_by"),
    EntityDescriptor::new("tickets", "tickets", "Ticket")
        .filters(&["status", "priority"])
        .owned_by("created_by"),
    EntityDescriptor::new("expenses", "expenses", "Expense")
        .filters(&["status", "category"])
        .owned_by("created_by")
        .branch_scoped(),
    PAYMENTS,
    EntityDescriptor::new("vendors", "vendors", "Vendor").filters(&["status"]),
    EntityDescriptor::new("purchase-orders", "purchase_orders", "Purchase order")
        .filters(&["status", "vendor_id"]),
    EntityDescriptor::new("inventory", "inventory_items", "Inventory item")
        .filters(&["category"])
        .branch_scoped(),
    EntityDescriptor::new("employees", "employees", "Employee")
        .filters(&["department", "status"])
        .branch_scoped(),
    EntityDescriptor::new("projects", "projects", "Project").filters(&["status"]),
    WORKFLOWS,
    EntityDescriptor::new("email-templates", "email_templates", "Email template")
        .filters(&["category"]),
    EntityDescriptor::new("documents", "documents", "Document").filters(&["category"]),
];

/// Look up a descriptor by its route segment.
pub fn find(name: &str) -> Option<&'static EntityDescriptor> {
    ENTITIES.iter().find(|e| e.name == name)
}

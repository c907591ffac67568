use crm_domain::entity::{CONTACTS, DEALS, INVOICES, LEADS};
use crm_domain::tenant::TenantScope;

use crate::domain::repository::RecordRepository;
use crate::domain::types::DashboardStats;
use crate::error::ApiError;

/// Headline counts for the dashboard. The four counts run concurrently and
/// the first failure fails the whole call.
pub struct DashboardStatsUseCase<R: RecordRepository> {
    pub repo: R,
}

impl<R: RecordRepository> DashboardStatsUseCase<R> {
    pub async fn execute(&self, scope: TenantScope) -> Result<DashboardStats, ApiError> {
        let (total_leads, total_contacts, total_deals, total_invoices) = tokio::try_join!(
            self.repo.count(&LEADS, scope),
            self.repo.count(&CONTACTS, scope),
            self.repo.count(&DEALS, scope),
            self.repo.count(&INVOICES, scope),
        )?;
        Ok(DashboardStats {
            total_leads,
            total_contacts,
            total_deals,
            total_invoices,
        })
    }
}

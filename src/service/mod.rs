
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::{
    license::{self, CpfCnpj, License, LicenseStatus},
    store::{LicenseStore, StoreError},
};

/// Plan label used when the operator does not pass one.
pub const DEFAULT_PLAN: &str = "profissional";

/// Errors from license operations.
#[derive(Debug, Error)]
pub enum LicenseServiceError {
    /// A record is already registered for the identifier. The policy
    /// is one record per identifier; the operator renews or cancels
    /// the existing one instead of activating a second.
    #[error("a license is already registered for {0}")]
    AlreadyRegistered(CpfCnpj),
    /// No record matches the identifier.
    #[error("no license found for {0}")]
    NotFound(CpfCnpj),
    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for license operations.
pub type ServiceResult<T> = Result<T, LicenseServiceError>;

/// Outcome of a renewal, distinguishing a plain extension from a
/// reactivation that restarted the period from today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewalOutcome {
    /// The record after the renewal.
    pub license: License,
    /// The date the added months were counted from.
    pub base_date: NaiveDate,
    /// True when the record was cancelled, expired, or key-less and
    /// the period restarted today with a fresh key.
    pub reactivated: bool,
}

/// License operations on top of the versioned store.
///
/// Each mutating operation performs a full read-modify-write round
/// trip; a concurrent edit of the remote document surfaces as
/// [`StoreError::Conflict`] and is never retried here.
#[automock]
#[async_trait]
pub trait LicenseService: Send + Sync {
    /// Issues a new license for `cpf_cnpj`, valid for `months` calendar
    /// months from today.
    async fn activate(
        &self,
        cpf_cnpj: &CpfCnpj,
        months: u32,
        plan: Option<String>,
    ) -> ServiceResult<License>;

    /// Extends the license by `months`, counted from the later of
    /// today and the current expiry.
    async fn renew(&self, cpf_cnpj: &CpfCnpj, months: u32) -> ServiceResult<RenewalOutcome>;

    /// Flips the license status to cancelled. Dates and key are left
    /// untouched.
    async fn cancel(&self, cpf_cnpj: &CpfCnpj) -> ServiceResult<License>;

    /// Looks up the license, read-only.
    async fn status(&self, cpf_cnpj: &CpfCnpj) -> ServiceResult<License>;

    /// Returns all records, read-only.
    async fn list(&self) -> ServiceResult<Vec<License>>;
}

/// Default implementation over a [`LicenseStore`].
pub struct DefaultLicenseService {
    store: Arc<dyn LicenseStore>,
}

impl DefaultLicenseService {
    /// Creates a new `DefaultLicenseService`.
    pub fn new(store: Arc<dyn LicenseStore>) -> Self {
        Self { store }
    }

    /// Generates a key that does not collide with any record in
    /// `existing`. Collisions are vanishingly rare with this keyspace,
    /// so the loop almost always runs once.
    fn fresh_key(existing: &[License]) -> String {
        loop {
            let key = license::generate_key();
            if !existing.iter().any(|l| l.key == key) {
                return key;
            }
        }
    }
}

#[async_trait]
impl LicenseService for DefaultLicenseService {
    async fn activate(
        &self,
        cpf_cnpj: &CpfCnpj,
        months: u32,
        plan: Option<String>,
    ) -> ServiceResult<License> {
        let today = Utc::now().date_naive();
        let (mut licenses, revision) = self.store.load().await?;

        if licenses.iter().any(|l| l.cpf_cnpj == *cpf_cnpj) {
            return Err(LicenseServiceError::AlreadyRegistered(cpf_cnpj.clone()));
        }

        let record = License {
            key: Self::fresh_key(&licenses),
            cpf_cnpj: cpf_cnpj.clone(),
            status: LicenseStatus::Active,
            expires_at: license::add_months(today, months),
            created_at: today,
            plan: plan.unwrap_or_else(|| DEFAULT_PLAN.to_string()),
        };
        licenses.push(record.clone());

        self.store.save(licenses, revision, &format!("Ativar licença {cpf_cnpj}")).await?;
        info!("Activated license for {cpf_cnpj}, expires {}", record.expires_at);
        Ok(record)
    }

    async fn renew(&self, cpf_cnpj: &CpfCnpj, months: u32) -> ServiceResult<RenewalOutcome> {
        let today = Utc::now().date_naive();
        let (mut licenses, revision) = self.store.load().await?;

        let idx = licenses
            .iter()
            .position(|l| l.cpf_cnpj == *cpf_cnpj)
            .ok_or_else(|| LicenseServiceError::NotFound(cpf_cnpj.clone()))?;

        // A cancelled, expired, or key-less record starts over from
        // today with a fresh key; an active one keeps its remaining
        // days and extends from the current expiry.
        let reactivated = {
            let record = &licenses[idx];
            record.status == LicenseStatus::Cancelled
                || record.key.is_empty()
                || record.is_expired(today)
        };
        let base_date = if reactivated { today } else { licenses[idx].expires_at };
        let new_key = reactivated.then(|| Self::fresh_key(&licenses));

        let record = &mut licenses[idx];
        record.expires_at = license::add_months(base_date, months);
        record.status = LicenseStatus::Active;
        if let Some(key) = new_key {
            record.key = key;
        }
        let updated = record.clone();

        self.store.save(licenses, revision, &format!("Renovar licença {cpf_cnpj}")).await?;
        info!(
            "Renewed license for {cpf_cnpj} from {base_date}, expires {} (reactivated: {reactivated})",
            updated.expires_at
        );
        Ok(RenewalOutcome { license: updated, base_date, reactivated })
    }

    async fn cancel(&self, cpf_cnpj: &CpfCnpj) -> ServiceResult<License> {
        let (mut licenses, revision) = self.store.load().await?;

        let idx = licenses
            .iter()
            .position(|l| l.cpf_cnpj == *cpf_cnpj)
            .ok_or_else(|| LicenseServiceError::NotFound(cpf_cnpj.clone()))?;

        licenses[idx].status = LicenseStatus::Cancelled;
        let updated = licenses[idx].clone();

        self.store.save(licenses, revision, &format!("Cancelar licença {cpf_cnpj}")).await?;
        info!("Cancelled license for {cpf_cnpj}");
        Ok(updated)
    }

    async fn status(&self, cpf_cnpj: &CpfCnpj) -> ServiceResult<License> {
        let (licenses, _) = self.store.load().await?;
        licenses
            .into_iter()
            .find(|l| l.cpf_cnpj == *cpf_cnpj)
            .ok_or_else(|| LicenseServiceError::NotFound(cpf_cnpj.clone()))
    }

    async fn list(&self) -> ServiceResult<Vec<License>> {
        let (licenses, _) = self.store.load().await?;
        Ok(licenses)
    }
}

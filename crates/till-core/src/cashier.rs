//! # Cashiers
//!
//! Cashier profiles. Every receipt names the cashier who rang it up, so a
//! cashier can be deactivated but never removed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::validation::{normalize_phone, validate_name, validate_uuid};

/// What a cashier is allowed to do in the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CashierRole {
    #[default]
    Cashier,
    Supervisor,
}

/// A cashier profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cashier {
    /// UUID v4.
    pub id: String,
    pub name: String,
    /// Digits only.
    pub phone: Option<String>,
    pub role: CashierRole,
    pub active: bool,
}

impl Cashier {
    /// The identity frozen onto receipts.
    pub fn to_ref(&self) -> CashierRef {
        CashierRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Cashier identity as recorded on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashierRef {
    pub id: String,
    pub name: String,
}

/// All cashier profiles of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashierRegistry {
    cashiers: Vec<Cashier>,
}

impl CashierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new active cashier and returns it.
    pub fn register(
        &mut self,
        name: &str,
        phone: Option<&str>,
        role: CashierRole,
    ) -> CoreResult<&Cashier> {
        validate_name("name", name)?;
        let phone = phone.map(normalize_phone).transpose()?;

        self.cashiers.push(Cashier {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            phone,
            role,
            active: true,
        });

        self.cashiers
            .last()
            .ok_or_else(|| CoreError::CashierNotFound(name.to_string()))
    }

    /// Updates name and phone of an existing cashier.
    pub fn update_profile(&mut self, id: &str, name: &str, phone: Option<&str>) -> CoreResult<&Cashier> {
        validate_name("name", name)?;
        let phone = phone.map(normalize_phone).transpose()?;

        let cashier = self.get_mut(id)?;
        cashier.name = name.trim().to_string();
        cashier.phone = phone;
        Ok(&*cashier)
    }

    /// Looks up a cashier by id. Ids are UUIDs; anything else is rejected
    /// before the lookup.
    pub fn get(&self, id: &str) -> CoreResult<&Cashier> {
        validate_uuid(id)?;
        self.cashiers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CashierNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> CoreResult<&mut Cashier> {
        validate_uuid(id)?;
        self.cashiers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CashierNotFound(id.to_string()))
    }

    /// Looks up an active cashier and returns the identity for a receipt.
    pub fn require_active(&self, id: &str) -> CoreResult<CashierRef> {
        let cashier = self.get(id)?;
        if !cashier.active {
            return Err(CoreError::CashierInactive(cashier.name.clone()));
        }
        Ok(cashier.to_ref())
    }

    /// Finds an active cashier by name, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Cashier> {
        let name = name.trim().to_lowercase();
        self.cashiers
            .iter()
            .find(|c| c.active && c.name.to_lowercase() == name)
    }

    /// Deactivates a cashier. Their past receipts are unaffected.
    pub fn deactivate(&mut self, id: &str) -> CoreResult<()> {
        self.get_mut(id)?.active = false;
        Ok(())
    }

    /// Active cashiers in registration order.
    pub fn active(&self) -> impl Iterator<Item = &Cashier> {
        self.cashiers.iter().filter(|c| c.active)
    }

    /// Every cashier, active or not.
    pub fn all(&self) -> &[Cashier] {
        &self.cashiers
    }
}

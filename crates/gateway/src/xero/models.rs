// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream accounting records and the projections served to clients.

use serde::{Deserialize, Serialize};

// -- Upstream shapes ----------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ContactsEnvelope {
    #[serde(rename = "Contacts", default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsEnvelope {
    #[serde(rename = "Accounts", default)]
    pub accounts: Vec<Account>,
}

/// A Xero contact (only the fields the gateway projects).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    #[serde(rename = "ContactID")]
    pub contact_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_status: Option<String>,
    #[serde(default)]
    pub is_supplier: bool,
    #[serde(default)]
    pub balances: Option<ContactBalances>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactBalances {
    #[serde(default)]
    pub accounts_payable: Option<UpstreamBalance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamBalance {
    #[serde(default)]
    pub outstanding: f64,
    #[serde(default)]
    pub overdue: f64,
}

/// A Xero chart-of-accounts entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    #[serde(rename = "AccountID")]
    pub account_id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub account_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// -- Projections --------------------------------------------------------------

/// Supplier view of a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub is_supplier: bool,
    pub balances: VendorBalances,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorBalances {
    pub accounts_payable: PayableBalance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableBalance {
    pub outstanding: f64,
    pub over_due: f64,
}

impl From<Contact> for VendorRecord {
    fn from(c: Contact) -> Self {
        let payable = c.balances.and_then(|b| b.accounts_payable).unwrap_or_default();
        Self {
            id: c.contact_id,
            name: c.name,
            status: c.contact_status,
            is_supplier: c.is_supplier,
            balances: VendorBalances {
                accounts_payable: PayableBalance {
                    outstanding: payable.outstanding,
                    over_due: payable.overdue,
                },
            },
        }
    }
}

/// Expense-account view of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub code: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl From<Account> for AccountRecord {
    fn from(a: Account) -> Self {
        Self {
            id: a.account_id,
            code: a.code,
            name: a.name,
            account_type: a.account_type,
            status: a.status,
            description: a.description,
        }
    }
}

/// Project contacts to vendors, keeping suppliers only, in upstream order.
pub fn suppliers(contacts: Vec<Contact>) -> Vec<VendorRecord> {
    contacts.into_iter().map(VendorRecord::from).filter(|v| v.is_supplier).collect()
}

/// Project accounts, keeping `EXPENSE` accounts only, in upstream order.
pub fn expense_accounts(accounts: Vec<Account>) -> Vec<AccountRecord> {
    accounts.into_iter().map(AccountRecord::from).filter(|a| a.account_type == "EXPENSE").collect()
}

// -- Snapshots ----------------------------------------------------------------

/// Last-fetched vendors, as written to blob storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSnapshot {
    pub last_updated: String,
    pub vendors: Vec<VendorRecord>,
}

/// Last-fetched expense accounts, as written to blob storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub last_updated: String,
    pub accounts: Vec<AccountRecord>,
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

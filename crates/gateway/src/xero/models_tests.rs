// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn contacts_fixture() -> anyhow::Result<Vec<Contact>> {
    let envelope: ContactsEnvelope = serde_json::from_value(serde_json::json!({
        "Contacts": [
            {
                "ContactID": "c-1",
                "Name": "Paper Co",
                "ContactStatus": "ACTIVE",
                "IsSupplier": true,
                "IsCustomer": false,
                "Balances": { "AccountsPayable": { "Outstanding": 120.5, "Overdue": 20.0 } }
            },
            { "ContactID": "c-2", "Name": "Big Customer", "ContactStatus": "ACTIVE", "IsSupplier": false },
            { "ContactID": "c-3", "Name": "Ink Ltd", "ContactStatus": "ARCHIVED", "IsSupplier": true }
        ]
    }))?;
    Ok(envelope.contacts)
}

#[test]
fn suppliers_filters_and_keeps_order() -> anyhow::Result<()> {
    let vendors = suppliers(contacts_fixture()?);
    let ids: Vec<&str> = vendors.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["c-1", "c-3"]);
    assert_eq!(vendors[0].balances.accounts_payable.outstanding, 120.5);
    assert_eq!(vendors[0].balances.accounts_payable.over_due, 20.0);
    Ok(())
}

#[test]
fn missing_payables_default_to_zero() -> anyhow::Result<()> {
    let vendors = suppliers(contacts_fixture()?);
    assert_eq!(vendors[1].balances, VendorBalances::default());
    assert_eq!(vendors[1].status.as_deref(), Some("ARCHIVED"));

    // Balances present but without AccountsPayable.
    let contact: Contact = serde_json::from_value(serde_json::json!({
        "ContactID": "c-4", "Name": "X", "IsSupplier": true,
        "Balances": { "AccountsReceivable": { "Outstanding": 5.0, "Overdue": 1.0 } }
    }))?;
    assert_eq!(VendorRecord::from(contact).balances.accounts_payable.outstanding, 0.0);
    Ok(())
}

#[test]
fn vendor_serializes_camel_case() -> anyhow::Result<()> {
    let vendors = suppliers(contacts_fixture()?);
    let value = serde_json::to_value(&vendors[0])?;
    assert_eq!(
        value,
        serde_json::json!({
            "id": "c-1",
            "name": "Paper Co",
            "status": "ACTIVE",
            "isSupplier": true,
            "balances": { "accountsPayable": { "outstanding": 120.5, "overDue": 20.0 } }
        })
    );
    Ok(())
}

#[test]
fn expense_accounts_filters_on_type() -> anyhow::Result<()> {
    let envelope: AccountsEnvelope = serde_json::from_value(serde_json::json!({
        "Accounts": [
            { "AccountID": "a-1", "Code": "400", "Name": "Advertising", "Type": "EXPENSE", "Status": "ACTIVE", "Description": "Ads" },
            { "AccountID": "a-2", "Code": "200", "Name": "Sales", "Type": "REVENUE", "Status": "ACTIVE" },
            { "AccountID": "a-3", "Name": "Travel", "Type": "EXPENSE", "Status": "ARCHIVED" }
        ]
    }))?;
    let accounts = expense_accounts(envelope.accounts);
    let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["a-1", "a-3"]);

    let value = serde_json::to_value(&accounts[1])?;
    assert_eq!(
        value,
        serde_json::json!({
            "id": "a-3", "code": null, "name": "Travel", "type": "EXPENSE",
            "status": "ARCHIVED", "description": null
        })
    );
    Ok(())
}

#[test]
fn empty_envelopes_parse() -> anyhow::Result<()> {
    let contacts: ContactsEnvelope = serde_json::from_str("{}")?;
    let accounts: AccountsEnvelope = serde_json::from_str(r#"{"Accounts":[]}"#)?;
    assert!(suppliers(contacts.contacts).is_empty());
    assert!(expense_accounts(accounts.accounts).is_empty());
    Ok(())
}

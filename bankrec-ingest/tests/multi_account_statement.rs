//! Drive a combined three-account statement through the full pipeline:
//! segmentation, boundary-page split, wrapped and concatenated rows,
//! service-fee supplement, and reconciliation of every account.

use bankrec_core::config::{AccountRule, ExtractConfig};
use bankrec_core::statement::{Statement, StatementPeriod};
use bankrec_core::transaction::Category;
use bankrec_ingest::extract_statement;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

const COVER_PAGE: &str = "\
JPMorgan Chase Bank, N.A.\n\
P O Box 182051, Columbus, OH 43218-2051\n\
January 08, 2025 through February 07, 2025\n";

const PAGE_2084: &str = "\
Chase Premier Plus Checking\n\
CHECKING SUMMARY\n\
Account ending in ...2084\n\
Beginning Balance $2,871.09\n\
Ending Balance $1,099.24\n\
TRANSACTION DETAIL\n\
DATE DESCRIPTION AMOUNT BALANCE\n\
01/13 Venmo Payment 1039580470057 Web ID: 3264681992 -101.29 2,769.80\n\
01/27 Card Purchase 01/24 Amazon Mktpl*Zg4WI9R Amzn.Com/Bill WA Card 0885 -46.33 2,723.47\n\
01/29 Online Transfer To Chk ...8619 Transaction#: 23540544174 -150.00 2,573.47\n\
01/30 Online Payment 23214609657 To Discover Card -250.00 2,323.47\n\
02/06 Online Payment 23297114961 To Mr. Cooper -1,500.00 823.47\n\
02/07 Environmental AL Rf Pmt PPD ID: 1942751173 275.72 1,099.19 02/07 Interest Payment 0.05 1,099.24\n";

const PAGE_1873_OPEN: &str = "\
Chase Premier Plus Checking\n\
CHECKING SUMMARY\n\
Account ending in ...1873\n\
Beginning Balance $16,087.31\n\
Ending Balance $11,416.57\n\
TRANSACTION DETAIL\n\
DATE DESCRIPTION AMOUNT BALANCE\n\
01/10 Card Purchase 01/09 Eyelab Factory Outlet San Ramon CA Card 0665 -35.00 16,052.31\n\
01/14 State Farm Ro 27 Cpc-Client 02 S 1067268602 CCD ID: 9000313004 -33.66 16,018.65\n\
01/16 Venmo Payment 1039635550955 Web ID: 3264681992 -2,500.00 13,518.65\n\
01/22 Check # 998 -280.00 13,238.65\n";

// Boundary page: closes 1873, opens 8619
const PAGE_BOUNDARY: &str = "\
TRANSACTION DETAIL (continued)\n\
DATE DESCRIPTION AMOUNT BALANCE\n\
01/28 Verizon Wireless Payments PPD ID: 4223344794 -126.64 13,112.01\n\
02/06 Online Transfer To Chk ...8619\n\
Transaction#: 23637622827 -1,695.53 11,416.48\n\
02/07 Interest Payment 0.09 11,416.57\n\
CHASE TOTAL CHECKING\n\
CHECKING SUMMARY\n\
Account ending in ...8619\n\
Beginning Balance $229.42\n\
Ending Balance $77.59\n\
TRANSACTION DETAIL\n\
DATE DESCRIPTION AMOUNT\n\
01/14 State Farm Ro 27 Sfpp CCD ID: 9000313004 -106.83\n\
01/29 Online Transfer From Chk ...2084 Transaction#: 23540544174 150.00\n\
02/06 Online Transfer From Chk ...1873 Transaction#: 23637622827 1,695.53\n\
02/06 Online Payment 23637563107 To Rushmore Servicing -1,878.53\n\
Monthly Service Fee $12.00\n";

fn statement() -> Statement {
    let period = StatementPeriod::new(
        NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
    );
    let text = [COVER_PAGE, PAGE_2084, PAGE_1873_OPEN, PAGE_BOUNDARY].join("\x0c");
    Statement::from_text("Chase", period, &text)
}

fn config() -> ExtractConfig {
    ExtractConfig {
        institution: "Chase".to_string(),
        accounts: vec![
            AccountRule {
                id: "2084".to_string(),
                full_number: Some("000000837532084".to_string()),
                card_suffixes: vec!["0885".to_string()],
                known_beginning_balances: vec![],
            },
            AccountRule {
                id: "1873".to_string(),
                full_number: Some("000000526021873".to_string()),
                card_suffixes: vec!["0665".to_string()],
                known_beginning_balances: vec![],
            },
            AccountRule {
                id: "8619".to_string(),
                full_number: None,
                card_suffixes: vec![],
                known_beginning_balances: vec![],
            },
        ],
        payee_rules: vec![],
    }
}

#[test]
fn test_three_accounts_all_reconcile() {
    let extraction = extract_statement(&statement(), &config()).unwrap();

    let ids: Vec<&str> = extraction
        .accounts
        .iter()
        .map(|a| a.section.account.as_str())
        .collect();
    assert_eq!(ids, vec!["2084", "1873", "8619"]);

    for account in &extraction.accounts {
        assert!(
            account.recon.reconciles,
            "account {} discrepancy {}",
            account.section.account, account.recon.discrepancy
        );
        assert_eq!(account.recon.discrepancy, dec!(0.00));
    }
    assert!(extraction.all_reconcile());
    assert_eq!(extraction.dropped_count(), 0);
    assert_eq!(extraction.unresolved().count(), 0);
}

#[test]
fn test_page_ownership_partitions_except_boundary() {
    let extraction = extract_statement(&statement(), &config()).unwrap();

    assert_eq!(extraction.unassigned_pages, vec![0]);
    assert_eq!(extraction.accounts[0].section.page_indices(), vec![1]);
    assert_eq!(extraction.accounts[1].section.page_indices(), vec![2, 3]);
    // the boundary page is shared between the closing and opening accounts
    assert_eq!(extraction.accounts[2].section.page_indices(), vec![3]);
}

#[test]
fn test_transaction_counts_and_shapes() {
    let extraction = extract_statement(&statement(), &config()).unwrap();

    let first = &extraction.accounts[0];
    assert_eq!(first.transactions.len(), 7);
    // the concatenated row split into an ACH credit and an interest payment
    let interest = first
        .transactions
        .iter()
        .find(|t| t.category == Category::Interest)
        .unwrap();
    assert_eq!(interest.amount, dec!(0.05));
    assert_eq!(interest.date, NaiveDate::from_ymd_opt(2025, 2, 7).unwrap());
    let credit = first
        .transactions
        .iter()
        .find(|t| t.category == Category::Credit)
        .unwrap();
    assert_eq!(credit.amount, dec!(275.72));
    assert_eq!(credit.description, "Environmental AL Rf Pmt");

    let second = &extraction.accounts[1];
    assert_eq!(second.transactions.len(), 7);
    // the wrapped transfer picked its amount off the continuation line
    let transfer = second
        .transactions
        .iter()
        .find(|t| t.category == Category::Transfer)
        .unwrap();
    assert_eq!(transfer.amount, dec!(-1695.53));
    assert_eq!(transfer.description, "Online Transfer To Chk ...8619");
    assert!(second
        .transactions
        .iter()
        .any(|t| t.category == Category::Check && t.amount == dec!(-280.00)));

    let third = &extraction.accounts[2];
    assert_eq!(third.transactions.len(), 5);
    let fee = third
        .transactions
        .iter()
        .find(|t| t.category == Category::Fee)
        .unwrap();
    assert_eq!(fee.amount, dec!(-12.00));
    assert_eq!(fee.description, "Monthly Service Fee");
    // dated at the section's last activity
    assert_eq!(fee.date, NaiveDate::from_ymd_opt(2025, 2, 6).unwrap());
}

#[test]
fn test_category_breakdown_matches_statement() {
    let extraction = extract_statement(&statement(), &config()).unwrap();
    let recon = &extraction.accounts[0].recon;

    assert_eq!(recon.by_category[&Category::Withdrawal], dec!(-101.29));
    assert_eq!(recon.by_category[&Category::Debit], dec!(-46.33));
    assert_eq!(recon.by_category[&Category::Transfer], dec!(-150.00));
    assert_eq!(recon.by_category[&Category::Payment], dec!(-1750.00));
    assert_eq!(recon.by_category[&Category::Credit], dec!(275.72));
    assert_eq!(recon.by_category[&Category::Interest], dec!(0.05));
    assert_eq!(recon.total_credits, dec!(275.77));
    assert_eq!(recon.total_debits, dec!(-2047.62));
    assert_eq!(recon.computed_ending, dec!(1099.24));
}

#[test]
fn test_pipeline_is_idempotent() {
    let stmt = statement();
    let cfg = config();
    let first = extract_statement(&stmt, &cfg).unwrap();
    let second = extract_statement(&stmt, &cfg).unwrap();

    assert_eq!(first.accounts.len(), second.accounts.len());
    for (a, b) in first.accounts.iter().zip(second.accounts.iter()) {
        assert_eq!(a.transactions, b.transactions);
        assert_eq!(a.recon, b.recon);
    }
}

#[test]
fn test_unparsable_fragment_and_unknown_card_are_surfaced() {
    let page = "\
CHECKING SUMMARY\n\
Account ending in ...2084\n\
Beginning Balance $500.00\n\
Ending Balance $395.00\n\
TRANSACTION DETAIL\n\
DATE DESCRIPTION AMOUNT\n\
01/12 Utility Autopay Scheduled Confirmation\n\
01/15 Card Purchase Corner Store Card 9999 -60.00\n\
01/20 ATM Cash Withdrawal -40.00\n";
    let period = StatementPeriod::new(
        NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
    );
    let stmt = Statement::from_text("Chase", period, page);

    let extraction = extract_statement(&stmt, &config()).unwrap();
    let account = &extraction.accounts[0];

    // the date-led line with no amount was dropped, not guessed at
    assert_eq!(account.dropped.len(), 1);
    assert!(account.dropped[0].text.contains("Utility Autopay"));

    // the unknown card suffix is flagged for manual review but retained
    let flagged: Vec<_> = extraction.unresolved().collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].card_hint.as_deref(), Some("9999"));

    // reconciliation reports the five dollars the dropped row represents
    assert!(!account.recon.reconciles);
    assert_eq!(account.recon.discrepancy, dec!(-5.00));
    assert_eq!(account.recon.by_category[&Category::Debit], dec!(-60.00));
    assert_eq!(account.recon.by_category[&Category::Withdrawal], dec!(-40.00));
}

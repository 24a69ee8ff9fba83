//! Field normalization: raw bank-specific rows into canonical transactions.
//!
//! Every bank encodes dates and debit/credit direction differently. The rules
//! here are applied explicitly per (bank, statement type) so that after
//! normalization a negative amount always means money leaving the account or
//! card balance, and a positive amount always means money arriving:
//!
//! - ADCB Account: single signed `Amount` column, sign kept as-is.
//! - ADCB Credit Card: `Debit Amount` (purchases) becomes negative,
//!   `Credit Amount` (payments/refunds) becomes positive.
//! - ENBD Account: `Debit` column becomes negative, `Credit` positive.
//! - ENBD Credit Card: unsigned `Amount`; a trailing `CR` marks payments and
//!   refunds (positive), everything else is a purchase (negative).
//!
//! Rows carrying a foreign-currency marker are normalized from the AED
//! settlement amount; the foreign figure stays in the memo text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::raw::RawRecord;
use crate::types::{Bank, Classification, StatementType, Transaction};

/// Normalize one raw row into a canonical transaction, or fail with a
/// row-level error. Never defaults a bad date or amount.
pub fn normalize_record(record: &RawRecord, classification: Classification) -> Result<Transaction> {
    let Classification { bank, statement_type } = classification;

    let date_key = match (bank, statement_type) {
        (Bank::Adcb, StatementType::CreditCard) => "transaction date",
        _ => "date",
    };
    let raw_date = record
        .get_non_empty(date_key)
        .ok_or_else(|| Error::MissingField(date_key.to_string()))?;
    let date = parse_date(raw_date, bank)?;

    let amount = match (bank, statement_type) {
        (Bank::Adcb, StatementType::Account) => {
            let raw = record
                .get_non_empty("amount")
                .ok_or_else(|| Error::MissingField("amount".to_string()))?;
            parse_amount(raw)?
        }
        (Bank::Adcb, StatementType::CreditCard) => debit_credit_amount(
            record.get_non_empty("debit amount"),
            record.get_non_empty("credit amount"),
        )?,
        (Bank::EmiratesNbd, StatementType::Account) => {
            debit_credit_amount(record.get_non_empty("debit"), record.get_non_empty("credit"))?
        }
        (Bank::EmiratesNbd, StatementType::CreditCard) => {
            let raw = record
                .get_non_empty("amount")
                .ok_or_else(|| Error::MissingField("amount".to_string()))?;
            card_amount_with_cr_marker(raw)?
        }
    };

    if amount.is_zero() {
        return Err(Error::ZeroAmount(raw_date.to_string()));
    }

    let description = record.get("description").unwrap_or("");
    let (payee, memo) = split_payee_memo(description, bank);

    Ok(Transaction {
        date,
        payee,
        memo,
        amount: amount.round_dp(2),
        bank,
        statement_type,
    })
}

/// Parse a date using the bank's documented format. ADCB exports use
/// `DD/MM/YYYY`; ENBD statements print `DD MMM YYYY` with a textual month.
fn parse_date(raw: &str, bank: Bank) -> Result<NaiveDate> {
    let format = match bank {
        Bank::Adcb => "%d/%m/%Y",
        Bank::EmiratesNbd => "%d %b %Y",
    };
    NaiveDate::parse_from_str(raw.trim(), format).map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Combine separate debit/credit columns: debit is an outflow, credit an
/// inflow. Exactly one of the two must be populated.
fn debit_credit_amount(debit: Option<&str>, credit: Option<&str>) -> Result<Decimal> {
    match (debit, credit) {
        (Some(d), None) => Ok(-parse_amount(d)?),
        (None, Some(c)) => parse_amount(c),
        (None, None) => Err(Error::MissingField("debit/credit amount".to_string())),
        (Some(d), Some(c)) => Err(Error::InvalidAmount(format!(
            "both debit ({d}) and credit ({c}) populated"
        ))),
    }
}

/// ENBD card statements print unsigned magnitudes; `CR` flags money arriving
/// on the card (payment or refund), everything else is a purchase.
fn card_amount_with_cr_marker(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if let Some(stripped) = trimmed
        .strip_suffix("CR")
        .or_else(|| trimmed.strip_suffix("cr"))
    {
        parse_amount(stripped)
    } else {
        Ok(-parse_amount(trimmed)?)
    }
}

/// Parse a decimal amount in statement notation: optional `AED` prefix,
/// thousands separators, and accounting parentheses for negatives.
fn parse_amount(raw: &str) -> Result<Decimal> {
    let mut cleaned = raw.trim().trim_start_matches("AED").trim().replace([',', ' '], "");

    let mut negate = false;
    if cleaned.starts_with('(') && cleaned.ends_with(')') {
        negate = true;
        cleaned = cleaned[1..cleaned.len() - 1].to_string();
    }

    let amount =
        Decimal::from_str(&cleaned).map_err(|_| Error::InvalidAmount(raw.to_string()))?;
    Ok(if negate { -amount } else { amount })
}

/// Split a raw description into payee and memo. The first physical line is
/// the payee; wrapped continuation lines (and quoted multi-line CSV fields)
/// become the memo. ADCB single-line descriptions additionally split at the
/// first ` - ` separator. The remainder is never discarded.
fn split_payee_memo(description: &str, bank: Bank) -> (String, String) {
    let mut lines = description.lines();
    let head = lines.next().unwrap_or("").trim();
    let tail = lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let (payee, head_memo) = match bank {
        Bank::Adcb => match head.split_once(" - ") {
            Some((p, m)) => (p.trim(), m.trim()),
            None => (head, ""),
        },
        Bank::EmiratesNbd => (head, ""),
    };

    let memo = [head_memo, tail.as_str()]
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    (payee.to_string(), memo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn adcb_account_row(date: &str, description: &str, amount: &str) -> RawRecord {
        let mut rec = RawRecord::new(1);
        rec.push("Date", date);
        rec.push("Description", description);
        rec.push("Amount", amount);
        rec
    }

    fn classification(bank: Bank, statement_type: StatementType) -> Classification {
        Classification::new(bank, statement_type)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_adcb_account_keeps_signed_amount() {
        let tx = normalize_record(
            &adcb_account_row("01/03/2024", "COFFEE SHOP", "-12.50"),
            classification(Bank::Adcb, StatementType::Account),
        )
        .unwrap();
        assert_eq!(tx.amount, dec("-12.50"));
        assert_eq!(tx.payee, "COFFEE SHOP");
        assert_eq!(tx.memo, "");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let tx = normalize_record(
            &adcb_account_row("02/03/2024", "SALARY", "5000.00"),
            classification(Bank::Adcb, StatementType::Account),
        )
        .unwrap();
        assert_eq!(tx.amount, dec("5000.00"));
    }

    #[test]
    fn test_adcb_card_debit_is_outflow_credit_is_inflow() {
        let c = classification(Bank::Adcb, StatementType::CreditCard);

        let mut purchase = RawRecord::new(1);
        purchase.push("Transaction Date", "01/03/2024");
        purchase.push("Description", "CARREFOUR DUBAI");
        purchase.push("Debit Amount", "120.00");
        purchase.push("Credit Amount", "");
        assert_eq!(normalize_record(&purchase, c).unwrap().amount, dec("-120.00"));

        let mut payment = RawRecord::new(2);
        payment.push("Transaction Date", "05/03/2024");
        payment.push("Description", "PAYMENT RECEIVED");
        payment.push("Debit Amount", "");
        payment.push("Credit Amount", "500.00");
        assert_eq!(normalize_record(&payment, c).unwrap().amount, dec("500.00"));
    }

    #[test]
    fn test_enbd_account_debit_credit_columns() {
        let c = classification(Bank::EmiratesNbd, StatementType::Account);

        let mut debit = RawRecord::new(1);
        debit.push("date", "01 Mar 2024");
        debit.push("description", "POS CARREFOUR");
        debit.push("debit", "243.75");
        debit.push("credit", "");
        assert_eq!(normalize_record(&debit, c).unwrap().amount, dec("-243.75"));

        let mut credit = RawRecord::new(2);
        credit.push("date", "02 Mar 2024");
        credit.push("description", "SALARY TRANSFER");
        credit.push("debit", "");
        credit.push("credit", "15,000.00");
        assert_eq!(normalize_record(&credit, c).unwrap().amount, dec("15000.00"));
    }

    #[test]
    fn test_enbd_card_cr_marker_inverts_to_inflow() {
        let c = classification(Bank::EmiratesNbd, StatementType::CreditCard);

        let mut purchase = RawRecord::new(1);
        purchase.push("date", "06 Mar 2024");
        purchase.push("description", "NOON.COM DUBAI");
        purchase.push("amount", "89.00");
        assert_eq!(normalize_record(&purchase, c).unwrap().amount, dec("-89.00"));

        let mut refund = RawRecord::new(2);
        refund.push("date", "05 Mar 2024");
        refund.push("description", "PAYMENT RECEIVED");
        refund.push("amount", "1,500.00 CR");
        assert_eq!(normalize_record(&refund, c).unwrap().amount, dec("1500.00"));
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let err = normalize_record(
            &adcb_account_row("03/03/2024", "", "0.00"),
            classification(Bank::Adcb, StatementType::Account),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ZeroAmount(_)));
        assert!(err.is_row_level());
    }

    #[test]
    fn test_bad_date_is_an_error_not_a_default() {
        let err = normalize_record(
            &adcb_account_row("31/31/2024", "COFFEE", "-1.00"),
            classification(Bank::Adcb, StatementType::Account),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }

    #[test]
    fn test_enbd_date_uses_textual_month() {
        let mut rec = RawRecord::new(1);
        rec.push("date", "07 Mar 2024");
        rec.push("description", "ATM WITHDRAWAL");
        rec.push("debit", "500.00");
        rec.push("credit", "");
        let tx = normalize_record(&rec, classification(Bank::EmiratesNbd, StatementType::Account))
            .unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());

        // ADCB's numeric format must not be accepted for ENBD rows.
        let mut rec = RawRecord::new(2);
        rec.push("date", "07/03/2024");
        rec.push("description", "ATM WITHDRAWAL");
        rec.push("debit", "500.00");
        rec.push("credit", "");
        assert!(matches!(
            normalize_record(&rec, classification(Bank::EmiratesNbd, StatementType::Account)),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn test_adcb_payee_memo_split_on_dash() {
        let tx = normalize_record(
            &adcb_account_row("01/03/2024", "AMAZON.AE - ORDER 403-551", "-89.00"),
            classification(Bank::Adcb, StatementType::Account),
        )
        .unwrap();
        assert_eq!(tx.payee, "AMAZON.AE");
        assert_eq!(tx.memo, "ORDER 403-551");
    }

    #[test]
    fn test_wrapped_description_becomes_memo() {
        let mut rec = RawRecord::new(1);
        rec.push("date", "01 Mar 2024");
        rec.push("description", "POS CARREFOUR\nMALL OF EMIRATES DUBAI\nUSD 25.00");
        rec.push("debit", "91.82");
        rec.push("credit", "");
        let tx = normalize_record(&rec, classification(Bank::EmiratesNbd, StatementType::Account))
            .unwrap();
        assert_eq!(tx.payee, "POS CARREFOUR");
        // Settlement amount is used; the foreign-currency marker survives in
        // the memo rather than being silently dropped.
        assert_eq!(tx.memo, "MALL OF EMIRATES DUBAI USD 25.00");
        assert_eq!(tx.amount, dec("-91.82"));
    }

    #[test]
    fn test_both_debit_and_credit_populated_is_an_error() {
        let mut rec = RawRecord::new(1);
        rec.push("date", "01 Mar 2024");
        rec.push("description", "WEIRD ROW");
        rec.push("debit", "10.00");
        rec.push("credit", "10.00");
        assert!(matches!(
            normalize_record(&rec, classification(Bank::EmiratesNbd, StatementType::Account)),
            Err(Error::InvalidAmount(_))
        ));
    }
}

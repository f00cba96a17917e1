//! Account-balance entry: `LABEL=AMOUNT` flags, or interactive prompts when
//! none were given.

use anyhow::{Context, Result, bail};
use std::io::{self, Write};

use tally_core::AccountBalance;
use tally_core::amount::normalize_amount;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Parse a `LABEL=AMOUNT` flag value.
pub fn parse_account_spec(spec: &str) -> Result<AccountBalance> {
    let Some((label, amount)) = spec.split_once('=') else {
        bail!("expected LABEL=AMOUNT, got '{spec}'");
    };
    let label = label.trim();
    if label.is_empty() {
        bail!("empty account label in '{spec}'");
    }
    let amount = normalize_amount(amount).with_context(|| format!("bad amount in '{spec}'"))?;
    Ok(AccountBalance {
        account: label.to_string(),
        amount,
    })
}

/// Resolve account balances: flags win; otherwise ask on the terminal
/// (count, then one label/amount pair per account).
pub fn resolve_accounts(specs: &[String]) -> Result<Vec<AccountBalance>> {
    if !specs.is_empty() {
        return specs.iter().map(|s| parse_account_spec(s)).collect();
    }

    let n: usize = prompt("Enter the number of accounts")?
        .parse()
        .context("expected a number")?;

    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let account = prompt("Enter Account Type")?;
        let amount = normalize_amount(&prompt("Enter Balance")?).context("bad balance amount")?;
        out.push(AccountBalance { account, amount });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_account_spec() {
        let a = parse_account_spec("Checking=1250.75").unwrap();
        assert_eq!(a.account, "Checking");
        assert_eq!(a.amount, dec!(1250.75));
    }

    #[test]
    fn test_parse_account_spec_with_symbols() {
        let a = parse_account_spec("Savings = $3,000.00").unwrap();
        assert_eq!(a.account, "Savings");
        assert_eq!(a.amount, dec!(3000.00));
    }

    #[test]
    fn test_parse_account_spec_rejects_malformed() {
        assert!(parse_account_spec("Checking").is_err());
        assert!(parse_account_spec("=100").is_err());
        assert!(parse_account_spec("Checking=").is_err());
    }

    #[test]
    fn test_flags_bypass_interactive() {
        let specs = vec!["A=1.00".to_string(), "B=2.00".to_string()];
        let accounts = resolve_accounts(&specs).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].amount, dec!(2.00));
    }
}

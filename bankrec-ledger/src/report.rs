//! Render reconciliation results for terminal output.

use bankrec_core::money::format_usd;
use bankrec_core::reconcile::ReconciliationResult;

/// Plain-text report for one account: category breakdown, computed vs
/// declared ending balance, and a PASSED/FAILED verdict.
pub fn render(recon: &ReconciliationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Account {}:\n", recon.account));
    out.push_str(&format!(
        "  Beginning balance:  {}\n",
        format_usd(recon.beginning_balance)
    ));

    for (category, total) in &recon.by_category {
        out.push_str(&format!("  {:<18}  {}\n", format!("{category}:"), format_usd(*total)));
    }

    out.push_str(&format!(
        "  Total credits:      {}\n",
        format_usd(recon.total_credits)
    ));
    out.push_str(&format!(
        "  Total debits:       {}\n",
        format_usd(recon.total_debits)
    ));
    out.push_str(&format!(
        "  Computed ending:    {}\n",
        format_usd(recon.computed_ending)
    ));
    out.push_str(&format!(
        "  Declared ending:    {}\n",
        format_usd(recon.ending_balance)
    ));
    out.push_str(&format!(
        "  Difference:         {}\n",
        format_usd(recon.discrepancy)
    ));
    out.push_str(&format!(
        "  Status: {}\n",
        if recon.reconciles { "PASSED" } else { "FAILED" }
    ));
    out
}

//! Term catalogs for locating financial statement tables.
//!
//! Each catalog lists heading patterns observed across filings for one kind
//! of statement. They are matched case-insensitively, anchored to the whole
//! line or table cell.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Balance sheet headings.
pub const BALANCE_SHEET_TERMS: &[&str] = &[
    r"^\s*consolidated\s+balance\s+sheets\s*$",
    r"^balance sheets\s*$",
    r"^CONSOLIDATED BALANCE SHEETS\s*$",
    r"^\s*consolidated\s+balance\s+sheet\s+[(]continued[)]\s*$",
    r"^consolidated\s+statement\s+of\s+financial\s+position\s*$",
    r"^\s*consolidated\s+balance\s+sheet[s]?\s*(December 31,)?\s*$",
    r"^\s*\{consolidated\s+balance\s+sheet[s]?\}\s*$",
    r"^\s*consolidated\s+balance\s+sheet[s]?\s+35\s*$",
];

/// Income statement headings.
pub const INCOME_STATEMENT_TERMS: &[&str] = &[
    r"^consolidated\s+statements\s+of\s+operations\s*$",
    r"^consolidated\s+statements\s+of\s+income\s*$",
    r"^consolidated\s+statement\s+of\s+operations\s*$",
    r"^consolidated\s+income\s+statements\s*$",
    r"^statements of income\s*$",
    r"^income statements\s*$",
    r"^consolidated\s+statements\s+of\s+earnings\s*$",
    r"^\s*consolidated\s+income\s+statement\s*$",
    r"^\s*consolidated\s+statements\s+of\s+earnings\s*$",
    r"^\s*consolidated\s+profit\s+and\s+loss\s+account\s*$",
    r"^\s*consolidated\s+statement\s+of\s+income\s*$",
    r"^\s*consolidated\s+statements\s+of\s+income\s+and\s+comprehensive\s+income\s*$",
    r"^\s*consolidated\s+statements\s+of\s+income\s+[(]loss[)]\s+and\s+comprehensive\s+income\s+[(]loss[)]\s*$",
    r"^\s*consolidated\s+statements\s+of\s+comprehensive\s+income\s*$",
    r"^\s*Consolidated Statements of Income\s*$",
    r"^\s*\{Consolidated Statements of Income\}\s*$",
    r"^\s*Consolidated Statements of Income\s*For the years ended December 31,",
    r"^\s*Consolidated Statements of Income\s+34\s*$",
];

/// Statement of stockholders' equity headings.
pub const EQUITY_STATEMENT_TERMS: &[&str] = &[
    r"^consolidated\s+statements\s+of\s+changes\s+in\s+stockholders\s*$",
    r"^consolidated\s+statements\s+of\s+stockholders\s*$",
    r"^consolidated\s+statements\s+of\s+changes\s+in\s+equity\s*$",
    r"^statements\s+of\s+shareholders.\s+equity\s*$",
    r"^consolidated\s+statements\s+of\s+shareholders.\s+equity\s*$",
    r"^stockholders.\s+equity\s+statements\s*$",
    r"^Consolidated Statements of Redeemable Noncontrolling Interests and Equity\s*$",
    r"^Consolidated Statement of Changes in Equity\s*$",
    r"^consolidated\s+statements\s+of\s+equity\s*$",
    r"^consolidated\s+statements\s+of\s+changes\s+in\s+equity\s*$",
    r"^Consolidated Statements of Changes in Shareholders. Equity\s*$",
    r"^CONSOLIDATED STATEMENTS OF CHANGES IN EQUITY\s*$",
    r"^\s*stockholders.\s+equity\s+statements\s*$",
    r"^\s*consolidated\s+statement\s+of\s+changes\s+in\s+equity\s*$",
    r"^\s*consolidated\s+statement\s+of\s+changes\s+in\s+shareholders.\s+equity\s*$",
    r"^\s*consolidated\s+statements\s+of\s+changes\s+in\s+stockholders.\s+equity\s*$",
];

/// Comprehensive income statement headings.
pub const COMPREHENSIVE_INCOME_TERMS: &[&str] = &[
    r"^consolidated\s+statements\s+of\s+comprehensive\s+income\s*$",
    r"^consolidated\s+statements\s+of\s+comprehensive\s+\(loss\)\s+income\s*$",
    r"^comprehensive\s+income\s+statements\s*$",
    r"^consolidated\s+statements\s+of\s+comprehensive\s+loss\s*$",
    r"^Consolidated Statements of Comprehensive Loss\s*$",
    r"^Consolidated Statement of Comprehensive Income\s*$",
    r"^\s*consolidated\s+statement\s+of\s+recognized\s+income\s+and\s+expense\s*$",
    r"^\s*consolidated\s+statement\s+of\s+total\s+recognized\s+gains\s+and\s+losses\s*$",
    r"^\s*consolidated\s+statements\s+of\s+comprehensive\s+income\s+[(]loss[)]\s*$",
];

/// Cash flow statement headings.
pub const CASH_FLOW_STATEMENT_TERMS: &[&str] = &[
    r"^consolidated\s+statements\s+of\s+cash\s+flows\s*$",
    r"^consolidated\s+statements\s+of\s+cash\s+flows\s*[(]*\s*continued[)]*\s*$",
    r"^\s*cash\s+flows\s+statements\s*$",
    r"^\s*consolidated\s+statement\s+of\s+cash\s+flows\s*$",
    r"^\s*consolidated\s+cash\s+flow\s+statement\s*$",
];

/// Kind of financial statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Balance sheet / statement of financial position
    BalanceSheet,
    /// Statement of operations / income
    IncomeStatement,
    /// Statement of comprehensive income
    ComprehensiveIncomeStatement,
    /// Statement of cash flows
    CashFlowStatement,
    /// Statement of changes in equity
    EquityStatement,
}

impl StatementKind {
    /// Every statement kind.
    pub const ALL: [StatementKind; 5] = [
        StatementKind::BalanceSheet,
        StatementKind::IncomeStatement,
        StatementKind::ComprehensiveIncomeStatement,
        StatementKind::CashFlowStatement,
        StatementKind::EquityStatement,
    ];

    /// Heading patterns for this kind.
    pub fn terms(self) -> &'static [&'static str] {
        match self {
            StatementKind::BalanceSheet => BALANCE_SHEET_TERMS,
            StatementKind::IncomeStatement => INCOME_STATEMENT_TERMS,
            StatementKind::ComprehensiveIncomeStatement => COMPREHENSIVE_INCOME_TERMS,
            StatementKind::CashFlowStatement => CASH_FLOW_STATEMENT_TERMS,
            StatementKind::EquityStatement => EQUITY_STATEMENT_TERMS,
        }
    }

    /// Snake-case name, as accepted by `from_str`.
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "balance_sheet",
            StatementKind::IncomeStatement => "income_statement",
            StatementKind::ComprehensiveIncomeStatement => "comprehensive_income_statement",
            StatementKind::CashFlowStatement => "cash_flow_statement",
            StatementKind::EquityStatement => "equity_statement",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        StatementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| Error::UnknownStatementKind(s.to_string()))
    }
}

//! Wallet transaction status normalisation.

use std::fmt;

/// Suffix some telecom callbacks append to the status.
const TELECOM_SUFFIX: &str = " AT TELECOM";

/// Status of a wallet transaction as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WalletStatus {
    /// Not final yet.
    Pending,
    /// Completed.
    Successful,
    /// Rejected by the provider.
    Failed,
    /// Completed, then undone by the provider.
    Reversed,
    /// The row is itself a reversal record.
    Reversal,
    /// Anything else, with the raw text kept for diagnostics.
    Unknown(String),
}

impl WalletStatus {
    /// Normalises free-text status.
    ///
    /// Trims, upper-cases, collapses internal whitespace and strips a trailing
    /// `AT TELECOM`, so `"successful at  telecom"` reads as `Successful`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        let core = normalized
            .strip_suffix(TELECOM_SUFFIX)
            .unwrap_or(&normalized);

        match core {
            "PENDING" => Self::Pending,
            "SUCCESSFUL" | "SUCCESS" => Self::Successful,
            "FAILED" => Self::Failed,
            "REVERSED" => Self::Reversed,
            "REVERSAL" => Self::Reversal,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    /// Returns true for statuses that end a withdrawal without payout.
    #[must_use]
    pub const fn returns_funds(&self) -> bool {
        matches!(self, Self::Failed | Self::Reversed)
    }
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("PENDING"),
            Self::Successful => f.write_str("SUCCESSFUL"),
            Self::Failed => f.write_str("FAILED"),
            Self::Reversed => f.write_str("REVERSED"),
            Self::Reversal => f.write_str("REVERSAL"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PENDING", WalletStatus::Pending)]
    #[case("pending", WalletStatus::Pending)]
    #[case("  Pending At Telecom ", WalletStatus::Pending)]
    #[case("SUCCESSFUL", WalletStatus::Successful)]
    #[case("success", WalletStatus::Successful)]
    #[case("Successful at   Telecom", WalletStatus::Successful)]
    #[case("FAILED", WalletStatus::Failed)]
    #[case("failed AT TELECOM", WalletStatus::Failed)]
    #[case("Reversed", WalletStatus::Reversed)]
    #[case("REVERSED AT TELECOM", WalletStatus::Reversed)]
    #[case("reversal", WalletStatus::Reversal)]
    fn test_parse_recognised(#[case] raw: &str, #[case] expected: WalletStatus) {
        assert_eq!(WalletStatus::parse(raw), expected);
    }

    #[rstest]
    #[case("PROCESSING")]
    #[case("")]
    #[case("AT TELECOM")]
    #[case("FAILEDAT TELECOM")]
    fn test_parse_unknown_keeps_raw(#[case] raw: &str) {
        assert_eq!(
            WalletStatus::parse(raw),
            WalletStatus::Unknown(raw.trim().to_string())
        );
    }

    #[test]
    fn test_returns_funds() {
        assert!(WalletStatus::Failed.returns_funds());
        assert!(WalletStatus::Reversed.returns_funds());
        assert!(!WalletStatus::Pending.returns_funds());
        assert!(!WalletStatus::Reversal.returns_funds());
    }
}

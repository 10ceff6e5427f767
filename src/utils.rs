//! Utils

use clap::Parser;
use jiff::Timestamp;

/// Arguments for the evaluation demo
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Fixture set to evaluate
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Evaluation instant (RFC 3339); defaults to now
    #[clap(short, long)]
    pub at: Option<Timestamp>,

    /// Only evaluate this discount code
    #[clap(short, long)]
    pub code: Option<String>,

    /// Default log filter when `RUST_LOG` is unset
    #[clap(short, long, default_value = "info")]
    pub log_level: String,
}

impl DemoArgs {
    /// Evaluation instant, falling back to the current time.
    pub fn now(&self) -> Timestamp {
        self.at.unwrap_or_else(Timestamp::now)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_to_storefront_set() -> TestResult {
        let args = DemoArgs::try_parse_from(["evaluate"])?;

        assert_eq!(args.fixture, "storefront");
        assert!(args.at.is_none());
        assert!(args.code.is_none());

        Ok(())
    }

    #[test]
    fn parses_evaluation_instant() -> TestResult {
        let args = DemoArgs::try_parse_from([
            "evaluate",
            "--at",
            "2026-03-01T12:00:00Z",
            "--code",
            "WELCOME10",
        ])?;

        assert_eq!(args.now(), "2026-03-01T12:00:00Z".parse::<Timestamp>()?);
        assert_eq!(args.code.as_deref(), Some("WELCOME10"));

        Ok(())
    }
}

// self
use crate::obs::{FlowKind, FlowOutcome};

/// Bumps `tent_auth_flow_total{flow, outcome}` on the installed recorder.
///
/// Each exchange records one `attempt` followed by exactly one `success` or `failure`.
/// A no-op without the `metrics` feature or when no recorder is installed.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"tent_auth_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn exchange_outcomes_record_without_recorder() {
		for outcome in [FlowOutcome::Attempt, FlowOutcome::Success, FlowOutcome::Failure] {
			record_flow_outcome(FlowKind::TokenExchange, outcome);
		}

		assert_eq!(FlowKind::TokenExchange.to_string(), "token_exchange");
	}
}

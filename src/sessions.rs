// src/sessions.rs
use crate::models::{Costs, SessionReport};

/// Convert a native-unit loss into USD and the whole number of average-cost
/// chemo sessions that amount could have funded.
pub fn build_report(native_loss: f64, eth_usd_rate: f64, session_cost_usd: f64) -> SessionReport {
    let total_losses_usd = native_loss * eth_usd_rate;
    let chemo_session = (total_losses_usd / session_cost_usd).floor() as u64;

    SessionReport {
        average_session_cost_usd: session_cost_usd,
        costs: Costs {
            total_losses_usd,
            chemo_session,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_loss_means_zero_sessions() {
        let report = build_report(0.0, 2228.0, 4500.0);
        assert_eq!(report.costs.total_losses_usd, 0.0);
        assert_eq!(report.costs.chemo_session, 0);
    }

    #[test]
    fn sub_session_loss_floors_to_zero() {
        // 1.01 ETH at the default rate is below one session
        let report = build_report(1.01, 2228.0, 4500.0);
        assert!((report.costs.total_losses_usd - 2250.28).abs() < 1e-9);
        assert_eq!(report.costs.chemo_session, 0);
    }

    #[test]
    fn sessions_are_floored_not_rounded() {
        let report = build_report(300.0, 2228.0, 4500.0);
        assert_eq!(report.costs.total_losses_usd, 668_400.0);
        assert_eq!(report.costs.chemo_session, 148); // 148.53… floors down
    }

    #[test]
    fn report_carries_the_session_cost_for_display() {
        let report = build_report(10.0, 2000.0, 4500.0);
        assert_eq!(report.average_session_cost_usd, 4500.0);
    }

    #[test]
    fn wire_field_names_match_the_contract() {
        let report = build_report(300.0, 2228.0, 4500.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["averageSessionCostUSD"], 4500.0);
        assert_eq!(json["costs"]["totalLossesUSD"], 668_400.0);
        assert_eq!(json["costs"]["chemoSession"], 148);
    }
}

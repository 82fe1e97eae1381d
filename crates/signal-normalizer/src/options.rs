use bias_core::OptionFlowSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

/// One contract of the nearest-expiry chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOptionContract {
    pub contract_type: OptionType,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub open_interest: Option<f64>,
}

fn as_count(v: Option<f64>) -> i64 {
    match v {
        Some(x) if x.is_finite() && x > 0.0 && x < i64::MAX as f64 => x as i64,
        _ => 0,
    }
}

/// Sum volume and open interest across the chain; missing cells count as zero.
/// An empty chain, or one whose totals overflow, is "no data".
pub fn summarize_chain(contracts: &[RawOptionContract]) -> Option<OptionFlowSummary> {
    if contracts.is_empty() {
        return None;
    }

    let totals = contracts.iter().try_fold([0i64; 4], |[cv, pv, co, po], contract| {
        let volume = as_count(contract.volume);
        let oi = as_count(contract.open_interest);
        Some(match contract.contract_type {
            OptionType::Call => [cv.checked_add(volume)?, pv, co.checked_add(oi)?, po],
            OptionType::Put => [cv, pv.checked_add(volume)?, co, po.checked_add(oi)?],
        })
    });

    match totals {
        Some([call_volume, put_volume, call_oi, put_oi]) => Some(OptionFlowSummary::from_totals(
            call_volume,
            put_volume,
            call_oi,
            put_oi,
        )),
        None => {
            tracing::debug!("Option chain totals overflow across {} contracts", contracts.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contract(kind: OptionType, volume: Option<f64>, oi: Option<f64>) -> RawOptionContract {
        RawOptionContract {
            contract_type: kind,
            volume,
            open_interest: oi,
        }
    }

    #[test]
    fn test_chain_totals() {
        let chain = vec![
            contract(OptionType::Call, Some(600.0), Some(1000.0)),
            contract(OptionType::Call, None, Some(200.0)),
            contract(OptionType::Call, Some(400.0), None),
            contract(OptionType::Put, Some(750.0), Some(900.0)),
            contract(OptionType::Put, Some(f64::NAN), Some(100.0)),
        ];
        let flow = summarize_chain(&chain).unwrap();
        assert_eq!(flow.call_volume, 1000);
        assert_eq!(flow.put_volume, 750);
        assert_eq!(flow.call_open_interest, 1200);
        assert_eq!(flow.put_open_interest, 1000);
        assert_relative_eq!(flow.put_call_ratio.unwrap(), 0.75);
    }

    #[test]
    fn test_no_calls_leaves_ratio_undefined() {
        let chain = vec![contract(OptionType::Put, Some(10.0), Some(10.0))];
        let flow = summarize_chain(&chain).unwrap();
        assert!(flow.put_call_ratio.is_none());
    }

    #[test]
    fn test_overflowing_totals_are_no_data() {
        let chain = vec![
            contract(OptionType::Call, Some(9.0e18), Some(1.0)),
            contract(OptionType::Call, Some(9.0e18), Some(1.0)),
        ];
        assert!(summarize_chain(&chain).is_none());

        // Beyond i64 range a single cell is treated as missing
        let chain = vec![
            contract(OptionType::Call, Some(1e300), Some(5.0)),
            contract(OptionType::Put, Some(4.0), Some(1e300)),
        ];
        let flow = summarize_chain(&chain).unwrap();
        assert_eq!(flow.call_volume, 0);
        assert_eq!(flow.put_open_interest, 0);
        assert!(flow.put_call_ratio.is_none());
    }

    #[test]
    fn test_empty_chain_is_no_data() {
        assert!(summarize_chain(&[]).is_none());
    }

    #[test]
    fn test_contract_type_deserializes_lowercase() {
        let c: RawOptionContract =
            serde_json::from_str(r#"{"contract_type":"put","volume":12}"#).unwrap();
        assert_eq!(c.contract_type, OptionType::Put);
        assert_eq!(c.open_interest, None);
    }
}

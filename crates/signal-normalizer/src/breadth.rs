use bias_core::{BreadthSnapshot, QuoteBoard};

/// Advance/decline counts of `basket` from the cycle's quotes.
///
/// `total_sampled` is the basket size, so unquoted names dilute the advancing
/// share. If no basket member was quoted at all the snapshot is "no data".
pub fn compute_breadth<S: AsRef<str>>(board: &QuoteBoard, basket: &[S]) -> Option<BreadthSnapshot> {
    let mut advancing = 0u32;
    let mut declining = 0u32;
    let mut quoted = 0usize;

    for symbol in basket {
        if let Some(q) = board.get(symbol.as_ref()) {
            quoted += 1;
            if q.percent_change > 0.0 {
                advancing += 1;
            } else if q.percent_change < 0.0 {
                declining += 1;
            }
        }
    }

    if quoted == 0 {
        tracing::debug!("Breadth: none of {} basket names quoted", basket.len());
        return None;
    }

    BreadthSnapshot::from_counts(advancing, declining, basket.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bias_core::PriceQuote;

    fn quote(symbol: &str, pct: f64) -> PriceQuote {
        PriceQuote {
            symbol: symbol.to_string(),
            last_close: 100.0,
            percent_change: pct,
            volume: None,
        }
    }

    #[test]
    fn test_counts_over_basket() {
        let board: QuoteBoard = vec![
            quote("AAPL", 1.0),
            quote("MSFT", 0.4),
            quote("AMZN", -0.2),
            quote("XOM", 0.0),
        ]
        .into_iter()
        .collect();
        let basket = ["AAPL", "MSFT", "AMZN", "XOM", "KO"];

        let b = compute_breadth(&board, &basket).unwrap();
        assert_eq!(b.advancing, 2);
        assert_eq!(b.declining, 1);
        assert_eq!(b.total_sampled, 5);
        assert_relative_eq!(b.advance_decline_ratio, 2.0);
        assert_relative_eq!(b.pct_advancing, 0.4);
    }

    #[test]
    fn test_nothing_quoted_is_no_data() {
        let board = QuoteBoard::new();
        assert!(compute_breadth(&board, &["AAPL", "MSFT"]).is_none());
    }
}

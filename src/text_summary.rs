//! Text summary builder for CLI output.
//!
//! Turns the rendered document into human-readable lines for text mode.

use crate::model::{Field, ResultBlock, SearchParams, SubmitOutcome};
use crate::view::DocumentState;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from the submitted params, its outcome and the document.
pub(crate) fn build_text_summary(
    params: &SearchParams,
    outcome: &SubmitOutcome,
    state: &DocumentState,
) -> TextSummary {
    let mut lines = Vec::new();

    let origin = params.origin.as_deref().unwrap_or("-");
    let destination = params.destination.as_deref().unwrap_or("-");
    let outbound = params.outbound_date.as_deref().unwrap_or("-");
    match params.inbound_date.as_deref() {
        Some(inbound) => lines.push(format!(
            "Search: {origin} ⇄ {destination}, out {outbound}, back {inbound}"
        )),
        None => lines.push(format!("Search: {origin} ➜ {destination}, out {outbound}")),
    }

    for field in Field::ALL {
        if let Some(msg) = state.error(field) {
            lines.push(format!("{}: {}", field.label(), msg));
        }
    }

    if let SubmitOutcome::Aborted { reason, .. } = outcome {
        lines.push(format!("Search failed: {reason}"));
    }

    if let Some(err) = state.panel.error.as_deref() {
        lines.push(err.to_string());
    }

    for block in &state.panel.blocks {
        match block {
            ResultBlock::Quote(q) => {
                lines.push(q.leader());
                lines.push(format!("    {}", q.follower()));
            }
            ResultBlock::Divider { text } => {
                lines.push(String::new());
                lines.push(text.clone());
            }
        }
    }

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuoteBlock;

    #[test]
    fn renders_quotes_and_divider() {
        let mut state = DocumentState::default();
        let quote = QuoteBlock {
            price: "$120".into(),
            origin: "New York".into(),
            destination: "Los Angeles".into(),
            direct: true,
            carrier: "Acme Air".into(),
        };
        state.panel.blocks = vec![
            ResultBlock::Quote(quote.clone()),
            ResultBlock::Divider {
                text: "-- Return Flight Information --".into(),
            },
            ResultBlock::Quote(quote),
        ];
        let params = SearchParams::new("JFK", "LAX", "2024-01-10", Some("2024-01-15"));
        let outcome = SubmitOutcome::Completed {
            had_error: false,
            requests: 2,
        };
        let summary = build_text_summary(&params, &outcome, &state);
        assert_eq!(
            summary.lines,
            [
                "Search: JFK ⇄ LAX, out 2024-01-10, back 2024-01-15",
                "$120: New York ➜ Los Angeles",
                "    Direct through Acme Air",
                "",
                "-- Return Flight Information --",
                "$120: New York ➜ Los Angeles",
                "    Direct through Acme Air",
            ]
        );
    }

    #[test]
    fn lists_field_errors() {
        let mut state = DocumentState::default();
        state
            .errors
            .insert(Field::Origin, "You must enter a value for origin airport.".into());
        let summary = build_text_summary(&SearchParams::default(), &SubmitOutcome::Invalid, &state);
        assert_eq!(
            summary.lines[1],
            "Origin: You must enter a value for origin airport."
        );
    }
}

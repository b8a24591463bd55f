//! Response interpretation and result-panel rendering.
//!
//! Every response lands in exactly one of four states: unreachable, upstream
//! validation error, no quotes, or a list of quotes. The first three put a
//! message in the error banner and report `true` ("had error") so the caller
//! skips the return leg.

use crate::model::{Quote, QuoteBlock, QuoteResponse, ResultBlock};
use crate::view::View;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

pub const SERVICE_UNAVAILABLE: &str = "Flight search service is not responding.";
pub const NO_FLIGHTS: &str = "Couldn't find any flights between those cities for those dates.";
pub const RETURN_DIVIDER: &str = "-- Return Flight Information --";
const UNKNOWN_CARRIER: &str = "Unknown carrier";
const UNKNOWN_PLACE: &str = "Unknown airport";

/// Parse a response body. `null` and any other non-object payload (the endpoint
/// answers a bare status code when its upstream fails) decode to `None`.
pub fn decode_response(body: &Bytes) -> Result<Option<QuoteResponse>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        debug!(payload = %value, "non-object response payload");
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

/// Replace the panel content with this response.
pub fn render_response(view: &dyn View, response: Option<&QuoteResponse>) -> bool {
    view.clear_results();
    render_into(view, response)
}

/// Append the return leg below the outbound results, behind a divider.
pub fn render_return_response(view: &dyn View, response: Option<&QuoteResponse>) -> bool {
    view.append_block(ResultBlock::Divider {
        text: RETURN_DIVIDER.to_string(),
    });
    render_into(view, response)
}

fn render_into(view: &dyn View, response: Option<&QuoteResponse>) -> bool {
    let Some(response) = render_error(view, response) else {
        return true;
    };
    for quote in response.quotes() {
        view.append_block(ResultBlock::Quote(render_quote(quote, response)));
    }
    false
}

/// Hide the banner, then show it again if the response is an error. Returns the
/// response only when it carries quotes.
fn render_error<'a>(
    view: &dyn View,
    response: Option<&'a QuoteResponse>,
) -> Option<&'a QuoteResponse> {
    view.hide_result_error();

    let Some(response) = response else {
        view.show_result_error(SERVICE_UNAVAILABLE);
        return None;
    };
    if let Some(err) = response.first_validation_error() {
        let message = match err.message.trim() {
            "" => "unknown error",
            m => m,
        };
        view.show_result_error(&format!("We've got a problem: {message}."));
        return None;
    }
    if response.quotes().is_empty() {
        view.show_result_error(NO_FLIGHTS);
        return None;
    }
    Some(response)
}

/// Resolve a quote's outbound leg against the response lookup tables.
pub fn render_quote(quote: &Quote, response: &QuoteResponse) -> QuoteBlock {
    let leg = &quote.outbound_leg;
    let carrier = leg
        .carrier_ids
        .first()
        .and_then(|id| response.carrier(*id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| {
            warn!(carrier_ids = ?leg.carrier_ids, "carrier not found in response");
            UNKNOWN_CARRIER.to_string()
        });
    let place_name = |id: i64| {
        response.place(id).map(|p| p.name.clone()).unwrap_or_else(|| {
            warn!(place_id = id, "place not found in response");
            UNKNOWN_PLACE.to_string()
        })
    };

    QuoteBlock {
        price: format!("{}{}", response.currency_symbol(), quote.min_price),
        origin: place_name(leg.origin_id),
        destination: place_name(leg.destination_id),
        direct: quote.direct,
        carrier,
    }
}

//! Form reading and validation.

use crate::model::{Field, SearchParams};
use crate::view::View;
use tracing::debug;

const MISSING_VALUE: &str = "You must enter a value for";
const DATE_ORDER: &str = "Inbound date must come after outbound date.";

/// Read the current form state. Blank inputs read as absent.
pub fn read_params(view: &dyn View) -> SearchParams {
    let read = |field| {
        view.field_value(field)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    SearchParams {
        origin: read(Field::Origin),
        destination: read(Field::Destination),
        outbound_date: read(Field::OutboundDate),
        inbound_date: read(Field::InboundDate),
    }
}

/// Check every field and write a message into the slot of each invalid one.
///
/// All checks run even after a failure. The ordering check runs last and shares
/// the outbound-date slot, so its message replaces a missing-value message there.
/// Dates compare lexicographically.
pub fn validate_params(view: &dyn View, params: &SearchParams) -> bool {
    let mut is_valid = true;

    if params.origin.is_none() {
        view.set_error(Field::Origin, &format!("{MISSING_VALUE} origin airport."));
        is_valid = false;
    }
    if params.destination.is_none() {
        view.set_error(
            Field::Destination,
            &format!("{MISSING_VALUE} destination airport."),
        );
        is_valid = false;
    }
    if params.outbound_date.is_none() {
        view.set_error(
            Field::OutboundDate,
            &format!("{MISSING_VALUE} outbound date."),
        );
        is_valid = false;
    }
    if let (Some(inbound), Some(outbound)) = (&params.inbound_date, &params.outbound_date) {
        if inbound < outbound {
            view.set_error(Field::OutboundDate, DATE_ORDER);
            is_valid = false;
        }
    }

    if !is_valid {
        debug!(?params, "search form rejected");
    }
    is_valid
}

/// Exchange the origin and destination inputs.
pub fn swap_cities(view: &dyn View) {
    let origin = view.field_value(Field::Origin);
    let destination = view.field_value(Field::Destination);
    view.set_field_value(Field::Origin, destination);
    view.set_field_value(Field::Destination, origin);
}

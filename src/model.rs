use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_PATH: &str = "/api/flights";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub host: String,
    pub base_path: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
    pub search_id: String,
}

/// Form inputs the pipeline reads. Each has an error slot next to it in the view,
/// though only origin, destination and outbound date are ever written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Origin,
    Destination,
    OutboundDate,
    InboundDate,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Origin,
        Field::Destination,
        Field::OutboundDate,
        Field::InboundDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Origin => "Origin",
            Field::Destination => "Destination",
            Field::OutboundDate => "Outbound date",
            Field::InboundDate => "Inbound date",
        }
    }

    /// Error slot cleared when this field regains focus. The inbound date has no
    /// slot of its own; the ordering message it can trigger lives in the outbound slot.
    pub fn focus_clears(self) -> Field {
        match self {
            Field::InboundDate => Field::OutboundDate,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub outbound_date: Option<String>,
    pub inbound_date: Option<String>,
}

impl SearchParams {
    #[cfg(test)]
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        outbound_date: impl Into<String>,
        inbound_date: Option<&str>,
    ) -> Self {
        Self {
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            outbound_date: Some(outbound_date.into()),
            inbound_date: inbound_date.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "Quotes", default, deserialize_with = "lenient_list")]
    pub quotes: Option<Vec<Quote>>,
    #[serde(rename = "Carriers", default, deserialize_with = "lenient_list")]
    pub carriers: Option<Vec<Carrier>>,
    #[serde(rename = "Places", default, deserialize_with = "lenient_list")]
    pub places: Option<Vec<Place>>,
    #[serde(rename = "Currencies", default, deserialize_with = "lenient_list")]
    pub currencies: Option<Vec<Currency>>,
    #[serde(rename = "ValidationErrors", default, deserialize_with = "lenient_list")]
    pub validation_errors: Option<Vec<UpstreamValidationError>>,
}

impl QuoteResponse {
    pub fn quotes(&self) -> &[Quote] {
        self.quotes.as_deref().unwrap_or_default()
    }

    pub fn first_validation_error(&self) -> Option<&UpstreamValidationError> {
        self.validation_errors.as_deref().and_then(|v| v.first())
    }

    pub fn carrier(&self, id: i64) -> Option<&Carrier> {
        self.carriers
            .as_deref()
            .and_then(|cs| cs.iter().find(|c| c.carrier_id == id))
    }

    pub fn place(&self, id: i64) -> Option<&Place> {
        self.places
            .as_deref()
            .and_then(|ps| ps.iter().find(|p| p.place_id == id))
    }

    /// Symbol of the first currency entry; the endpoint only ever prices in one currency.
    pub fn currency_symbol(&self) -> &str {
        self.currencies
            .as_deref()
            .and_then(|cs| cs.first())
            .map(|c| c.symbol.as_str())
            .unwrap_or("")
    }
}

/// Deserialize a lookup table or quote list, dropping entries that do not parse
/// instead of rejecting the whole response.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|items| {
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("skipping malformed response entry: {e}");
                    None
                }
            })
            .collect()
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "MinPrice")]
    pub min_price: f64,
    #[serde(rename = "Direct", default)]
    pub direct: bool,
    #[serde(rename = "OutboundLeg")]
    pub outbound_leg: Leg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    #[serde(rename = "CarrierIds", default)]
    pub carrier_ids: Vec<i64>,
    #[serde(rename = "OriginId")]
    pub origin_id: i64,
    #[serde(rename = "DestinationId")]
    pub destination_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrier {
    #[serde(rename = "CarrierId")]
    pub carrier_id: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "PlaceId")]
    pub place_id: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "Symbol", default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamValidationError {
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// One rendered quote in the result panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub price: String,
    pub origin: String,
    pub destination: String,
    pub direct: bool,
    pub carrier: String,
}

impl QuoteBlock {
    pub fn direct_label(&self) -> &'static str {
        if self.direct {
            "Direct"
        } else {
            "Indirect"
        }
    }

    pub fn leader(&self) -> String {
        format!("{}: {} ➜ {}", self.price, self.origin, self.destination)
    }

    pub fn follower(&self) -> String {
        format!("{} through {}", self.direct_label(), self.carrier)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultBlock {
    Quote(QuoteBlock),
    Divider { text: String },
}

/// Child content of the result container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPanel {
    /// Error banner text; `None` while the banner is hidden.
    pub error: Option<String>,
    pub blocks: Vec<ResultBlock>,
}

impl ResultPanel {
    pub fn quote_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, ResultBlock::Quote(_)))
            .count()
    }
}

/// How a single submission ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Validation failed; no request was sent.
    Invalid,
    /// Every stage ran. `had_error` is set when the last rendered response was an
    /// error (unreachable service, upstream validation error or no quotes).
    Completed { had_error: bool, requests: usize },
    /// A transport or decode failure cut the pipeline short.
    Aborted { reason: String, requests: usize },
    /// A newer submission took over the result panel before this one finished.
    Superseded { requests: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub timestamp_utc: String,
    pub search_id: String,
    pub config: SearchConfig,
    pub params: SearchParams,
    pub outcome: SubmitOutcome,
    #[serde(default)]
    pub field_errors: BTreeMap<Field, String>,
    pub panel: ResultPanel,
}

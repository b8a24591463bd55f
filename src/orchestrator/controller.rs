//! Submission pipeline.
//!
//! Form reader -> validator -> url builder -> fetch -> renderer, with the spinner
//! bracketing everything after validation. Stages run strictly one after another;
//! the first failure ends the submission and the spinner still comes down.

use crate::client::{FetchError, FetchQuotes};
use crate::form::{read_params, swap_cities, validate_params};
use crate::model::{Field, QuoteResponse, SearchParams, SubmitOutcome};
use crate::render::{decode_response, render_response, render_return_response};
use crate::spinner::Spinner;
use crate::url::UrlBuilder;
use crate::view::View;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, Instrument};

#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Owns the pipeline for one form and one result panel.
pub(crate) struct SearchController {
    view: Arc<dyn View>,
    client: Arc<dyn FetchQuotes>,
    urls: UrlBuilder,
    // Monotonic submission token; only the newest submission may render.
    latest: AtomicU64,
}

impl SearchController {
    pub fn new(view: Arc<dyn View>, client: Arc<dyn FetchQuotes>, base_path: &str) -> Self {
        Self {
            view,
            client,
            urls: UrlBuilder::new(base_path),
            latest: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    /// Read and validate the form; search only when every field checks out.
    pub async fn on_submit(&self) -> SubmitOutcome {
        let params = read_params(self.view());
        if !validate_params(self.view(), &params) {
            return SubmitOutcome::Invalid;
        }
        self.get_flights(params).await
    }

    pub fn on_focus(&self, field: Field) {
        self.view.clear_error(field.focus_clears());
    }

    pub fn switch_cities(&self) {
        swap_cities(self.view());
    }

    /// Run the outbound search and, for a round trip whose outbound leg rendered
    /// cleanly, the reversed return search.
    pub async fn get_flights(&self, params: SearchParams) -> SubmitOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::info_span!("submission", token);
        async move {
            let spinner = Spinner::show(self.view()).await;
            let mut requests = 0usize;
            let result = self.run_legs(token, &params, &mut requests).await;
            spinner.hide();

            match result {
                Ok(Some(had_error)) => {
                    info!(requests, had_error, "search finished");
                    SubmitOutcome::Completed {
                        had_error,
                        requests,
                    }
                }
                Ok(None) => {
                    debug!(requests, "superseded by a newer submission");
                    SubmitOutcome::Superseded { requests }
                }
                Err(e) => {
                    error!(requests, "search aborted: {e}");
                    SubmitOutcome::Aborted {
                        reason: e.to_string(),
                        requests,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// `Ok(None)` means a newer submission owns the panel and nothing was rendered
    /// after that point.
    async fn run_legs(
        &self,
        token: u64,
        params: &SearchParams,
        requests: &mut usize,
    ) -> Result<Option<bool>, PipelineError> {
        let path = self.urls.outbound_path(params);
        let Some(outbound) = self.fetch_current(token, &path, requests).await? else {
            return Ok(None);
        };
        if render_response(self.view(), outbound.as_ref()) {
            return Ok(Some(true));
        }

        let Some(path) = self.urls.return_path(params) else {
            return Ok(Some(false));
        };
        let Some(inbound) = self.fetch_current(token, &path, requests).await? else {
            return Ok(None);
        };
        Ok(Some(render_return_response(self.view(), inbound.as_ref())))
    }

    /// Fetch one leg on behalf of submission `token`. Returns `Ok(None)` when a
    /// newer submission took over while the request was in flight, whether the
    /// request succeeded or failed.
    async fn fetch_current(
        &self,
        token: u64,
        path: &str,
        requests: &mut usize,
    ) -> Result<Option<Option<QuoteResponse>>, PipelineError> {
        let result = self.fetch(path, requests).await;
        if !self.is_current(token) {
            if let Err(e) = &result {
                debug!("dropping failure of a stale submission: {e}");
            }
            return Ok(None);
        }
        result.map(Some)
    }

    async fn fetch(
        &self,
        path: &str,
        requests: &mut usize,
    ) -> Result<Option<QuoteResponse>, PipelineError> {
        *requests += 1;
        let body = self.client.fetch(path).await?;
        decode_response(&body).map_err(|e| PipelineError::Decode(e.to_string()))
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

//! Endpoint race dispatch.
//!
//! One verification fans out to every configured endpoint at once. The
//! first endpoint to answer with a successful HTTP status claims a
//! single-assignment completion slot and cancels the rest; endpoints that
//! fail or answer non-2xx simply never claim it. The race as a whole is
//! bounded by one deadline.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{Result, VerifyError};

type Slot = Arc<Mutex<Option<oneshot::Sender<String>>>>;

/// Race all `endpoints` for the first successful reply to `query`.
///
/// Returns the winning reply body, or `Timeout` when no endpoint produces
/// one within `deadline`. Exactly one body is ever returned per race; any
/// answer arriving after the winner is discarded.
pub(crate) async fn race(
    http: &reqwest::Client,
    endpoints: &[String],
    query: &str,
    deadline: Duration,
) -> Result<String> {
    let (tx, rx) = oneshot::channel();
    let slot: Slot = Arc::new(Mutex::new(Some(tx)));
    let cancel = CancellationToken::new();

    trace!(endpoints = endpoints.len(), "dispatching verification request");
    for endpoint in endpoints {
        // A winner may land while requests are still being launched.
        if cancel.is_cancelled() {
            break;
        }
        let url = format!("{endpoint}?{query}");
        tokio::spawn(fetch(http.clone(), url, Arc::clone(&slot), cancel.clone()));
    }

    // `slot` stays alive here, so the receiver only resolves when an
    // endpoint actually sends. Losing the race to the clock cancels every
    // request still in flight.
    let outcome = match timeout(deadline, rx).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(_)) | Err(_) => Err(VerifyError::Timeout(deadline)),
    };
    cancel.cancel();
    outcome
}

/// Issue one GET and, on success, try to claim the completion slot.
async fn fetch(http: reqwest::Client, url: String, slot: Slot, cancel: CancellationToken) {
    let response = tokio::select! {
        () = cancel.cancelled() => {
            trace!(url = %url, "request cancelled before completion");
            return;
        }
        response = http.get(&url).send() => response,
    };

    let response = match response {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            debug!(url = %url, status = %response.status(), "endpoint answered non-success");
            return;
        }
        Err(err) => {
            debug!(url = %url, error = %err, "endpoint request failed");
            return;
        }
    };

    let body = tokio::select! {
        () = cancel.cancelled() => {
            trace!(url = %url, "request cancelled while reading reply");
            return;
        }
        body = response.text() => match body {
            Ok(body) => body,
            Err(err) => {
                debug!(url = %url, error = %err, "failed to read endpoint reply");
                return;
            }
        },
    };

    // Claim before cancelling so exactly one task ever delivers.
    let Some(tx) = slot.lock().take() else {
        trace!(url = %url, "discarding reply, race already won");
        return;
    };
    cancel.cancel();
    debug!(url = %url, "endpoint won the verification race");
    let _ = tx.send(body);
}

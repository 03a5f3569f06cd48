//! Panic recovery middleware.
//!
//! Runs the rest of the chain inside `catch_unwind`. On a panic the chain is
//! aborted, any partially buffered response is dropped and a 500 is written.
//! Place it early in the global list: it only guards entries after it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::http::StatusCode;
use serde_json::json;

use crate::config::RecoveryConfig;
use crate::engine::Context;
use crate::observability::metrics;

/// Build the recovery middleware.
pub fn recovery(config: RecoveryConfig) -> impl Fn(&mut Context) + Send + Sync + 'static {
    move |c: &mut Context| {
        let result = panic::catch_unwind(AssertUnwindSafe(|| c.next()));
        let Err(payload) = result else {
            return;
        };

        tracing::error!(
            method = %c.method(),
            path = %c.path(),
            panic = %panic_message(payload.as_ref()),
            "Handler panicked"
        );
        metrics::record_panic();

        c.abort();
        c.clear_response();
        if config.json {
            c.json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "internal server error" }),
            );
        } else {
            c.string(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

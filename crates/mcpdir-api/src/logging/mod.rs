//! Request logging infrastructure
//!
//! Trace IDs for request correlation and a span per request.

mod trace_context;

pub use trace_context::{generate_trace_id, RequestSpan, TraceContext};

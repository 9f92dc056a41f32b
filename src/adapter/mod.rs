//! Carrier adapter: one view over every kind of carrier a call site may hold.
//!
//! # Data Flow
//! ```text
//! &Carrier ───────────────┐
//! &Request<B> / &Parts ───┼─→ CarrierLike ─→ normalize() ─→ Option<&Carrier> ─→ fields
//! None / () ──────────────┘
//! ```
//!
//! # Design Decisions
//! - The set of carrier kinds is closed and resolved once, at the call boundary
//! - A request keeps its carrier in its extensions, keyed by the `Carrier` type
//! - A missing carrier means "no fields", never an error

pub mod middleware;
pub mod request;

pub use middleware::{request_fields, X_REQUEST_ID};
pub use request::RequestFieldsExt;

use axum::http::request::Parts;
use axum::http::{Extensions, Request};

use crate::fields::{Carrier, Field};

/// A borrowed carrier of any supported kind.
#[derive(Debug, Clone, Copy)]
pub enum CarrierLike<'a> {
    /// A bare carrier value.
    Context(&'a Carrier),
    /// The extensions of a framework request, which may hold a carrier.
    Request(&'a Extensions),
    /// No carrier at all.
    Absent,
}

impl<'a> CarrierLike<'a> {
    /// The underlying carrier, if there is one.
    pub fn carrier(&self) -> Option<&'a Carrier> {
        match *self {
            CarrierLike::Context(carrier) => Some(carrier),
            CarrierLike::Request(extensions) => extensions.get::<Carrier>(),
            CarrierLike::Absent => None,
        }
    }

    /// Fields reachable through this carrier; empty when there are none.
    pub fn fields(&self) -> &'a [Field] {
        crate::fields::fields_of(self.carrier())
    }
}

impl<'a> From<&'a Carrier> for CarrierLike<'a> {
    fn from(carrier: &'a Carrier) -> Self {
        CarrierLike::Context(carrier)
    }
}

impl<'a> From<Option<&'a Carrier>> for CarrierLike<'a> {
    fn from(carrier: Option<&'a Carrier>) -> Self {
        carrier.map_or(CarrierLike::Absent, CarrierLike::Context)
    }
}

impl<'a, B> From<&'a Request<B>> for CarrierLike<'a> {
    fn from(request: &'a Request<B>) -> Self {
        CarrierLike::Request(request.extensions())
    }
}

impl<'a> From<&'a Parts> for CarrierLike<'a> {
    fn from(parts: &'a Parts) -> Self {
        CarrierLike::Request(&parts.extensions)
    }
}

impl<'a> From<&'a Extensions> for CarrierLike<'a> {
    fn from(extensions: &'a Extensions) -> Self {
        CarrierLike::Request(extensions)
    }
}

impl From<()> for CarrierLike<'_> {
    fn from(_: ()) -> Self {
        CarrierLike::Absent
    }
}

/// Resolve any carrier-like input to the carrier it holds.
pub fn normalize<'a>(input: impl Into<CarrierLike<'a>>) -> Option<&'a Carrier> {
    input.into().carrier()
}

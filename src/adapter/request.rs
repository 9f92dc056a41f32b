//! Field setters operating on framework requests.
//!
//! The request's carrier is read from its extensions, a derived carrier is
//! built, and the derived one is written back into the same request.

use std::borrow::Cow;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, Request};

use crate::fields::{Carrier, Field};

/// Attach structured fields to a request in place.
pub trait RequestFieldsExt {
    /// Extensions holding the request's carrier.
    fn carrier_slot(&self) -> &Extensions;

    fn carrier_slot_mut(&mut self) -> &mut Extensions;

    /// The request's carrier, or the empty root carrier.
    fn carrier(&self) -> Carrier {
        self.carrier_slot()
            .get::<Carrier>()
            .cloned()
            .unwrap_or_default()
    }

    /// Append `fields` to the request's carrier.
    fn add_fields<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = Field>,
        Self: Sized,
    {
        let derived = self.carrier().with_fields(fields);
        self.carrier_slot_mut().insert(derived);
    }

    fn add_string(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.add_fields([Field::string(key, value)]);
    }

    fn add_int(&mut self, key: impl Into<Cow<'static, str>>, value: i64)
    where
        Self: Sized,
    {
        self.add_fields([Field::int(key, value)]);
    }

    fn add_bool(&mut self, key: impl Into<Cow<'static, str>>, value: bool)
    where
        Self: Sized,
    {
        self.add_fields([Field::bool(key, value)]);
    }
}

impl<B> RequestFieldsExt for Request<B> {
    fn carrier_slot(&self) -> &Extensions {
        self.extensions()
    }

    fn carrier_slot_mut(&mut self) -> &mut Extensions {
        self.extensions_mut()
    }
}

impl RequestFieldsExt for Parts {
    fn carrier_slot(&self) -> &Extensions {
        &self.extensions
    }

    fn carrier_slot_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// Handlers can take the request's carrier as an argument.
impl<S> FromRequestParts<S> for Carrier
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.carrier())
    }
}

//! Structured field propagation.
//!
//! # Data Flow
//! ```text
//! handler A: c1 = with_fields(&root, [request_id])
//!     → handler B: c2 = with_fields(&c1, [user_id])
//!         → dispatch reads fields_of(c2) = [request_id, user_id]
//!     (c1 still holds [request_id])
//! ```
//!
//! # Design Decisions
//! - Derivation is append-only and allocates a new carrier; nothing is mutated
//! - Absence is emptiness: no carrier, or a carrier without fields, yields `[]`
//! - Duplicate keys are kept in order; consumers must not assume last-wins

mod carrier;
mod field;

pub use carrier::Carrier;
pub use field::{Field, FieldValue};

/// Return a new carrier holding `parent`'s fields followed by `fields`.
pub fn with_fields<I>(parent: &Carrier, fields: I) -> Carrier
where
    I: IntoIterator<Item = Field>,
{
    parent.with_fields(fields)
}

/// Field set of `carrier`, or empty when there is none.
pub fn fields_of(carrier: Option<&Carrier>) -> &[Field] {
    carrier.map(Carrier::fields).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_of_absent_carrier() {
        assert!(fields_of(None).is_empty());
        assert!(fields_of(Some(&Carrier::new())).is_empty());
    }

    #[test]
    fn test_with_fields_from_root() {
        let c = with_fields(&Carrier::default(), [Field::string("request_id", "abc")]);
        assert_eq!(fields_of(Some(&c)), &[Field::string("request_id", "abc")]);
    }
}

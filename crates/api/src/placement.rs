//! Field placement: where a field is drawn on a page
//!
//! Coordinates and sizes are fractions of the page (`0.0..=1.0`).

use once_cell::sync::Lazy;
use scrive_core::{Descriptor, Result, Schema, Validator, Value, WireEnum};

use crate::enums::TipSide;

/// Font size used when none is given, as a fraction of the page width
pub const DEFAULT_FONT_SIZE: f64 = 0.0168;

fn fraction() -> Validator {
    Validator::bounded_float(0.0, 1.0)
}

pub(crate) static PLACEMENT: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "FieldPlacement",
        vec![
            Descriptor::new("left", fraction()).wire("xrel"),
            Descriptor::new("top", fraction()).wire("yrel"),
            Descriptor::new("width", fraction()).wire("wrel"),
            Descriptor::new("height", fraction()).wire("hrel"),
            Descriptor::new("font_size", fraction())
                .wire("fsrel")
                .default(|| Value::Float(DEFAULT_FONT_SIZE)),
            Descriptor::new("page", Validator::positive_int()).default(|| Value::Int(1)),
            Descriptor::new("tip", Validator::nullable(Validator::enumeration(TipSide::SPEC)))
                .default(|| Value::Null),
        ],
    )
});

entity!(
    /// Position and size of one occurrence of a field
    FieldPlacement,
    PLACEMENT
);

impl FieldPlacement {
    attributes! {
        /// Distance from the left page edge
        left / set_left: f64,
        /// Distance from the top page edge
        top / set_top: f64,
        /// Width of the field
        width / set_width: f64,
        /// Height of the field
        height / set_height: f64,
        /// Font size
        font_size / set_font_size: f64,
        /// 1-based page number
        page / set_page: i64,
        /// Side of the arrow tip, if any
        tip / set_tip: Option<TipSide>,
    }

    /// Decode a wire placement
    pub fn from_wire(json: &serde_json::Value) -> Result<Self> {
        scrive_core::Object::from_wire(&PLACEMENT, json).map(FieldPlacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrive_core::{Error, Kwargs};
    use serde_json::json;

    fn corner() -> Kwargs {
        Kwargs::new()
            .with("left", 0)
            .with("top", 0)
            .with("width", 0.5)
            .with("height", 0.1)
    }

    #[test]
    fn test_defaults() {
        let p = FieldPlacement::new(corner()).unwrap();
        assert_eq!(p.font_size(), Ok(DEFAULT_FONT_SIZE));
        assert_eq!(p.page(), Ok(1));
        assert_eq!(p.tip(), Ok(None));
        assert_eq!(p.left(), Ok(0.0));
    }

    #[test]
    fn test_missing_coordinate() {
        let err = FieldPlacement::new(Kwargs::new().with("left", 0.1)).unwrap_err();
        assert_eq!(
            err,
            Error::MissingArgument {
                type_name: "FieldPlacement".into(),
                name: "top".into()
            }
        );
    }

    #[test]
    fn test_fraction_bounds() {
        let p = FieldPlacement::new(corner()).unwrap();
        assert_eq!(
            p.set_width(1.5).unwrap_err().to_string(),
            "width must be a number between 0 and 1 (inclusive), not: 1.5"
        );
        assert_eq!(
            p.set_page(0).unwrap_err().to_string(),
            "page must be a positive integer, not: 0"
        );
    }

    #[test]
    fn test_tip_accepts_variant_name() {
        let p = FieldPlacement::new(corner()).unwrap();
        p.set_tip("Right").unwrap();
        assert_eq!(p.tip(), Ok(Some(TipSide::Right)));
        p.set_tip(()).unwrap();
        assert_eq!(p.tip(), Ok(None));
    }

    #[test]
    fn test_wire_keys() {
        let p = FieldPlacement::new(corner().with("tip", TipSide::Left)).unwrap();
        let wire = p.to_wire().unwrap();
        assert_eq!(wire["xrel"], json!(0.0));
        assert_eq!(wire["wrel"], json!(0.5));
        assert_eq!(wire["tip"], json!("left"));

        let back = FieldPlacement::from_wire(&serde_json::Value::Object(wire)).unwrap();
        assert_eq!(back.height(), Ok(0.1));
        assert_eq!(back.tip(), Ok(Some(TipSide::Left)));
    }
}

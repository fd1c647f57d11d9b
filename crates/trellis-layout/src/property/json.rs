//! JSON inspection format of a [`LayoutProperty`].
//!
//! Box edges serialize as a single length when all four are equal
//! (`"10.00vp"`), otherwise as a JSON object string holding the set edges
//! (`"{\"left\":\"4.00px\",\"top\":\"1.00vp\"}"`). An absent property
//! serializes as `"0.00vp"`, which [`LayoutProperty::from_json`] skips.

use serde_json::{Map, Value};
use tracing::debug;
use trellis_core::{
    Alignment, CalcLength, CalcSize, FlexAlign, PaddingProperty, PropertyParseError,
    TextDirection, TrellisError, VisibleType,
};

use super::LayoutProperty;
use crate::flags::PropertyChangeFlag;

const DEFAULT_EDGES: &str = "0.00vp";
const UNBOUNDED: &str = "Infinity";

/// Serialize box edges.
pub fn edges_to_json_string(edges: Option<&PaddingProperty>) -> String {
    let Some(edges) = edges.filter(|e| !e.is_empty()) else {
        return DEFAULT_EDGES.to_string();
    };
    if let Some(all) = edges.uniform() {
        return all.to_string();
    }
    let mut map = Map::new();
    for (key, value) in [
        ("top", edges.top),
        ("right", edges.right),
        ("bottom", edges.bottom),
        ("left", edges.left),
    ] {
        if let Some(value) = value {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(map).to_string()
}

/// Parse box edges written by [`edges_to_json_string`].
pub fn parse_edges_json(property: &'static str, text: &str) -> Result<PaddingProperty, PropertyParseError> {
    let text = text.trim();
    if !text.starts_with('{') {
        return Ok(PaddingProperty::all(text.parse()?));
    }
    let map: Map<String, Value> = serde_json::from_str(text).map_err(|_| PropertyParseError::Malformed {
        property,
        value: text.to_string(),
    })?;
    let mut edges = PaddingProperty::default();
    for (key, value) in &map {
        let length: CalcLength = value
            .as_str()
            .ok_or_else(|| PropertyParseError::Malformed {
                property,
                value: value.to_string(),
            })?
            .parse()?;
        let slot = match key.as_str() {
            "top" => &mut edges.top,
            "right" => &mut edges.right,
            "bottom" => &mut edges.bottom,
            "left" => &mut edges.left,
            _ => {
                return Err(PropertyParseError::UnknownKey {
                    property,
                    key: key.clone(),
                })
            }
        };
        *slot = Some(length);
    }
    Ok(edges)
}

fn length_or(value: Option<CalcLength>, fallback: &str) -> Value {
    Value::String(value.map_or_else(|| fallback.to_string(), |v| v.to_string()))
}

impl LayoutProperty {
    /// Inspection dump of the declared properties.
    pub fn to_json_value(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("padding".into(), edges_to_json_string(self.padding.as_ref()).into());
        json.insert("margin".into(), edges_to_json_string(self.margin.as_ref()).into());
        json.insert("visibility".into(), self.visibility().as_json_str().into());
        json.insert(
            "direction".into(),
            self.layout_direction.unwrap_or_default().as_json_str().into(),
        );
        if self.border_width.is_some() {
            json.insert("borderWidth".into(), edges_to_json_string(self.border_width.as_ref()).into());
        }
        if let Some(weight) = self.layout_weight() {
            json.insert("layoutWeight".into(), weight.into());
        }
        if let Some(ratio) = self.aspect_ratio() {
            json.insert("aspectRatio".into(), ratio.into());
        }
        if let Some(calc) = &self.calc_layout_constraint {
            if let Some(width) = calc.self_ideal_size.and_then(|s| s.width) {
                json.insert("width".into(), width.to_string().into());
            }
            if let Some(height) = calc.self_ideal_size.and_then(|s| s.height) {
                json.insert("height".into(), height.to_string().into());
            }
            if calc.min_size.is_some() || calc.max_size.is_some() {
                let min = calc.min_size.unwrap_or_default();
                let max = calc.max_size.unwrap_or_default();
                let mut size = Map::new();
                size.insert("minWidth".into(), length_or(min.width, DEFAULT_EDGES));
                size.insert("minHeight".into(), length_or(min.height, DEFAULT_EDGES));
                size.insert("maxWidth".into(), length_or(max.width, UNBOUNDED));
                size.insert("maxHeight".into(), length_or(max.height, UNBOUNDED));
                json.insert("constraintSize".into(), Value::Object(size));
            }
        }
        if let Some(alignment) = self.alignment {
            json.insert("align".into(), alignment.as_json_str().into());
        }
        if let Some(flex) = &self.flex_item_property {
            if let Some(grow) = flex.flex_grow {
                json.insert("flexGrow".into(), grow.into());
            }
            if let Some(shrink) = flex.flex_shrink {
                json.insert("flexShrink".into(), shrink.into());
            }
            if let Some(basis) = flex.flex_basis {
                json.insert("flexBasis".into(), basis.to_string().into());
            }
            if let Some(align) = flex.align_self {
                json.insert("alignSelf".into(), align.as_json_str().into());
            }
            if let Some(index) = flex.display_index {
                json.insert("displayPriority".into(), index.into());
            }
        }
        json
    }

    /// Apply a dump given as JSON text. Only the outer document is strict:
    /// text that is not a JSON object is an error, while bad values inside it
    /// are skipped as in [`from_json`](Self::from_json).
    pub fn from_json_str(&mut self, text: &str) -> Result<PropertyChangeFlag, TrellisError> {
        let json: Map<String, Value> =
            serde_json::from_str(text).map_err(|_| PropertyParseError::Malformed {
                property: "layoutProperty",
                value: text.to_string(),
            })?;
        Ok(self.from_json(&json))
    }

    /// Apply a dump produced by [`to_json_value`](Self::to_json_value).
    ///
    /// Keys that are missing or fail to parse leave the property unchanged.
    pub fn from_json(&mut self, json: &Map<String, Value>) -> PropertyChangeFlag {
        let mut flag = PropertyChangeFlag::NORMAL;
        let edges = |key: &'static str| {
            let text = json.get(key).and_then(Value::as_str)?;
            if text == DEFAULT_EDGES {
                return None;
            }
            match parse_edges_json(key, text) {
                Ok(edges) => Some(edges),
                Err(err) => {
                    debug!(%err, "ignoring {key}");
                    None
                }
            }
        };
        if let Some(padding) = edges("padding") {
            flag |= self.update_padding(padding);
        }
        if let Some(margin) = edges("margin") {
            flag |= self.update_margin(margin);
        }
        if let Some(border) = edges("borderWidth") {
            flag |= self.update_border_width(border);
        }
        if let Some(text) = json.get("visibility").and_then(Value::as_str) {
            flag |= self.update_visibility(VisibleType::from_json_str(text));
        }
        if let Some(text) = json.get("direction").and_then(Value::as_str) {
            flag |= self.update_layout_direction(TextDirection::from_json_str(text));
        }
        let ideal = CalcSize::new(parse_length(json, "width", ""), parse_length(json, "height", ""));
        if !ideal.is_null() {
            flag |= self.update_user_defined_ideal_size(ideal);
        }
        if let Some(Value::Object(size)) = json.get("constraintSize") {
            let min = CalcSize::new(
                parse_length(size, "minWidth", DEFAULT_EDGES),
                parse_length(size, "minHeight", DEFAULT_EDGES),
            );
            let max = CalcSize::new(
                parse_length(size, "maxWidth", UNBOUNDED),
                parse_length(size, "maxHeight", UNBOUNDED),
            );
            if !min.is_null() {
                flag |= self.update_calc_min_size(min);
            }
            if !max.is_null() {
                flag |= self.update_calc_max_size(max);
            }
        }
        if let Some(weight) = json.get("layoutWeight").and_then(Value::as_f64) {
            flag |= self.update_layout_weight(weight as f32);
        }
        if let Some(ratio) = json.get("aspectRatio").and_then(Value::as_f64) {
            flag |= self.update_aspect_ratio(ratio as f32);
        }
        if let Some(text) = json.get("align").and_then(Value::as_str) {
            flag |= self.update_alignment(Alignment::from_json_str(text));
        }
        if let Some(grow) = json.get("flexGrow").and_then(Value::as_f64) {
            flag |= self.update_flex_grow(grow as f32);
        }
        if let Some(shrink) = json.get("flexShrink").and_then(Value::as_f64) {
            flag |= self.update_flex_shrink(shrink as f32);
        }
        if let Some(basis) = parse_length(json, "flexBasis", "") {
            flag |= self.update_flex_basis(basis);
        }
        if let Some(text) = json.get("alignSelf").and_then(Value::as_str) {
            flag |= self.update_align_self(FlexAlign::from_json_str(text));
        }
        if let Some(index) = json.get("displayPriority").and_then(Value::as_i64) {
            match i32::try_from(index) {
                Ok(index) => flag |= self.update_display_index(index),
                Err(err) => debug!(%err, "ignoring displayPriority"),
            }
        }
        flag
    }
}

/// The length under `key`, or `None` when it is missing, equal to `unset`,
/// or fails to parse.
fn parse_length(json: &Map<String, Value>, key: &str, unset: &str) -> Option<CalcLength> {
    let text = json.get(key).and_then(Value::as_str)?;
    if text == unset {
        return None;
    }
    text.parse::<CalcLength>()
        .map_err(|err| debug!(%err, "ignoring {key}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_edges() {
        let edges = PaddingProperty::all(CalcLength::vp(10.0));
        assert_eq!(edges_to_json_string(Some(&edges)), "10.00vp");
        assert_eq!(edges_to_json_string(None), "0.00vp");
        assert_eq!(edges_to_json_string(Some(&PaddingProperty::default())), "0.00vp");
    }

    #[test]
    fn test_mixed_edges_omit_unset() {
        let edges = PaddingProperty {
            top: Some(CalcLength::vp(1.0)),
            left: Some(CalcLength::px(4.0)),
            ..Default::default()
        };
        insta::assert_snapshot!(edges_to_json_string(Some(&edges)), @r#"{"left":"4.00px","top":"1.00vp"}"#);
    }

    #[test]
    fn test_parse_edges_errors() {
        assert!(matches!(
            parse_edges_json("padding", r#"{"middle":"1px"}"#),
            Err(PropertyParseError::UnknownKey { .. })
        ));
        assert!(matches!(
            parse_edges_json("padding", "{not json"),
            Err(PropertyParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_edges_json("padding", r#"{"top":3}"#),
            Err(PropertyParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_edges_json("padding", "3em"),
            Err(PropertyParseError::Dimension(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut prop = LayoutProperty::new();
        prop.update_padding(PaddingProperty {
            top: Some(CalcLength::vp(1.0)),
            right: Some(CalcLength::px(2.0)),
            bottom: Some(CalcLength::percent(0.03)),
            left: Some(CalcLength::fp(4.0)),
        });
        prop.update_margin(PaddingProperty::all(CalcLength::vp(5.0)));
        prop.update_visibility(VisibleType::Invisible);
        prop.update_layout_direction(TextDirection::Rtl);

        let json = prop.to_json_value();
        let mut restored = LayoutProperty::new();
        let flag = restored.from_json(&json);
        assert!(flag.check_measure_flag());
        assert_eq!(restored.padding(), prop.padding());
        assert_eq!(restored.margin(), prop.margin());
        assert_eq!(restored.visibility(), VisibleType::Invisible);
        assert_eq!(restored.layout_direction(), Some(TextDirection::Rtl));
    }

    #[test]
    fn test_json_round_trip_sizes_and_flex() {
        let mut prop = LayoutProperty::new();
        prop.update_calc_min_size(CalcSize::new(Some(CalcLength::vp(10.0)), None));
        prop.update_calc_max_size(CalcSize::new(None, Some(CalcLength::px(300.0))));
        prop.update_flex_grow(2.0);
        prop.update_flex_shrink(0.5);
        prop.update_flex_basis(CalcLength::percent(0.25));
        prop.update_align_self(FlexAlign::Stretch);
        prop.update_display_index(3);

        let json = prop.to_json_value();
        let mut restored = LayoutProperty::new();
        restored.from_json(&json);
        assert_eq!(restored.calc_layout_constraint(), prop.calc_layout_constraint());
        assert_eq!(restored.flex_item_property(), prop.flex_item_property());
    }

    #[test]
    fn test_from_json_str() {
        let mut prop = LayoutProperty::new();
        let text = Value::Object(LayoutProperty::new().to_json_value()).to_string();
        assert_eq!(prop.from_json_str(&text).unwrap(), PropertyChangeFlag::MEASURE);

        let flag = prop.from_json_str(r#"{"padding":"4.00px","width":"oops"}"#).unwrap();
        assert_eq!(flag, PropertyChangeFlag::MEASURE);
        assert_eq!(prop.padding(), Some(&PaddingProperty::all(CalcLength::px(4.0))));

        let err = prop.from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, TrellisError::Property(PropertyParseError::Malformed { .. })));
        assert_eq!(err.to_string(), "Malformed layoutProperty value '[1, 2]'");
    }

    #[test]
    fn test_from_json_skips_bad_flex_values() {
        let json = serde_json::json!({
            "flexBasis": "wide",
            "alignSelf": "ItemAlign.Sideways",
            "displayPriority": 1u64 << 40,
            "constraintSize": { "minWidth": "0.00vp", "maxWidth": "Infinity" },
        });
        let Value::Object(map) = json else { unreachable!() };
        let mut prop = LayoutProperty::new();
        prop.from_json(&map);
        assert!(prop.calc_layout_constraint().is_none());
        let flex = prop.flex_item_property().unwrap();
        assert_eq!(flex.flex_basis, None);
        assert_eq!(flex.align_self, Some(FlexAlign::Auto));
        assert_eq!(flex.display_index, None);
    }

    #[test]
    fn test_json_dump() {
        let mut prop = LayoutProperty::new();
        prop.update_aspect_ratio(2.0);
        prop.update_calc_max_size(CalcSize::new(Some(CalcLength::vp(100.0)), None));
        prop.update_alignment(Alignment::TOP_LEFT);
        let json = Value::Object(prop.to_json_value());
        insta::assert_json_snapshot!(json, @r###"
        {
          "align": "Alignment.TopStart",
          "aspectRatio": 2.0,
          "constraintSize": {
            "maxHeight": "Infinity",
            "maxWidth": "100.00vp",
            "minHeight": "0.00vp",
            "minWidth": "0.00vp"
          },
          "direction": "Direction.Ltr",
          "margin": "0.00vp",
          "padding": "0.00vp",
          "visibility": "Visibility.Visible"
        }
        "###);
    }

    #[test]
    fn test_from_json_skips_defaults_and_garbage() {
        let mut prop = LayoutProperty::new();
        let json = serde_json::json!({
            "padding": "0.00vp",
            "margin": "{bad",
            "width": "12.00vp",
        });
        let Value::Object(map) = json else { unreachable!() };
        let flag = prop.from_json(&map);
        assert_eq!(flag, PropertyChangeFlag::MEASURE);
        assert!(prop.padding().is_none());
        assert!(prop.margin().is_none());
        assert!(prop.has_fixed_width());
    }
}

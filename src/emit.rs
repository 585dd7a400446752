//! Polygon list → `var polyImg = [...];` declaration.

use crate::config::NumberFormat;
use crate::encode::encode_points;
use crate::error::ConvertError;
use crate::polygon::Polygon;

/// Render `polygons` as a device-side array of `{fill, stroke, points}`
/// map literals, one per line.
pub fn emit(polygons: &[Polygon], format: NumberFormat) -> Result<String, ConvertError> {
    let records = polygons
        .iter()
        .map(|polygon| emit_polygon(polygon, format))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("var polyImg = [\n{}\n];", records.join(",\n")))
}

fn emit_polygon(polygon: &Polygon, format: NumberFormat) -> Result<String, ConvertError> {
    let mut fields = Vec::with_capacity(3);
    if let Some(fill) = polygon.fill {
        fields.push(format!("fill: \"{}\"", fill));
    }
    if let Some(stroke) = polygon.stroke {
        fields.push(format!("stroke: \"{}\"", stroke));
    }
    fields.push(format!(
        "points: {}",
        encode_points(&polygon.coordinates(), format)?
    ));
    Ok(format!("  {{{}}}", fields.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use kurbo::Point;

    fn triangle(fill: Option<Color>, stroke: Option<Color>) -> Polygon {
        Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 1.5)],
            fill,
            stroke,
        }
    }

    #[test]
    fn empty_list() {
        assert_eq!(emit(&[], NumberFormat::Int).unwrap(), "var polyImg = [\n\n];");
    }

    #[test]
    fn fields_in_order() {
        let polys = [
            triangle(Some(Color([255, 0, 0])), None),
            triangle(Some(Color([0, 0, 0])), Some(Color([0, 0, 255]))),
        ];
        let out = emit(&polys, NumberFormat::Decimal).unwrap();
        assert_eq!(
            out,
            "var polyImg = [\n\
             \x20 {fill: \"#ff0000\", points: [0,0,2,0,1,1.5]},\n\
             \x20 {fill: \"#000000\", stroke: \"#0000ff\", points: [0,0,2,0,1,1.5]}\n\
             ];"
        );
    }

    #[test]
    fn packed_points() {
        let out = emit(&[triangle(None, Some(Color([1, 1, 1])))], NumberFormat::Int).unwrap();
        // 1.5 rounds up to 2: [0, 0, 2, 0, 1, 2]
        assert_eq!(
            out,
            "var polyImg = [\n  {stroke: \"#010101\", points: new Uint8Array(E.toArrayBuffer(atob(\"AAACAAEC\")))}\n];"
        );
    }

    #[test]
    fn encoding_errors_propagate() {
        let mut poly = triangle(Some(Color([0, 0, 0])), None);
        poly.points.push(Point::new(1e12, 0.0));
        assert!(matches!(
            emit(&[poly], NumberFormat::Int),
            Err(ConvertError::RangeExceeded { .. })
        ));
    }
}

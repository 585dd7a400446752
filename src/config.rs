use std::convert::Infallible;
use std::str::FromStr;

/// All conversion parameters in one struct.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    // -- Flattening --
    /// Simplification distance threshold, in document units.
    /// 0 disables simplification entirely.
    pub tolerance: f64,
    /// Number of uniform parameter steps used to sample each cubic curve
    /// before simplification.
    pub sample_count: usize,
    /// Upper bound on the total number of sampled curve points in one
    /// conversion. `None` = unbounded.
    pub sample_budget: Option<usize>,
    /// Upper bound on the node count of the tree after reuse expansion.
    /// `None` = unbounded.
    pub node_budget: Option<usize>,
    /// Reserved per-polygon point cap. Carried for option compatibility;
    /// no stage enforces it yet.
    pub max_points: usize,

    // -- Output space --
    /// Uniform multiplier applied to the whole document and to the origin.
    pub scale: f64,
    /// Origin X, in unscaled document units. Subtracted from every point.
    pub origin_x: f64,
    /// Origin Y, in unscaled document units.
    pub origin_y: f64,

    // -- Emission --
    pub number_format: NumberFormat,
}

/// How polygon coordinates are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Narrowest exact integer array, base64-packed.
    Int,
    /// 32-bit float array, base64-packed.
    Float,
    /// Plain decimal list, 3 decimal places.
    Decimal,
}

impl FromStr for NumberFormat {
    type Err = Infallible;

    /// "int" and "float" select the packed encodings; any other name
    /// selects the plain decimal list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "int" => NumberFormat::Int,
            "float" => NumberFormat::Float,
            _ => NumberFormat::Decimal,
        })
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            sample_count: 1000,
            sample_budget: None,
            node_budget: None,
            max_points: 63,
            scale: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            number_format: NumberFormat::Int,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_names() {
        assert_eq!("int".parse::<NumberFormat>(), Ok(NumberFormat::Int));
        assert_eq!("float".parse::<NumberFormat>(), Ok(NumberFormat::Float));
        assert_eq!("json".parse::<NumberFormat>(), Ok(NumberFormat::Decimal));
    }

    #[test]
    fn defaults_match_option_defaults() {
        let config = ConvertConfig::default();
        assert_eq!(config.tolerance, 0.0);
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.sample_count, 1000);
        assert_eq!(config.max_points, 63);
        assert_eq!(config.number_format, NumberFormat::Int);
    }
}

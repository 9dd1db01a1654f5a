use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::Result;

/// Column names the models were trained with. Predictors resolve their
/// features by these names, so they must match the training schema exactly.
pub mod columns {
    pub const GR_LIV_AREA: &str = "GrLivArea";
    pub const LOT_AREA: &str = "LotArea";
    pub const TOTAL_BSMT_SF: &str = "TotalBsmtSF";
    pub const BEDROOM_ABV_GR: &str = "BedroomAbvGr";
    pub const FULL_BATH: &str = "FullBath";
    pub const TOT_RMS_ABV_GRD: &str = "TotRmsAbvGrd";
    pub const OVERALL_QUAL: &str = "OverallQual";
    pub const OVERALL_COND: &str = "OverallCond";
    pub const KITCHEN_QUAL: &str = "KitchenQual";
    pub const GARAGE_CARS: &str = "GarageCars";
    pub const GARAGE_AREA: &str = "GarageArea";
    pub const NEIGHBORHOOD: &str = "Neighborhood";
}

/// Closed set of neighborhood codes from the training data. Anything outside
/// this set is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    Blmngtn,
    Blueste,
    BrDale,
    BrkSide,
    ClearCr,
    CollgCr,
    Crawfor,
    Edwards,
    Gilbert,
    IDOTRR,
    MeadowV,
    Mitchel,
    NAmes,
    NPkVill,
    NWAmes,
    NoRidge,
    NridgHt,
    OldTown,
    SWISU,
    Sawyer,
    SawyerW,
    Somerst,
    StoneBr,
    Timber,
    Veenker,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 25] = [
        Neighborhood::Blmngtn,
        Neighborhood::Blueste,
        Neighborhood::BrDale,
        Neighborhood::BrkSide,
        Neighborhood::ClearCr,
        Neighborhood::CollgCr,
        Neighborhood::Crawfor,
        Neighborhood::Edwards,
        Neighborhood::Gilbert,
        Neighborhood::IDOTRR,
        Neighborhood::MeadowV,
        Neighborhood::Mitchel,
        Neighborhood::NAmes,
        Neighborhood::NPkVill,
        Neighborhood::NWAmes,
        Neighborhood::NoRidge,
        Neighborhood::NridgHt,
        Neighborhood::OldTown,
        Neighborhood::SWISU,
        Neighborhood::Sawyer,
        Neighborhood::SawyerW,
        Neighborhood::Somerst,
        Neighborhood::StoneBr,
        Neighborhood::Timber,
        Neighborhood::Veenker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Neighborhood::Blmngtn => "Blmngtn",
            Neighborhood::Blueste => "Blueste",
            Neighborhood::BrDale => "BrDale",
            Neighborhood::BrkSide => "BrkSide",
            Neighborhood::ClearCr => "ClearCr",
            Neighborhood::CollgCr => "CollgCr",
            Neighborhood::Crawfor => "Crawfor",
            Neighborhood::Edwards => "Edwards",
            Neighborhood::Gilbert => "Gilbert",
            Neighborhood::IDOTRR => "IDOTRR",
            Neighborhood::MeadowV => "MeadowV",
            Neighborhood::Mitchel => "Mitchel",
            Neighborhood::NAmes => "NAmes",
            Neighborhood::NPkVill => "NPkVill",
            Neighborhood::NWAmes => "NWAmes",
            Neighborhood::NoRidge => "NoRidge",
            Neighborhood::NridgHt => "NridgHt",
            Neighborhood::OldTown => "OldTown",
            Neighborhood::SWISU => "SWISU",
            Neighborhood::Sawyer => "Sawyer",
            Neighborhood::SawyerW => "SawyerW",
            Neighborhood::Somerst => "Somerst",
            Neighborhood::StoneBr => "StoneBr",
            Neighborhood::Timber => "Timber",
            Neighborhood::Veenker => "Veenker",
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Neighborhood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Neighborhood::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown neighborhood code '{}'", s)))
    }
}

/// A single cell of an input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}

/// A single-row record of column name to value, assembled fresh for each
/// prediction and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct InputRecord {
    cells: BTreeMap<String, Value>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.cells.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_number)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Constraints and default of one numeric input, used both to render the
/// form and to validate submissions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Training-time column name
    pub column: &'static str,
    /// JSON/CLI parameter name
    pub param: &'static str,
    pub label: &'static str,
    pub min: f64,
    /// Bounded fields render as sliders, unbounded ones as number inputs
    pub max: Option<f64>,
    pub default: f64,
}

pub const NUMERIC_FIELDS: [FieldSpec; 11] = [
    FieldSpec {
        column: columns::GR_LIV_AREA,
        param: "gr_liv_area",
        label: "Building area (sqft)",
        min: 0.0,
        max: None,
        default: 1500.0,
    },
    FieldSpec {
        column: columns::LOT_AREA,
        param: "lot_area",
        label: "Lot area (sqft)",
        min: 0.0,
        max: None,
        default: 5000.0,
    },
    FieldSpec {
        column: columns::TOTAL_BSMT_SF,
        param: "total_bsmt_sf",
        label: "Basement area (sqft)",
        min: 0.0,
        max: None,
        default: 1000.0,
    },
    FieldSpec {
        column: columns::BEDROOM_ABV_GR,
        param: "bedroom_abv_gr",
        label: "Bedrooms",
        min: 0.0,
        max: None,
        default: 3.0,
    },
    FieldSpec {
        column: columns::FULL_BATH,
        param: "full_bath",
        label: "Full bathrooms",
        min: 0.0,
        max: None,
        default: 2.0,
    },
    FieldSpec {
        column: columns::TOT_RMS_ABV_GRD,
        param: "tot_rms_abv_grd",
        label: "Total rooms",
        min: 0.0,
        max: None,
        default: 6.0,
    },
    FieldSpec {
        column: columns::OVERALL_QUAL,
        param: "overall_qual",
        label: "Overall quality (1-10)",
        min: 1.0,
        max: Some(10.0),
        default: 5.0,
    },
    FieldSpec {
        column: columns::OVERALL_COND,
        param: "overall_cond",
        label: "Overall condition (1-10)",
        min: 1.0,
        max: Some(10.0),
        default: 5.0,
    },
    FieldSpec {
        column: columns::KITCHEN_QUAL,
        param: "kitchen_qual",
        label: "Kitchen quality (1-5)",
        min: 1.0,
        max: Some(5.0),
        default: 3.0,
    },
    FieldSpec {
        column: columns::GARAGE_CARS,
        param: "garage_cars",
        label: "Garage capacity (cars)",
        min: 0.0,
        max: None,
        default: 2.0,
    },
    FieldSpec {
        column: columns::GARAGE_AREA,
        param: "garage_area",
        label: "Garage area (sqft)",
        min: 0.0,
        max: None,
        default: 400.0,
    },
];

/// The form payload: every house attribute the models were trained on.
/// Omitted fields fall back to the same defaults the form renders with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseInput {
    pub gr_liv_area: f64,
    pub lot_area: f64,
    pub total_bsmt_sf: f64,
    pub bedroom_abv_gr: u32,
    pub full_bath: u32,
    pub tot_rms_abv_grd: u32,
    pub overall_qual: u8,
    pub overall_cond: u8,
    pub kitchen_qual: u8,
    pub garage_cars: u32,
    pub garage_area: f64,
    pub neighborhood: Neighborhood,
}

impl Default for HouseInput {
    fn default() -> Self {
        Self {
            gr_liv_area: 1500.0,
            lot_area: 5000.0,
            total_bsmt_sf: 1000.0,
            bedroom_abv_gr: 3,
            full_bath: 2,
            tot_rms_abv_grd: 6,
            overall_qual: 5,
            overall_cond: 5,
            kitchen_qual: 3,
            garage_cars: 2,
            garage_area: 400.0,
            neighborhood: Neighborhood::Blmngtn,
        }
    }
}

impl HouseInput {
    /// Check every field against its stated bounds, naming the first field
    /// that violates them.
    pub fn validate(&self) -> Result<()> {
        let areas = [
            ("gr_liv_area", self.gr_liv_area),
            ("lot_area", self.lot_area),
            ("total_bsmt_sf", self.total_bsmt_sf),
            ("garage_area", self.garage_area),
        ];
        for (name, value) in areas {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!("{} must be a finite number", name)));
            }
            if value < 0.0 {
                return Err(Error::InvalidInput(format!("{} must not be negative", name)));
            }
        }
        let scores = [
            ("overall_qual", self.overall_qual, 10),
            ("overall_cond", self.overall_cond, 10),
            ("kitchen_qual", self.kitchen_qual, 5),
        ];
        for (name, value, max) in scores {
            if value < 1 || value > max {
                return Err(Error::InvalidInput(format!(
                    "{} must be between 1 and {}",
                    name, max
                )));
            }
        }
        Ok(())
    }

    /// Assemble the single-row record the predictors consume, keyed by the
    /// training-time column names.
    pub fn to_record(&self) -> InputRecord {
        let mut record = InputRecord::new();
        record.set(columns::GR_LIV_AREA, Value::Number(self.gr_liv_area));
        record.set(columns::LOT_AREA, Value::Number(self.lot_area));
        record.set(columns::TOTAL_BSMT_SF, Value::Number(self.total_bsmt_sf));
        record.set(
            columns::BEDROOM_ABV_GR,
            Value::Number(f64::from(self.bedroom_abv_gr)),
        );
        record.set(columns::FULL_BATH, Value::Number(f64::from(self.full_bath)));
        record.set(
            columns::TOT_RMS_ABV_GRD,
            Value::Number(f64::from(self.tot_rms_abv_grd)),
        );
        record.set(
            columns::OVERALL_QUAL,
            Value::Number(f64::from(self.overall_qual)),
        );
        record.set(
            columns::OVERALL_COND,
            Value::Number(f64::from(self.overall_cond)),
        );
        record.set(
            columns::KITCHEN_QUAL,
            Value::Number(f64::from(self.kitchen_qual)),
        );
        record.set(
            columns::GARAGE_CARS,
            Value::Number(f64::from(self.garage_cars)),
        );
        record.set(columns::GARAGE_AREA, Value::Number(self.garage_area));
        record.set(
            columns::NEIGHBORHOOD,
            Value::Text(self.neighborhood.as_str().to_string()),
        );
        record
    }
}

/// Format an estimate as dollars with two decimals, e.g. `$1,234,567.89`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_set_is_closed() {
        assert_eq!(Neighborhood::ALL.len(), 25);
        for n in Neighborhood::ALL {
            assert_eq!(n.as_str().parse::<Neighborhood>().unwrap(), n);
        }
        assert!("Downtown".parse::<Neighborhood>().is_err());
        assert!(serde_json::from_str::<Neighborhood>("\"Downtown\"").is_err());
    }

    #[test]
    fn defaults_match_the_form() {
        let input = HouseInput::default();
        assert_eq!(input.gr_liv_area, 1500.0);
        assert_eq!(input.lot_area, 5000.0);
        assert_eq!(input.total_bsmt_sf, 1000.0);
        assert_eq!(input.bedroom_abv_gr, 3);
        assert_eq!(input.full_bath, 2);
        assert_eq!(input.tot_rms_abv_grd, 6);
        assert_eq!(input.overall_qual, 5);
        assert_eq!(input.overall_cond, 5);
        assert_eq!(input.kitchen_qual, 3);
        assert_eq!(input.garage_cars, 2);
        assert_eq!(input.garage_area, 400.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let mut input = HouseInput {
            gr_liv_area: 0.0,
            lot_area: 0.0,
            total_bsmt_sf: 0.0,
            bedroom_abv_gr: 0,
            full_bath: 0,
            tot_rms_abv_grd: 0,
            overall_qual: 1,
            overall_cond: 1,
            kitchen_qual: 1,
            garage_cars: 0,
            garage_area: 0.0,
            neighborhood: Neighborhood::Veenker,
        };
        assert!(input.validate().is_ok());

        input.overall_qual = 10;
        input.overall_cond = 10;
        input.kitchen_qual = 5;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn out_of_bounds_values_are_rejected() {
        let mut input = HouseInput::default();
        input.overall_qual = 11;
        assert!(input.validate().is_err());

        let mut input = HouseInput::default();
        input.kitchen_qual = 0;
        assert!(input.validate().is_err());

        let mut input = HouseInput::default();
        input.lot_area = -1.0;
        assert!(input.validate().is_err());

        let mut input = HouseInput::default();
        input.garage_area = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn record_uses_training_column_names() {
        let record = HouseInput::default().to_record();
        assert_eq!(record.len(), NUMERIC_FIELDS.len() + 1);
        for field in NUMERIC_FIELDS {
            assert!(record.number(field.column).is_some(), "{}", field.column);
        }
        assert_eq!(record.text(columns::NEIGHBORHOOD), Some("Blmngtn"));
        assert_eq!(record.number(columns::GR_LIV_AREA), Some(1500.0));
    }

    #[test]
    fn omitted_payload_fields_fall_back_to_defaults() {
        let input: HouseInput =
            serde_json::from_str(r#"{"gr_liv_area": 2000, "neighborhood": "NAmes"}"#).unwrap();
        assert_eq!(input.gr_liv_area, 2000.0);
        assert_eq!(input.neighborhood, Neighborhood::NAmes);
        assert_eq!(input.lot_area, 5000.0);
        assert_eq!(input.overall_qual, 5);
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.5), "$5.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(184250.0), "$184,250.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-12500.75), "-$12,500.75");
    }
}

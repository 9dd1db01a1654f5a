pub mod error;
pub mod predictor;
pub mod types;

pub use error::Error;
pub use predictor::Predictor;
pub use types::{
    format_currency, FieldSpec, HouseInput, InputRecord, Neighborhood, Value, NUMERIC_FIELDS,
};
pub type Result<T> = std::result::Result<T, Error>;

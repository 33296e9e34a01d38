use thiserror::Error;

pub type EfResult<T> = Result<T, EfError>;

/// Numeric-level errors shared by all epiflow crates.
///
/// Domain errors (dimension mismatches, bad distribution bounds, ...) live in
/// the crate that owns the concept; this type only covers raw scalar checks.
#[derive(Error, Debug)]
pub enum EfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value out of range for {what}: {value} not in [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Checks that a numerical value is in the provided interval `[a,b]` and returns
/// early with [`Error::InvalidConfig`](crate::error::Error::InvalidConfig) if not
///
/// NaN is never in any interval.
///
/// ### Example
/// ```
/// # use qlearn::{ensure_interval, error::Result};
/// fn check(value: f64) -> Result<()> {
///     ensure_interval!(value, 0.0, 1.0);
///     Ok(())
/// }
/// assert!(check(0.5).is_ok());
/// assert!(check(2.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        let value = $var;
        if !(value >= $a && value <= $b) {
            return Err($crate::error::Error::InvalidConfig(format!(
                "invalid value {} for `{}`, must be in the interval [{}, {}]",
                value,
                stringify!($var),
                $a,
                $b,
            )));
        }
    };
}

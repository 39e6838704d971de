//! Math functions

use crate::error::{FormulaError, FormulaResult};

fn arg(args: &[f64], index: usize, function: &str) -> FormulaResult<f64> {
    args.get(index)
        .copied()
        .ok_or_else(|| FormulaError::Argument(format!("{} is missing argument {}", function, index + 1)))
}

fn domain_checked(value: f64, function: &str) -> FormulaResult<f64> {
    if value.is_nan() {
        Err(FormulaError::Domain(function.to_string()))
    } else {
        Ok(value)
    }
}

/// Round half to even, the rounding used by the formulas' historical host.
pub fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    }
}

/// SQRT function
pub fn fn_sqrt(args: &[f64]) -> FormulaResult<f64> {
    let x = arg(args, 0, "sqrt")?;
    if x < 0.0 {
        return Err(FormulaError::Domain("sqrt".into()));
    }
    Ok(x.sqrt())
}

/// POW function
pub fn fn_pow(args: &[f64]) -> FormulaResult<f64> {
    let base = arg(args, 0, "pow")?;
    let exponent = arg(args, 1, "pow")?;
    if base == 0.0 && exponent < 0.0 {
        return Err(FormulaError::Domain("pow".into()));
    }
    domain_checked(base.powf(exponent), "pow")
}

/// CEIL function
pub fn fn_ceil(args: &[f64]) -> FormulaResult<f64> {
    Ok(arg(args, 0, "ceil")?.ceil())
}

/// FLOOR function
pub fn fn_floor(args: &[f64]) -> FormulaResult<f64> {
    Ok(arg(args, 0, "floor")?.floor())
}

/// ABS function
pub fn fn_abs(args: &[f64]) -> FormulaResult<f64> {
    Ok(arg(args, 0, "abs")?.abs())
}

/// ROUND function
///
/// `round(x)` rounds half to even; `round(x, n)` does the same at `n`
/// decimals (negative `n` rounds to tens, hundreds, ...).
pub fn fn_round(args: &[f64]) -> FormulaResult<f64> {
    let number = arg(args, 0, "round")?;

    let Some(&digits) = args.get(1) else {
        return Ok(round_half_even(number));
    };
    if digits.fract() != 0.0 {
        return Err(FormulaError::Argument(
            "round digits must be an integer".into(),
        ));
    }

    let multiplier = 10_f64.powi(digits as i32);
    Ok(round_half_even(number * multiplier) / multiplier)
}

/// MIN function
pub fn fn_min(args: &[f64]) -> FormulaResult<f64> {
    args.iter()
        .copied()
        .reduce(f64::min)
        .ok_or_else(|| FormulaError::Argument("min of nothing".into()))
}

/// MAX function
pub fn fn_max(args: &[f64]) -> FormulaResult<f64> {
    args.iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| FormulaError::Argument("max of nothing".into()))
}

/// SIN function
pub fn fn_sin(args: &[f64]) -> FormulaResult<f64> {
    domain_checked(arg(args, 0, "sin")?.sin(), "sin")
}

/// COS function
pub fn fn_cos(args: &[f64]) -> FormulaResult<f64> {
    domain_checked(arg(args, 0, "cos")?.cos(), "cos")
}

/// TAN function
pub fn fn_tan(args: &[f64]) -> FormulaResult<f64> {
    domain_checked(arg(args, 0, "tan")?.tan(), "tan")
}

/// LOG function, natural or with an explicit base
pub fn fn_log(args: &[f64]) -> FormulaResult<f64> {
    let x = arg(args, 0, "log")?;
    if x <= 0.0 {
        return Err(FormulaError::Domain("log".into()));
    }

    match args.get(1) {
        None => Ok(x.ln()),
        Some(&base) if base <= 0.0 => Err(FormulaError::Domain("log".into())),
        Some(&base) if base == 1.0 => Err(FormulaError::DivisionByZero),
        Some(&base) => Ok(x.ln() / base.ln()),
    }
}

/// LOG10 function
pub fn fn_log10(args: &[f64]) -> FormulaResult<f64> {
    let x = arg(args, 0, "log10")?;
    if x <= 0.0 {
        return Err(FormulaError::Domain("log10".into()));
    }
    Ok(x.log10())
}

/// EXP function
pub fn fn_exp(args: &[f64]) -> FormulaResult<f64> {
    Ok(arg(args, 0, "exp")?.exp())
}

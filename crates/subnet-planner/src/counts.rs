//! Exact address counts and their display
//!
//! Counts can reach 2^128, so they are carried as [`BigUint`] or as decimal
//! text and never pass through floating point except for the final
//! utilization percentage.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::range::parse_cidr;
use crate::Result;

/// Largest integer a double represents exactly (2^53 - 1)
pub const SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Parse a non-negative decimal count, ignoring surrounding whitespace
pub fn parse_count(text: &str) -> Option<BigUint> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Display form of a count
///
/// Up to [`SAFE_INTEGER`] the digits are grouped in thousands
/// (`1,048,576`). Above it, scientific notation from the three leading
/// digits, truncated and with trailing zeros dropped (`1.84e19`).
pub fn format_count(value: &BigUint) -> String {
    let digits = value.to_str_radix(10);
    if *value <= BigUint::from(SAFE_INTEGER) {
        return group_thousands(&digits);
    }

    let exponent = digits.len() - 1;
    let mantissa = format!("{}.{}", &digits[..1], &digits[1..3]);
    let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{}e{}", mantissa, exponent)
}

/// Display form of count text
///
/// Empty text shows as `0`. Finite numbers in the safe range are floored and
/// grouped, larger integers use [`format_count`], anything else is returned
/// as given.
pub fn format_count_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "0".to_string();
    }
    if let Some(value) = parse_count(trimmed) {
        return format_count(&value);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n.abs() <= SAFE_INTEGER as f64 => {
            let floored = n.floor();
            let grouped = group_thousands(&format!("{}", floored.abs() as u64));
            if floored < 0.0 {
                format!("-{}", grouped)
            } else {
                grouped
            }
        }
        _ => text.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Exact sum of count texts as a decimal string; unparseable entries count as zero
pub fn sum_counts<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|v| parse_count(v.as_ref()))
        .sum::<BigUint>()
        .to_string()
}

/// Numeric ordering of count texts; unparseable values sort after all numbers
pub fn compare_counts(a: &str, b: &str) -> Ordering {
    match (parse_count(a), parse_count(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `used / total` as a percentage in `[0, 100]`, floored to two decimals
///
/// Returns 0 for an empty total and 100 once `used` reaches `total`.
pub fn utilization_percent(total: &BigUint, used: &BigUint) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    if used >= total {
        return 100.0;
    }
    let basis_points = (used * 10_000u32) / total;
    basis_points.to_f64().unwrap_or(0.0) / 100.0
}

/// [`utilization_percent`] over count texts; unparseable input yields 0
pub fn utilization_percent_text(total: &str, used: &str) -> f64 {
    match (parse_count(total), parse_count(used)) {
        (Some(total), Some(used)) => utilization_percent(&total, &used),
        _ => 0.0,
    }
}

/// Address count of a CIDR as decimal text, `"0"` when the CIDR is invalid
pub fn total_ips_for_cidr(cidr: &str) -> String {
    parse_cidr(cidr)
        .map(|c| c.size().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Occupancy of one pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolUsage {
    #[serde(with = "decimal")]
    pub total: BigUint,
    #[serde(with = "decimal")]
    pub used: BigUint,
    #[serde(with = "decimal")]
    pub available: BigUint,
    pub percent: f64,
}

/// Usage of `pool_cidr`: its direct child pools plus the blocks allocated in it
///
/// Invalid child CIDRs and unparseable block totals count as zero.
pub fn pool_usage<C, B>(pool_cidr: &str, child_pool_cidrs: C, block_totals: B) -> Result<PoolUsage>
where
    C: IntoIterator,
    C::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
{
    let total = parse_cidr(pool_cidr)?.size();
    let children = sum_counts(child_pool_cidrs.into_iter().map(|c| total_ips_for_cidr(c.as_ref())));
    let blocks = sum_counts(block_totals);
    let used = parse_count(&sum_counts([children, blocks])).unwrap_or_default();

    let available = if used >= total {
        BigUint::zero()
    } else {
        &total - &used
    };
    let percent = utilization_percent(&total, &used);
    Ok(PoolUsage {
        total,
        used,
        available,
        percent,
    })
}

/// Serde adapter: [`BigUint`] as a decimal string
///
/// Deserialization also takes plain unsigned integers.
pub(crate) mod decimal {
    use std::fmt;

    use num_bigint::BigUint;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CountVisitor)
    }

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = BigUint;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigUint, E> {
            Ok(BigUint::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigUint, E> {
            u64::try_from(v)
                .map(BigUint::from)
                .map_err(|_| E::custom(format!("negative count {}", v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigUint, E> {
            super::parse_count(v).ok_or_else(|| E::custom(format!("invalid count '{}'", v)))
        }
    }
}

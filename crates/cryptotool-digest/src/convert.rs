//! Integer base conversion

use crate::error::{DigestError, DigestResult};

/// One integer in the four bases the CLI prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversions {
    pub bin: String,
    pub oct: String,
    pub dec: String,
    pub hex: String,
}

/// Parse `input` and render it in binary, octal, decimal and hex.
///
/// Accepts an optional sign, then decimal digits or a `0x` / `0o` / `0b`
/// prefixed literal (case-insensitive), with `_` allowed as a separator.
/// Negative values keep their sign in every base. Magnitudes up to
/// `u128::MAX` are supported.
pub fn convert_int(input: &str) -> DigestResult<Conversions> {
    let invalid = |reason: &str| DigestError::InvalidNumber {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, lower.as_str())
    };

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() {
        return Err(invalid("no digits"));
    }
    if digits.starts_with(['+', '-']) {
        return Err(invalid("sign must precede the base prefix"));
    }

    let magnitude = u128::from_str_radix(&digits, radix).map_err(|e| invalid(&e.to_string()))?;
    let sign = if negative && magnitude != 0 { "-" } else { "" };

    Ok(Conversions {
        bin: format!("{sign}{magnitude:b}"),
        oct: format!("{sign}{magnitude:o}"),
        dec: format!("{sign}{magnitude}"),
        hex: format!("{sign}{magnitude:x}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_input() {
        let c = convert_int("255").unwrap();
        assert_eq!(c.bin, "11111111");
        assert_eq!(c.oct, "377");
        assert_eq!(c.dec, "255");
        assert_eq!(c.hex, "ff");
    }

    #[test]
    fn prefixed_inputs_agree() {
        let expected = convert_int("255").unwrap();
        for input in ["0xff", "0XFF", "0o377", "0b1111_1111", " 255\n", "+255"] {
            assert_eq!(convert_int(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn binary_input() {
        let c = convert_int("0b1010").unwrap();
        assert_eq!(c.dec, "10");
        assert_eq!(c.hex, "a");
    }

    #[test]
    fn negative_values() {
        let c = convert_int("-10").unwrap();
        assert_eq!(c.bin, "-1010");
        assert_eq!(c.oct, "-12");
        assert_eq!(c.dec, "-10");
        assert_eq!(c.hex, "-a");

        assert_eq!(convert_int("-0").unwrap().dec, "0");
    }

    #[test]
    fn zero() {
        let c = convert_int("0").unwrap();
        assert_eq!((c.bin.as_str(), c.oct.as_str(), c.hex.as_str()), ("0", "0", "0"));
    }

    #[test]
    fn large_values() {
        let c = convert_int("340282366920938463463374607431768211455").unwrap();
        assert_eq!(c.hex, "f".repeat(32));
        assert!(convert_int("340282366920938463463374607431768211456").is_err());
    }

    #[test]
    fn invalid_inputs() {
        for input in ["", "-", "0x", "12a", "0b102", "0x-1", "--1", "1.5"] {
            let err = convert_int(input).unwrap_err();
            assert!(
                matches!(err, DigestError::InvalidNumber { .. }),
                "input {input:?} must be rejected"
            );
        }
    }
}

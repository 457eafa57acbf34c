use std::fmt;

/// Kernel size used when the blur input is missing, malformed or non-positive.
pub const DEFAULT_BLUR_KSIZE: u64 = 151;
pub const DEFAULT_BLUR_INPUT: &str = "151";
pub const DEFAULT_MOSAIC_INPUT: &str = "0.06";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionMethod {
    #[default]
    Blur,
    Pixelate,
}

impl RedactionMethod {
    /// Wire name expected by the redaction backend.
    pub fn as_str(self) -> &'static str {
        match self {
            RedactionMethod::Blur => "blur",
            RedactionMethod::Pixelate => "pixelate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "blur" => Some(RedactionMethod::Blur),
            "pixelate" => Some(RedactionMethod::Pixelate),
            _ => None,
        }
    }
}

impl fmt::Display for RedactionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters sent with one redaction request. Recomputed from raw input
/// right before each request and never stored between requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedactionParameters {
    pub method: RedactionMethod,
    /// Always positive and odd.
    pub blur_kernel_size: u64,
    /// Passed through as parsed, including non-positive and NaN values.
    pub mosaic_scale: f64,
}

/// Normalize raw user input into a usable parameter set. Never fails.
pub fn normalize(method: RedactionMethod, raw_blur: &str, raw_mosaic: &str) -> RedactionParameters {
    RedactionParameters {
        method,
        blur_kernel_size: normalize_blur(raw_blur),
        mosaic_scale: parse_leading_float(raw_mosaic).unwrap_or(f64::NAN),
    }
}

fn normalize_blur(raw: &str) -> u64 {
    match parse_leading_int(raw).and_then(|value| u64::try_from(value).ok()) {
        Some(size) if size > 0 && size % 2 == 0 => size + 1,
        Some(size) if size > 0 => size,
        _ => DEFAULT_BLUR_KSIZE,
    }
}

/// Parses the integer prefix of `raw`: `" 12px"` is 12, `"3.9"` is 3.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Parses the decimal prefix of `raw`, accepting an optional exponent.
/// A bare `Infinity` (optionally signed) is accepted as well.
fn parse_leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(trimmed.starts_with(['+', '-']));
    if trimmed[end..].starts_with("Infinity") {
        return Some(if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

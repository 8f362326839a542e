/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds `value` to `scale` decimal places, ties away from zero.
///
/// Works on the shortest decimal representation of `value` rather than on its
/// binary expansion, so `4.255` rounds to `4.26` even though the nearest `f64`
/// is slightly below `4.255`.
pub fn round_half_up(value: f64, scale: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = value.to_string();
    let (negative, digits) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let scale = scale as usize;

    if frac_part.len() <= scale {
        return value;
    }

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(scale))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes()[scale] >= b'5' {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, 1);
        }
    }

    let split = kept.len() - scale;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let sign = if negative { "-" } else { "" };
    let text = if scale == 0 {
        format!("{sign}{}", render(&kept))
    } else {
        format!("{sign}{}.{}", render(&kept[..split]), render(&kept[split..]))
    };

    text.parse().unwrap_or(value)
}

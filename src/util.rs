/// Parse `s` as a number, or `None` if it isn't one.
pub fn to_num_or_null(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `"true"`/`"false"` in any case, otherwise `None`.
pub fn to_bool_or_null(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers() {
        assert_eq!(to_num_or_null("15"), Some(15.0));
        assert_eq!(to_num_or_null(" 2.5 "), Some(2.5));
        assert_eq!(to_num_or_null("test"), None);
        assert_eq!(to_num_or_null(""), None);
        assert_eq!(to_num_or_null("NaN"), None);
    }

    #[test]
    fn parses_booleans() {
        assert_eq!(to_bool_or_null("true"), Some(true));
        assert_eq!(to_bool_or_null("FALSE"), Some(false));
        assert_eq!(to_bool_or_null("test"), None);
    }
}

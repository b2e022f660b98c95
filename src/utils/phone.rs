/// Normalizes a phone number to E.164 before it is handed to a messaging
/// provider.
///
/// Local-format numbers with a leading `0` national prefix get the configured
/// country code substituted (`03001234567` -> `+923001234567` with `+92`).
/// Numbers already carrying a `+` pass through unchanged apart from
/// whitespace/hyphen stripping. Anything else is not usable contact data and
/// yields `None`, which skips that channel for the recipient.
pub fn normalize_msisdn(raw: &str, country_code: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if let Some(rest) = cleaned.strip_prefix('+') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return Some(cleaned);
        }
        return None;
    }

    if let Some(rest) = cleaned.strip_prefix('0') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return Some(format!("{}{}", country_code, rest));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_prefix_substituted() {
        assert_eq!(
            normalize_msisdn("03001234567", "+92"),
            Some("+923001234567".to_string())
        );
    }

    #[test]
    fn test_international_passes_through() {
        assert_eq!(
            normalize_msisdn("+923001234567", "+92"),
            Some("+923001234567".to_string())
        );
    }

    #[test]
    fn test_separators_stripped() {
        assert_eq!(
            normalize_msisdn("0300-123 4567", "+92"),
            Some("+923001234567".to_string())
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(normalize_msisdn("not-a-number", "+92"), None);
        assert_eq!(normalize_msisdn("", "+92"), None);
        assert_eq!(normalize_msisdn("0", "+92"), None);
        assert_eq!(normalize_msisdn("+", "+92"), None);
    }
}

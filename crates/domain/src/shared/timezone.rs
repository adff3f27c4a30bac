use chrono_tz::Tz;

/// Parses an IANA timezone name like `Europe/London`.
/// Surrounding whitespace is ignored.
pub fn parse_timezone(timezone: &str) -> Option<Tz> {
    timezone.trim().parse::<Tz>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_iana_names() {
        assert_eq!(parse_timezone("Europe/Oslo"), Some(chrono_tz::Europe::Oslo));
        assert_eq!(parse_timezone(" UTC "), Some(chrono_tz::UTC));
        assert_eq!(parse_timezone("Mars/Olympus"), None);
        assert_eq!(parse_timezone(""), None);
    }
}

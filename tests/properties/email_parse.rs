//! Property tests for email normalization.

use proptest::prelude::*;

use dewey::EmailAddress;

fn plausible_email() -> impl Strategy<Value = String> {
    let local = proptest::string::string_regex("[a-z0-9._-]{1,8}").unwrap();
    let domain = proptest::string::string_regex("[a-z0-9-]{1,8}").unwrap();
    let tld = proptest::string::string_regex("[a-z]{2,4}").unwrap();
    (local, domain, tld).prop_map(|(l, d, t)| format!("{l}@{d}.{t}"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `EmailAddress::parse` never panics on arbitrary input, and
    /// every accepted address is normalized: no surrounding whitespace, no
    /// uppercase ASCII, exactly one '@' with a dotted domain.
    #[test]
    fn property_parse_never_panics_and_accepts_only_normalized(
        raw in ".{0,64}"
    ) {
        if let Ok(email) = EmailAddress::parse(&raw) {
            let s = email.as_str();
            prop_assert_eq!(s, s.trim());
            prop_assert!(!s.chars().any(|c| c.is_ascii_uppercase()));
            prop_assert_eq!(s.matches('@').count(), 1);
            let (local, domain) = s.split_once('@').unwrap();
            prop_assert!(!local.is_empty());
            prop_assert!(domain.contains('.'));
            prop_assert!(!domain.starts_with('.') && !domain.ends_with('.'));
        }
    }

    /// PROPERTY: parsing is idempotent: re-parsing an accepted address
    /// yields the same value.
    #[test]
    fn property_parse_is_idempotent(raw in ".{0,64}") {
        if let Ok(email) = EmailAddress::parse(&raw) {
            let again = EmailAddress::parse(email.as_str());
            prop_assert_eq!(again, Ok(email));
        }
    }

    /// PROPERTY: well-formed lowercase addresses always parse, and parse to
    /// themselves.
    #[test]
    fn property_plausible_addresses_parse(raw in plausible_email()) {
        let parsed = EmailAddress::parse(&raw);
        prop_assert!(parsed.is_ok(), "rejected {raw}");
        let email = parsed.unwrap();
        prop_assert_eq!(email.as_str(), raw.as_str());
    }

    /// PROPERTY: case and surrounding whitespace never affect identity.
    #[test]
    fn property_case_and_padding_are_normalized_away(raw in plausible_email()) {
        let padded = format!("  {}  ", raw.to_ascii_uppercase());
        let a = EmailAddress::parse(&raw).unwrap();
        let b = EmailAddress::parse(&padded).unwrap();
        prop_assert_eq!(a, b);
    }
}

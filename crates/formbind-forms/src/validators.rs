//! Validator factory functions.
//!
//! Each factory is stateless and returns a small [`RuleSet`] ready to be
//! merged into a field's active rules. Statically known patterns are
//! compiled once; parameterized factories build their pattern per call.
//!
//! Rule names double as removal keys: `field.remove_validators(&email())`
//! removes whatever `email()` inserted.
//!
//! The IBAN rule is a structural, checksum-free match (fixed per-country
//! length and shape, case-insensitive). Structurally well-formed but
//! checksum-invalid IBANs are accepted; tightening this would change the
//! set of accepted inputs.

use std::sync::LazyLock;

use regex::Regex;

use crate::rules::{RuleSet, RuleSpec};

/// Rule name the iban factory inserts under; values checked against it
/// are space-stripped rather than trimmed.
pub(crate) const RULE_IBAN: &str = "iban";
/// Rule name the required factory inserts under.
pub(crate) const RULE_REQUIRED: &str = "required";
/// Rule name the require_option factory inserts under.
pub(crate) const RULE_REQUIRE_OPTION: &str = "require_option";

/// Capitalized-word shape shared by person names, streets, and cities:
/// an uppercase Latin-or-umlaut start, letter runs optionally separated
/// by a single hyphen or space, a lowercase end.
static NAME_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-ZÄÖÜ]([A-Za-zÄÖÜäöüß]+(-| )?)*[a-zäöüß]$").expect("valid pattern")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"#,
    )
    .expect("valid pattern")
});

static PHONENUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{3,14}$").expect("valid pattern"));

static IBAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:IT|SM)\d{2}[A-Z]\d{22}|CY\d{2}[A-Z]\d{23}|NL\d{2}[A-Z]{4}\d{10}|LV\d{2}[A-Z]{4}\d{13}|(?:BG|BH|GB|IE)\d{2}[A-Z]{4}\d{14}|GI\d{2}[A-Z]{4}\d{15}|RO\d{2}[A-Z]{4}\d{16}|KW\d{2}[A-Z]{4}\d{22}|MT\d{2}[A-Z]{4}\d{23}|NO\d{13}|(?:DK|FI|GL|FO)\d{16}|MK\d{17}|(?:AT|EE|KZ|LU|XK)\d{18}|(?:BA|HR|LI|CH|CR)\d{19}|(?:GE|DE|LT|ME|RS)\d{20}|IL\d{21}|(?:AD|CZ|ES|MD|SA)\d{22}|PT\d{23}|(?:BE|IS)\d{24}|(?:FR|MR|MC)\d{25}|(?:AL|DO|LB|PL)\d{26}|(?:AZ|HU)\d{27}|(?:GR|MU)\d{28})$",
    )
    .expect("valid pattern")
});

static STREETNUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[a-zäöü]?$").expect("valid pattern"));

static POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("valid pattern"));

static PASSWORD_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-zA-ZÄÖÜäöüß!$%&/\\(){}\[\]=?*+~#_.:,;^°@-]{8,}$").expect("valid pattern")
});

static PASSWORD_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("valid pattern"));

static PASSWORD_LOWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zäöüß]").expect("valid pattern"));

static PASSWORD_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-ZÄÖÜ]").expect("valid pattern"));

/// The value must be at least `length` characters long.
pub fn min_length(length: usize) -> RuleSet {
    RuleSet::single(
        "min_length",
        RuleSpec::Pattern(Regex::new(&format!("^.{{{length},}}$")).expect("valid pattern")),
    )
}

/// The value must be at most `length` characters long.
pub fn max_length(length: usize) -> RuleSet {
    RuleSet::single(
        "max_length",
        RuleSpec::Pattern(Regex::new(&format!("^.{{0,{length}}}$")).expect("valid pattern")),
    )
}

/// A person's name: capitalized words, optionally hyphen- or
/// space-separated, umlauts allowed.
pub fn person_name() -> RuleSet {
    RuleSet::single("person_name", RuleSpec::Pattern(NAME_LIKE.clone()))
}

/// An email address (RFC-5322-flavored: quoted local parts and bracketed
/// IPv4/domain literals are accepted; lowercase only).
pub fn email() -> RuleSet {
    RuleSet::single("email", RuleSpec::Pattern(EMAIL.clone()))
}

/// An international phone number: `+`, a non-zero digit, then 3 to 14
/// more digits.
pub fn phonenumber() -> RuleSet {
    RuleSet::single("phonenumber", RuleSpec::Pattern(PHONENUMBER.clone()))
}

/// An IBAN, matched structurally per country (see module docs for the
/// checksum caveat). Checked against the space-stripped value.
pub fn iban() -> RuleSet {
    RuleSet::single(RULE_IBAN, RuleSpec::Pattern(IBAN.clone()))
}

/// A street name; same shape as [`person_name`].
pub fn street() -> RuleSet {
    RuleSet::single("street", RuleSpec::Pattern(NAME_LIKE.clone()))
}

/// A street number: digits with an optional single lowercase suffix.
pub fn streetnumber() -> RuleSet {
    RuleSet::single("streetnumber", RuleSpec::Pattern(STREETNUMBER.clone()))
}

/// A five-digit postcode.
pub fn postcode() -> RuleSet {
    RuleSet::single("postcode", RuleSpec::Pattern(POSTCODE.clone()))
}

/// A city name; same shape as [`person_name`].
pub fn city() -> RuleSet {
    RuleSet::single("city", RuleSpec::Pattern(NAME_LIKE.clone()))
}

/// A password: at least 8 characters from the allowed set, with at
/// least one digit, one lowercase, and one uppercase letter.
///
/// Returns a composite set of four patterns that must all pass; merging
/// and removal treat them as a unit when this set is passed whole.
pub fn password() -> RuleSet {
    RuleSet::union([
        RuleSet::single("password_chars", RuleSpec::Pattern(PASSWORD_CHARS.clone())),
        RuleSet::single("password_digit", RuleSpec::Pattern(PASSWORD_DIGIT.clone())),
        RuleSet::single("password_lower", RuleSpec::Pattern(PASSWORD_LOWER.clone())),
        RuleSet::single("password_upper", RuleSpec::Pattern(PASSWORD_UPPER.clone())),
    ])
}

/// The trimmed value must equal the named sibling field's stored value.
///
/// The reference is resolved through the owning binder when validation
/// runs, so the referenced field may be declared after this one. An
/// unknown name fails the check with a lookup error at validation time.
pub fn equals(field_name: impl Into<String>) -> RuleSet {
    RuleSet::single("equals", RuleSpec::FieldReference(field_name.into()))
}

/// Single-choice fields only: the option whose value equals the given
/// literal must be currently selected.
pub fn require_option(value: &str) -> RuleSet {
    RuleSet::single(
        RULE_REQUIRE_OPTION,
        RuleSpec::Pattern(
            Regex::new(&format!("^{}$", regex::escape(value))).expect("valid pattern"),
        ),
    )
}

/// Presence: free text must be non-empty after trimming, a toggle must
/// be on.
pub fn required() -> RuleSet {
    RuleSet::single(RULE_REQUIRED, RuleSpec::Presence)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts every sample against the single pattern rule in `rules`.
    fn assert_pattern(rules: &RuleSet, valid: &[&str], invalid: &[&str]) {
        let (name, spec) = rules.iter().next().expect("non-empty rule set");
        let RuleSpec::Pattern(re) = spec else {
            panic!("rule {name} is not a pattern");
        };
        for sample in valid {
            assert!(re.is_match(sample), "{name} should accept {sample:?}");
        }
        for sample in invalid {
            assert!(!re.is_match(sample), "{name} should reject {sample:?}");
        }
    }

    #[test]
    fn test_min_length() {
        assert_pattern(&min_length(3), &["abc", "abcd"], &["ab", ""]);
    }

    #[test]
    fn test_max_length() {
        assert_pattern(&max_length(3), &["", "ab", "abc"], &["abcd"]);
    }

    #[test]
    fn test_person_name() {
        assert_pattern(
            &person_name(),
            &["Anna", "Anna-Lena", "Jean Paul", "Müller", "Özil"],
            &["anna", "Anna-", "A", "Anna--Lena", "Anna3"],
        );
    }

    #[test]
    fn test_email() {
        assert_pattern(
            &email(),
            &[
                "a@b.co",
                "user.name@example.com",
                "user+tag@example.co.uk",
                r#""quoted local"@example.com"#,
                "user@[192.168.0.1]",
            ],
            &["bad", "no-at.example.com", "user@", "@example.com", "Upper@example.com"],
        );
    }

    #[test]
    fn test_phonenumber() {
        assert_pattern(
            &phonenumber(),
            &["+4915123456789", "+15551234"],
            &["+0123456", "004912345678", "+49", "+4915123456789012345", "+49 151 234"],
        );
    }

    #[test]
    fn test_iban_structural() {
        assert_pattern(
            &iban(),
            &[
                "DE89370400440532013000",
                "de89370400440532013000",
                "GB29NWBK60161331926819",
                "FR1420041010050500013002606",
            ],
            &["DE8937040044053201300", "XX89370400440532013000", "DE89 3704"],
        );
    }

    #[test]
    fn test_iban_accepts_checksum_invalid_structure() {
        // Structural match only: a wrong check digit pair still passes.
        assert_pattern(&iban(), &["DE00370400440532013000"], &[]);
    }

    #[test]
    fn test_streetnumber() {
        assert_pattern(&streetnumber(), &["12", "12a", "7ü"], &["12A", "a12", "12ab", ""]);
    }

    #[test]
    fn test_postcode() {
        assert_pattern(&postcode(), &["12345", "01067"], &["1234", "123456", "1234a"]);
    }

    #[test]
    fn test_street_and_city_share_name_shape() {
        assert_pattern(&street(), &["Hauptstraße", "Unter den Linden"], &["hauptstraße"]);
        assert_pattern(&city(), &["Berlin", "Frankfurt am Main"], &["berlin", "Berlin3"]);
    }

    /// Asserts a sample against all four password patterns at once.
    fn password_accepts(sample: &str) -> bool {
        password().iter().all(|(_, spec)| match spec {
            RuleSpec::Pattern(re) => re.is_match(sample),
            _ => false,
        })
    }

    #[test]
    fn test_password_composite() {
        assert!(password_accepts("Passw0rd"));
        assert!(password_accepts("Sicher#2024"));
        assert!(!password_accepts("passw0rd"), "missing uppercase");
        assert!(!password_accepts("PASSW0RD"), "missing lowercase");
        assert!(!password_accepts("Passwort"), "missing digit");
        assert!(!password_accepts("Pw0!"), "too short");
        assert!(!password_accepts("Passw0rd\u{1F600}"), "char outside allowed set");
    }

    #[test]
    fn test_password_is_a_four_rule_set() {
        let rules = password();
        assert_eq!(rules.len(), 4);
        assert!(rules.contains("password_chars"));
        assert!(rules.contains("password_digit"));
        assert!(rules.contains("password_lower"));
        assert!(rules.contains("password_upper"));
    }

    #[test]
    fn test_equals_stores_reference() {
        let rules = equals("password");
        assert!(matches!(
            rules.get("equals"),
            Some(RuleSpec::FieldReference(name)) if name == "password"
        ));
    }

    #[test]
    fn test_require_option_escapes_literal() {
        assert_pattern(&require_option("a.b"), &["a.b"], &["axb", "a.bc"]);
    }

    #[test]
    fn test_required_is_presence() {
        assert!(matches!(required().get("required"), Some(RuleSpec::Presence)));
    }
}

//! RFC 2253 canonical forms of names.
//!
//! The canonical string of an attribute is `keyword=value` (or
//! `dotted.oid=value` when the type has no RFC 2253 keyword), all lowercase.
//! String values are trimmed, runs of whitespace collapse to a single space
//! and the special characters are backslash-escaped. Values that
//! are not directory strings are written as `#` followed by the hex of their
//! DER encoding.
//!
//! Multi-valued RDNs are ordered with [`AttributeTypeAndValue::canonical_cmp`],
//! which puts attributes with a keyword first.

use std::cmp::Ordering;

use asn1::ObjectIdentifier;

use crate::name::{AttributeTypeAndValue, AttributeValue, Name, RelativeDistinguishedName};

/// RFC 2253 section 2.3 keywords.
pub fn rfc2253_keyword(oid: &ObjectIdentifier) -> Option<&'static str> {
    match oid.to_string().as_str() {
        AttributeTypeAndValue::OID_COMMON_NAME => Some("CN"),
        AttributeTypeAndValue::OID_COUNTRY_NAME => Some("C"),
        AttributeTypeAndValue::OID_LOCALITY_NAME => Some("L"),
        AttributeTypeAndValue::OID_STATE_OR_PROVINCE_NAME => Some("ST"),
        AttributeTypeAndValue::OID_ORGANIZATION_NAME => Some("O"),
        AttributeTypeAndValue::OID_ORGANIZATIONAL_UNIT_NAME => Some("OU"),
        AttributeTypeAndValue::OID_STREET_ADDRESS => Some("STREET"),
        AttributeTypeAndValue::OID_DOMAIN_COMPONENT => Some("DC"),
        AttributeTypeAndValue::OID_USER_ID => Some("UID"),
        _ => None,
    }
}

fn canonical_text(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    for (i, c) in collapsed.chars().enumerate() {
        if matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';') || (i == 0 && c == '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out.to_lowercase()
}

impl AttributeTypeAndValue {
    pub fn has_rfc2253_keyword(&self) -> bool {
        rfc2253_keyword(self.attribute_type()).is_some()
    }

    pub fn to_rfc2253_canonical(&self) -> String {
        let key = match rfc2253_keyword(self.attribute_type()) {
            Some(keyword) => keyword.to_ascii_lowercase(),
            None => self.attribute_type().to_string(),
        };
        let value = match self.attribute_value() {
            AttributeValue::Text(s) => canonical_text(s.as_str()),
            encoded @ AttributeValue::Encoded(_) => encoded.to_string(),
        };
        format!("{}={}", key, value)
    }

    /// Total order used to sort the attributes of a multi-valued RDN.
    ///
    /// Attributes whose type has an RFC 2253 keyword come first; ties are
    /// broken by comparing canonical strings.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        other
            .has_rfc2253_keyword()
            .cmp(&self.has_rfc2253_keyword())
            .then_with(|| self.to_rfc2253_canonical().cmp(&other.to_rfc2253_canonical()))
    }
}

impl RelativeDistinguishedName {
    /// Attributes in canonical order.
    pub fn canonical_attributes(&self) -> Vec<&AttributeTypeAndValue> {
        let mut attributes = self.attributes().iter().collect::<Vec<_>>();
        attributes.sort_by(|a, b| a.canonical_cmp(b));
        attributes
    }

    pub fn to_rfc2253_canonical(&self) -> String {
        self.canonical_attributes()
            .iter()
            .map(|attr| attr.to_rfc2253_canonical())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl Name {
    /// Canonical string with the most specific RDN first.
    pub fn to_rfc2253_canonical(&self) -> String {
        self.rdn_sequence()
            .iter()
            .rev()
            .map(|rdn| rdn.to_rfc2253_canonical())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Equality of canonical forms: ignores case, surrounding and repeated
    /// whitespace, string type and attribute order inside an RDN.
    pub fn canonical_eq(&self, other: &Name) -> bool {
        self.len() == other.len()
            && self
                .rdn_sequence()
                .iter()
                .zip(other.rdn_sequence())
                .all(|(a, b)| a.to_rfc2253_canonical() == b.to_rfc2253_canonical())
    }

    /// Whether `base` is a prefix of this name, starting from the root.
    /// An empty base contains every name.
    pub fn is_within_subtree(&self, base: &Name) -> bool {
        base.len() <= self.len()
            && base
                .rdn_sequence()
                .iter()
                .zip(self.rdn_sequence())
                .all(|(a, b)| a.to_rfc2253_canonical() == b.to_rfc2253_canonical())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::directory_string::DirectoryString;

    fn ava(oid: &str, value: &str) -> AttributeTypeAndValue {
        AttributeTypeAndValue::new(ObjectIdentifier::from_str(oid).unwrap(), value)
    }

    fn name(rdns: &[(&str, &str)]) -> Name {
        Name::new(
            rdns.iter()
                .map(|(oid, value)| RelativeDistinguishedName::new_single(ava(oid, value)))
                .collect(),
        )
    }

    #[rstest]
    #[case("  Example   Org ", "o=example org")]
    #[case("a,b", "o=a\\,b")]
    #[case("#x", "o=\\#x")]
    #[case("A+B<C>", "o=a\\+b\\<c\\>")]
    fn test_attribute_canonical_string(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(ava("2.5.4.10", value).to_rfc2253_canonical(), expected);
    }

    #[test]
    fn test_attribute_without_keyword_uses_oid() {
        let attr = ava("2.5.4.12", "Engineer");
        assert!(!attr.has_rfc2253_keyword());
        assert_eq!(attr.to_rfc2253_canonical(), "2.5.4.12=engineer");
    }

    #[test]
    fn test_keyword_attributes_sort_first() {
        // A has no keyword, B and C do.
        let a = ava("2.5.4.12", "a");
        let b = ava("2.5.4.10", "b");
        let c = ava("2.5.4.3", "c");

        let rdn = RelativeDistinguishedName::new(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        let sorted = rdn.canonical_attributes();
        // "cn=c" < "o=b"
        assert_eq!(sorted, vec![&c, &b, &a]);
        assert_eq!(a.canonical_cmp(&b), Ordering::Greater);
        assert_eq!(c.canonical_cmp(&b), Ordering::Less);
        assert_eq!(rdn.to_rfc2253_canonical(), "cn=c+o=b+2.5.4.12=a");
    }

    #[test]
    fn test_keyword_ties_break_on_canonical_string() {
        let a = ava("1.2.3.4", "a");
        let b = ava("2.5.4.3", "z");
        let c = ava("2.5.4.3", "a");

        let mut attrs = vec![a.clone(), b.clone(), c.clone()];
        attrs.sort_by(|x, y| x.canonical_cmp(y));
        assert_eq!(attrs, vec![c, b, a]);
    }

    #[test]
    fn test_canonical_cmp_is_consistent_with_equality() {
        let x = ava("2.5.4.3", "same");
        assert_eq!(x.canonical_cmp(&x.clone()), Ordering::Equal);
    }

    #[test]
    fn test_name_canonical_reverses_order() {
        let n = name(&[("2.5.4.6", "US"), ("2.5.4.10", "Org"), ("2.5.4.3", "Host")]);
        assert_eq!(n.to_rfc2253_canonical(), "cn=host,o=org,c=us");
    }

    #[test]
    fn test_canonical_eq_ignores_string_kind_and_case() {
        let utf8 = name(&[("2.5.4.3", "Test")]);
        let printable = Name::new(vec![RelativeDistinguishedName::new_single(
            AttributeTypeAndValue::new(
                ObjectIdentifier::from_str("2.5.4.3").unwrap(),
                DirectoryString::printable("TEST").unwrap(),
            ),
        )]);
        assert_ne!(utf8, printable);
        assert!(utf8.canonical_eq(&printable));
    }

    #[rstest]
    #[case(&[("2.5.4.6", "US")], true)]
    #[case(&[("2.5.4.6", "us"), ("2.5.4.10", "Org")], true)]
    #[case(&[], true)]
    #[case(&[("2.5.4.6", "JP")], false)]
    #[case(&[("2.5.4.6", "US"), ("2.5.4.10", "Org"), ("2.5.4.3", "Host"), ("2.5.4.11", "x")], false)]
    fn test_is_within_subtree(#[case] base: &[(&str, &str)], #[case] expected: bool) {
        let n = name(&[("2.5.4.6", "US"), ("2.5.4.10", "Org"), ("2.5.4.3", "Host")]);
        assert_eq!(n.is_within_subtree(&name(base)), expected);
    }
}

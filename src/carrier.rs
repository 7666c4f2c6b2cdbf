use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    Telkomsel,
    Indosat,
    #[serde(rename = "XL Axiata")]
    XlAxiata,
    Smartfren,
    Axis,
    /// 62851 is reported apart from the main Telkomsel block.
    #[serde(rename = "Telkomsel (851)")]
    Telkomsel851,
    Unknown,
}

impl Carrier {
    pub fn label(&self) -> &'static str {
        match self {
            Carrier::Telkomsel => "Telkomsel",
            Carrier::Indosat => "Indosat",
            Carrier::XlAxiata => "XL Axiata",
            Carrier::Smartfren => "Smartfren",
            Carrier::Axis => "Axis",
            Carrier::Telkomsel851 => "Telkomsel (851)",
            Carrier::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const PREFIX_LEN: usize = 5;

pub const CARRIER_PREFIXES: &[(Carrier, &[&str])] = &[
    (
        Carrier::Telkomsel,
        &["62811", "62812", "62813", "62821", "62822", "62823", "62852", "62853"],
    ),
    (
        Carrier::Indosat,
        &["62814", "62815", "62816", "62855", "62856", "62857", "62858"],
    ),
    (
        Carrier::XlAxiata,
        &["62817", "62818", "62819", "62859", "62877", "62878", "62879"],
    ),
    (Carrier::Smartfren, &["62888", "62889", "62887", "62828"]),
    (Carrier::Axis, &["62838", "62831", "62832", "62833"]),
    (Carrier::Telkomsel851, &["62851"]),
];

/// Every prefix the generator may pick, in table order.
pub fn prefix_table() -> Vec<&'static str> {
    CARRIER_PREFIXES
        .iter()
        .flat_map(|(_, prefixes)| prefixes.iter().copied())
        .collect()
}

pub fn is_known_prefix(prefix: &str) -> bool {
    CARRIER_PREFIXES
        .iter()
        .any(|(_, prefixes)| prefixes.contains(&prefix))
}

/// Maps a phone number to its carrier by the first five digits.
///
/// A single leading `+` is ignored. Anything that does not match a known
/// block, including strings shorter than a prefix, is `Carrier::Unknown`.
pub fn classify(phone: &str) -> Carrier {
    let phone = phone.strip_prefix('+').unwrap_or(phone);
    let prefix = match phone.get(..PREFIX_LEN) {
        Some(prefix) => prefix,
        None => return Carrier::Unknown,
    };

    CARRIER_PREFIXES
        .iter()
        .find(|(_, prefixes)| prefixes.contains(&prefix))
        .map(|(carrier, _)| *carrier)
        .unwrap_or(Carrier::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_classify_known_groups() {
        assert_eq!(classify("628511234567"), Carrier::Telkomsel851);
        assert_eq!(classify("628111234567"), Carrier::Telkomsel);
        assert_eq!(classify("628571234567"), Carrier::Indosat);
        assert_eq!(classify("6287712345678"), Carrier::XlAxiata);
        assert_eq!(classify("62828123456789"), Carrier::Smartfren);
        assert_eq!(classify("628311234567"), Carrier::Axis);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("629991234567"), Carrier::Unknown);
        assert_eq!(classify("0811234567"), Carrier::Unknown);
        assert_eq!(classify("6281"), Carrier::Unknown);
        assert_eq!(classify(""), Carrier::Unknown);
        assert_eq!(classify("62٨١١"), Carrier::Unknown);
    }

    #[test]
    fn test_classify_ignores_leading_plus() {
        assert_eq!(classify("+628121234567"), Carrier::Telkomsel);
        assert_eq!(classify("++628121234567"), Carrier::Unknown);
    }

    #[test]
    fn test_prefix_table_is_disjoint_and_well_formed() {
        let table = prefix_table();
        assert_eq!(table.len(), 31);

        let distinct: HashSet<_> = table.iter().collect();
        assert_eq!(distinct.len(), table.len());

        for prefix in &table {
            assert_eq!(prefix.len(), PREFIX_LEN);
            assert!(prefix.starts_with("62"));
            assert!(prefix.bytes().all(|b| b.is_ascii_digit()));
            assert!(is_known_prefix(prefix));
            assert_ne!(classify(prefix), Carrier::Unknown);
        }
    }

    #[test]
    fn test_labels_serialize_as_display_names() {
        assert_eq!(
            serde_json::to_string(&Carrier::Telkomsel851).unwrap(),
            "\"Telkomsel (851)\""
        );
        assert_eq!(serde_json::to_string(&Carrier::XlAxiata).unwrap(), "\"XL Axiata\"");
        assert_eq!(Carrier::Unknown.to_string(), "Unknown");
    }
}

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use laundrypay_core::{DomainError, DomainResult, Money, ValueObject};

/// Service offered at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCode {
    Wash,
    Dry,
    Fold,
    Full,
}

impl ServiceCode {
    pub const ALL: [ServiceCode; 4] = [
        ServiceCode::Wash,
        ServiceCode::Dry,
        ServiceCode::Fold,
        ServiceCode::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCode::Wash => "wash",
            ServiceCode::Dry => "dry",
            ServiceCode::Fold => "fold",
            ServiceCode::Full => "full",
        }
    }

    pub fn entry(self) -> &'static ServiceCatalogEntry {
        entry(self)
    }
}

impl core::fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ServiceCode::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| DomainError::invalid_service(code))
    }
}

/// One catalog line: code, label shown to the attendant, and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCatalogEntry {
    pub code: ServiceCode,
    pub display_label: &'static str,
    pub unit_price: Money,
}

impl ValueObject for ServiceCatalogEntry {}

static CATALOG: [ServiceCatalogEntry; 4] = [
    ServiceCatalogEntry {
        code: ServiceCode::Wash,
        display_label: "Wash/Load",
        unit_price: Money::from_major(70),
    },
    ServiceCatalogEntry {
        code: ServiceCode::Dry,
        display_label: "Dry/Load",
        unit_price: Money::from_major(70),
    },
    ServiceCatalogEntry {
        code: ServiceCode::Fold,
        display_label: "Fold/Load",
        unit_price: Money::from_major(30),
    },
    ServiceCatalogEntry {
        code: ServiceCode::Full,
        display_label: "Full Service",
        unit_price: Money::from_major(170),
    },
];

/// All catalog entries in display order.
pub fn entries() -> &'static [ServiceCatalogEntry] {
    &CATALOG
}

pub fn entry(code: ServiceCode) -> &'static ServiceCatalogEntry {
    match code {
        ServiceCode::Wash => &CATALOG[0],
        ServiceCode::Dry => &CATALOG[1],
        ServiceCode::Fold => &CATALOG[2],
        ServiceCode::Full => &CATALOG[3],
    }
}

/// Resolve a raw service code (`"wash"`, `" Fold "`).
///
/// Unknown codes fail with `DomainError::InvalidService`.
pub fn lookup(code: &str) -> DomainResult<&'static ServiceCatalogEntry> {
    code.parse::<ServiceCode>().map(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_priced_services() {
        let prices: Vec<(ServiceCode, &str, Money)> = entries()
            .iter()
            .map(|e| (e.code, e.display_label, e.unit_price))
            .collect();

        assert_eq!(
            prices,
            vec![
                (ServiceCode::Wash, "Wash/Load", Money::from_major(70)),
                (ServiceCode::Dry, "Dry/Load", Money::from_major(70)),
                (ServiceCode::Fold, "Fold/Load", Money::from_major(30)),
                (ServiceCode::Full, "Full Service", Money::from_major(170)),
            ]
        );
    }

    #[test]
    fn entry_matches_code() {
        for code in ServiceCode::ALL {
            assert_eq!(entry(code).code, code);
        }
    }

    #[test]
    fn lookup_is_case_insensitive_and_trims() {
        assert_eq!(lookup("wash").unwrap().code, ServiceCode::Wash);
        assert_eq!(lookup(" FULL ").unwrap().code, ServiceCode::Full);
    }

    #[test]
    fn unknown_code_is_invalid_service() {
        let err = lookup("iron").unwrap_err();
        assert_eq!(err, DomainError::InvalidService("iron".to_string()));
    }

    #[test]
    fn codes_serialize_lowercase() {
        let json = serde_json::to_string(&ServiceCode::Dry).unwrap();
        assert_eq!(json, "\"dry\"");
    }
}

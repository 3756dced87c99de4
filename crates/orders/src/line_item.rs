use serde::{Deserialize, Serialize};

use laundrypay_catalog::{ServiceCatalogEntry, ServiceCode};
use laundrypay_core::{Entity, LineItemId, Money};

/// One priced service entry within an in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub client_name: String,
    pub service_code: ServiceCode,
    pub service_label: String,
    pub price: Money,
}

impl LineItem {
    /// Build a line item priced from the catalog.
    pub fn from_catalog(
        id: LineItemId,
        client_name: impl Into<String>,
        entry: &ServiceCatalogEntry,
    ) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            service_code: entry.code,
            service_label: entry.display_label.to_string(),
            price: entry.unit_price,
        }
    }
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

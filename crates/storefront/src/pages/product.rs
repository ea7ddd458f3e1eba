//! Product detail page.

use mercado_core::{Community, ContactCard, Product, ProductId, Store};

use super::PageView;
use crate::catalog::Dataset;
use crate::error::BrowseError;
use crate::routing::RouteParams;

pub const NOT_FOUND: &str = "Producto no encontrado";

#[derive(Debug, Clone)]
pub struct ProductPage {
    pub product: Product,
    /// Community from the route, when it exists.
    pub community: Option<Community>,
    pub store: Option<Store>,
    /// Contact for the product's store, or the community when the store is unknown.
    pub contact: Option<ContactCard>,
    /// Home listing narrowed to this product's store.
    pub store_link: String,
}

impl ProductPage {
    /// WhatsApp link asking about this product.
    #[must_use]
    pub fn whatsapp_link(&self) -> Option<String> {
        self.product.whatsapp_link()
    }
}

/// Look up product `id` in the dataset.
pub fn load_product(dataset: &Dataset, id: ProductId, route: &RouteParams) -> PageView<ProductPage> {
    let result = dataset
        .product(id)
        .cloned()
        .ok_or_else(|| BrowseError::NotFound(format!("product {id}")))
        .map(|product| {
            let community_id = route.community_or_default();
            let community = dataset.community(&community_id).cloned();
            let store = dataset.store(&product.store_id).cloned();
            let contact = community
                .as_ref()
                .map(|c| ContactCard::for_scope(c, store.as_ref()));
            let store_link = RouteParams::for_community(community_id)
                .with_store(product.store_id.clone())
                .home_path();

            ProductPage {
                product,
                community,
                store,
                contact,
                store_link,
            }
        });

    PageView::from_result(result, NOT_FOUND)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mercado_core::ContactKind;

    use super::*;
    use crate::test_support::sample_dataset;

    #[test]
    fn test_known_product_with_store_contact() {
        let page = load_product(&sample_dataset(), ProductId::new(1), &RouteParams::default())
            .into_result()
            .unwrap();

        assert_eq!(page.contact.as_ref().map(|c| c.kind), Some(ContactKind::Store));
        assert_eq!(
            page.store_link,
            "/?comunidad=mercado-comunidad&tienda=muebles-sur"
        );
        assert!(page.whatsapp_link().is_some());
    }

    #[test]
    fn test_unknown_product_not_found() {
        let view = load_product(&sample_dataset(), ProductId::new(999), &RouteParams::default());
        let PageView::Failed { error, message } = view else {
            panic!("expected failure");
        };
        assert!(matches!(error, BrowseError::NotFound(_)));
        assert_eq!(message, NOT_FOUND);
    }
}

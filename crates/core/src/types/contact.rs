//! Contact helpers: WhatsApp deep links and the contact card shown in modals.

use serde::Serialize;

use super::community::Community;
use super::store::Store;

/// Build a WhatsApp deep link for `phone` with a prefilled `message`.
///
/// Whitespace is stripped from the phone number; the message is URL-encoded.
#[must_use]
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!(
        "https://wa.me/{phone}?text={}",
        urlencoding::encode(message)
    )
}

/// Prefilled message asking about a product.
#[must_use]
pub fn product_inquiry(title: &str) -> String {
    format!("Hola, me interesa el producto: {title}")
}

/// Prefilled message asking about a store's catalog.
#[must_use]
pub fn store_inquiry(store_name: &str) -> String {
    format!("Hola, me interesa conocer más sobre los productos de {store_name}")
}

/// Who a contact card points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Store,
    Community,
}

impl ContactKind {
    /// Heading label used by the contact modal.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Store => "Tienda",
            Self::Community => "Comunidad",
        }
    }
}

/// Contact details for the current browsing scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactCard {
    pub kind: ContactKind,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactCard {
    /// Contact card for the store when one is in scope, otherwise the community.
    #[must_use]
    pub fn for_scope(community: &Community, store: Option<&Store>) -> Self {
        store.map_or_else(
            || Self {
                kind: ContactKind::Community,
                name: community.display_name().to_string(),
                email: community.email.clone(),
                phone: community.phone.clone(),
            },
            |store| Self {
                kind: ContactKind::Store,
                name: store.name.clone(),
                email: store.email.clone(),
                phone: store.phone.clone(),
            },
        )
    }

    /// WhatsApp link for the card's phone, if any.
    #[must_use]
    pub fn whatsapp_link(&self) -> Option<String> {
        let phone = self.phone.as_deref()?;
        let message = match self.kind {
            ContactKind::Store => store_inquiry(&self.name),
            ContactKind::Community => format!("Hola, escribo desde {}", self.name),
        };
        Some(whatsapp_link(phone, &message))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let link = whatsapp_link("+56 9 8765 4321", &product_inquiry("Silla"));
        assert_eq!(
            link,
            "https://wa.me/+56987654321?text=Hola%2C%20me%20interesa%20el%20producto%3A%20Silla"
        );
    }

    #[test]
    fn test_store_inquiry_text() {
        assert_eq!(
            store_inquiry("Muebles del Sur"),
            "Hola, me interesa conocer más sobre los productos de Muebles del Sur"
        );
    }

    #[test]
    fn test_contact_card_prefers_store() {
        let community: Community = serde_json::from_value(serde_json::json!({
            "id": "valdivia", "title": "Comunidad Valdivia", "email": "hola@valdivia.cl"
        }))
        .unwrap();
        let store: Store = serde_json::from_value(serde_json::json!({
            "id": "muebles", "Name": "Muebles del Sur", "email": "ventas@muebles.cl"
        }))
        .unwrap();

        let card = ContactCard::for_scope(&community, Some(&store));
        assert_eq!(card.kind, ContactKind::Store);
        assert_eq!(card.email.as_deref(), Some("ventas@muebles.cl"));

        let card = ContactCard::for_scope(&community, None);
        assert_eq!(card.kind, ContactKind::Community);
        assert_eq!(card.name, "Comunidad Valdivia");
        assert_eq!(card.kind.label(), "Comunidad");
    }
}

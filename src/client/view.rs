use uuid::Uuid;

use crate::catalog::Product;

/// Client-side cache of the product list. After the initial fetch, each
/// mutation applies its own result eagerly instead of re-fetching, the
/// way the browser front end keeps its table current. Writers that share
/// a catalog can therefore drift until they re-fetch; the server stays
/// authoritative.
#[derive(Debug, Clone, Default)]
pub struct LocalView {
    products: Vec<Product>,
}

impl LocalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache from a fresh list fetch.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Append an entity the server just created.
    pub fn apply_created(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Replace the matching entity. Unknown ids leave the view alone,
    /// matching the server's treatment of updates to absent rows.
    pub fn apply_updated(&mut self, product: Product) {
        if let Some(slot) = self.products.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
    }

    pub fn apply_deleted(&mut self, id: Uuid) {
        self.products.retain(|p| p.id != id);
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: price.parse().expect("price"),
        }
    }

    #[test]
    fn mutations_apply_without_a_refetch() {
        let mut view = LocalView::new();
        let widget = product("Widget", "9.99");
        let gadget = product("Gadget", "19.99");
        view.replace_all(vec![widget.clone(), gadget.clone()]);

        let created = product("Gizmo", "4.50");
        view.apply_created(created.clone());
        assert_eq!(view.products().len(), 3);

        let mut renamed = gadget.clone();
        renamed.name = "Gadget Pro".to_string();
        view.apply_updated(renamed.clone());
        assert_eq!(view.products()[1], renamed);

        view.apply_deleted(widget.id);
        assert_eq!(view.products(), [renamed, created]);
    }

    #[test]
    fn updates_to_unknown_ids_leave_the_view_alone() {
        let mut view = LocalView::new();
        view.replace_all(vec![product("Widget", "9.99")]);
        let before = view.products().to_vec();

        view.apply_updated(product("Stranger", "1.00"));
        assert_eq!(view.products(), before);
    }

    #[test]
    fn two_eager_views_drift_until_one_refetches() {
        // Both operators loaded the same list, then edited the same row.
        let original = product("Widget", "9.99");
        let mut first = LocalView::new();
        let mut second = LocalView::new();
        first.replace_all(vec![original.clone()]);
        second.replace_all(vec![original.clone()]);

        let mut from_first = original.clone();
        from_first.name = "Widget (sale)".to_string();
        let mut from_second = original.clone();
        from_second.price = "12.00".parse().expect("price");

        // Each view only sees its own write. The server has applied both,
        // second's last; neither view matches it until a full re-fetch.
        first.apply_updated(from_first.clone());
        second.apply_updated(from_second.clone());
        assert_ne!(first.products(), second.products());

        let server_state = vec![from_second];
        first.replace_all(server_state.clone());
        assert_eq!(first.products(), server_state);
    }
}

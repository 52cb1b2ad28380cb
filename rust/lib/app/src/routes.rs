//! The shell's page table.

use std::sync::Arc;

use inventory_router::{
    BoxFuture, LoadError, RouteDescriptor, RouteTable, RouteTableError, View, CATCH_ALL,
};

/// Path of the default page; unknown locations land here.
pub const HOME: &str = "/";

/// `(path, name, title)` for every page, in match order.
pub const PAGES: &[(&str, &str, &str)] = &[
    ("/", "Dashboard", "仪表板"),
    ("/products", "Products", "产品管理"),
    ("/orders", "Orders", "订单管理"),
    ("/purchase-orders", "PurchaseOrders", "采购订单"),
    ("/sales-orders", "SalesOrders", "销售订单"),
    ("/bom", "BOM", "BOM管理"),
    ("/production", "Production", "生产管理"),
    ("/inventory", "Inventory", "库存管理"),
    ("/unit-converter", "UnitConverter", "单位转换"),
    ("/exchange-rate", "ExchangeRate", "汇率转换"),
    ("/categories", "Categories", "产品分类"),
    ("/packing-list", "PackingList", "装箱单"),
    ("/reports", "Reports", "报表中心"),
];

/// Produces page views on demand. The embedding UI decides what a view
/// is; the router only caches what this returns.
pub trait ViewSource: Send + Sync + 'static {
    fn load(&self, name: &str) -> BoxFuture<Result<Arc<dyn View>, LoadError>>;
}

/// A view that is nothing but its page name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    name: String,
}

impl PageView {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl View for PageView {
    fn name(&self) -> &str {
        &self.name
    }
}

/// [`ViewSource`] resolving every page to a [`PageView`]. Used by hosts
/// that render from the route alone.
pub struct PageViews;

impl ViewSource for PageViews {
    fn load(&self, name: &str) -> BoxFuture<Result<Arc<dyn View>, LoadError>> {
        let view: Arc<dyn View> = Arc::new(PageView::new(name));
        Box::pin(async move { Ok(view) })
    }
}

/// Build the route table: every page, each titled, then the catch-all.
pub fn route_table(views: Arc<dyn ViewSource>) -> Result<RouteTable, RouteTableError> {
    let mut routes: Vec<RouteDescriptor> = PAGES
        .iter()
        .map(|&(path, name, title)| {
            let views = Arc::clone(&views);
            RouteDescriptor::view(path, name, Arc::new(move || views.load(name))).with_title(title)
        })
        .collect();
    routes.push(RouteDescriptor::redirect(CATCH_ALL, HOME));
    RouteTable::new(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_router::RouteTarget;

    #[test]
    fn table_has_every_page_and_catch_all_last() {
        let table = route_table(Arc::new(PageViews)).unwrap();
        assert_eq!(table.len(), PAGES.len() + 1);

        for (path, name, title) in PAGES {
            let route = table.by_name(name).unwrap();
            assert_eq!(route.path, *path);
            assert_eq!(route.meta.title(), Some(*title));
        }

        let last = table.routes().last().unwrap();
        assert_eq!(last.path, CATCH_ALL);
        assert!(matches!(&last.target, RouteTarget::Redirect(to) if to == HOME));
    }

    #[test]
    fn unknown_path_resolves_to_catch_all() {
        let table = route_table(Arc::new(PageViews)).unwrap();
        let m = table.resolve("/unknown-path").unwrap();
        assert_eq!(m.index, PAGES.len());
        assert_eq!(table.resolve("/bom/").unwrap().index, 5);
    }
}

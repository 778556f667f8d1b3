use crate::planner::blueprints::{Blueprint, BlueprintId};
use crate::planner::catalog::{CatalogError, ComponentDefinition as C};
use crate::planner::grouping::{Accent, GroupConfig};

/// Commerce blueprint: storefront, orders, fulfilment
pub fn commerce() -> Result<Blueprint, CatalogError> {
    let components = vec![
        // Primary
        C::new("storefront", "Storefront", 0)
            .describe("Responsive shop front with home and landing pages")
            .mandatory(),
        C::new("product_catalog", "Product Catalog", 0)
            .describe("Products, variants, categories and search")
            .requires(&["storefront"])
            .mandatory(),
        C::new("shopping_cart", "Shopping Cart", 0)
            .describe("Persistent cart with quantity updates")
            .requires(&["product_catalog"])
            .mandatory(),
        // Scaffolding
        C::new("commerce_events", "Commerce Event Bus", 3000)
            .describe("Order and stock events consumed by other modules")
            .requires(&["storefront"])
            .hidden(),
        C::new("sms_gateway", "SMS Gateway", 2000)
            .describe("Transactional SMS delivery")
            .hidden(),
        // Checkout
        C::new("customer_accounts", "Customer Accounts", 4000)
            .describe("Saved addresses, order history and profiles")
            .requires(&["storefront"]),
        C::new("payment_gateway", "Payment Gateway", 7500)
            .describe("UPI, cards and net-banking at checkout")
            .requires(&["shopping_cart"]),
        C::new("cash_on_delivery", "Cash on Delivery", 2500)
            .describe("COD with OTP confirmation")
            .requires(&["payment_gateway", "sms_gateway"]),
        C::new("coupons_discounts", "Coupons & Discounts", 3500)
            .describe("Promo codes, automatic discounts and offers")
            .requires(&["shopping_cart"]),
        // Orders & fulfilment
        C::new("order_tracking", "Order Tracking", 5000)
            .describe("Status timeline and notifications for every order")
            .requires(&["payment_gateway", "commerce_events", "sms_gateway"]),
        C::new("shipping_integration", "Shipping Integration", 6000)
            .describe("Courier rates, labels and pickup scheduling")
            .requires(&["order_tracking"]),
        C::new("returns_refunds", "Returns & Refunds", 4500)
            .describe("Self-service returns with refund workflows")
            .requires(&["order_tracking"]),
        C::new("inventory_management", "Inventory Management", 6500)
            .describe("Stock levels, low-stock alerts and warehouses")
            .requires(&["product_catalog", "commerce_events"]),
        C::new("multi_vendor", "Multi-vendor Marketplace", 15000)
            .describe("Vendor onboarding, commissions and payouts")
            .requires(&["inventory_management", "payment_gateway", "customer_accounts"]),
        // Growth
        C::new("wishlist", "Wishlist", 2000)
            .describe("Save products for later")
            .requires(&["customer_accounts"]),
        C::new("product_reviews", "Product Reviews", 3000)
            .describe("Verified-buyer ratings and reviews")
            .requires(&["customer_accounts", "order_tracking"]),
        C::new("abandoned_cart", "Abandoned Cart Recovery", 4000)
            .describe("Reminder messages for carts left behind")
            .requires(&["customer_accounts", "commerce_events"]),
        C::new("sales_reports", "Sales Reports", 4500)
            .describe("Revenue, best sellers and conversion reports")
            .requires(&["order_tracking"]),
    ];

    let groups = vec![
        GroupConfig::new(
            "Store Essentials",
            Accent::Blue,
            &["storefront", "product_catalog", "shopping_cart", "commerce_events"],
        ),
        GroupConfig::new(
            "Checkout & Payments",
            Accent::Orange,
            &[
                "customer_accounts",
                "payment_gateway",
                "cash_on_delivery",
                "coupons_discounts",
            ],
        ),
        GroupConfig::new(
            "Orders & Fulfilment",
            Accent::Teal,
            &[
                "order_tracking",
                "shipping_integration",
                "returns_refunds",
                "inventory_management",
                "multi_vendor",
                "sms_gateway",
            ],
        ),
        GroupConfig::new(
            "Growth & Insights",
            Accent::Green,
            &[
                "wishlist",
                "product_reviews",
                "abandoned_cart",
                "sales_reports",
            ],
        ),
    ];

    Blueprint::new(BlueprintId::Commerce, components, groups)
}

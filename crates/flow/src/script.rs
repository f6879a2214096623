//! The flow definition: categories, field sequences, menu tokens, prompts,
//! and catalogs, all as data. The engine never hard-codes a branch; adding a
//! category or reordering its fields is a change here only.

use serde::Serialize;

/// Greeting/reset keywords. Matching is exact after trimming and
/// case-folding; any of these restarts the conversation from any step.
pub const RESET_KEYWORDS: &[&str] = &["salam", "hi", "hello", "hy", "reset"];

/// True when `body` is a reset keyword.
pub fn is_reset(body: &str) -> bool {
    let folded = body.trim().to_lowercase();
    RESET_KEYWORDS.contains(&folded.as_str())
}

// ── Categories ──────────────────────────────────────────────────────────────

/// The intake category chosen from the opening menu. Each variant carries its
/// menu token, label, ordered field list, and closing contact footer as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SalesmanComplaint,
    DistributorComplaint,
    QualityPriceBill,
    StockOrder,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 4] = [
        Category::SalesmanComplaint,
        Category::DistributorComplaint,
        Category::QualityPriceBill,
        Category::StockOrder,
    ];

    /// The selector token shown in the opening menu.
    pub fn token(self) -> &'static str {
        match self {
            Category::SalesmanComplaint => "1",
            Category::DistributorComplaint => "2",
            Category::QualityPriceBill => "3",
            Category::StockOrder => "4",
        }
    }

    /// Parse a menu selection. `None` for anything outside the token set.
    pub fn from_token(body: &str) -> Option<Self> {
        let token = body.trim();
        Category::ALL.into_iter().find(|c| c.token() == token)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::SalesmanComplaint => "Salesman Complaint",
            Category::DistributorComplaint => "Distributor Complaint",
            Category::QualityPriceBill => "Quality/Price/Bill",
            Category::StockOrder => "Stock Order",
        }
    }

    /// The ordered fields collected after the name step. The order branch
    /// collects none here — it goes through the product menu instead.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Category::SalesmanComplaint
            | Category::DistributorComplaint
            | Category::QualityPriceBill => &[Field::Salesman, Field::Shop, Field::Address],
            Category::StockOrder => &[],
        }
    }

    pub fn is_order(self) -> bool {
        matches!(self, Category::StockOrder)
    }

    /// Contact footer attached to the closing reply.
    pub fn footer(self) -> &'static str {
        match self {
            Category::SalesmanComplaint | Category::DistributorComplaint => {
                "Our sales office will contact you within 24 hours. For urgent matters call 0300-1122334."
            },
            Category::QualityPriceBill => {
                "Our quality desk will review this and get back to you. For urgent matters call 0300-1122335."
            },
            Category::StockOrder => {
                "Our order desk will confirm availability and delivery time shortly. Questions? Call 0300-1122336."
            },
        }
    }

    /// Prompt for the terminal free-text step of this category's branch.
    pub fn detail_prompt(self) -> &'static str {
        if self.is_order() {
            "Please type the items and quantities you would like to order."
        } else {
            "Please describe your complaint in a few lines."
        }
    }
}

// ── Fields ──────────────────────────────────────────────────────────────────

/// A named answer slot in the collected mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Salesman,
    Shop,
    Address,
    ProductCategory,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Salesman => "Salesman",
            Field::Shop => "Shop",
            Field::Address => "Address",
            Field::ProductCategory => "Product Category",
        }
    }

    /// The question asked when this field is awaited.
    pub fn prompt(self) -> &'static str {
        match self {
            Field::Name => "May I have your name, please?",
            Field::Salesman => "Please share the salesman's name.",
            Field::Shop => "Which shop or outlet is this about?",
            Field::Address => "Please share the shop's address.",
            // Never asked as free text — the product menu covers it.
            Field::ProductCategory => "Please choose a product category.",
        }
    }
}

// ── Product catalog (order branch) ──────────────────────────────────────────

/// A product sub-menu entry: selecting it echoes the catalog back and moves
/// the sender to the order-detail step.
#[derive(Debug, Clone, Copy)]
pub struct ProductCategory {
    pub token: &'static str,
    pub name: &'static str,
    pub items: &'static [&'static str],
}

pub const PRODUCT_CATEGORIES: [ProductCategory; 2] = [
    ProductCategory {
        token: "1",
        name: "Beverages",
        items: &[
            "Cola 1.5L",
            "Cola 500ml",
            "Lemon Lime 1.5L",
            "Orange Fizz 500ml",
            "Mineral Water 1.5L",
        ],
    },
    ProductCategory {
        token: "2",
        name: "Snacks & Biscuits",
        items: &[
            "Salted Chips 30g",
            "Masala Chips 30g",
            "Chocolate Biscuit Box",
            "Cream Biscuit Box",
        ],
    },
];

/// Parse a product sub-menu selection.
pub fn product_from_token(body: &str) -> Option<&'static ProductCategory> {
    let token = body.trim();
    PRODUCT_CATEGORIES.iter().find(|p| p.token == token)
}

// ── Prompt builders ─────────────────────────────────────────────────────────

/// The opening category menu.
pub fn category_menu() -> String {
    let mut out = String::from(
        "Assalam o Alaikum! Welcome to Khidmat support.\nPlease reply with a number:\n",
    );
    for category in Category::ALL {
        out.push_str(&format!("{}. {}\n", category.token(), category.label()));
    }
    out.push_str("\n(Send \"reset\" at any time to start over.)");
    out
}

/// Re-prompt shown for an unrecognized category selection.
pub fn invalid_category() -> String {
    format!("Please choose a valid option (1-4).\n\n{}", category_menu())
}

/// The product sub-menu for the order branch.
pub fn product_menu() -> String {
    let mut out = String::from("Which product category would you like to order from?\n");
    for product in &PRODUCT_CATEGORIES {
        out.push_str(&format!("{}. {}\n", product.token, product.name));
    }
    out
}

/// Re-prompt shown for an unrecognized product selection.
pub fn invalid_product() -> String {
    format!("Please choose a valid option (1-2).\n\n{}", product_menu())
}

/// Echo the selected catalog back and ask for the order detail.
pub fn catalog_echo(product: &ProductCategory) -> String {
    let mut out = format!("{} catalog:\n", product.name);
    for item in product.items {
        out.push_str(&format!("- {item}\n"));
    }
    out.push('\n');
    out.push_str(Category::StockOrder.detail_prompt());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keywords_are_case_insensitive_and_trimmed() {
        assert!(is_reset("salam"));
        assert!(is_reset("  HELLO  "));
        assert!(is_reset("Hy"));
        assert!(is_reset("ReSeT"));
        assert!(!is_reset("hello there"));
        assert!(!is_reset("1"));
    }

    #[test]
    fn category_tokens_map_per_menu() {
        assert_eq!(Category::from_token("1"), Some(Category::SalesmanComplaint));
        assert_eq!(
            Category::from_token("2"),
            Some(Category::DistributorComplaint)
        );
        assert_eq!(Category::from_token("3"), Some(Category::QualityPriceBill));
        assert_eq!(Category::from_token("4"), Some(Category::StockOrder));
        assert_eq!(Category::from_token("5"), None);
        assert_eq!(Category::from_token("one"), None);
        assert_eq!(Category::from_token(" 2 "), Some(Category::DistributorComplaint));
    }

    #[test]
    fn complaint_categories_share_the_field_sequence() {
        for category in [
            Category::SalesmanComplaint,
            Category::DistributorComplaint,
            Category::QualityPriceBill,
        ] {
            assert_eq!(
                category.fields(),
                &[Field::Salesman, Field::Shop, Field::Address]
            );
        }
        assert!(Category::StockOrder.fields().is_empty());
    }

    #[test]
    fn menu_lists_every_category() {
        let menu = category_menu();
        for category in Category::ALL {
            assert!(menu.contains(category.label()));
            assert!(menu.contains(&format!("{}.", category.token())));
        }
    }

    #[test]
    fn catalog_echo_lists_items_and_asks_for_detail() {
        let echo = catalog_echo(&PRODUCT_CATEGORIES[0]);
        assert!(echo.contains("Beverages"));
        assert!(echo.contains("Cola 1.5L"));
        assert!(echo.contains(Category::StockOrder.detail_prompt()));
    }

    #[test]
    fn product_tokens_parse() {
        assert_eq!(product_from_token("1").map(|p| p.name), Some("Beverages"));
        assert_eq!(
            product_from_token("2").map(|p| p.name),
            Some("Snacks & Biscuits")
        );
        assert!(product_from_token("3").is_none());
    }
}

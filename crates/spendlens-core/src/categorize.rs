//! Keyword rules for categorizing spending
//!
//! Rules are checked in declaration order against the lower-cased description
//! and the first rule with a matching keyword wins. A description that mentions
//! both a ride-share and a restaurant is therefore Transportation.

use crate::models::Category;

/// Ordered (category, keywords) table. Keywords must be lower-case.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Transportation,
        &[
            "uber", "lyft", "taxi", "presto", "ttc", "go transit", "via rail", "parking",
            "impark", "petro", "shell", "chevron", "husky", "air canada", "westjet",
            "407 etr",
        ],
    ),
    (
        Category::FoodAndDining,
        &[
            "restaurant", "pizza", "burger", "sushi", "mcdonald", "tim horton", "starbucks",
            "second cup", "cafe", "coffee", "subway", "taco", "a&w", "wendy", "kfc", "doordash",
            "skipthedishes", "grocery", "loblaw", "sobeys", "metro", "no frills", "farm boy",
            "freshco",
        ],
    ),
    (
        Category::ShoppingAndRetail,
        &[
            "amazon", "amzn", "walmart", "costco", "best buy", "canadian tire", "winners",
            "ikea", "shoppers", "dollarama", "hudson's bay", "indigo", "uniqlo", "h&m",
            "home depot",
        ],
    ),
    (
        Category::FitnessAndRecreation,
        &[
            "gym", "goodlife", "fitness", "yoga", "climbing", "ymca", "cineplex", "golf",
            "ski", "sport chek", "ticketmaster",
        ],
    ),
    (
        Category::AlcoholAndBeverages,
        &["lcbo", "beer store", "saq", "liquor", "wine", "brewery", "brewing", "pub "],
    ),
    (
        Category::SubscriptionsAndTech,
        &[
            "netflix", "spotify", "disney", "crave", "apple.com", "itunes", "google",
            "microsoft", "adobe", "openai", "github", "dropbox", "patreon", "rogers",
            "bell canada", "bell mobility", "telus", "fido", "subscription",
        ],
    ),
];

/// Map a free-text description to its spending category
pub fn categorize(description: &str) -> Category {
    let text = description.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

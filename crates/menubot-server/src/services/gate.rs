//! Keyword relevance gate applied before the agent is invoked.

/// Words that mark a request as restaurant related.
pub const ALLOWED_KEYWORDS: &[&str] = &[
    "menu",
    "food",
    "breakfast",
    "lunch",
    "dinner",
    "dish",
    "order",
    "restaurant",
];

/// Reply for input that mentions none of the allowed keywords.
pub const REFUSAL: &str =
    "I can only help with restaurant-related questions like menu, food, or orders 🍽️";

/// Returns true if any allowed keyword appears in the input (case-insensitive substring).
pub fn is_menu_related(input: &str) -> bool {
    let input = input.to_lowercase();
    ALLOWED_KEYWORDS.iter().any(|word| input.contains(word))
}

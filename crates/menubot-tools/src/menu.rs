//! The restaurant menu and its filter logic.
//!
//! The menu is a `static` tree of [`MenuNode`]s. Every path ends in a
//! [`MenuNode::Dishes`] list. Key order is declaration order, which is also
//! the order used when listing available options or flattening a category.

use serde::Deserialize;

/// A node of the menu tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuNode {
    /// A leaf list of dish names.
    Dishes(&'static [&'static str]),
    /// A mapping keyed by subcategory, cuisine or diet tag.
    Group(&'static [(&'static str, MenuNode)]),
}

impl MenuNode {
    /// Returns the direct child with exactly the given key.
    ///
    /// Callers normalize first: subcategories and diet tags are lower case,
    /// cuisines are capitalized.
    pub fn child(&self, key: &str) -> Option<&'static MenuNode> {
        match *self {
            MenuNode::Dishes(_) => None,
            MenuNode::Group(entries) => entries
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, node)| node),
        }
    }

    /// Resolves a filter key: the direct child if present, otherwise the
    /// first child group that holds the key.
    fn narrow(&self, key: &str) -> Option<&'static MenuNode> {
        if let Some(node) = self.child(key) {
            return Some(node);
        }
        match *self {
            MenuNode::Dishes(_) => None,
            MenuNode::Group(entries) => entries.iter().find_map(|(_, node)| node.child(key)),
        }
    }

    /// Keys of this node in declaration order (empty for a dish list).
    pub fn keys(&self) -> Vec<&'static str> {
        match *self {
            MenuNode::Dishes(_) => Vec::new(),
            MenuNode::Group(entries) => entries.iter().map(|(name, _)| *name).collect(),
        }
    }

    /// Every dish reachable from this node, in declaration order.
    ///
    /// Dishes listed under several keys appear once per listing.
    pub fn dishes(&self) -> Vec<&'static str> {
        match *self {
            MenuNode::Dishes(items) => items.to_vec(),
            MenuNode::Group(entries) => entries.iter().flat_map(|(_, node)| node.dishes()).collect(),
        }
    }

    fn is_group(&self) -> bool {
        matches!(self, MenuNode::Group(_))
    }
}

/// Filters accepted by [`Menu::lookup`].
///
/// Empty strings are treated the same as absent filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MenuQuery {
    /// Type of meal (breakfast, lunch, dinner, snacks).
    pub category: String,
    /// e.g. main, desserts, beverages, starters.
    #[serde(default)]
    pub subcategory: Option<String>,
    /// e.g. Indian, Italian, Continental.
    #[serde(default)]
    pub cuisine: Option<String>,
    /// e.g. vegan, vegetarian.
    #[serde(default)]
    pub diet: Option<String>,
}

impl MenuQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }
}

fn present(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|s| !s.is_empty())
}

/// First letter upper case, the rest lower case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// The restaurant menu.
#[derive(Debug)]
pub struct Menu {
    categories: &'static [(&'static str, MenuNode)],
}

/// Today's menu.
pub static MENU: Menu = Menu {
    categories: &[
        (
            "breakfast",
            MenuNode::Group(&[
                ("drinks", MenuNode::Dishes(&["Tea", "Coffee", "Orange Juice"])),
                ("starters", MenuNode::Dishes(&["Idli", "Poha", "Fruit Salad"])),
                (
                    "main",
                    MenuNode::Group(&[
                        ("Indian", MenuNode::Dishes(&["Aloo Paratha", "Masala Dosa"])),
                        ("Continental", MenuNode::Dishes(&["Pancakes", "Omelette"])),
                    ]),
                ),
                (
                    "diet",
                    MenuNode::Group(&[
                        ("vegan", MenuNode::Dishes(&["Poha", "Fruit Salad"])),
                        ("vegetarian", MenuNode::Dishes(&["Aloo Paratha", "Masala Dosa"])),
                    ]),
                ),
            ]),
        ),
        (
            "lunch",
            MenuNode::Group(&[
                ("appetizers", MenuNode::Dishes(&["Paneer Tikka", "Veg Spring Roll"])),
                (
                    "main",
                    MenuNode::Group(&[
                        (
                            "Indian",
                            MenuNode::Dishes(&["Dal Tadka", "Paneer Butter Masala", "Jeera Rice"]),
                        ),
                        ("Italian", MenuNode::Dishes(&["Veg Pizza", "Pasta Primavera"])),
                    ]),
                ),
                ("desserts", MenuNode::Dishes(&["Gulab Jamun", "Ice Cream"])),
                (
                    "diet",
                    MenuNode::Group(&[
                        ("vegan", MenuNode::Dishes(&["Dal Tadka", "Veg Spring Roll"])),
                        ("vegetarian", MenuNode::Dishes(&["Paneer Butter Masala", "Veg Pizza"])),
                    ]),
                ),
            ]),
        ),
        (
            "dinner",
            MenuNode::Group(&[
                (
                    "main",
                    MenuNode::Group(&[
                        (
                            "Indian",
                            MenuNode::Dishes(&["Butter Chicken", "Paneer Butter Masala", "Veg Pulao"]),
                        ),
                        ("Italian", MenuNode::Dishes(&["Pasta Alfredo", "Margherita Pizza"])),
                    ]),
                ),
                ("desserts", MenuNode::Dishes(&["Brownie", "Gulab Jamun"])),
                ("beverages", MenuNode::Dishes(&["Lassi", "Soft Drinks"])),
            ]),
        ),
        (
            "snacks",
            MenuNode::Group(&[
                ("starters", MenuNode::Dishes(&["French Fries", "Samosa", "Nachos"])),
                ("beverages", MenuNode::Dishes(&["Tea", "Coffee", "Cold Drinks"])),
            ]),
        ),
    ],
};

impl Menu {
    /// Category names in declaration order.
    pub fn category_names(&self) -> Vec<&'static str> {
        self.categories.iter().map(|(name, _)| *name).collect()
    }

    /// Returns the tree for a category (ASCII case-insensitive).
    pub fn category(&self, name: &str) -> Option<&'static MenuNode> {
        self.categories
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, node)| node)
    }

    /// Filters the menu and formats the answer for the LLM.
    ///
    /// Never fails: unknown categories and filters produce a message listing
    /// what is available instead.
    ///
    /// A cuisine or diet filter that arrives once the working node is already
    /// a dish list is skipped and left out of the heading.
    pub fn lookup(&self, query: &MenuQuery) -> String {
        let category = query.category.to_lowercase();
        let Some(root) = self.category(&category) else {
            return format!(
                "No menu found for \"{}\". Available categories: {}",
                category,
                self.category_names().join(", ")
            );
        };

        let subcategory = present(&query.subcategory).map(str::to_lowercase);
        let mut cuisine = present(&query.cuisine).map(String::from);
        let mut diet = present(&query.diet).map(String::from);

        if subcategory.is_none() && cuisine.is_none() && diet.is_none() {
            return format!("Here are all {} items:\n- {}", category, root.dishes().join("\n- "));
        }

        let mut current = root;
        let path = match &subcategory {
            Some(sub) => format!("{} -> {}", category, sub),
            None => category.clone(),
        };

        if let Some(sub) = &subcategory {
            match current.child(sub) {
                Some(node) => current = node,
                None => {
                    return format!(
                        "No {} found in {}. Available: {}",
                        sub,
                        category,
                        current.keys().join(", ")
                    )
                }
            }
        }

        cuisine = cuisine.filter(|_| current.is_group()).map(|c| capitalize(&c));
        if let Some(wanted) = &cuisine {
            match current.narrow(wanted) {
                Some(node) => current = node,
                None => return format!("No {} options found in {}", wanted, path),
            }
        }

        diet = diet.filter(|_| current.is_group()).map(|d| d.to_lowercase());
        if let Some(wanted) = &diet {
            match current.narrow(wanted) {
                Some(node) => current = node,
                None => return format!("No {} options found in {}", wanted, path),
            }
        }

        match current {
            MenuNode::Dishes(items) => {
                let cuisine = cuisine.map(|c| format!(" ({})", c)).unwrap_or_default();
                let diet = diet.map(|d| format!(" [{}]", d)).unwrap_or_default();
                format!("Here are the items for {}{}{}:\n- {}", path, cuisine, diet, items.join("\n- "))
            }
            MenuNode::Group(_) => "No items found for your query.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(answer: &str) -> Vec<&str> {
        answer.lines().filter_map(|l| l.strip_prefix("- ")).collect()
    }

    #[test]
    fn unfiltered_category_lists_every_reachable_dish() {
        let expected: &[(&str, &[&str])] = &[
            (
                "breakfast",
                &[
                    "Tea", "Coffee", "Orange Juice", "Idli", "Poha", "Fruit Salad", "Aloo Paratha",
                    "Masala Dosa", "Pancakes", "Omelette", "Poha", "Fruit Salad", "Aloo Paratha",
                    "Masala Dosa",
                ],
            ),
            (
                "lunch",
                &[
                    "Paneer Tikka", "Veg Spring Roll", "Dal Tadka", "Paneer Butter Masala", "Jeera Rice",
                    "Veg Pizza", "Pasta Primavera", "Gulab Jamun", "Ice Cream", "Dal Tadka",
                    "Veg Spring Roll", "Paneer Butter Masala", "Veg Pizza",
                ],
            ),
            (
                "dinner",
                &[
                    "Butter Chicken", "Paneer Butter Masala", "Veg Pulao", "Pasta Alfredo",
                    "Margherita Pizza", "Brownie", "Gulab Jamun", "Lassi", "Soft Drinks",
                ],
            ),
            ("snacks", &["French Fries", "Samosa", "Nachos", "Tea", "Coffee", "Cold Drinks"]),
        ];

        for (category, dishes) in expected {
            let answer = MENU.lookup(&MenuQuery::new(*category));
            assert!(answer.starts_with(&format!("Here are all {} items:\n", category)));
            assert_eq!(bullets(&answer), dishes.to_vec(), "category {}", category);
        }
    }

    #[test]
    fn breakfast_vegan_reaches_the_diet_group() {
        let answer = MENU.lookup(&MenuQuery::new("breakfast").diet("vegan"));
        assert_eq!(bullets(&answer), vec!["Poha", "Fruit Salad"]);
        assert_eq!(answer, "Here are the items for breakfast [vegan]:\n- Poha\n- Fruit Salad");
    }

    #[test]
    fn dinner_italian_reaches_the_main_group() {
        let answer = MENU.lookup(&MenuQuery::new("dinner").cuisine("Italian"));
        assert_eq!(
            answer,
            "Here are the items for dinner (Italian):\n- Pasta Alfredo\n- Margherita Pizza"
        );
    }

    #[test]
    fn unknown_category_lists_the_valid_ones() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("unknown")),
            "No menu found for \"unknown\". Available categories: breakfast, lunch, dinner, snacks"
        );
    }

    #[test]
    fn filters_ignore_case() {
        let lower = MENU.lookup(&MenuQuery::new("lunch").subcategory("main").cuisine("italian"));
        let shouted = MENU.lookup(&MenuQuery::new("LUNCH").subcategory("MAIN").cuisine("ITALIAN"));
        assert_eq!(lower, shouted);
        assert_eq!(
            lower,
            "Here are the items for lunch -> main (Italian):\n- Veg Pizza\n- Pasta Primavera"
        );

        let diet = MENU.lookup(&MenuQuery::new("Breakfast").subcategory("Diet").diet("VEGAN"));
        assert_eq!(diet, "Here are the items for breakfast -> diet [vegan]:\n- Poha\n- Fruit Salad");
    }

    #[test]
    fn subcategory_leaf() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("snacks").subcategory("beverages")),
            "Here are the items for snacks -> beverages:\n- Tea\n- Coffee\n- Cold Drinks"
        );
    }

    #[test]
    fn missing_subcategory_lists_available_keys() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("dinner").subcategory("Soups")),
            "No soups found in dinner. Available: main, desserts, beverages"
        );
    }

    #[test]
    fn missing_cuisine_and_diet_report_the_path() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("breakfast").subcategory("main").cuisine("chinese")),
            "No Chinese options found in breakfast -> main"
        );
        assert_eq!(
            MENU.lookup(&MenuQuery::new("dinner").diet("Vegan")),
            "No vegan options found in dinner"
        );
    }

    #[test]
    fn filters_on_a_dish_list_are_skipped_and_unlabelled() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("lunch").subcategory("desserts").cuisine("indian")),
            "Here are the items for lunch -> desserts:\n- Gulab Jamun\n- Ice Cream"
        );
    }

    #[test]
    fn cuisine_then_diet_stops_at_first_leaf() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("lunch").cuisine("indian").diet("vegan")),
            "Here are the items for lunch (Indian):\n- Dal Tadka\n- Paneer Butter Masala\n- Jeera Rice"
        );
    }

    #[test]
    fn filters_only_match_their_own_kind_of_key() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("lunch").diet("italian")),
            "No italian options found in lunch"
        );
        assert_eq!(
            MENU.lookup(&MenuQuery::new("breakfast").cuisine("vegan")),
            "No Vegan options found in breakfast"
        );
        assert_eq!(
            MENU.lookup(&MenuQuery::new("dinner").cuisine("desserts")),
            "No Desserts options found in dinner"
        );
    }

    #[test]
    fn group_left_after_filters_is_reported() {
        assert_eq!(
            MENU.lookup(&MenuQuery::new("breakfast").subcategory("main")),
            "No items found for your query."
        );
    }

    #[test]
    fn empty_filters_count_as_absent() {
        let query = MenuQuery {
            category: "snacks".into(),
            subcategory: Some(String::new()),
            cuisine: Some(String::new()),
            diet: None,
        };
        assert_eq!(MENU.lookup(&query), MENU.lookup(&MenuQuery::new("snacks")));
    }

    #[test]
    fn lookups_are_repeatable() {
        let query = MenuQuery::new("lunch").diet("vegetarian");
        assert_eq!(MENU.lookup(&query), MENU.lookup(&query));
    }

    #[test]
    fn capitalize_normalizes_the_tail() {
        assert_eq!(capitalize("iTALIAN"), "Italian");
        assert_eq!(capitalize(""), "");
    }
}

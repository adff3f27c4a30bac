pub mod create_category;
pub mod get_categories;

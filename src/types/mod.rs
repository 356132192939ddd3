//! Public types for the Pantry API.

mod food;

pub use food::{
    FoodReport, FoodSummary, NutrientEntry, SearchResult, TRACKED_NUTRIENTS, is_tracked_nutrient,
};

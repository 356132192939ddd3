//! Food data types as returned by the FoodData Central API.
//!
//! Field names on the wire follow the provider (`fdcId`, `gtinUpc`,
//! `foodNutrients`, ...). Unknown fields are ignored, so a raw provider
//! body and a record written by [`serde_json::to_string`] both deserialize
//! into the same types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Nutrient name fragments kept by [`FoodReport::filtered`].
///
/// Matching is a case-insensitive substring test, so `"Total lipid (fat)"`
/// and `"Carbohydrate, by difference"` are both kept.
pub const TRACKED_NUTRIENTS: [&str; 5] = ["protein", "total lipid", "carbohydrate", "fiber", "energy"];

/// Whether a nutrient name contains one of [`TRACKED_NUTRIENTS`].
pub fn is_tracked_nutrient(name: &str) -> bool {
    let name = name.to_lowercase();
    TRACKED_NUTRIENTS.iter().any(|wanted| name.contains(wanted))
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSummary {
    #[serde(rename = "fdcId")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "gtinUpc", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

impl FoodSummary {
    /// The barcode, if present and not blank.
    pub fn usable_barcode(&self) -> Option<&str> {
        self.barcode
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

impl fmt::Display for FoodSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fdcId={}, description='{}'", self.id, self.description)?;
        if let Some(barcode) = self.usable_barcode() {
            write!(f, ", gtinUpc={barcode}")?;
        }
        Ok(())
    }
}

/// A search response: ordered hits for a keyword query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "foods", default)]
    pub items: Vec<FoodSummary>,
}

/// A single nutrient measurement, per 100g.
///
/// The provider nests name and unit under a `nutrient` object:
/// `{"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 1.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireNutrientEntry", into = "WireNutrientEntry")]
pub struct NutrientEntry {
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

impl NutrientEntry {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            amount,
        }
    }
}

impl fmt::Display for NutrientEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2} {}", self.name, self.amount, self.unit)
    }
}

#[derive(Serialize, Deserialize)]
struct WireNutrientEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    nutrient: WireNutrient,
    #[serde(default, deserialize_with = "null_as_default")]
    amount: f64,
}

#[derive(Default, Serialize, Deserialize)]
struct WireNutrient {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(rename = "unitName", default, deserialize_with = "null_as_default")]
    unit_name: String,
}

impl From<WireNutrientEntry> for NutrientEntry {
    fn from(wire: WireNutrientEntry) -> Self {
        Self {
            name: wire.nutrient.name,
            unit: wire.nutrient.unit_name,
            amount: wire.amount,
        }
    }
}

impl From<NutrientEntry> for WireNutrientEntry {
    fn from(entry: NutrientEntry) -> Self {
        Self {
            nutrient: WireNutrient {
                name: entry.name,
                unit_name: entry.unit,
            },
            amount: entry.amount,
        }
    }
}

/// Detailed report for one food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodReport {
    #[serde(rename = "fdcId")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: String,
    #[serde(rename = "gtinUpc", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "foodNutrients", default, deserialize_with = "null_as_default")]
    pub nutrients: Vec<NutrientEntry>,
}

impl FoodReport {
    /// Copy of this report keeping only [tracked](is_tracked_nutrient)
    /// nutrients, in their original order. Idempotent.
    pub fn filtered(&self) -> FoodReport {
        FoodReport {
            nutrients: self
                .nutrients
                .iter()
                .filter(|n| is_tracked_nutrient(&n.name))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Render the report as response lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.nutrients.len() + 3);
        lines.push(format!("Name: {}", self.description));
        lines.push(format!("Ingredients: {}", self.ingredients));
        lines.push("Nutritional value per 100g:".to_string());
        lines.extend(self.nutrients.iter().map(|n| format!(" - {n}")));
        lines
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLA: &str = r#"{
        "fdcId": 2494378,
        "description": "COLA",
        "ingredients": "CARBONATED WATER",
        "gtinUpc": "012000338960",
        "dataType": "Branded",
        "foodNutrients": [
            {"nutrient": {"name": "Sodium, Na", "unitName": "mg"}, "amount": 4.0},
            {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 0.0},
            {"nutrient": {"name": "Sugars, total", "unitName": "g"}, "amount": 4.22},
            {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 17.0},
            {"nutrient": {"name": "Caffeine", "unitName": "mg"}, "amount": 8.0},
            {"nutrient": {"name": "Calcium, Ca", "unitName": "mg"}}
        ]
    }"#;

    #[test]
    fn deserializes_provider_report() {
        let report: FoodReport = serde_json::from_str(COLA).unwrap();
        assert_eq!(report.id, 2494378);
        assert_eq!(report.barcode.as_deref(), Some("012000338960"));
        assert_eq!(report.nutrients.len(), 6);
        assert_eq!(report.nutrients[1], NutrientEntry::new("Protein", "g", 0.0));
        // missing amount defaults to zero
        assert_eq!(report.nutrients[5].amount, 0.0);
    }

    #[test]
    fn filter_keeps_tracked_in_order() {
        let report: FoodReport = serde_json::from_str(COLA).unwrap();
        let filtered = report.filtered();
        let names: Vec<_> = filtered.nutrients.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Protein", "Energy"]);
        // the source value is untouched
        assert_eq!(report.nutrients.len(), 6);
    }

    #[test]
    fn filter_is_idempotent() {
        let report: FoodReport = serde_json::from_str(COLA).unwrap();
        let once = report.filtered();
        assert_eq!(once.filtered(), once);
    }

    #[test]
    fn tracked_match_is_case_insensitive_substring() {
        assert!(is_tracked_nutrient("Total lipid (fat)"));
        assert!(is_tracked_nutrient("CARBOHYDRATE, BY DIFFERENCE"));
        assert!(is_tracked_nutrient("Fiber, total dietary"));
        assert!(!is_tracked_nutrient("Sodium, Na"));
        assert!(!is_tracked_nutrient(""));
    }

    #[test]
    fn nulls_become_defaults() {
        let json = r#"{"fdcId": 1, "description": null, "ingredients": null, "foodNutrients": null}"#;
        let report: FoodReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.description, "");
        assert!(report.nutrients.is_empty());
    }

    #[test]
    fn report_lines_format_amounts() {
        let report: FoodReport = serde_json::from_str(COLA).unwrap();
        let lines = report.filtered().lines();
        assert_eq!(
            lines,
            [
                "Name: COLA",
                "Ingredients: CARBONATED WATER",
                "Nutritional value per 100g:",
                " - Protein: 0.00 g",
                " - Energy: 17.00 kcal",
            ]
        );
    }

    #[test]
    fn summary_display_skips_blank_barcode() {
        let summary = FoodSummary {
            id: 7,
            description: "Raffaello".into(),
            barcode: Some("  ".into()),
        };
        assert_eq!(summary.to_string(), "fdcId=7, description='Raffaello'");
        assert_eq!(summary.usable_barcode(), None);
    }

    #[test]
    fn search_result_reads_foods_field() {
        let json = r#"{"totalHits": 2, "foods": [
            {"fdcId": 1, "description": "A", "gtinUpc": "111"},
            {"fdcId": 2, "description": "B"}
        ]}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].usable_barcode(), Some("111"));
        assert_eq!(result.items[1].barcode, None);
    }

    #[test]
    fn summary_survives_its_own_serialization() {
        let summary = FoodSummary {
            id: 3,
            description: "Pepsi".into(),
            barcode: Some("012000001291".into()),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"gtinUpc\""));
        let back: FoodSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}

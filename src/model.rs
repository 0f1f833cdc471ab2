use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Highest numbered `strIngredientN` / `strMeasureN` pair the API returns.
pub const MAX_INGREDIENTS: usize = 20;

/// A single recipe as returned by TheMealDB.
///
/// The API is loosely typed: any field can be missing, `null`, or an empty
/// string, and ids sometimes arrive as numbers. Lightweight records from
/// `filter.php` only carry id, name and thumbnail. The numbered
/// ingredient/measure fields are kept in `extra` and read through
/// [`Recipe::ingredient`] and [`Recipe::measure`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Recipe {
    #[serde(rename = "idMeal", default, deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb", default, deserialize_with = "loose_string")]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategory", default, deserialize_with = "loose_string")]
    pub category: Option<String>,
    #[serde(rename = "strYoutube", default, deserialize_with = "loose_string")]
    pub youtube: Option<String>,
    #[serde(rename = "strInstructions", default, deserialize_with = "loose_string")]
    pub instructions: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Recipe {
    /// Ingredient `n` (1-based), if present and not blank.
    pub fn ingredient(&self, n: usize) -> Option<&str> {
        self.numbered("strIngredient", n)
    }

    /// Measure `n` (1-based), if present and not blank.
    pub fn measure(&self, n: usize) -> Option<&str> {
        self.numbered("strMeasure", n)
    }

    fn numbered(&self, prefix: &str, n: usize) -> Option<&str> {
        match self.extra.get(&format!("{prefix}{n}")) {
            Some(Value::String(s)) => non_blank(s),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().and_then(non_blank)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref().and_then(non_blank)
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().and_then(non_blank)
    }

    pub fn youtube(&self) -> Option<&str> {
        self.youtube.as_deref().and_then(non_blank)
    }
}

/// Response envelope shared by every endpoint. `meals` is `null` (or
/// missing) when nothing matched.
#[derive(Debug, Default, Deserialize)]
pub struct MealsResponse {
    #[serde(default)]
    pub meals: Option<Vec<Recipe>>,
}

impl MealsResponse {
    pub fn into_records(self) -> Vec<Recipe> {
        self.meals.unwrap_or_default()
    }
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
impl Recipe {
    pub fn named(id: &str, name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_ingredient(mut self, n: usize, ingredient: &str, measure: &str) -> Self {
        self.extra
            .insert(format!("strIngredient{n}"), Value::String(ingredient.to_string()));
        self.extra
            .insert(format!("strMeasure{n}"), Value::String(measure.to_string()));
        self
    }
}

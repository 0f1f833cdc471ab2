//! Turns recipe records into the view models the terminal surface draws.
//!
//! Nothing here touches the terminal, so every fallback rule (placeholder
//! images, inert video links, blank ingredient filtering) is checked in plain
//! unit tests.

use crate::model::{MAX_INGREDIENTS, Recipe};
use reqwest::Url;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::warn;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

pub const NO_IMAGE_URL: &str = "https://via.placeholder.com/300x200?text=No+Image";
pub const IMAGE_ERROR_URL: &str = "https://via.placeholder.com/300x200?text=Image+Error";
pub const INERT_LINK: &str = "#";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_INSTRUCTIONS: &str = "Instructions not specified";
pub const UNTITLED: &str = "Untitled recipe";

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const PARAGRAPH_SEPARATOR: &str = "\r\n";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("recipe record has no {0}")]
    MissingField(&'static str),
}

/// Compact summary of one record in the results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub category: String,
    pub video_url: String,
}

impl Card {
    pub fn has_video(&self) -> bool {
        self.video_url != INERT_LINK
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instructions {
    Paragraphs(Vec<String>),
    NotSpecified,
}

/// Detail overlay for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeModal {
    pub name: String,
    pub image_url: String,
    pub category: String,
    pub video_url: String,
    pub ingredients: Vec<String>,
    pub instructions: Instructions,
}

/// Primary collation key: decomposed, accents dropped, lowercased. `Éclair`
/// files under `e`, not after `z`.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Accent- and case-insensitive name ordering. Ties fall back to the
/// lowercased text, then the exact text, so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Sort `records` by name and build a card for each. A record that cannot
/// be turned into a card is logged and skipped; the rest still render.
pub fn render_cards(records: &[Recipe]) -> Vec<Card> {
    let mut sorted: Vec<&Recipe> = records.iter().collect();
    sorted.sort_by(|a, b| {
        compare_names(
            a.name().map(str::trim).unwrap_or_default(),
            b.name().map(str::trim).unwrap_or_default(),
        )
    });

    sorted
        .into_iter()
        .filter_map(|recipe| match build_card(recipe) {
            Ok(card) => Some(card),
            Err(e) => {
                warn!(id = ?recipe.id, error = %e, "skipping recipe card");
                None
            }
        })
        .collect()
}

pub fn build_card(recipe: &Recipe) -> Result<Card, RenderError> {
    let id = recipe
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(RenderError::MissingField("identifier"))?;
    let name = recipe.name().ok_or(RenderError::MissingField("name"))?;

    Ok(Card {
        id: id.to_string(),
        name: name.trim().to_string(),
        image_url: image_url(recipe.thumbnail()),
        category: recipe.category().unwrap_or(NOT_SPECIFIED).to_string(),
        video_url: youtube_watch_url(recipe.youtube()),
    })
}

/// Image to show for a thumbnail reference. A missing thumbnail gets the
/// no-image placeholder; one that is not a fetchable http(s) URL gets the
/// image-error placeholder.
pub fn image_url(thumbnail: Option<&str>) -> String {
    let Some(thumbnail) = thumbnail.map(str::trim) else {
        return NO_IMAGE_URL.to_string();
    };
    match Url::parse(thumbnail) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => thumbnail.to_string(),
        _ => {
            warn!(thumbnail, "unloadable recipe image");
            IMAGE_ERROR_URL.to_string()
        }
    }
}

/// Canonical watch URL for a video reference, or `#` when there is none.
///
/// The id is whatever follows the first `v=` up to the next `v=`. A
/// reference without the marker is passed through unchanged.
pub fn youtube_watch_url(reference: Option<&str>) -> String {
    let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
        return INERT_LINK.to_string();
    };
    match reference.split("v=").nth(1) {
        Some(id) => format!("{WATCH_URL}{id}"),
        None => reference.to_string(),
    }
}

/// `"<measure> <ingredient>"` for every numbered pair whose ingredient is
/// present. The measure alone never produces a line.
pub fn ingredient_lines(recipe: &Recipe) -> Vec<String> {
    (1..=MAX_INGREDIENTS)
        .filter_map(|n| {
            let ingredient = recipe.ingredient(n)?.trim();
            Some(match recipe.measure(n) {
                Some(measure) => format!("{} {}", measure.trim(), ingredient),
                None => ingredient.to_string(),
            })
        })
        .collect()
}

/// One paragraph per non-blank `\r\n`-separated segment.
pub fn format_instructions(text: Option<&str>) -> Instructions {
    let paragraphs: Vec<String> = text
        .unwrap_or_default()
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect();

    if paragraphs.is_empty() {
        Instructions::NotSpecified
    } else {
        Instructions::Paragraphs(paragraphs)
    }
}

pub fn render_modal(recipe: &Recipe) -> RecipeModal {
    RecipeModal {
        name: recipe.name().unwrap_or(UNTITLED).trim().to_string(),
        image_url: image_url(recipe.thumbnail()),
        category: recipe.category().unwrap_or(NOT_SPECIFIED).to_string(),
        video_url: youtube_watch_url(recipe.youtube()),
        ingredients: ingredient_lines(recipe),
        instructions: format_instructions(recipe.instructions.as_deref()),
    }
}

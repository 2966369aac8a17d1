//! Weekly meal plan
//!
//! At most one recipe per day of the week.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{Ingredient, PlannedRecipe};

/// Days in plan order
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One optional recipe per weekday
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default)]
    pub monday: Option<PlannedRecipe>,
    #[serde(default)]
    pub tuesday: Option<PlannedRecipe>,
    #[serde(default)]
    pub wednesday: Option<PlannedRecipe>,
    #[serde(default)]
    pub thursday: Option<PlannedRecipe>,
    #[serde(default)]
    pub friday: Option<PlannedRecipe>,
    #[serde(default)]
    pub saturday: Option<PlannedRecipe>,
    #[serde(default)]
    pub sunday: Option<PlannedRecipe>,
}

impl MealPlan {
    pub fn get(&self, day: Weekday) -> Option<&PlannedRecipe> {
        match day {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    fn slot_mut(&mut self, day: Weekday) -> &mut Option<PlannedRecipe> {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    /// Put a recipe on a day, returning the one it replaced
    pub fn assign(&mut self, day: Weekday, recipe: PlannedRecipe) -> Option<PlannedRecipe> {
        self.slot_mut(day).replace(recipe)
    }

    /// Empty a day, returning what was planned
    pub fn clear(&mut self, day: Weekday) -> Option<PlannedRecipe> {
        self.slot_mut(day).take()
    }

    /// Planned days, Monday first, skipping empty days
    pub fn planned(&self) -> impl Iterator<Item = (Weekday, &PlannedRecipe)> {
        WEEK.into_iter()
            .filter_map(move |day| self.get(day).map(|recipe| (day, recipe)))
    }

    /// Every ingredient of every planned day, in plan order
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.planned().flat_map(|(_, recipe)| recipe.ingredients.iter())
    }

    pub fn planned_count(&self) -> usize {
        self.planned().count()
    }

    pub fn is_empty(&self) -> bool {
        self.planned_count() == 0
    }
}

/// Parse a day name such as "monday", "Tue", or "SUNDAY"
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().to_lowercase().parse::<Weekday>().ok()
}

/// Lower-case day name as used in the stored plan
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

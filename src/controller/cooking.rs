use crate::recipe_model::{Recipe, Step};

/// Which half of the recipe screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipeTab {
    #[default]
    Menu,
    Cooking,
}

/// Step cursor for cooking mode. The index is always a valid position in the
/// recipe's instructions, or 0 when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CookingWizard {
    step: usize,
}

impl CookingWizard {
    pub fn index(&self) -> usize {
        self.step
    }

    pub fn current_step<'r>(&self, recipe: &'r Recipe) -> Option<&'r Step> {
        recipe.instructions.get(self.step)
    }

    pub fn can_next(&self, recipe: &Recipe) -> bool {
        self.step + 1 < recipe.instructions.len()
    }

    pub fn can_previous(&self) -> bool {
        self.step > 0
    }

    pub fn is_last(&self, recipe: &Recipe) -> bool {
        !recipe.instructions.is_empty() && self.step + 1 == recipe.instructions.len()
    }

    /// Returns whether the cursor moved.
    pub fn next(&mut self, recipe: &Recipe) -> bool {
        if self.can_next(recipe) {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.can_previous() {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }
}

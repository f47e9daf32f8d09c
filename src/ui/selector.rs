//! Menu selection and text prompts

use super::dialoguer_selector::DialoguerSelector;
use super::fzf::FzfSelector;
use crate::types::{MenuItem, SelectorType};
use dialoguer::{Input, theme::ColorfulTheme};

/// Selector enum for interactive menus
pub enum Selector {
    Fzf(FzfSelector),
    Dialoguer(DialoguerSelector),
}

impl Selector {
    /// Select an item from the menu; `None` when cancelled
    pub fn select<T: Clone>(
        &self,
        items: &[MenuItem<T>],
        prompt: &str,
        header: Option<&str>,
    ) -> Option<T> {
        match self {
            Selector::Fzf(s) => s.select(items, prompt, header),
            Selector::Dialoguer(s) => s.select(items, prompt, header),
        }
    }

    /// Free-text prompt; `None` when cancelled or unreadable
    pub fn input(&self, prompt: &str, initial: &str) -> Option<String> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .ok()
    }
}

/// Create a selector based on type, falling back to dialoguer without fzf
pub fn create_selector(selector_type: SelectorType) -> Selector {
    match selector_type {
        SelectorType::Fzf => {
            let fzf = FzfSelector::new();
            if fzf.is_available() {
                return Selector::Fzf(fzf);
            }
            Selector::Dialoguer(DialoguerSelector::new())
        }
        SelectorType::Dialoguer => Selector::Dialoguer(DialoguerSelector::new()),
    }
}

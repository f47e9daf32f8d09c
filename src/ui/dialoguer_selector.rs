//! dialoguer selector implementation (fallback)

use crate::types::MenuItem;
use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};

pub struct DialoguerSelector;

impl DialoguerSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select<T: Clone>(
        &self,
        items: &[MenuItem<T>],
        prompt: &str,
        header: Option<&str>,
    ) -> Option<T> {
        if items.is_empty() {
            return None;
        }

        if let Some(header) = header {
            println!("{}", header.dimmed());
        }

        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .max_length(15)
            .interact_opt()
            .ok()
            .flatten()?;

        items.get(selection).map(|item| item.value.clone())
    }
}

//! Interactive capability boundary
//!
//! The engine never talks to a UI directly; selection and confirmation are
//! injected so every flow also works headlessly.

/// One labeled choice presented to a selector
#[derive(Debug, Clone)]
pub struct SelectItem {
    pub label: String,
    pub description: Option<String>,
    pub detail: Option<String>,
}

impl SelectItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            detail: None,
        }
    }
}

/// Present N labeled choices, return the chosen index or none
pub trait Selector {
    fn select(&self, items: &[SelectItem], prompt: &str) -> Option<usize>;
}

/// Present a yes/no choice, return the answer
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Non-interactive implementation: selects nothing, declines everything
#[derive(Debug, Default)]
pub struct NoPrompt;

impl Selector for NoPrompt {
    fn select(&self, _items: &[SelectItem], _prompt: &str) -> Option<usize> {
        None
    }
}

impl Confirmer for NoPrompt {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

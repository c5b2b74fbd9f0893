// src/guide/prompts.rs
//! Prompt templates for the summarizer and the Q&A service.
//!
//! Templates are Handlebars files embedded at compile time. Escaping is
//! disabled: the output is a model prompt, not HTML, and documentation text
//! must reach the model byte-for-byte.

use crate::error::AppError;
use handlebars::Handlebars;
use serde::Serialize;

pub const SUMMARY_SYSTEM: &str = "summary_system";
pub const SUMMARY_USER: &str = "summary_user";
pub const CHAT_SYSTEM: &str = "chat_system";

const TEMPLATES: &[(&str, &str)] = &[
    (SUMMARY_SYSTEM, include_str!("../../templates/summary_system.hbs")),
    (SUMMARY_USER, include_str!("../../templates/summary_user.hbs")),
    (CHAT_SYSTEM, include_str!("../../templates/chat_system.hbs")),
];

/// Registered prompt templates.
pub struct Prompts {
    registry: Handlebars<'static>,
}

impl Prompts {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);

        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| AppError::TemplateRenderError {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, AppError> {
        self.registry
            .render(name, data)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_templates_register() {
        assert!(Prompts::new().is_ok());
    }

    #[test]
    fn documentation_is_not_html_escaped() {
        let prompts = Prompts::new().unwrap();
        let rendered = prompts
            .render(
                CHAT_SYSTEM,
                &json!({ "api_name": "Petstore", "documentation": "curl -H \"a: b\" <url> & more" }),
            )
            .unwrap();
        assert!(rendered.contains("curl -H \"a: b\" <url> & more"));
        assert!(rendered.contains("use the Petstore API"));
    }

    #[test]
    fn system_summary_prompt_describes_json_shape() {
        let prompts = Prompts::new().unwrap();
        let rendered = prompts.render(SUMMARY_SYSTEM, &json!({})).unwrap();
        assert!(rendered.contains("\"keyEndpoints\""));
        assert!(rendered.contains("Use curl examples"));
    }
}

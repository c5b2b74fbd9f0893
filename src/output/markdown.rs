// src/output/markdown.rs
//! Renders a [`SummaryDocument`] as a markdown guide for terminal or file output.

use crate::model::{Endpoint, SummaryDocument, UseCase};
use std::fmt::Write;

/// Renders the guide: overview, getting started, authentication, use cases,
/// endpoints, then the optional rate limits and tips.
pub fn render_guide(doc: &SummaryDocument) -> String {
    let mut out = String::with_capacity(4096);
    // Writing to a String cannot fail.
    let _ = write_guide(&mut out, doc);
    out.trim_end().to_string() + "\n"
}

fn write_guide(out: &mut String, doc: &SummaryDocument) -> std::fmt::Result {
    let title = if doc.api_name.trim().is_empty() {
        "API Guide"
    } else {
        doc.api_name.trim()
    };
    writeln!(out, "# {}\n", title)?;
    if !doc.description.trim().is_empty() {
        writeln!(out, "{}\n", doc.description.trim())?;
    }

    if !doc.getting_started.steps.is_empty() {
        writeln!(out, "## Getting Started\n")?;
        for (i, step) in doc.getting_started.steps.iter().enumerate() {
            writeln!(out, "{}. **{}**: {}", i + 1, step.title, step.description)?;
            write_code(out, step.code.as_deref())?;
        }
        writeln!(out)?;
    }

    let auth = &doc.authentication;
    if !auth.method.is_empty() || !auth.description.is_empty() {
        writeln!(out, "## Authentication\n")?;
        if !auth.method.is_empty() {
            writeln!(out, "**Method:** {}\n", auth.method)?;
        }
        if !auth.description.is_empty() {
            writeln!(out, "{}\n", auth.description)?;
        }
        write_code(out, auth.example.as_deref())?;
    }

    if !doc.common_use_cases.is_empty() {
        writeln!(out, "## Common Use Cases\n")?;
        for use_case in &doc.common_use_cases {
            write_use_case(out, use_case)?;
        }
    }

    if !doc.key_endpoints.is_empty() {
        writeln!(out, "## Key Endpoints\n")?;
        for endpoint in &doc.key_endpoints {
            write_endpoint(out, endpoint)?;
        }
    }

    if let Some(limits) = &doc.rate_limits {
        if !limits.description.is_empty() || !limits.limits.is_empty() {
            writeln!(out, "## Rate Limits\n")?;
            if !limits.description.is_empty() {
                writeln!(out, "{}\n", limits.description)?;
            }
            write_bullets(out, &limits.limits)?;
        }
    }

    if let Some(tips) = doc.quick_tips.as_ref().filter(|t| !t.is_empty()) {
        writeln!(out, "## Quick Tips\n")?;
        write_bullets(out, tips)?;
    }

    Ok(())
}

fn write_use_case(out: &mut String, use_case: &UseCase) -> std::fmt::Result {
    writeln!(out, "### {}\n", use_case.title)?;
    if !use_case.description.is_empty() {
        writeln!(out, "{}\n", use_case.description)?;
    }
    if !use_case.endpoints.is_empty() {
        let endpoints: Vec<String> = use_case
            .endpoints
            .iter()
            .map(|e| format!("`{}`", e))
            .collect();
        writeln!(out, "Endpoints: {}\n", endpoints.join(", "))?;
    }
    write_code(out, use_case.code_example.as_deref())?;
    write_bullets(out, &use_case.tips)
}

fn write_endpoint(out: &mut String, endpoint: &Endpoint) -> std::fmt::Result {
    writeln!(
        out,
        "### `{} {}`\n",
        endpoint.method.to_uppercase(),
        endpoint.path
    )?;
    if !endpoint.description.is_empty() {
        writeln!(out, "{}\n", endpoint.description)?;
    }
    if !endpoint.parameters.is_empty() {
        writeln!(out, "Parameters: {}\n", endpoint.parameters.join(", "))?;
    }
    write_code(out, endpoint.example.as_deref())
}

fn write_code(out: &mut String, code: Option<&str>) -> std::fmt::Result {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => writeln!(out, "\n```\n{}\n```\n", code),
        None => Ok(()),
    }
}

fn write_bullets(out: &mut String, items: &[String]) -> std::fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    writeln!(out)
}

use anyhow::{Context, Result};
use hcpmeg::matfile::{MatFile, MatValue};
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

/// List the variables of a MAT file, descending into structs
pub fn run(file: PathBuf) -> Result<()> {
    let mat = MatFile::open(&file).with_context(|| format!("Failed to read {}", file.display()))?;

    println!("{}", heading(&file.display().to_string()));
    println!("{}", mat.header_text());
    println!();
    for (name, value) in mat.iter() {
        print_value(name, value, 0);
    }
    Ok(())
}

fn print_value(name: &str, value: &MatValue, depth: usize) {
    println!("{}{}: {}", "  ".repeat(depth), field_name(name), value.describe());
    if let Some(structure) = value.as_struct() {
        if structure.len() == 1 {
            for field in &structure.field_names {
                if let Some(child) = structure.field(0, field) {
                    print_value(field, child, depth + 1);
                }
            }
        }
    }
}

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

#[cfg(feature = "colorized_output")]
fn field_name(text: &str) -> String {
    style(text).green().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn field_name(text: &str) -> String {
    text.to_string()
}

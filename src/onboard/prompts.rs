use crate::config::Model;
use anyhow::{Result, bail};
use dialoguer::Select;
use std::io::{BufRead, Write};

const INVALID_CHOICE: &str = "Invalid choice, try again.";

/// Arrow-key model picker for interactive terminals.
pub fn select_model(current: Option<Model>) -> Result<Model> {
    let models = Model::menu();
    let labels: Vec<String> = models.iter().map(ToString::to_string).collect();
    let default = current
        .and_then(|model| models.iter().position(|candidate| *candidate == model))
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("  Choose a model")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(models[idx])
}

/// Numbered model menu over plain streams. Re-prompts until a listed number
/// is entered; fails if input ends first.
pub fn choose_model_from<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Model> {
    writeln!(output, "Choose a model:")?;
    for (position, model) in Model::menu().iter().enumerate() {
        writeln!(output, "{}: {model}", position + 1)?;
    }

    loop {
        write!(output, "Enter number: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended before a model was chosen");
        }
        if let Some(model) = Model::from_menu_choice(&line) {
            return Ok(model);
        }
        writeln!(output, "{INVALID_CHOICE}")?;
    }
}

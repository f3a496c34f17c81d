//! Operator project selection.
//!
//! Projects are numbered from 1 in upstream order and the operator picks one
//! by typing its number. The prompt is asked exactly once.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use crate::provider::Project;

const SEPARATOR: &str = "------------------------------------------";

/// Ordinal-indexed view of the projects listed for a run.
#[derive(Debug, Clone, Default)]
pub struct ProjectDirectory {
    entries: BTreeMap<usize, Project>,
}

/// Outcome of the single selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The operator picked a listed project.
    Project(String),
    /// The input did not match any listed ordinal.
    Invalid,
}

impl ProjectDirectory {
    /// Number the projects 1, 2, 3, … in the order given.
    pub fn from_projects(projects: Vec<Project>) -> Self {
        let entries = projects
            .into_iter()
            .enumerate()
            .map(|(idx, project)| (idx + 1, project))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a project by its ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&Project> {
        self.entries.get(&ordinal)
    }

    /// Resolve raw operator input to a project name.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| self.get(n))
            .map(|p| p.name.as_str())
    }

    /// Print `"{n} | {name} | {type}"` for every project.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (ordinal, project) in &self.entries {
            writeln!(out, "{} | {} | {}", ordinal, project.name, project.project_type)?;
        }
        Ok(())
    }
}

/// Prompt once for a project number and resolve it against `directory`.
///
/// End of input counts as an invalid selection.
pub fn select_project<R: BufRead, W: Write>(
    directory: &ProjectDirectory,
    input: &mut R,
    out: &mut W,
) -> io::Result<Selection> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Which project would you like to test?")?;
    writeln!(out, "Please input a number from the list above: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    match directory.resolve(&line) {
        Some(name) => {
            writeln!(out, "Project: {} selected.", name)?;
            Ok(Selection::Project(name.to_string()))
        }
        None => {
            writeln!(out, "Please input a valid project number.")?;
            Ok(Selection::Invalid)
        }
    }
}

//! Per-item parameters read from the command line or a CSV parameter file.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::dataverse::RoleAssignment;

/// A batch value bundling a target with an optional role to assign on it.
#[derive(Debug, Clone)]
pub struct RoleAssignmentParams<A> {
    pub target: A,
    pub assignment: Option<RoleAssignment>,
}

/// Parse `assignee=role`, e.g. `@dataverseAdmin=contributor`.
/// Returns `None` unless both sides are present.
pub fn parse_assignment(text: &str) -> Option<RoleAssignment> {
    let (assignee, role) = text.split_once('=')?;
    let (assignee, role) = (assignee.trim(), role.trim());
    if assignee.is_empty() || role.is_empty() {
        return None;
    }
    Some(RoleAssignment {
        assignee: assignee.to_string(),
        role: role.to_string(),
    })
}

/// Read `(target, assignment)` rows from a CSV file. The first record is a
/// header and is skipped; columns are taken by position as target (PID or
/// alias), assignee, role.
pub fn read_parameter_file(path: &Path) -> Result<Vec<(String, RoleAssignment)>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open parameter file {}", path.display()))?;
    read_parameters(file).with_context(|| format!("invalid parameter file {}", path.display()))
}

pub fn read_parameters(reader: impl Read) -> Result<Vec<(String, RoleAssignment)>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in csv.records() {
        let (target, assignee, role): (String, String, String) = record?.deserialize(None)?;
        rows.push((target, RoleAssignment { assignee, role }));
    }
    Ok(rows)
}

//! JSON plan bundle loading for the CLI
//!
//! A bundle is one `Plan` serialized as JSON, scenarios nested inside. The
//! loader only deserializes; configuration validation stays with the engine
//! so the CLI and library callers report the same errors.

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::plan::Plan;

/// Load a plan bundle from a JSON file
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Plan, Box<dyn Error>> {
    let file = File::open(path.as_ref())
        .map_err(|e| format!("cannot open {}: {e}", path.as_ref().display()))?;
    let plan = load_plan_from_reader(BufReader::new(file))?;
    debug!(
        "loaded plan {} `{}`: {} asset(s), {} scenario(s)",
        plan.plan_id,
        plan.name,
        plan.assets.len(),
        plan.scenarios.len()
    );
    Ok(plan)
}

/// Load a plan bundle from any reader
pub fn load_plan_from_reader<R: std::io::Read>(reader: R) -> Result<Plan, Box<dyn Error>> {
    let plan: Plan = serde_json::from_reader(reader)?;
    Ok(plan)
}

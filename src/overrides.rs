//! Manual corrections applied to a parsed snapshot before ratios are
//! recomputed.

use crate::snapshot::{FinancialSnapshot, ResolvedLine};
use crate::taxonomy::LineItemId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The container for caller-supplied corrections to a parse result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct SnapshotOverrides {
    #[schemars(
        description = "Ordered list of value corrections, applied top to bottom. Later entries win over earlier ones for the same line item."
    )]
    #[serde(default)]
    pub modifications: Vec<ValueOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ValueOverride {
    /// Replace the resolved values of a line item. A `None` field leaves the
    /// extracted value in place, so current and previous year can be
    /// corrected independently.
    SetValue {
        target: LineItemId,
        current: Option<i64>,
        previous: Option<i64>,
    },

    /// Discard everything extracted for a line item (values and source line),
    /// marking it "not available" in the rendered report.
    Clear { target: LineItemId },
}

impl SnapshotOverrides {
    /// Applies the overrides to a base snapshot, returning a new snapshot.
    /// The original snapshot is immutable, preserving the audit trail.
    pub fn apply(&self, base: &FinancialSnapshot) -> FinancialSnapshot {
        let mut snapshot = base.clone();

        for modification in &self.modifications {
            apply_single_override(&mut snapshot, modification);
        }

        snapshot
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SnapshotOverrides)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

fn apply_single_override(snapshot: &mut FinancialSnapshot, modification: &ValueOverride) {
    match modification {
        ValueOverride::SetValue {
            target,
            current,
            previous,
        } => {
            let map = snapshot.side_map_mut(target.statement());
            if let Some(item) = map.get_mut(target) {
                if current.is_some() {
                    item.resolved.current = *current;
                }
                if previous.is_some() {
                    item.resolved.previous = *previous;
                }
            }
        }

        ValueOverride::Clear { target } => {
            let map = snapshot.side_map_mut(target.statement());
            if let Some(item) = map.get_mut(target) {
                item.resolved = ResolvedLine::default();
            }
        }
    }
}

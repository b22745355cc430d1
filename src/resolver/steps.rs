//! The resolution steps, each a pure function from context to context.
//!
//! A step that fails returns `Halt` with the partial context; nothing is
//! retried or rolled back. Steps consume their context by value, so no two
//! steps ever observe the same instance mid-mutation.

use serde_json::Value;

use crate::plugin::Mantra;
use crate::schema::types::{ComponentDef, SchemaError};
use crate::utils::is_id_number;

use super::context::{Halt, ParentEntity, PathContext, ResolvedAction};

pub type StepResult = Result<PathContext, Halt>;

/// Resolves the first segment to a registered schema and consumes it.
pub fn set_base(mantra: &Mantra, mut ctx: PathContext) -> StepResult {
    let segment = match ctx.next_segment() {
        Some(segment) => segment.to_string(),
        None => {
            return Err(Halt {
                error: SchemaError::NotFound(String::new()),
                context: ctx,
            })
        }
    };
    let schema = match mantra.schemas().get(&segment) {
        Some(schema) => schema,
        None => {
            return Err(Halt {
                error: SchemaError::NotFound(segment),
                context: ctx,
            })
        }
    };
    ctx.name = segment.clone();
    ctx.schema = Some(schema);
    ctx.consume(&segment);
    Ok(ctx)
}

/// Walks relationship and id segments left to right.
///
/// At each segment the relationship test runs before the numeric-id test;
/// the ordering is load-bearing, since a relationship whose name parses as a
/// number would otherwise be misclassified as an id. A segment matching
/// neither ends the phase and is left for action resolution.
pub fn set_record(mantra: &Mantra, mut ctx: PathContext) -> StepResult {
    while let Some(segment) = ctx.next_segment().map(str::to_string) {
        let relationship = ctx
            .schema
            .as_ref()
            .and_then(|schema| schema.relationship(&segment))
            .cloned();

        if let Some(relationship) = relationship {
            let target = match mantra.schemas().get(&relationship.schema) {
                Some(target) => target,
                None => {
                    return Err(Halt {
                        error: SchemaError::NotFound(relationship.schema.clone()),
                        context: ctx,
                    })
                }
            };
            if let Some(parent) = ctx.schema.replace(target) {
                ctx.parents.push(ParentEntity {
                    schema: parent,
                    name: std::mem::take(&mut ctx.name),
                    id: std::mem::take(&mut ctx.id),
                });
            }
            ctx.name = segment.clone();
            ctx.consume(&segment);
            continue;
        }

        if is_id_number(&segment) {
            ctx.id = segment.clone();
            ctx.consume(&segment);
            continue;
        }

        break;
    }
    Ok(ctx)
}

/// Picks the resolved action.
///
/// A custom action named by the next segment wins unconditionally and
/// consumes it; otherwise the default policy applies: a non-empty id means
/// `update` (fetch required), an empty id means `create` (no fetch).
pub fn set_action(mut ctx: PathContext) -> StepResult {
    let custom = ctx.next_segment().map(str::to_string).filter(|segment| {
        ctx.schema
            .as_ref()
            .map(|schema| schema.action(segment).is_some())
            .unwrap_or(false)
    });

    match custom {
        Some(name) => {
            ctx.action = Some(ResolvedAction::custom(&name));
            ctx.consume(&name);
        }
        None if ctx.id.is_empty() => ctx.action = Some(ResolvedAction::create()),
        None => ctx.action = Some(ResolvedAction::update()),
    }
    Ok(ctx)
}

/// Derives the HTTP endpoint: the resolved path with every separator
/// replaced by a slash.
pub fn set_endpoint(mut ctx: PathContext) -> StepResult {
    ctx.endpoint = ctx.path.replace('.', "/");
    Ok(ctx)
}

/// Resolves the target component from the schemas module in the store tree.
///
/// The lookup path is assembled from the schema name, `actions`, the
/// resolved action name, and the caller's context suffix with empty segments
/// dropped. The matched definition is deep-cloned (schema entries are reused
/// across resolutions) and must carry the `MantraForm` mixin tag.
pub fn set_component(mantra: &Mantra, mut ctx: PathContext, context_path: &[&str]) -> StepResult {
    let (schema_name, action_name) = match (ctx.schema.as_ref(), ctx.action.as_ref()) {
        (Some(schema), Some(action)) => (schema.name.clone(), action.name.clone()),
        _ => {
            return Err(Halt {
                error: SchemaError::InvalidComponent(ctx.name.clone()),
                context: ctx,
            })
        }
    };

    let mut segments = vec![schema_name.as_str(), "actions", action_name.as_str()];
    segments.extend(context_path.iter().copied().filter(|s| !s.is_empty()));
    let lookup = segments.join(".");

    let node = match mantra.schemas_module(&lookup) {
        Some(node) => node.clone(),
        None => {
            return Err(Halt {
                error: SchemaError::InvalidComponent(lookup),
                context: ctx,
            })
        }
    };

    let component_name = node
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(lookup.as_str())
        .to_string();
    let tagged = node.get("mixin").and_then(Value::as_str) == Some("MantraForm");
    if !tagged {
        return Err(Halt {
            error: SchemaError::InvalidComponent(component_name),
            context: ctx,
        });
    }

    match serde_json::from_value::<ComponentDef>(node) {
        Ok(component) => {
            ctx.component = Some(component);
            Ok(ctx)
        }
        Err(_) => Err(Halt {
            error: SchemaError::InvalidComponent(component_name),
            context: ctx,
        }),
    }
}

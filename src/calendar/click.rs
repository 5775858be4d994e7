use crate::calendar::widget::ExtendedProps;
use serde_json::Value;

/// Detail line for a widget click state, `"[{cat}] {detail}"`.
///
/// The state looks like `{"eventClick": {"event": {"extendedProps": {...}}}}`. Returns
/// `None` when nothing was clicked or the state is not valid JSON; missing properties
/// read as empty text.
pub fn click_detail(state_json: &str) -> Option<String> {
    let state: Value = serde_json::from_str(state_json).ok()?;
    let click = state.get("eventClick").filter(|click| is_truthy(click))?;
    let props = click
        .get("event")
        .and_then(|event| event.get("extendedProps"))
        .cloned()
        .and_then(|props| serde_json::from_value::<ExtendedProps>(props).ok())
        .unwrap_or_default();
    Some(format!("[{}] {}", props.cat, props.detail))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        Value::Number(_) => true,
    }
}

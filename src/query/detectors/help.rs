use crate::query::columns::aggregate_target;
use crate::query::response::{QueryResponse, ResultKind};
use crate::types::Value;

use super::Ctx;

/// Fallback answer: the available columns plus example questions.
pub(crate) fn help(ctx: &Ctx<'_>) -> QueryResponse {
    let columns = ctx.dataset.column_names();

    let mut examples = vec!["how many rows".to_string()];
    if let Some(idx) = aggregate_target(&ctx.dataset.schema, ctx.classes, ctx.text) {
        let numeric = ctx.column_name(idx);
        examples.push(format!("total {numeric}"));
        examples.push(format!("average {numeric}"));
        examples.push(format!("highest {numeric}"));
        if let Some(label) = ctx.classes.first_categorical() {
            examples.push(format!("show {} where {numeric} greater than 10", ctx.column_name(label)));
        }
    }
    if ctx.classes.first_categorical().is_some() {
        examples.push("names starting with a".to_string());
    }

    let answer = format!(
        "I couldn't understand that question. Available columns: {}. Try asking: {}.",
        columns.join(", "),
        examples
            .iter()
            .map(|e| format!("'{e}'"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    QueryResponse::new(ResultKind::Help, answer)
        .with_values(columns.into_iter().map(Value::Utf8).collect())
}

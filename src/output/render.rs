//! Result rendering
//!
//! Writes a response envelope to a terminal in one of three modes. `raw`
//! pretty-prints the whole response. `default` and `table` print a one-line
//! summary of a search response followed by the hits, and fall back to
//! printing the response as-is when it has no usable `hits` section.

use std::io::Write;

use serde_json::{Map, Value as JsonValue};

use super::fields::{display_optional, display_value, resolve};
use super::terminal::Style;
use crate::errors::Result;
use crate::models::{OutputMode, ResponseBody, ResponseEnvelope};
use crate::table::{columns_for, format_hits_table};

/// The parts of a search response the summary line and hit list need
#[derive(Debug, Clone, Copy)]
pub struct SearchSummary<'a> {
    pub total: Option<&'a JsonValue>,
    pub took: Option<&'a JsonValue>,
    pub max_score: Option<&'a JsonValue>,
    pub hits: &'a [JsonValue],
}

impl SearchSummary<'_> {
    /// `"<total> results in <took> milliseconds with a max score of <max>"`
    pub fn line(&self) -> String {
        // Elasticsearch 7+ reports total as {"value": n, "relation": "eq"}
        let total = match self.total {
            Some(JsonValue::Object(map)) => map.get("value"),
            other => other,
        };

        format!(
            "{} results in {} milliseconds with a max score of {}",
            display_optional(total),
            display_optional(self.took),
            display_optional(self.max_score)
        )
    }
}

/// Extract the summary, or `None` when `response.hits.hits` is not a list
pub fn search_summary(response: &JsonValue) -> Option<SearchSummary<'_>> {
    let section = response.get("hits")?.as_object()?;
    let hits = section.get("hits")?.as_array()?;

    Some(SearchSummary {
        total: section.get("total"),
        took: response.get("took"),
        max_score: section.get("max_score"),
        hits,
    })
}

/// Renders envelopes with a fixed styling policy
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    style: Style,
}

impl Renderer {
    pub fn new(style: Style) -> Self {
        Self { style }
    }

    pub fn render<W: Write>(&self, envelope: &ResponseEnvelope, out: &mut W) -> Result<()> {
        let json = match &envelope.response {
            ResponseBody::Json(json) => json,
            ResponseBody::Text(text) => return write_text(text, out),
        };

        let params = &envelope.merged_args;
        match params.output {
            OutputMode::Raw => write_pretty(json, out),
            OutputMode::Default => match search_summary(json) {
                Some(summary) => self.render_default(&summary, params.fields.as_deref(), out),
                None => write_pretty(json, out),
            },
            OutputMode::Table => match search_summary(json) {
                Some(summary) => self.render_table(&summary, params.fields.as_deref(), out),
                None => write_pretty(json, out),
            },
        }
    }

    fn render_default<W: Write>(
        &self,
        summary: &SearchSummary<'_>,
        fields: Option<&[String]>,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out, "{}", self.style.success(&summary.line()))?;

        for hit in summary.hits {
            let identity = format!(
                "_id:{}, _score:{}",
                display_optional(hit.get("_id")),
                display_optional(hit.get("_score"))
            );
            writeln!(out, "{}", self.style.info(&identity))?;

            // Hits fetched with `_source: false` carry no document
            let shown = match fields {
                Some(fields) if !fields.is_empty() => Some(project(fields, hit)),
                _ => hit.get("_source").cloned(),
            };
            if let Some(shown) = shown {
                writeln!(out, "{}", display_value(&shown))?;
            }
        }

        Ok(())
    }

    fn render_table<W: Write>(
        &self,
        summary: &SearchSummary<'_>,
        fields: Option<&[String]>,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out, "{}", self.style.success(&summary.line()))?;

        let columns = columns_for(fields);
        let table = format_hits_table(&columns, summary.hits, self.style.is_enabled());
        writeln!(out, "{}", table)?;

        Ok(())
    }
}

/// `{field: resolved value}` for each selected field, in order
fn project(fields: &[String], hit: &JsonValue) -> JsonValue {
    let projection: Map<String, JsonValue> = fields
        .iter()
        .map(|field| (field.clone(), resolve(field, hit)))
        .collect();
    JsonValue::Object(projection)
}

fn write_pretty<W: Write>(json: &JsonValue, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, json)?;
    writeln!(out)?;
    Ok(())
}

fn write_text<W: Write>(text: &str, out: &mut W) -> Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

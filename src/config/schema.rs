//! Static JSON Schema for configuration documents.

use serde_json::{json, Value};

/// Schema describing the allowed configuration keys, for authoring tooling.
/// Derivable without running a cleanup pass.
pub fn config_schema() -> Value {
    let string_or_string_array = json!({
        "oneOf": [
            { "type": "string" },
            { "type": "array", "items": { "type": "string" } }
        ]
    });

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "dustbuster configuration",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "dirs": {
                "type": "array",
                "items": { "type": "string", "minLength": 1 },
                "description": "Directories to clean, resolved against the config file's directory."
            },
            "exclude": {
                "type": "array",
                "items": { "type": "string", "minLength": 1 },
                "description": "Subtrees excluded from cleanup."
            },
            "maxAge": {
                "oneOf": [
                    { "type": "number", "minimum": 0 },
                    { "type": "string", "pattern": "^[0-9]+[smhdwSMHDW]?$" },
                    { "type": "null" }
                ],
                "description": "Minimum entry age before removal: hours as a number, or 30m/12h/5d."
            },
            "summary": { "type": "boolean" },
            "parallel": { "type": "boolean" },
            "dryRun": { "type": "boolean" },
            "deep": { "type": "boolean" },
            "logFile": {
                "oneOf": [
                    { "type": "string", "minLength": 1 },
                    { "type": "null" }
                ],
                "description": "File that receives a copy of every status line."
            },
            "concurrency": {
                "oneOf": [
                    { "type": "integer", "minimum": 1 },
                    { "type": "null" }
                ],
                "description": "Cap on concurrently cleaned targets, or null for the default."
            },
            "preview": { "type": "boolean" },
            "presets": {
                "oneOf": string_or_string_array["oneOf"].clone(),
                "description": "Other configuration sources to import, by name or path."
            }
        }
    })
}

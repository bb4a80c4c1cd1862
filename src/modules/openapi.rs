//! Builders for the OpenAPI fragments each catalog module contributes.

use serde_json::{json, Value};

pub fn schema_ref(schema: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{schema}") })
}

pub fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

pub fn error_response(description: &str) -> Value {
    json_response(description, schema_ref("ErrorResponse"))
}

pub fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

pub fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema_ref(schema) } }
    })
}

/// Standard CRUD paths for a resource rooted at `/` and `/{id}`.
pub fn crud_paths(tag: &str, schema: &str, draft_schema: &str) -> Value {
    json!({
        "/": {
            "get": {
                "summary": format!("List {}", tag.to_lowercase()),
                "tags": [tag],
                "responses": {
                    "200": json_response("All records", json!({ "type": "array", "items": schema_ref(schema) })),
                    "500": error_response("Internal server error")
                }
            },
            "post": {
                "summary": format!("Create {}", schema.to_lowercase()),
                "tags": [tag],
                "requestBody": json_body(draft_schema),
                "responses": {
                    "201": json_response("Created", schema_ref(schema)),
                    "400": error_response("Validation error"),
                    "404": error_response("Referenced record not found")
                }
            }
        },
        "/{id}": {
            "get": {
                "summary": format!("Get {} by id", schema.to_lowercase()),
                "tags": [tag],
                "parameters": [id_parameter()],
                "responses": {
                    "200": json_response("Found", schema_ref(schema)),
                    "404": error_response("Not found")
                }
            },
            "put": {
                "summary": format!("Replace {}", schema.to_lowercase()),
                "tags": [tag],
                "parameters": [id_parameter()],
                "requestBody": json_body(draft_schema),
                "responses": {
                    "200": json_response("Updated", schema_ref(schema)),
                    "400": error_response("Validation error"),
                    "404": error_response("Not found")
                }
            },
            "delete": {
                "summary": format!("Delete {}", schema.to_lowercase()),
                "tags": [tag],
                "parameters": [id_parameter()],
                "responses": {
                    "204": { "description": "Deleted" },
                    "404": error_response("Not found")
                }
            }
        }
    })
}

/// Full fragment for a resource that only carries an id and a name.
pub fn named_resource(tag: &str, schema: &str) -> Value {
    let draft_schema = format!("{schema}Draft");
    json!({
        "paths": crud_paths(tag, schema, &draft_schema),
        "components": {
            "schemas": {
                schema: {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "name": { "type": "string" }
                    },
                    "required": ["id", "name"]
                },
                draft_schema: {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "minLength": 1 }
                    },
                    "required": ["name"]
                }
            }
        }
    })
}

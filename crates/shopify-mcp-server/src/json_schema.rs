/// Macro to generate a JSON schema from a type
///
/// Subschemas are inlined so that every property schema is self-contained and can be
/// compiled on its own by the argument validator.
#[macro_export]
macro_rules! schema_from_type {
    ($type:ty) => {{
        // Use Draft-07 for compatibility with MCP clients like VSCode/Copilot that don't support newer drafts.
        // See: https://github.com/microsoft/vscode/issues/251315
        let mut settings = schemars::generate::SchemaSettings::draft07();
        settings.inline_subschemas = true;
        let generator = settings.into_generator();
        let schema = generator.into_root_schema_for::<$type>();
        match serde_json::to_value(schema) {
            Ok(serde_json::Value::Object(schema)) => schema,
            _ => panic!("Failed to generate schema for {}", stringify!($type)),
        }
    }};
}

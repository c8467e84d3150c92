use tantivy::schema::{self, Schema, STORED, STRING};

/// Field names used in the source excerpt index.
pub mod field {
    pub const ID: &str = "id";
    pub const DOCUMENT_ID: &str = "document_id";
    pub const LOCATOR: &str = "locator";
    pub const TEXT: &str = "text";
    pub const TOPIC_TAGS: &str = "topic_tags";
}

/// Build the Tantivy schema used by the source excerpt index.
pub fn build_schema() -> Schema {
    let mut builder = Schema::builder();

    // Identifiers, stored and indexed as exact strings
    builder.add_text_field(field::ID, STRING | STORED);
    builder.add_text_field(field::DOCUMENT_ID, STRING | STORED);

    // Stored-only locator
    builder.add_text_field(field::LOCATOR, STORED);

    // Excerpt body, returned with hits but never queried
    builder.add_text_field(field::TEXT, STORED);

    // Multi-valued, normalized topic tags, exact match lookups
    builder.add_text_field(field::TOPIC_TAGS, STRING | STORED);

    builder.build()
}

/// Resolve a field by name from the schema, returning the Tantivy `Field` handle.
///
/// # Panics
///
/// Panics if the field name does not exist in the schema. This is only called
/// with compile-time field name constants, so a panic indicates a schema
/// definition bug.
pub fn get_field(schema: &Schema, name: &str) -> schema::Field {
    schema
        .get_field(name)
        .unwrap_or_else(|_| panic!("field '{name}' not found in schema"))
}

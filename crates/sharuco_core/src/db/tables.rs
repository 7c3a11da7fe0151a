//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Snippet documents (JSON) keyed by insertion sequence.
pub const SNIPPETS: TableDefinition<u64, &[u8]> = TableDefinition::new("snippets");
/// Snippet id to insertion sequence.
pub const SNIPPET_IDS: TableDefinition<&str, u64> = TableDefinition::new("snippet_ids");

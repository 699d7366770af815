//! Transaction wrapping for multi-statement mutations.

/// Wrap a statement block in one SurrealDB transaction: every write in
/// the block commits together or not at all. Single-statement mutations
/// are already atomic and do not need this.
pub(crate) fn in_transaction(statements: &str) -> String {
    format!("BEGIN TRANSACTION; {statements} COMMIT TRANSACTION;")
}

#[cfg(test)]
mod tests {
    use super::in_transaction;

    #[test]
    fn wraps_statements_in_transaction_markers() {
        let sql = in_transaction("CREATE a; CREATE b;");
        assert!(sql.starts_with("BEGIN TRANSACTION;"));
        assert!(sql.ends_with("COMMIT TRANSACTION;"));
        assert!(sql.contains("CREATE a; CREATE b;"));
    }
}

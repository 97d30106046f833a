//! Tool Tests
//!
//! Built-in tools through the registry and the permission-gated executor.
//!
//! Run: cargo nextest run --test tools_tests

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Registry
// =============================================================================

mod registry_tests {
    use deepseek_code::tools::ToolRegistry;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_builtins_registered() {
        let registry = ToolRegistry::new();
        let names: Vec<String> = registry
            .list_tools()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["edit_file", "glob", "grep", "read_file", "write_file"]
        );
        for def in registry.definitions() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }

    #[tokio::test]
    async fn test_write_then_read_through_registry() {
        super::init_tracing();
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let registry = ToolRegistry::new();

        let written = registry
            .execute(
                "write_file",
                json!({"path": path.to_str().unwrap(), "content": "# Notes\n"}),
            )
            .await;
        assert!(written.success);

        let read = registry
            .get("read_file")
            .unwrap()
            .execute(json!({"path": path.to_str().unwrap()}))
            .await;
        assert_eq!(read.output, "# Notes\n");
    }

    #[tokio::test]
    async fn test_missing_field_is_failure() {
        let registry = ToolRegistry::new();
        for tool in ["read_file", "write_file", "edit_file", "glob", "grep"] {
            let result = registry.execute(tool, json!({})).await;
            assert!(!result.success, "{} should fail on empty input", tool);
        }
    }
}

// =============================================================================
// File tools
// =============================================================================

mod file_tool_tests {
    use deepseek_code::tools::{EditFileTool, Tool};
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_edit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.py");
        std::fs::write(&path, "def hello():\n    print('hello')").unwrap();

        let result = EditFileTool
            .execute(json!({
                "path": path.to_str().unwrap(),
                "old": "print('hello')",
                "new": "print('world')"
            }))
            .await;

        assert!(result.success);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("print('world')"));
        assert!(!content.contains("print('hello')"));
    }

    #[tokio::test]
    async fn test_edit_not_found_leaves_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.py");
        let original = b"def hello():\r\n    pass\r\n";
        std::fs::write(&path, original).unwrap();

        let result = EditFileTool
            .execute(json!({
                "path": path.to_str().unwrap(),
                "old": "print('missing')",
                "new": "x"
            }))
            .await;

        assert!(!result.success);
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }
}

// =============================================================================
// Search tools
// =============================================================================

mod search_tool_tests {
    use deepseek_code::tools::{GlobTool, GrepTool, Tool};
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_glob_tool() {
        let dir = tempdir().unwrap();
        for name in ["test1.py", "test2.py", "readme.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg/nested.py"), "").unwrap();

        let flat = GlobTool
            .execute(json!({"pattern": "*.py", "path": dir.path().to_str().unwrap()}))
            .await;
        assert!(flat.success);
        assert!(flat.output.contains("test1.py"));
        assert!(flat.output.contains("test2.py"));
        assert!(!flat.output.contains("readme.txt"));

        let deep = GlobTool
            .execute(json!({"pattern": "**/*.py", "path": dir.path().to_str().unwrap()}))
            .await;
        assert!(deep.success);
        assert!(deep.output.contains("nested.py"));
        assert!(deep.output.contains("test1.py"));
    }

    #[tokio::test]
    async fn test_grep_tool() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("test.py"),
            "def hello():\n    pass\n\ndef world():\n    pass\n",
        )
        .unwrap();

        let result = GrepTool
            .execute(json!({"pattern": "def ", "path": dir.path().to_str().unwrap()}))
            .await;
        assert!(result.success);
        assert!(result.output.contains("def hello"));
        assert!(result.output.contains("def world"));

        let none = GrepTool
            .execute(json!({
                "pattern": "nonexistent_pattern_xyz",
                "path": dir.path().to_str().unwrap()
            }))
            .await;
        assert!(none.success);
        assert!(none.output.contains("No matches"));
    }
}

// =============================================================================
// Executor
// =============================================================================

mod executor_tests {
    use std::sync::Arc;

    use deepseek_code::permissions::{PermissionManager, PermissionMode};
    use deepseek_code::tools::{AutoApprove, AutoDeny, ToolExecutor, ToolRegistry};
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_trust_mode_writes_without_asking() {
        super::init_tracing();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let executor = ToolExecutor::new(
            ToolRegistry::new(),
            Arc::new(PermissionManager::new(PermissionMode::Trust)),
            Arc::new(AutoDeny),
        );

        let result = executor
            .execute(
                "write_file",
                json!({"path": path.to_str().unwrap(), "content": "ok"}),
            )
            .await;
        assert!(result.success);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_default_mode_consults_approver() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "alpha").unwrap();
        let input = json!({"path": path.to_str().unwrap(), "old": "alpha", "new": "beta"});

        let denied = ToolExecutor::new(
            ToolRegistry::new(),
            Arc::new(PermissionManager::default()),
            Arc::new(AutoDeny),
        );
        assert!(!denied.execute("edit_file", input.clone()).await.success);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha");

        let approved = ToolExecutor::new(
            ToolRegistry::new(),
            Arc::new(PermissionManager::default()),
            Arc::new(AutoApprove),
        );
        assert!(approved.execute("edit_file", input).await.success);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "beta");
    }
}

//! Integration tests for the scaffold tool set
//!
//! Exercises the tools the way the agent does: through a [`ToolSet`] built for
//! one working directory and `execute_with_timing`.

use serde_json::{Value, json};
use sitegen_core::tools::{ToolCall, ToolResult, ToolSet};
use sitegen_tools::{PATH_TRAVERSAL_MESSAGE, create_sandbox_tools};
use std::path::Path;
use tempfile::TempDir;

async fn run(tools: &ToolSet, name: &str, args: Value) -> ToolResult {
    let call = ToolCall::from_json(format!("call_{}", name), name, args);
    let tool = tools.get(name).expect("tool is registered");
    tool.execute_with_timing(&call).await
}

#[tokio::test]
async fn test_escaping_write_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let work_dir = temp_dir.path().join("code_output").join("vite_project_1");
    std::fs::create_dir_all(&work_dir).unwrap();
    let tools = create_sandbox_tools(&work_dir);

    let result = run(
        &tools,
        "FileWrite",
        json!({"filepath": "../../outside.txt", "content": "x"}),
    )
    .await;

    assert!(result.success);
    assert_eq!(result.content(), PATH_TRAVERSAL_MESSAGE);
    assert!(!temp_dir.path().join("outside.txt").exists());
    assert!(!work_dir.parent().unwrap().join("outside.txt").exists());
}

#[tokio::test]
async fn test_every_file_tool_refuses_to_leave_the_root() {
    let temp_dir = TempDir::new().unwrap();
    let work_dir = temp_dir.path().join("project");
    std::fs::create_dir_all(&work_dir).unwrap();
    std::fs::write(temp_dir.path().join("secret.txt"), "token").unwrap();
    let tools = create_sandbox_tools(&work_dir);

    let attempts = [
        ("FileRead", json!({"filePath": "../secret.txt"})),
        ("FileModify", json!({"filePath": "../secret.txt", "searchStr": "token", "replaceStr": "x"})),
        ("FileDelete", json!({"filePath": "../secret.txt"})),
        ("ReadDir", json!({"dirPath": ".."})),
    ];
    for (name, args) in attempts {
        let result = run(&tools, name, args).await;
        assert_eq!(result.content(), PATH_TRAVERSAL_MESSAGE, "{} escaped", name);
    }

    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("secret.txt")).unwrap(),
        "token"
    );
}

#[tokio::test]
async fn test_scaffold_session() {
    let temp_dir = TempDir::new().unwrap();
    let work_dir = temp_dir.path();
    let tools = create_sandbox_tools(work_dir);

    let files = [
        ("package.json", "{\"name\":\"demo\"}"),
        ("index.html", "<div id=\"app\"></div>"),
        ("src/main.js", "import App from './App.vue'"),
        ("src/App.vue", "<template><h1>Hello</h1></template>"),
    ];
    for (path, content) in files {
        let result = run(&tools, "FileWrite", json!({"filepath": path, "content": content})).await;
        assert_eq!(result.content(), format!("File written: {}", path));
    }

    let result = run(
        &tools,
        "FileModify",
        json!({"filePath": "src/App.vue", "searchStr": "Hello", "replaceStr": "Todo"}),
    )
    .await;
    assert_eq!(result.content(), "File modified: src/App.vue");

    let result = run(&tools, "FileDelete", json!({"filePath": "index.html"})).await;
    assert_eq!(result.content(), "Cannot delete protected file: index.html");

    let result = run(&tools, "ReadDir", json!({})).await;
    assert_eq!(
        result.content(),
        "index.html\npackage.json\nsrc/\n  App.vue\n  main.js\n"
    );

    let result = run(&tools, "FileRead", json!({"filePath": "src/App.vue"})).await;
    assert_eq!(result.content(), "<template><h1>Todo</h1></template>");

    let result = run(&tools, "Exit", json!({"summary": "done"})).await;
    assert_eq!(result.content(), "done");
    assert!(Path::new(work_dir).join("src").is_dir());
}

#[tokio::test]
async fn test_missing_arguments_fail_the_call() {
    let temp_dir = TempDir::new().unwrap();
    let tools = create_sandbox_tools(temp_dir.path());

    let result = run(&tools, "FileModify", json!({"filePath": "a.txt"})).await;
    assert!(!result.success);
    assert_eq!(result.content(), "Invalid arguments: Missing 'searchStr' parameter");

    let result = run(&tools, "Exit", json!({})).await;
    assert!(!result.success);
}

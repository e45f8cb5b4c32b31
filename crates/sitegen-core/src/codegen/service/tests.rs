//! Tests for the generation service

use super::*;
use crate::config::SessionConfig;
use crate::llm::provider::SingleModelProvider;
use crate::llm::{MessageRole, ScriptedChatModel};
use crate::session::InMemoryChatHistory;
use crate::tools::{Tool, ToolCall, ToolError, ToolResult, ToolSchema, ToolSet};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;

struct RecordingTool {
    name: &'static str,
    terminal: bool,
    fail: bool,
    invoked: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Records invocations"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(self.name, "Records invocations", vec![])
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        self.invoked.lock().push(call.name.clone());
        if self.fail {
            return Err(ToolError::InvalidArguments("Missing filePath".to_string()));
        }
        Ok(ToolResult::success(&call.id, self.name(), format!("{} done", self.name)))
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}

struct Fixture {
    service: GenerationService,
    model: Arc<ScriptedChatModel>,
    invoked: Arc<Mutex<Vec<String>>>,
    _temp_dir: TempDir,
    root: PathBuf,
}

fn fixture(model: ScriptedChatModel) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("code_output");
    let model = Arc::new(model);
    let invoked = Arc::new(Mutex::new(Vec::new()));

    let factory_invoked = invoked.clone();
    let factory = move |_dir: &Path| {
        let tool = |name: &'static str, terminal: bool, fail: bool| -> Arc<dyn Tool> {
            Arc::new(RecordingTool {
                name,
                terminal,
                fail,
                invoked: factory_invoked.clone(),
            })
        };
        ToolSet::new()
            .with_tool(tool("ReadDir", false, false))
            .with_tool(tool("FileRead", false, true))
            .with_tool(tool("Exit", true, false))
    };

    let sessions = SessionCache::new(Arc::new(InMemoryChatHistory::new()), &SessionConfig::default());
    let service = GenerationService::new(
        Arc::new(SingleModelProvider(model.clone())),
        sessions,
        Arc::new(factory),
        &root,
    );

    Fixture {
        service,
        model,
        invoked,
        _temp_dir: temp_dir,
        root,
    }
}

async fn run(
    fixture: &Fixture,
    message: &str,
    output_type: OutputType,
) -> (SitegenResult<()>, Vec<GenerationEvent>) {
    let mut events = Vec::new();
    let mut on_event = |event: GenerationEvent| events.push(event);
    let result = fixture
        .service
        .generate("42", message, output_type, &mut on_event, &CancellationToken::new())
        .await;
    (result, events)
}

#[tokio::test]
async fn test_plain_generation_streams_text_in_order() {
    let fixture = fixture(ScriptedChatModel::new("standard").with_text_chunked("<html>hello</html>", 5));

    let (result, events) = run(&fixture, "make a page", OutputType::SingleFile).await;
    result.unwrap();

    let text: String = events.iter().filter_map(|e| e.as_text()).collect();
    assert_eq!(text, "<html>hello</html>");
    assert_eq!(events.len(), 4);

    let call = &fixture.model.calls()[0];
    assert_eq!(call.messages[0].role, MessageRole::System);
    assert_eq!(call.messages[0].content, crate::prompts::VANILLA_HTML_SYSTEM_PROMPT);
    assert_eq!(call.messages.last().unwrap().content, "make a page");
    assert!(call.tool_names.is_empty());
}

#[tokio::test]
async fn test_session_history_is_sent_on_next_turn() {
    let fixture = fixture(
        ScriptedChatModel::new("standard")
            .with_text("first answer")
            .with_text("second answer"),
    );

    run(&fixture, "first", OutputType::MultiFile).await.0.unwrap();
    run(&fixture, "second", OutputType::MultiFile).await.0.unwrap();

    let contents: Vec<String> = fixture.model.calls()[1]
        .messages
        .iter()
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(
        contents,
        vec![
            crate::prompts::MULTI_FILES_SYSTEM_PROMPT.to_string(),
            "first".to_string(),
            "second".to_string()
        ]
    );
}

#[tokio::test]
async fn test_failed_generation_still_records_instruction() {
    let fixture = fixture(ScriptedChatModel::new("standard").with_error("model unavailable"));

    let (result, events) = run(&fixture, "broken", OutputType::SingleFile).await;
    assert!(matches!(result, Err(SitegenError::Llm { .. })));
    assert!(events.is_empty());

    let session = fixture
        .service
        .sessions()
        .get(OutputType::SingleFile, "42")
        .await
        .unwrap();
    assert_eq!(session.messages()[0].content, "broken");
}

#[tokio::test]
async fn test_agent_round_runs_tools_in_order_until_exit() {
    let calls = vec![
        ToolCall::from_json("c1", "ReadDir", json!({"dirPath": "."})),
        ToolCall::from_json("c2", "Deploy", json!({})),
        ToolCall::from_json("c3", "FileRead", json!({})),
        ToolCall::from_json("c4", "Exit", json!({"summary": "done"})),
        ToolCall::from_json("c5", "ReadDir", json!({})),
    ];
    let fixture = fixture(ScriptedChatModel::new("reasoning").with_tool_calls("Scaffolding.", calls));

    let (result, events) = run(&fixture, "vue todo app", OutputType::ProjectScaffold).await;
    result.unwrap();

    assert_eq!(events.len(), 5);
    assert_eq!(events[0], GenerationEvent::Text("Scaffolding.".to_string()));
    assert!(matches!(&events[1], GenerationEvent::ToolResult { tool_name, tool_content, .. }
        if tool_name == "ReadDir" && tool_content == "ReadDir done"));
    assert!(matches!(&events[2], GenerationEvent::ToolError { tool_name, tool_error, .. }
        if tool_name == "Deploy" && tool_error == "Tool not found: Deploy"));
    assert!(matches!(&events[3], GenerationEvent::ToolError { tool_name, tool_error, .. }
        if tool_name == "FileRead" && tool_error.contains("Missing filePath")));
    assert!(matches!(&events[4], GenerationEvent::ToolResult { tool_name, .. } if tool_name == "Exit"));

    assert_eq!(*fixture.invoked.lock(), vec!["ReadDir", "FileRead", "Exit"]);
    assert!(fixture.root.join("vite_project_42").is_dir());
    assert_eq!(fixture.model.calls()[0].tool_names, vec!["ReadDir", "FileRead", "Exit"]);
}

#[tokio::test]
async fn test_generate_text_never_binds_tools() {
    let fixture = fixture(ScriptedChatModel::new("reasoning").with_text("```html\n<p/>\n```"));

    let content = fixture
        .service
        .generate_text("workflow", "a blog", OutputType::ProjectScaffold, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(content, "```html\n<p/>\n```");
    assert!(fixture.model.calls()[0].tool_names.is_empty());
    assert!(fixture.invoked.lock().is_empty());
}

#[tokio::test]
async fn test_cancelled_generation_returns_cancelled() {
    let fixture = fixture(ScriptedChatModel::new("standard").with_text("never seen"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut events = Vec::new();
    let mut on_event = |event: GenerationEvent| events.push(event);
    let result = fixture
        .service
        .generate("42", "page", OutputType::SingleFile, &mut on_event, &cancel)
        .await;

    assert!(matches!(result, Err(SitegenError::Cancelled)));
    assert!(events.is_empty());
}

#[test]
fn test_work_dir_rejects_path_like_targets() {
    let fixture = fixture(ScriptedChatModel::new("standard"));
    assert!(fixture.service.work_dir("../etc").is_err());
    assert_eq!(
        fixture.service.work_dir("7").unwrap(),
        fixture.root.join("vite_project_7")
    );
}

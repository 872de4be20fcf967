/// A full MCP session driven line by line, the way a client talks to the server
use habit_journal_mcp::mcp::protocol::error_codes;
use habit_journal_mcp::mcp::McpServer;
use habit_journal_mcp::*;
use serde_json::{json, Value};
use tempfile::tempdir;

struct Session {
    server: McpServer,
    next_id: u64,
}

impl Session {
    fn new(journal: JournalServer) -> Self {
        Self {
            server: McpServer::new(journal),
            next_id: 1,
        }
    }

    fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let line = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }).to_string();
        let response = self.server.process_line(&line).expect("requests get a response");
        let response = serde_json::to_value(response).unwrap();
        assert_eq!(response["id"], json!(id));
        response
    }

    fn call(&mut self, tool: &str, arguments: Value) -> Value {
        self.request("tools/call", json!({ "name": tool, "arguments": arguments }))
    }

    fn text(&mut self, tool: &str, arguments: Value) -> String {
        let response = self.call(tool, arguments);
        assert!(response["error"].is_null(), "{} failed: {}", tool, response["error"]);
        response["result"]["content"][0]["text"].as_str().unwrap().to_string()
    }
}

/// The id printed on the last "ID: ..." line of a tool message
fn last_id(message: &str) -> String {
    message
        .lines()
        .filter_map(|line| line.trim().strip_prefix("ID: ").or_else(|| line.trim().strip_prefix("Habit ID: ")))
        .last()
        .expect("message carries an id")
        .to_string()
}

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    #[tokio::test]
    async fn test_habit_session() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let journal = JournalServer::new(temp_dir.path().join("journal.db"), UserId::from("alice"))
            .await
            .unwrap();
        let mut session = Session::new(journal);

        let init = session.request(
            "initialize",
            json!({"protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": {"name": "test-client"}}),
        );
        assert!(init["result"]["capabilities"]["tools"].is_object());

        let created = session.text("habit_create", json!({"title": "Drink water", "category": "health"}));
        let habit_id = last_id(&created);

        let toggled = session.text("habit_toggle", json!({ "habit_id": habit_id }));
        assert!(toggled.contains("Drink water"));

        let status = session.text("habit_status", json!({ "habit_id": habit_id }));
        assert!(status.contains("Streak started"));

        let updated = session.text("habit_update", json!({ "habit_id": habit_id, "title": "Drink more water" }));
        assert!(updated.contains("Drink more water"));

        let dashboard = session.text("dashboard", json!({}));
        assert!(dashboard.contains("Today: 1/1 habits done"));

        session.text("habit_delete", json!({ "habit_id": habit_id }));
        let listed = session.text("habit_list", json!({}));
        assert!(listed.contains("No habits found"));

        let gone = session.call("habit_toggle", json!({ "habit_id": habit_id }));
        assert_eq!(gone["error"]["code"], json!(error_codes::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_journal_session() {
        let mut session = Session::new(JournalServer::in_memory(UserId::from("alice")));

        let logged = session.text(
            "mood_log",
            json!({"date": "2024-02-01", "mood": "okay", "energy": 3, "tags": ["Work"]}),
        );
        assert!(logged.contains("Logged"));

        let replaced = session.text("mood_log", json!({"date": "2024-02-01", "mood": "amazing", "energy": 5}));
        assert!(replaced.contains("Replaced"));

        let listed = session.text("mood_list", json!({}));
        assert!(listed.contains("(1 entries)"));
        let entry_id = last_id(&listed);

        let updated = session.text("mood_update", json!({ "entry_id": entry_id, "notes": "Great day" }));
        assert!(updated.contains("2024-02-01"));

        let stats = session.text("mood_stats", json!({ "days": 7 }));
        assert!(stats.contains("No journal entries in the last 7 days"));

        session.text("mood_delete", json!({ "entry_id": entry_id }));
        let again = session.call("mood_delete", json!({ "entry_id": entry_id }));
        assert_eq!(again["error"]["code"], json!(error_codes::NOT_FOUND));

        let bad_date = session.call("mood_log", json!({"date": "Feb 1", "mood": "okay", "energy": 3}));
        assert_eq!(bad_date["error"]["code"], json!(error_codes::VALIDATION_ERROR));
    }
}

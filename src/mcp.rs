use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::MenuCache;
use crate::config::Config;
use crate::format;
use crate::tokenize::Stoplist;

/// MCP server over stdio. Two tools:
/// - `docmenu_outline` → menu for a markdown or JSON file on disk
/// - `docmenu_build`   → menu for a document passed inline as JSON
pub fn run(config: Config) -> io::Result<()> {
    let server = Server::new(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    tracing::info!("mcp server listening on stdio");
    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                write_error(&mut stdout, None, -32700, &format!("parse error: {e}"))?;
                continue;
            }
        };

        // notifications carry no id and get no response
        if req.id.is_none() {
            continue;
        }

        let response = server.handle_request(&req);
        serde_json::to_writer(&mut stdout, &response)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    Ok(())
}

#[derive(Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

struct Server {
    config: Config,
    stoplist: Stoplist,
    cache: MenuCache,
}

impl Server {
    fn new(config: Config) -> Self {
        let stoplist = crate::stoplist(&config);
        Self {
            config,
            stoplist,
            cache: MenuCache::new(),
        }
    }

    fn handle_request(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        match req.method.as_str() {
            "initialize" => JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: Some(serde_json::json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": "docmenu",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                })),
                error: None,
            },

            "tools/list" => JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: Some(serde_json::json!({
                    "tools": tool_definitions()
                })),
                error: None,
            },

            "tools/call" => self.handle_tool_call(req),

            "ping" => JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: Some(serde_json::json!({})),
                error: None,
            },

            _ => JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: None,
                error: Some(JsonRpcError {
                    code: -32601,
                    message: format!("method not found: {}", req.method),
                }),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Tool dispatch
    // -----------------------------------------------------------------------

    /// Execute a tool by name with the given arguments. Returns formatted
    /// output or an error string.
    fn dispatch_tool(&self, tool: &str, args: &Value) -> Result<String, String> {
        match tool {
            "docmenu_outline" => self.tool_outline(args),
            "docmenu_build" => self.tool_build(args),
            _ => Err(format!("unknown tool: {tool}")),
        }
    }

    fn tool_outline(&self, args: &Value) -> Result<String, String> {
        let path_str = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or("missing required parameter: path")?;
        let path = PathBuf::from(path_str);
        let config = self.config_for(args);

        let mtime = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        // per-call overrides bypass the cache
        let menu = if config == self.config {
            self.cache
                .get_or_compute(&path, mtime, || {
                    crate::menu_for_path(&path, &self.config, &self.stoplist)
                })
                .map_err(|e| e.to_string())?
        } else {
            crate::menu_for_path(&path, &config, &self.stoplist)
                .map(std::sync::Arc::new)
                .map_err(|e| e.to_string())?
        };

        Ok(format::render_text(&path, &menu))
    }

    fn tool_build(&self, args: &Value) -> Result<String, String> {
        let document = args
            .get("document")
            .cloned()
            .ok_or("missing required parameter: document")?;
        let doc = crate::read::json::from_value(document)
            .map_err(|e| e.with_path(PathBuf::from("<document>")).to_string())?;
        let config = self.config_for(args);

        let menu = crate::build_menu(&doc, &config, &self.stoplist);
        Ok(menu.lines.join("\n"))
    }

    /// Server config with the optional `top` argument applied.
    fn config_for(&self, args: &Value) -> Config {
        let mut config = self.config.clone();
        if let Some(top) = args.get("top").and_then(Value::as_u64) {
            config.top_n = top as usize;
        }
        config
    }

    // -----------------------------------------------------------------------
    // MCP tool call handler
    // -----------------------------------------------------------------------

    fn handle_tool_call(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let params = &req.params;
        let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let args = params.get("arguments").unwrap_or(&Value::Null);

        let result = self.dispatch_tool(tool_name, args);

        match result {
            Ok(output) => JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: Some(serde_json::json!({
                    "content": [{
                        "type": "text",
                        "text": output
                    }]
                })),
                error: None,
            },
            Err(e) => JsonRpcResponse {
                jsonrpc: "2.0",
                id: req.id.clone(),
                result: Some(serde_json::json!({
                    "content": [{
                        "type": "text",
                        "text": e
                    }],
                    "isError": true
                })),
                error: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tool definitions
// ---------------------------------------------------------------------------

fn tool_definitions() -> Vec<Value> {
    vec![
        serde_json::json!({
            "name": "docmenu_outline",
            "description": "Build a numbered section menu for a markdown (.md) or JSON (.json) document. Each top-level section lists its most frequent words; hyperlinks are listed under the section they appear in.",
            "inputSchema": {
                "type": "object",
                "required": ["path"],
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Absolute or relative path to the document."
                    },
                    "top": {
                        "type": "number",
                        "default": 5,
                        "description": "How many frequent words to list per section."
                    }
                }
            }
        }),
        serde_json::json!({
            "name": "docmenu_build",
            "description": "Build a section menu from an inline document: {\"blocks\": [{\"type\": \"heading\", \"depth\": 2, \"text\": ...}, {\"type\": \"paragraph\", \"text\": ...}, {\"type\": \"list\", \"items\": [...]}], \"links\": [...], \"toc\": [...]}.",
            "inputSchema": {
                "type": "object",
                "required": ["document"],
                "properties": {
                    "document": {
                        "type": "object",
                        "description": "Document with `blocks`, optional `links`, `toc` and `title`."
                    },
                    "top": {
                        "type": "number",
                        "default": 5,
                        "description": "How many frequent words to list per section."
                    }
                }
            }
        }),
    ]
}

fn write_error(w: &mut impl Write, id: Option<Value>, code: i32, msg: &str) -> io::Result<()> {
    let resp = JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: msg.into(),
        }),
    };
    serde_json::to_writer(&mut *w, &resp)?;
    w.write_all(b"\n")?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            _jsonrpc: "2.0".into(),
            id: Some(Value::from(1)),
            method: method.into(),
            params,
        }
    }

    fn text_of(resp: &JsonRpcResponse) -> &str {
        resp.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
    }

    #[test]
    fn lists_both_tools() {
        let server = Server::new(Config::default());
        let resp = server.handle_request(&request("tools/list", Value::Null));
        let tools = &resp.result.unwrap()["tools"];
        assert_eq!(tools[0]["name"], "docmenu_outline");
        assert_eq!(tools[1]["name"], "docmenu_build");
    }

    #[test]
    fn build_inline_document() {
        let server = Server::new(Config::default());
        let resp = server.handle_request(&request(
            "tools/call",
            serde_json::json!({
                "name": "docmenu_build",
                "arguments": {
                    "top": 1,
                    "document": {
                        "blocks": [
                            {"type": "heading", "depth": 2, "text": "Diet"},
                            {"type": "paragraph", "text": "mice mice birds"}
                        ]
                    }
                }
            }),
        ));
        assert_eq!(
            text_of(&resp),
            "\t0 Intro Section\n\t1 Diet - 1 Most Frequent Words: mice (2 times)"
        );
    }

    #[test]
    fn invalid_document_is_tool_error() {
        let server = Server::new(Config::default());
        let resp = server.handle_request(&request(
            "tools/call",
            serde_json::json!({
                "name": "docmenu_build",
                "arguments": {"document": {"blocks": [{"type": "heading", "depth": 9, "text": "x"}]}}
            }),
        ));
        assert_eq!(resp.result.as_ref().unwrap()["isError"], true);
        assert!(text_of(&resp).starts_with("<document>: invalid document"));
    }

    #[test]
    fn outline_reads_file_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cats.md");
        std::fs::write(&path, "# Cats\n\n## Diet\n\nMice.\n").unwrap();
        let server = Server::new(Config::default());
        let args = serde_json::json!({"path": path.to_str().unwrap()});

        let out = server.tool_outline(&args).unwrap();
        assert!(out.starts_with(&format!("# {} — Cats (1 headings, 0 links)", path.display())));
        assert!(out.contains("\t1 Diet - 5 Most Frequent Words: mice (1 times)"));
        server.tool_outline(&args).unwrap();
        assert_eq!(server.cache.len(), 1);
    }

    #[test]
    fn unknown_method() {
        let server = Server::new(Config::default());
        let resp = server.handle_request(&request("resources/list", Value::Null));
        assert_eq!(resp.error.unwrap().code, -32601);
    }
}

//! Web server: the reference page, a JSON API, and the chat proxy.
//!
//! `tiny_http` blocks on `recv`, so the accept loop runs under
//! `spawn_blocking`. Page and JSON requests are answered inline; chat
//! requests are handed to tokio tasks so a slow upstream never stalls the
//! loop.

use std::io::{Cursor, Read};
use std::sync::Arc;

use anyhow::Context;
use jeongyeol_chat::{ChatClient, ChatError, ChatRequest};
use jeongyeol_store::{KnowledgeBase, search};
use serde::Serialize;
use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::page;

type Reply = Response<Cursor<Vec<u8>>>;

/// Upper bound on a chat request body.
const MAX_CHAT_BODY: u64 = 64 * 1024;

/// A request path resolved to the handler that answers it.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Page,
    Reference,
    Search(String),
    Chat,
    NotFound,
}

impl Route {
    fn resolve(method: &Method, url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        match (method, path) {
            (Method::Get, "/") => Self::Page,
            (Method::Get, "/api/reference") => Self::Reference,
            (Method::Get, "/api/search") => Self::Search(query_param(query, "q").unwrap_or_default()),
            (Method::Post, "/api/chat") => Self::Chat,
            _ => Self::NotFound,
        }
    }
}

/// Decode one form-encoded query parameter.
fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != name {
            return None;
        }
        let value = value.replace('+', " ");
        urlencoding::decode(&value).ok().map(|v| v.into_owned())
    })
}

// ── Responses ──

fn with_content_type(response: Reply, value: &str) -> Reply {
    match Header::from_bytes("Content-Type", value) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

fn html(body: String) -> Reply {
    with_content_type(Response::from_string(body), "text/html; charset=utf-8")
}

fn json_reply<T: Serialize>(status: u16, body: &T) -> Reply {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_content_type(
            Response::from_data(bytes).with_status_code(status),
            "application/json; charset=utf-8",
        ),
        Err(e) => {
            warn!(error = %e, "failed to serialise response");
            Response::from_string("internal error").with_status_code(500)
        }
    }
}

fn not_found() -> Reply {
    json_reply(404, &json!({ "error": "not found" }))
}

/// The JSON body and status for a failed chat round trip.
fn chat_error_reply(e: &ChatError) -> (u16, serde_json::Value) {
    let mut body = json!({ "error": e.user_message() });
    if let Some(details) = e.details() {
        body["details"] = json!(details);
    }
    (e.status_code(), body)
}

// ── Handlers ──

fn search_reply(kb: &KnowledgeBase, query: &str) -> Reply {
    let reference = kb.assemble();
    let results = search(&reference, query);
    debug!(query, hits = results.len(), "search");
    json_reply(200, &json!({ "status": "ok", "results": results }))
}

async fn chat_reply(client: Option<Arc<ChatClient>>, body: &str) -> Reply {
    let request: ChatRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "unparseable chat body");
            ChatRequest::default()
        }
    };
    let outcome = match client {
        _ if request.message.trim().is_empty() => Err(ChatError::EmptyMessage),
        None => Err(ChatError::NotConfigured),
        Some(client) => client.ask(&request.message, request.conversation()).await,
    };
    match outcome {
        Ok(reply) => json_reply(200, &reply),
        Err(e) => {
            warn!(error = %e, "chat request failed");
            let (status, body) = chat_error_reply(&e);
            json_reply(status, &body)
        }
    }
}

/// Read at most `MAX_CHAT_BODY` bytes; unreadable bodies come back empty.
fn read_body(reader: impl Read) -> String {
    let mut body = String::new();
    if let Err(e) = reader.take(MAX_CHAT_BODY).read_to_string(&mut body) {
        debug!(error = %e, "failed to read chat body");
        body.clear();
    }
    body
}

fn respond(request: Request, response: Reply) {
    if let Err(e) = request.respond(response) {
        debug!(error = %e, "client went away before the response was sent");
    }
}

fn accept_loop(server: Server, kb: KnowledgeBase, chat: Option<Arc<ChatClient>>, runtime: Handle) {
    for mut request in server.incoming_requests() {
        let route = Route::resolve(request.method(), request.url());
        debug!(method = %request.method(), url = request.url(), "request");

        match route {
            Route::Page => {
                let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                respond(request, html(page::render(&kb.assemble(), &generated_at)));
            }
            Route::Reference => respond(request, json_reply(200, &kb.assemble())),
            Route::Search(query) => respond(request, search_reply(&kb, &query)),
            Route::Chat => {
                let body = read_body(request.as_reader());
                let client = chat.clone();
                runtime.spawn(async move {
                    let response = chat_reply(client, &body).await;
                    respond(request, response);
                });
            }
            Route::NotFound => respond(request, not_found()),
        }
    }
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run(addr: &str, kb: KnowledgeBase, chat: Option<ChatClient>) -> anyhow::Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow::anyhow!("binding {addr}: {e}"))?;
    info!(
        addr,
        knowledge_base = %kb.root().display(),
        chat = chat.is_some(),
        "serving approval reference"
    );

    let runtime = Handle::current();
    let chat = chat.map(Arc::new);
    tokio::task::spawn_blocking(move || accept_loop(server, kb, chat, runtime))
        .await
        .context("server loop panicked")?;
    Ok(())
}

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use cv_analyzer::{
    handlers::create_router,
    services::llm_client::{ChatBackend, ChatCompletionRequest, LlmError},
    AppState, Config,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Builds a PDF with one page per entry; each page shows its string with `Tj`.
/// An empty entry produces a page that only paints a rectangle.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            vec![
                Operation::new("re", vec![50.into(), 50.into(), 400.into(), 600.into()]),
                Operation::new("f", vec![]),
            ]
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize pdf");
    buffer
}

/// One page whose text is drawn with a Type0 font using Identity-H encoding,
/// as word processors export it. Glyph ids equal the ASCII codes and a
/// ToUnicode CMap maps them back.
pub fn identity_h_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let cmap = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0020> <007E> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";
    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, cmap.as_bytes().to_vec()));
    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "Calibri",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "Calibri",
            "Flags" => 32,
            "FontBBox" => vec![(-500).into(), (-250).into(), 1500.into(), 1000.into()],
            "ItalicAngle" => 0,
            "Ascent" => 750,
            "Descent" => -250,
            "CapHeight" => 650,
            "StemV" => 80,
        },
        "DW" => 500,
    });
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "Calibri",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![descendant_id.into()],
        "ToUnicode" => to_unicode_id,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let glyphs: Vec<u8> = text
        .bytes()
        .flat_map(|b| [0u8, b])
        .collect();
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
            Operation::new("Tj", vec![Object::String(glyphs, StringFormat::Hexadecimal)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode page content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize pdf");
    buffer
}

/// Text with all whitespace removed, for comparisons that ignore layout.
pub fn squash(text: &str) -> String {
    text.split_whitespace().collect()
}

/// A single page carrying no text layer, like a scanned image.
pub fn scanned_pdf() -> Vec<u8> {
    pdf_with_pages(&[""])
}

/// Three pages of text, roughly 500 characters in total.
pub fn three_page_resume() -> (Vec<u8>, [String; 3]) {
    let pages = [
        format!("Jane Doe Senior Software Engineer {}", "a".repeat(130)),
        format!("Experience Rust services at Example Corp {}", "b".repeat(125)),
        format!("Education MSc Computer Science {}", "c".repeat(135)),
    ];
    let refs: Vec<&str> = pages.iter().map(String::as_str).collect();
    (pdf_with_pages(&refs), pages)
}

/// Backend double that records every request and replies with a fixed outcome.
pub struct RecordingBackend {
    pub calls: Mutex<Vec<ChatCompletionRequest>>,
    reply: Result<String, u16>,
    delay: Option<Duration>,
}

impl RecordingBackend {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(answer.to_string()),
            delay: None,
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(status),
            delay: None,
        })
    }

    pub fn slow(answer: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(answer.to_string()),
            delay: Some(delay),
        })
    }

    pub fn calls(&self) -> Vec<ChatCompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for RecordingBackend {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Ok(answer) => Ok(answer.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "upstream secret detail".to_string(),
            }),
        }
    }
}

pub fn test_config(base_url: &str) -> Config {
    test_config_with(base_url, &[])
}

/// Test configuration with extra variables layered over the defaults.
pub fn test_config_with(base_url: &str, overrides: &[(&str, &str)]) -> Config {
    let base_url = base_url.to_string();
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |name| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| k == name) {
            return Some(value.clone());
        }
        match name {
            "OPENROUTER_API_KEY" => Some("test-key".to_string()),
            "OPENROUTER_BASE_URL" => Some(base_url.clone()),
            "REQUEST_TIMEOUT_SECONDS" => Some("5".to_string()),
            _ => None,
        }
    })
    .expect("test config")
}

/// Request bodies received by the mock backend.
pub type RequestLog = Arc<Mutex<Vec<Value>>>;

#[derive(Clone)]
struct MockState {
    requests: RequestLog,
    status: StatusCode,
    body: Value,
}

/// Serves `POST /chat/completions` with a canned reply and records request bodies
/// (with the authorization header under `_authorization`).
pub async fn spawn_mock_backend(
    status: StatusCode,
    body: Value,
) -> (String, RequestLog) {
    let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        status,
        body,
    };

    async fn completions(
        State(state): State<MockState>,
        headers: axum::http::HeaderMap,
        Json(mut payload): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        payload["_authorization"] = json!(auth);
        state.requests.lock().unwrap().push(payload);
        (state.status, Json(state.body.clone()))
    }

    let app = Router::new()
        .route("/chat/completions", post(completions))
        .with_state(state);
    let addr = serve(app).await;
    (format!("http://{}", addr), requests)
}

pub fn completion_body(answer: &str) -> Value {
    json!({
        "id": "gen-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": answer } }
        ]
    })
}

pub async fn spawn_app(state: AppState) -> String {
    let addr = serve(create_router(state)).await;
    format!("http://{}", addr)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}
